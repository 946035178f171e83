// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Storyloom.
//!
//! Exposes credential endpoints (reachable while anonymous) and pipeline
//! endpoints (behind the session gate), and maps every pipeline failure to
//! a distinct user-visible JSON message.

pub mod auth;
pub mod handlers;
pub mod server;

pub use server::{AppState, ServerConfig, build_router, start_server};
