// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible text-generation adapter.
//!
//! Implements [`storyloom_core::StoryProvider`] against any
//! chat-completions-shaped API.

pub mod client;
pub mod types;

pub use client::OpenAiClient;
