// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image-captioning adapter: upload decoding plus the hosted inference client.
//!
//! Implements [`storyloom_core::CaptionProvider`] against a hosted
//! BLIP-style captioning endpoint.

pub mod client;
pub mod decode;
pub mod types;

pub use client::HostedCaptioner;
pub use decode::{decode_upload, encode_jpeg};
