// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Storyloom caption-to-story pipeline.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Storyloom workspace. All service
//! adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::StoryloomError;
pub use types::{AdapterType, Genre, HealthStatus, Session, SessionToken};

// Re-export all adapter traits at crate root.
pub use traits::{CaptionProvider, IdentityBackend, ServiceAdapter, StoryProvider};
