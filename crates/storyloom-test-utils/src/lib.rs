// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Storyloom integration tests.
//!
//! Provides mock implementations of the captioning and generation adapter
//! traits so pipeline and gateway tests run deterministically without
//! external services.

pub mod mock_captioner;
pub mod mock_generator;

pub use mock_captioner::MockCaptioner;
pub use mock_generator::{MockStoryProvider, completed, safety_blocked, truncated};
