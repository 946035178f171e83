// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Storyloom pipeline: caption aggregation and genre-conditioned story
//! composition over injected service adapters.
//!
//! Data flows one way and synchronously: uploaded images -> ordered
//! captions -> joined prompt -> generated story text. No state outlives a
//! single invocation.

pub mod composer;
pub mod controller;

pub use composer::{ComposeError, STORYTELLER_SYSTEM_PROMPT, StoryComposer, build_prompt};
pub use controller::{
    CaptionAttempt, CaptionBatch, CaptionReport, PipelineController, StoryError,
};
