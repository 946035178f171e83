// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for Storyloom's external-service boundaries.

pub mod adapter;
pub mod captioner;
pub mod generator;
pub mod identity;

pub use adapter::ServiceAdapter;
pub use captioner::CaptionProvider;
pub use generator::StoryProvider;
pub use identity::IdentityBackend;
