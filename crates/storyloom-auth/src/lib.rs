// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication for Storyloom: credential store, password policy,
//! identity backends, and the session gate.
//!
//! The credential store checks the password policy and delegates record
//! persistence to an injected [`storyloom_core::IdentityBackend`]; the
//! session registry turns verified logins into resolvable bearer tokens.

pub mod memory;
pub mod policy;
pub mod remote;
pub mod session;
pub mod store;

pub use memory::MemoryIdentityBackend;
pub use remote::RemoteIdentityBackend;
pub use session::SessionRegistry;
pub use store::{CredentialStore, LoginOutcome, SignupOutcome};
