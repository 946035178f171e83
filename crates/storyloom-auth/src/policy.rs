// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password strength policy.
//!
//! The policy is checked before any identity backend is touched, so a weak
//! password never results in a backend call or a created record.

/// Minimum password length in characters.
const MIN_PASSWORD_LEN: usize = 8;

/// Returns true when the password satisfies the strength policy:
/// at least 8 characters and at least one non-alphanumeric symbol.
pub fn password_meets_policy(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| !c.is_alphanumeric())
}
