// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `storyloom doctor`: health-check the configured external services.

use storyloom_config::StoryloomConfig;
use storyloom_core::types::HealthStatus;
use storyloom_core::{ServiceAdapter, StoryloomError};

use crate::serve;

/// Check every configured adapter and print one status line each.
pub async fn run(config: StoryloomConfig) -> Result<(), StoryloomError> {
    let backend = serve::build_identity_backend(&config)?;
    report(backend.as_ref(), backend.health_check().await);

    match serve::build_captioner(&config)? {
        Some(captioner) => report(captioner.as_ref(), captioner.health_check().await),
        None => println!("captioner: disabled (captioner.api_key not set)"),
    }

    match serve::build_generator(&config)? {
        Some(generator) => report(generator.as_ref(), generator.health_check().await),
        None => println!("generator: disabled (generator.api_key not set)"),
    }

    Ok(())
}

fn report<A: ServiceAdapter + ?Sized>(adapter: &A, result: Result<HealthStatus, StoryloomError>) {
    let line = match result {
        Ok(HealthStatus::Healthy) => "healthy".to_string(),
        Ok(HealthStatus::Degraded(reason)) => format!("degraded: {reason}"),
        Ok(HealthStatus::Unhealthy(reason)) => format!("unhealthy: {reason}"),
        Err(err) => format!("check failed: {err}"),
    };
    println!(
        "{} ({}/{}): {}",
        adapter.name(),
        adapter.adapter_type(),
        adapter.version(),
        line
    );
}
