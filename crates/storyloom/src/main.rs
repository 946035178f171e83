// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storyloom - caption images, then weave the captions into a story.
//!
//! This is the binary entry point for the Storyloom service.

use clap::{Parser, Subcommand};

use storyloom_config::StoryloomConfig;

mod doctor;
mod serve;

/// Storyloom - caption images, then weave the captions into a story.
#[derive(Parser, Debug)]
#[command(name = "storyloom", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Storyloom gateway server.
    Serve,
    /// Health-check the configured external services.
    Doctor,
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match storyloom_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            storyloom_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run(config).await,
        Some(Commands::Doctor) => doctor::run(config).await,
        Some(Commands::Config) => {
            print_config(&config);
            Ok(())
        }
        None => {
            eprintln!("storyloom: use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        tracing::error!(error = %err, "storyloom exited with error");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber once.
///
/// `RUST_LOG` overrides the configured level when set.
fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Print the effective configuration as TOML with API keys redacted.
fn print_config(config: &StoryloomConfig) {
    let mut redacted = config.clone();
    redact(&mut redacted.captioner.api_key);
    redact(&mut redacted.generator.api_key);
    redact(&mut redacted.auth.provider_api_key);

    match toml::to_string_pretty(&redacted) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("failed to render config: {err}"),
    }
}

fn redact(secret: &mut Option<String>) {
    if secret.is_some() {
        *secret = Some("[redacted]".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_replaces_present_secrets_only() {
        let mut present = Some("sk-very-secret".to_string());
        redact(&mut present);
        assert_eq!(present.as_deref(), Some("[redacted]"));

        let mut absent: Option<String> = None;
        redact(&mut absent);
        assert!(absent.is_none());
    }

    #[test]
    fn default_config_is_valid() {
        // The binary must start with no config file present.
        let config = StoryloomConfig::default();
        assert_eq!(config.gateway.port, 8080);
        assert!(config.captioner.api_key.is_none());
    }
}
