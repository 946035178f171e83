// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Storyloom service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Storyloom configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values; the
/// API keys have no defaults, and their absence disables the affected
/// feature rather than failing startup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoryloomConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub app: AppConfig,

    /// HTTP gateway bind settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Image-captioning service settings.
    #[serde(default)]
    pub captioner: CaptionerConfig,

    /// Text-generation service settings.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Credential backend settings.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Process-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Image-captioning service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CaptionerConfig {
    /// API key for the captioning service. `None` disables captioning.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Inference endpoint URL for the captioning model.
    #[serde(default = "default_caption_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_caption_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CaptionerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_caption_endpoint(),
            timeout_secs: default_caption_timeout_secs(),
        }
    }
}

fn default_caption_endpoint() -> String {
    "https://api-inference.huggingface.co/models/Salesforce/blip-image-captioning-base"
        .to_string()
}

fn default_caption_timeout_secs() -> u64 {
    60
}

/// Text-generation service configuration (OpenAI-compatible API).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// API key for the text-generation service. `None` disables story
    /// generation.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model identifier for story generation.
    #[serde(default = "default_generator_model")]
    pub model: String,

    /// Fixed sampling temperature for story generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Selectable story length bounds, in output tokens.
    #[serde(default = "default_length_options")]
    pub length_options: Vec<u32>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_generator_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_api_base(),
            model: default_generator_model(),
            temperature: default_temperature(),
            length_options: default_length_options(),
            timeout_secs: default_generator_timeout_secs(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_generator_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_length_options() -> Vec<u32> {
    vec![500, 750]
}

fn default_generator_timeout_secs() -> u64 {
    120
}

/// Credential backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Which identity backend to use: `memory` or `remote`.
    #[serde(default = "default_auth_backend")]
    pub backend: String,

    /// Base URL of the remote identity provider. Required when
    /// `backend = "remote"`.
    #[serde(default)]
    pub provider_url: Option<String>,

    /// API key for the remote identity provider.
    #[serde(default)]
    pub provider_api_key: Option<String>,

    /// Per-request timeout in seconds for the remote backend.
    #[serde(default = "default_auth_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            backend: default_auth_backend(),
            provider_url: None,
            provider_api_key: None,
            timeout_secs: default_auth_timeout_secs(),
        }
    }
}

fn default_auth_backend() -> String {
    "memory".to_string()
}

fn default_auth_timeout_secs() -> u64 {
    30
}
