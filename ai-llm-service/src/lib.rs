//! Shared LLM access for the advisor backend.
//!
//! Wraps Ollama and OpenAI-compatible endpoints behind [`service_profiles::LlmServiceProfiles`]
//! with three logical profiles (fast, slow, embedding), env-driven defaults and
//! resilient health probes.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError};
pub use health_service::HealthStatus;
pub use service_profiles::LlmServiceProfiles;
