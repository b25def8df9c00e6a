//! Core: configuration and environment setup

pub mod config;

pub use config::{EngineConfig, setup_environment};
