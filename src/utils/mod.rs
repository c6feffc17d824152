/// TOML configuration loading and validation.
pub mod toml_config;
/// Text truncation and formatting helpers.
pub mod text;
