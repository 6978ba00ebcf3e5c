//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, DirectorySettings, EventsSettings, LogFormat, LoggingConfig,
    ServerConfig, StorageConfig,
};
