use thiserror::Error;

pub mod app_config;
pub mod classify;
pub mod config;
pub mod metrics;
pub mod stores;

pub use app_config::AppConfig;
pub use classify::{MetricKind, Thresholds};
pub use config::{load_app_config, load_app_config_from_env};
pub use metrics::{
    parse_metric_value, InfItem, StoreAccumulator, StoreAggregate, StoreMetrics, StoreResult,
    WorkerRecord,
};
pub use stores::{load_stores, short_store_name, StoreConfig, StoresFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read stores file {path}: {source}")]
    StoresFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse stores file: {0}")]
    StoresFileParse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
