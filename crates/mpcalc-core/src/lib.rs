mod app_config;
mod config;
mod policy;
mod records;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use policy::{
    load_policy, OzonPolicy, SolverStrategy, StepSchedule, TariffPolicy, VolumeBand,
    WildberriesPolicy, YandexPolicy,
};
pub use records::{DateRange, FulfillmentModel, InventoryItem, OrderLine};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read tariff policy file {path}: {source}")]
    PolicyFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tariff policy file: {0}")]
    PolicyFileParse(#[from] serde_yaml::Error),

    #[error("tariff policy validation failed: {0}")]
    Validation(String),
}
