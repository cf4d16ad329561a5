pub mod app_config;
pub mod brand;
pub mod config;
pub mod logo;
pub mod profile;
pub mod section;

pub use app_config::{AppConfig, Environment};
pub use brand::BrandContext;
pub use config::{load_app_config, load_app_config_from_env};
pub use logo::{validate_logo, LogoDataUri, LogoValidationError, MAX_LOGO_BYTES};
pub use profile::{
    derive_profile_id, file_token, CompetitorProfile, CriticalReview, FeatureComparison, KillShot, Momentum,
    PlatformCoverage, Pricing, ProfileMap, RedFlags, ReviewAnalysis, ReviewCount, Summary,
};
pub use section::SectionType;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown section: {0}")]
    UnknownSection(String),
}
