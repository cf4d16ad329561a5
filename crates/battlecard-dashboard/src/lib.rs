//! Application-state controller for the battle card dashboard.
//!
//! [`Dashboard`] owns the profile and logo stores, the current selection and
//! the chat transcript. Both the HTTP server and the CLI drive it.

pub mod chat;
mod controller;
pub mod refresh;
pub mod staleness;
pub mod views;

#[cfg(test)]
mod testing;

pub use chat::{ChatMessage, ChatRole, ChatTranscript};
pub use controller::{CompetitorSummary, Dashboard, DashboardStatus};
pub use refresh::{RefreshFailure, RefreshReport, RefreshStrategy};
pub use staleness::{select_stale, StalenessState, FRESHNESS_WINDOW};
pub use views::{render_section, render_text, SectionView};

use battlecard_core::LogoValidationError;
use battlecard_export::ExportError;
use battlecard_gemini::GenerationError;
use battlecard_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("competitor not found: {0}")]
    NotFound(String),

    #[error("cannot delete the last remaining competitor")]
    LastProfile,

    #[error("competitor {0} has no URL to refresh from")]
    MissingUrl(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("profile generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("logo rejected: {0}")]
    Logo(#[from] LogoValidationError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

impl From<StoreError> for DashboardError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::LastProfile => Self::LastProfile,
        }
    }
}
