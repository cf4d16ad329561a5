//! Battle card exporters: CSV, Word-compatible HTML, and PDF.
//!
//! Every exporter is a pure projection of one profile. The three formats
//! cover the same fields; only layout differs.

pub mod csv_export;
pub mod html;
pub mod pdf;

use std::str::FromStr;

use battlecard_core::{file_token, BrandContext, CompetitorProfile};
use chrono::NaiveDate;
use thiserror::Error;

pub use csv_export::export_csv;
pub use html::export_html;
pub use pdf::export_pdf;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unknown export format: {0} (expected csv, html, doc or pdf)")]
    UnknownFormat(String),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush export buffer: {0}")]
    Flush(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    /// HTML wrapped for word processors, saved as `.doc`.
    Html,
    Pdf,
}

impl ExportFormat {
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Html => "application/msword",
            Self::Pdf => "application/pdf",
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Html => "doc",
            Self::Pdf => "pdf",
        }
    }

    /// Report kind used as the filename prefix.
    #[must_use]
    pub fn report_kind(self) -> &'static str {
        match self {
            Self::Csv => "Analysis",
            Self::Html => "Report",
            Self::Pdf => "BattleCard",
        }
    }

    /// `<kind>_<brand>_vs_<competitor>.<ext>`, e.g.
    /// `BattleCard_Swatio_vs_Sprout_Social.pdf`.
    #[must_use]
    pub fn filename(self, brand: &BrandContext, competitor_name: &str) -> String {
        format!(
            "{}_{}_vs_{}.{}",
            self.report_kind(),
            brand.file_token(),
            file_token(competitor_name),
            self.extension()
        )
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Html => write!(f, "html"),
            Self::Pdf => write!(f, "pdf"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "html" | "doc" => Ok(Self::Html),
            "pdf" => Ok(Self::Pdf),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// A rendered export ready to be written to disk or sent as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Render `profile` in `format`.
///
/// # Errors
///
/// Returns [`ExportError`] if the CSV writer fails.
pub fn export(
    profile: &CompetitorProfile,
    brand: &BrandContext,
    format: ExportFormat,
    generated_on: NaiveDate,
) -> Result<ExportedFile, ExportError> {
    let bytes = match format {
        ExportFormat::Csv => export_csv(profile, brand)?,
        ExportFormat::Html => export_html(profile, brand, generated_on),
        ExportFormat::Pdf => export_pdf(profile, brand),
    };
    Ok(ExportedFile {
        filename: format.filename(brand, &profile.name),
        content_type: format.content_type(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_aliases() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("doc".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert_eq!("html".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert_eq!(" pdf ".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!(matches!(
            "xlsx".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(ref f)) if f == "xlsx"
        ));
    }

    #[test]
    fn filenames_follow_kind_brand_competitor_pattern() {
        let brand = BrandContext::default();
        assert_eq!(
            ExportFormat::Csv.filename(&brand, "Hootsuite"),
            "Analysis_Swatio_vs_Hootsuite.csv"
        );
        assert_eq!(
            ExportFormat::Html.filename(&brand, "Sprout Social"),
            "Report_Swatio_vs_Sprout_Social.doc"
        );
        assert_eq!(
            ExportFormat::Pdf.filename(&brand, "Later / Inc."),
            "BattleCard_Swatio_vs_Later_Inc.pdf"
        );
    }
}

#[cfg(test)]
#[path = "coverage_test.rs"]
mod coverage_tests;
