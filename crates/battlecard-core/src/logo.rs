//! Brand logo upload validation and data-URI encoding.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted upload, inclusive.
pub const MAX_LOGO_BYTES: usize = 1024 * 1024;

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
const JPEG_SOI: &[u8] = &[0xff, 0xd8, 0xff];

/// Why a logo upload was rejected. Validation runs before any state changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogoValidationError {
    #[error("invalid file format '{0}'; upload a PNG, JPG, or SVG")]
    UnsupportedType(String),

    #[error("file is too large ({size} bytes); the maximum size is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("failed to read file: {0}")]
    Unreadable(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogoKind {
    Png,
    Jpeg,
    Svg,
}

impl LogoKind {
    fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/svg+xml" => Some(Self::Svg),
            _ => None,
        }
    }

    fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Svg => "image/svg+xml",
        }
    }

    fn check_readable(self, bytes: &[u8]) -> Result<(), LogoValidationError> {
        match self {
            Self::Png if !bytes.starts_with(PNG_SIGNATURE) => {
                Err(LogoValidationError::Unreadable("not a PNG image"))
            }
            Self::Jpeg if !bytes.starts_with(JPEG_SOI) => {
                Err(LogoValidationError::Unreadable("not a JPEG image"))
            }
            Self::Svg => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|_| LogoValidationError::Unreadable("SVG is not valid UTF-8"))?;
                if text.contains("<svg") {
                    Ok(())
                } else {
                    Err(LogoValidationError::Unreadable("no <svg> element found"))
                }
            }
            _ => Ok(()),
        }
    }
}

/// A validated logo, held as a `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogoDataUri(String);

impl LogoDataUri {
    /// Wrap a previously stored data URI without re-validating it.
    #[must_use]
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Split the URI back into its MIME type and decoded bytes.
    ///
    /// Returns `None` if the stored value is not a base64 data URI.
    #[must_use]
    pub fn decode(&self) -> Option<(String, Vec<u8>)> {
        let rest = self.0.strip_prefix("data:")?;
        let (meta, payload) = rest.split_once(',')?;
        let mime = meta.strip_suffix(";base64")?;
        let bytes = STANDARD.decode(payload).ok()?;
        Some((mime.to_string(), bytes))
    }
}

/// Validate an uploaded logo and encode it as a data URI.
///
/// Checks run in order: content type, size, then readability.
///
/// # Errors
///
/// Returns [`LogoValidationError::UnsupportedType`] for anything other than
/// PNG, JPEG, or SVG, [`LogoValidationError::TooLarge`] above
/// [`MAX_LOGO_BYTES`], and [`LogoValidationError::Unreadable`] for empty or
/// malformed payloads.
pub fn validate_logo(content_type: &str, bytes: &[u8]) -> Result<LogoDataUri, LogoValidationError> {
    let kind = LogoKind::from_content_type(content_type)
        .ok_or_else(|| LogoValidationError::UnsupportedType(content_type.to_string()))?;

    if bytes.len() > MAX_LOGO_BYTES {
        return Err(LogoValidationError::TooLarge {
            size: bytes.len(),
            max: MAX_LOGO_BYTES,
        });
    }
    if bytes.is_empty() {
        return Err(LogoValidationError::Unreadable("file is empty"));
    }
    kind.check_readable(bytes)?;

    Ok(LogoDataUri(format!(
        "data:{};base64,{}",
        kind.mime(),
        STANDARD.encode(bytes)
    )))
}
