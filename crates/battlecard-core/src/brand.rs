use serde::{Deserialize, Serialize};

/// The brand the battle cards argue for.
///
/// Feeds the generator's role instructions and names the exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandContext {
    pub name: String,
    pub positioning: String,
    pub usp: String,
    pub audience: String,
    /// Natural language the generated profiles are written in.
    pub output_language: String,
}

impl BrandContext {
    /// Filename-safe token for the brand, e.g. `"Swat.io"` → `"Swatio"`.
    #[must_use]
    pub fn file_token(&self) -> String {
        crate::profile::file_token(&self.name)
    }
}

impl Default for BrandContext {
    fn default() -> Self {
        Self {
            name: "Swat.io".to_string(),
            positioning: "Enterprise social media management for the DACH region".to_string(),
            usp: "Stable governance, GDPR compliance with EU hosting, excellent personal support, all-in-one inbox and publishing".to_string(),
            audience: "Mid-market to enterprise, public sector, agencies".to_string(),
            output_language: "English".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_token_strips_punctuation() {
        let brand = BrandContext::default();
        assert_eq!(brand.file_token(), "Swatio");
    }

    #[test]
    fn file_token_keeps_dashes_and_underscores() {
        let brand = BrandContext {
            name: "Acme-Social_Suite 2".to_string(),
            ..BrandContext::default()
        };
        assert_eq!(brand.file_token(), "Acme-Social_Suite_2");
    }
}
