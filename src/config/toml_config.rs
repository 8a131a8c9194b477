use crate::domain::model::CompressionOptions;
use crate::utils::error::{Result, UploadError};
use crate::utils::validation::{
    validate_mime_types, validate_positive_number, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File-based settings for the upload flow. Every section is optional; the
/// CLI merges whatever is present over its defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub limits: Option<LimitsConfig>,
    pub compression: Option<CompressionOptions>,
    pub preview: Option<PreviewConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub max_upload_size: Option<u64>,
    pub supported_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    pub base_url: Option<String>,
    pub path: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(UploadError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| UploadError::InvalidConfigValue {
            field: "toml_parsing".to_string(),
            value: String::new(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` placeholders with environment values; unknown
    /// variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("static pattern");

        re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(limits) = &self.limits {
            if let Some(max) = limits.max_upload_size {
                validate_positive_number("limits.max_upload_size", max, 1)?;
            }
            if let Some(types) = &limits.supported_types {
                validate_mime_types("limits.supported_types", types)?;
            }
        }

        if let Some(compression) = &self.compression {
            validate_range("compression.jpeg_quality", compression.jpeg_quality, 1, 100)?;
            validate_range(
                "compression.webp_quality",
                compression.webp_quality,
                0.0,
                100.0,
            )?;
        }

        if let Some(preview) = &self.preview {
            if let Some(base) = &preview.base_url {
                validate_url("preview.base_url", base)?;
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[limits]
max_upload_size = 1048576
supported_types = ["image/png", "image/webp"]

[compression]
jpeg_quality = 70

[preview]
base_url = "https://forms.example.com"
path = "attachments"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        let limits = config.limits.as_ref().unwrap();
        assert_eq!(limits.max_upload_size, Some(1_048_576));
        assert_eq!(
            limits.supported_types.as_ref().unwrap(),
            &["image/png".to_string(), "image/webp".to_string()]
        );

        // Unset compression fields fall back to the shipped defaults.
        let compression = config.compression.as_ref().unwrap();
        assert_eq!(compression.jpeg_quality, 70);
        assert_eq!(compression.webp_quality, 85.0);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_PREVIEW_BASE", "https://test.example.com");

        let toml_content = r#"
[preview]
base_url = "${TEST_PREVIEW_BASE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.preview.unwrap().base_url.unwrap(),
            "https://test.example.com"
        );

        std::env::remove_var("TEST_PREVIEW_BASE");
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let bad_base = r#"
[preview]
base_url = "not-a-url"
"#;
        let config = TomlConfig::from_toml_str(bad_base).unwrap();
        assert!(config.validate().is_err());

        let bad_mime = r#"
[limits]
supported_types = ["image/tiff"]
"#;
        let config = TomlConfig::from_toml_str(bad_mime).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[limits]
max_upload_size = 524288
"#;
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.limits.unwrap().max_upload_size, Some(524_288));
    }
}
