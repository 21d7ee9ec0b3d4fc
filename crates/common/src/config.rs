//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RobovidError, RobovidResult};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "ROBOVID_CONFIG";

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the content snapshot and all generated assets.
    pub content_dir: PathBuf,

    /// Text stage settings.
    pub text: TextConfig,

    /// Rendering stage settings.
    pub render: RenderConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Settings for fetching and enriching source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Locale passed to the text source and keyword extractor (e.g. "pt").
    pub locale: String,

    /// Maximum keywords kept per sentence.
    pub keyword_limit: usize,

    /// Per-request deadline for external services, in seconds.
    pub request_timeout_secs: u64,

    /// MediaWiki API endpoint. `{locale}` is substituted.
    pub wikipedia_endpoint: String,

    /// Base URL of the NLU keyword service.
    pub keyword_service_url: String,

    /// API key for the keyword service.
    pub keyword_api_key: Option<String>,
}

/// Settings for image composition and video rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// ImageMagick executable used for composition.
    pub compositor_binary: String,

    /// Deadline for a single composition call, in seconds.
    pub compositor_timeout_secs: u64,

    /// Background canvas width in pixels.
    pub width: u32,

    /// Background canvas height in pixels.
    pub height: u32,

    /// Gaussian blur sigma for the background fill.
    pub blur_sigma: u32,

    /// Path to the external renderer executable.
    pub renderer_binary: PathBuf,

    /// Composition name passed to the renderer.
    pub composition: String,

    /// Renderer project/template file.
    pub template_project: PathBuf,

    /// Video file name, relative to the content directory.
    pub output_file: String,

    /// Render-script file name, relative to the content directory.
    pub script_file: String,

    /// Upper bound on the renderer run time, in seconds.
    pub timeout_secs: u64,

    /// How a renderer exit status is interpreted.
    pub exit_policy: ExitPolicy,
}

/// Interpretation of the renderer's exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExitPolicy {
    /// Non-zero exit is a failure.
    #[default]
    Strict,
    /// Any exit counts as success.
    Lenient,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "robovid=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            text: TextConfig::default(),
            render: RenderConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            locale: "pt".to_string(),
            keyword_limit: 2,
            request_timeout_secs: 3,
            wikipedia_endpoint: "https://{locale}.wikipedia.org/w/api.php".to_string(),
            keyword_service_url:
                "https://api.us-south.natural-language-understanding.watson.cloud.ibm.com"
                    .to_string(),
            keyword_api_key: None,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            compositor_binary: "convert".to_string(),
            compositor_timeout_secs: 60,
            width: 1920,
            height: 1080,
            blur_sigma: 9,
            renderer_binary: PathBuf::from("aerender"),
            composition: "main".to_string(),
            template_project: PathBuf::from("templates/1/template.aep"),
            output_file: "output.mov".to_string(),
            script_file: "after-effects-script.js".to_string(),
            timeout_secs: 3600,
            exit_policy: ExitPolicy::Strict,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from `ROBOVID_CONFIG` or the standard location, falling
    /// back to defaults when neither names a file.
    ///
    /// A file that is named but unreadable, malformed, or invalid is an
    /// error.
    pub fn load() -> RobovidResult<Self> {
        let explicit = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        Self::resolve(explicit.as_deref(), &config_file_path())
    }

    fn resolve(explicit: Option<&Path>, default_path: &Path) -> RobovidResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        if default_path.exists() {
            return Self::load_from(default_path);
        }
        Ok(Self::default())
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> RobovidResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RobovidError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            RobovidError::config(format!("cannot parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> RobovidResult<()> {
        if self.text.keyword_limit == 0 {
            return Err(RobovidError::config("text.keyword_limit must be at least 1"));
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(RobovidError::config("render.width and render.height must be non-zero"));
        }
        if self.render.timeout_secs == 0 || self.render.compositor_timeout_secs == 0 {
            return Err(RobovidError::config("render timeouts must be non-zero"));
        }
        Ok(())
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("robovid").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_legacy_pipeline() {
        let config = AppConfig::default();
        assert_eq!(config.text.keyword_limit, 2);
        assert_eq!(config.text.request_timeout_secs, 3);
        assert_eq!((config.render.width, config.render.height), (1920, 1080));
        assert_eq!(config.render.composition, "main");
        assert_eq!(config.render.exit_policy, ExitPolicy::Strict);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"text": {"locale": "en"}, "render": {"exit_policy": "lenient"}}"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.text.locale, "en");
        assert_eq!(config.text.keyword_limit, 2);
        assert_eq!(config.render.exit_policy, ExitPolicy::Lenient);
        assert_eq!(config.content_dir, PathBuf::from("content"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = AppConfig::load_from("/nonexistent/robovid.json").unwrap_err();
        assert!(matches!(err, RobovidError::Config { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_keyword_limit() {
        let mut config = AppConfig::default();
        config.text.keyword_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_default_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::resolve(None, &dir.path().join("config.json")).unwrap();
        assert_eq!(config.text.keyword_limit, 2);
    }

    #[test]
    fn test_malformed_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("broken.json");
        std::fs::write(&explicit, "{not json").unwrap();

        let err = AppConfig::resolve(Some(&explicit), &dir.path().join("config.json")).unwrap_err();
        assert!(matches!(err, RobovidError::Config { .. }));
    }

    #[test]
    fn test_default_location_is_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"render": {"timeout_secs": 0}, "text": {"keyword_limit": 0}}"#,
        )
        .unwrap();

        let err = AppConfig::resolve(None, &path).unwrap_err();
        assert!(matches!(err, RobovidError::Config { .. }));
    }
}
