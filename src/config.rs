//! Application settings
//!
//! Compiled defaults with environment overrides. Nothing is written back
//! to disk.

/// Environment variable overriding the window title
const TITLE_ENV: &str = "CONVERT_TOOL_TITLE";

/// Log filter used when `RUST_LOG` is not set
const DEFAULT_LOG_LEVEL: &str = "convert_tool=info,warn";

/// Width of the converted image preview, in logical pixels
const DEFAULT_PREVIEW_WIDTH: f32 = 320.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Window title
    pub title: String,
    /// Large heading at the top of the window
    pub heading: String,
    /// Short description under the heading
    pub tagline: String,
    /// Fallback `tracing` filter directive
    pub log_level: String,
    pub preview_width: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Convert Tool".to_string(),
            heading: "Convert Tool".to_string(),
            tagline: "Convert your images easily and efficiently. Supports various formats."
                .to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            preview_width: DEFAULT_PREVIEW_WIDTH,
        }
    }
}

impl AppConfig {
    /// Defaults with overrides from the process environment
    pub fn from_env() -> Self {
        Self::with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(title) = lookup(TITLE_ENV).filter(|t| !t.trim().is_empty()) {
            config.title = title;
        }

        config
    }
}
