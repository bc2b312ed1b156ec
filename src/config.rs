use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::api::lookup::DEFAULT_LOOKUP_SCAN_SIZE;
use crate::views::detail::DEFAULT_HIGHLIGHTS_PAGE_SIZE;
use crate::views::videos::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};

/// Backend used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "https://audio3.tivi360.vn/api/v1";

/// Config files tried by [`Config::load`], in order
pub const CONFIG_SEARCH_PATHS: [&str; 2] = ["vmaf-dashboard.toml", "config/vmaf-dashboard.toml"];

/// Configuration for the VMAF review dashboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Evaluation backend settings
    pub api: ApiConfig,

    /// List and rendering settings
    pub display: DisplayConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the evaluation API, e.g. `https://host/api/v1`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Records scanned when looking a single video up
    pub lookup_scan_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Initial page size of the videos list (10, 20, 50 or 100)
    pub videos_page_size: u32,

    /// Page size of the highlights list
    pub highlights_page_size: u32,

    /// Colour badges and score bars
    pub color: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is not set
    pub level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: 30,
            lookup_scan_size: DEFAULT_LOOKUP_SCAN_SIZE,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            videos_page_size: DEFAULT_PAGE_SIZE,
            highlights_page_size: DEFAULT_HIGHLIGHTS_PAGE_SIZE,
            color: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, then apply environment
    /// overrides. Falls back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_first(&CONFIG_SEARCH_PATHS[..])?;
        config.apply_env();
        Ok(config)
    }

    /// Load the first of `paths` that exists, or defaults when none does.
    ///
    /// A file that exists but cannot be read or parsed is an error; it is never
    /// replaced by defaults.
    pub fn load_first<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                continue;
            }
            let config = Self::load_from(path)?;
            tracing::info!("📄 Loaded configuration from: {}", path.display());
            return Ok(config);
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific TOML file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&config_str)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Load defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override settings from environment variables
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    /// Apply overrides from a variable lookup. `VMAF_DASHBOARD_API_URL` wins over the
    /// legacy `NEXT_PUBLIC_API_BASE_URL`; blank URLs and unparsable timeouts are ignored.
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for name in ["NEXT_PUBLIC_API_BASE_URL", "VMAF_DASHBOARD_API_URL"] {
            if let Some(url) = lookup(name).filter(|url| !url.trim().is_empty()) {
                self.api.base_url = url;
            }
        }

        if let Some(timeout) = lookup("VMAF_DASHBOARD_TIMEOUT") {
            match timeout.trim().parse() {
                Ok(seconds) => self.api.timeout_seconds = seconds,
                Err(_) => tracing::warn!("Ignoring invalid VMAF_DASHBOARD_TIMEOUT: {}", timeout),
            }
        }

        if let Some(level) = lookup("VMAF_DASHBOARD_LOG_LEVEL").filter(|l| !l.trim().is_empty()) {
            self.logging.level = level;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(self.api.base_url.trim())
            .map_err(|e| anyhow!("api.base_url is not a valid URL ({}): {}", self.api.base_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!("api.base_url must use http or https"));
        }

        if self.api.timeout_seconds == 0 {
            return Err(anyhow!("api.timeout_seconds must be greater than 0"));
        }

        if self.api.lookup_scan_size == 0 {
            return Err(anyhow!("api.lookup_scan_size must be greater than 0"));
        }

        if !PAGE_SIZE_OPTIONS.contains(&self.display.videos_page_size) {
            return Err(anyhow!(
                "display.videos_page_size must be one of {:?}",
                PAGE_SIZE_OPTIONS
            ));
        }

        if self.display.highlights_page_size == 0 {
            return Err(anyhow!("display.highlights_page_size must be greater than 0"));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "VMAF Dashboard Configuration:\n\
            - API Base URL: {}\n\
            - Request Timeout: {}s\n\
            - Lookup Scan Size: {}\n\
            - Videos Page Size: {}\n\
            - Highlights Page Size: {}\n\
            - Colour Output: {}\n\
            - Log Level: {}",
            self.api.base_url,
            self.api.timeout_seconds,
            self.api.lookup_scan_size,
            self.display.videos_page_size,
            self.display.highlights_page_size,
            self.display.color,
            self.logging.level
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.api.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.api.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_lookup_scan_size(mut self, scan_size: u32) -> Self {
        self.config.api.lookup_scan_size = scan_size;
        self
    }

    pub fn with_videos_page_size(mut self, page_size: u32) -> Self {
        self.config.display.videos_page_size = page_size;
        self
    }

    pub fn with_highlights_page_size(mut self, page_size: u32) -> Self {
        self.config.display.highlights_page_size = page_size;
        self
    }

    pub fn enable_color(mut self, enable: bool) -> Self {
        self.config.display.color = enable;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
