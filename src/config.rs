use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::patcher::Region;
use crate::render::CardVariant;

/// Configuration for the channel carousel pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Video catalog settings
    pub catalog: CatalogConfig,

    /// Video categories to select from the channel uploads
    pub categories: CategoriesConfig,

    /// Output files and logging
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the YouTube Data API
    pub api_base: String,

    /// API key for the catalog service
    pub api_key: Option<String>,

    /// Channel whose uploads are listed
    pub channel_id: String,

    /// Request timeout in seconds (transport default when unset)
    pub timeout_seconds: Option<u64>,

    /// Env file loaded before reading credentials from the environment
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "CategoriesFile")]
pub struct CategoriesConfig {
    pub interviews: CategoryConfig,
    pub highlights: CategoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category name used in logs
    pub name: String,

    /// Title keywords, any match selects the video. Empty selects everything.
    pub keywords: Vec<String>,

    /// Maximum number of videos kept
    pub max_results: usize,

    /// Snapshot file name inside the data directory
    pub snapshot_file: String,

    /// Card style used when rendering into the page
    pub variant: CardVariant,

    /// Page region the rendered cards replace
    pub region: Region,
}

/// Category sections as written in a config file. Every key is optional and
/// falls back to the built-in settings of the same category.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CategoriesFile {
    interviews: CategoryFile,
    highlights: CategoryFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CategoryFile {
    name: Option<String>,
    keywords: Option<Vec<String>>,
    max_results: Option<usize>,
    snapshot_file: Option<String>,
    variant: Option<CardVariant>,
    region: RegionFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RegionFile {
    name: Option<String>,
    container_class: Option<String>,
    boundary_label: Option<String>,
}

impl CategoryFile {
    fn merge_into(self, category: &mut CategoryConfig) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(keywords) = self.keywords {
            category.keywords = keywords;
        }
        if let Some(max_results) = self.max_results {
            category.max_results = max_results;
        }
        if let Some(snapshot_file) = self.snapshot_file {
            category.snapshot_file = snapshot_file;
        }
        if let Some(variant) = self.variant {
            category.variant = variant;
        }
        if let Some(name) = self.region.name {
            category.region.name = name;
        }
        if let Some(container_class) = self.region.container_class {
            category.region.container_class = container_class;
        }
        if let Some(boundary_label) = self.region.boundary_label {
            category.region.boundary_label = boundary_label;
        }
    }
}

impl From<CategoriesFile> for CategoriesConfig {
    fn from(file: CategoriesFile) -> Self {
        let mut categories = CategoriesConfig::default();
        file.interviews.merge_into(&mut categories.interviews);
        file.highlights.merge_into(&mut categories.highlights);
        categories
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding snapshot files
    pub data_dir: PathBuf,

    /// Page document patched by `build` and `render`
    pub page_path: PathBuf,

    /// Fail instead of warn when a page region is not found
    pub strict_markers: bool,

    /// Log level
    pub log_level: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            api_key: None,
            channel_id: "UCB_qr75-ydFVKSF9Dmo6izg".to_string(),
            timeout_seconds: Some(30),
            env_file: None,
        }
    }
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            interviews: CategoryConfig {
                name: "interviews".to_string(),
                keywords: ["react", "driver", "speaks", "says", "exclusive", "wrap-up", "learned", "interview"]
                    .iter()
                    .map(|k| k.to_string())
                    .collect(),
                max_results: 6,
                snapshot_file: "interviews.json".to_string(),
                variant: CardVariant::Video,
                region: Region::new("interviews", "video-carousel", "EDITOR"),
            },
            highlights: CategoryConfig {
                name: "highlights".to_string(),
                keywords: ["highlight", "fastest", "best", "day", "testing"]
                    .iter()
                    .map(|k| k.to_string())
                    .collect(),
                max_results: 6,
                snapshot_file: "highlights.json".to_string(),
                variant: CardVariant::Highlight,
                region: Region::new("highlights", "highlights-carousel", "FOOTER"),
            },
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            page_path: PathBuf::from("index.html"),
            strict_markers: false,
            log_level: "info".to_string(),
        }
    }
}

impl CategoriesConfig {
    /// Categories in run order
    pub fn all(&self) -> [&CategoryConfig; 2] {
        [&self.interviews, &self.highlights]
    }
}

impl Config {
    /// Load configuration from an explicit file, or the first default location found.
    /// Falls back to defaults when no file exists. Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => Self::from_default_locations()?,
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    fn from_default_locations() -> Result<Self> {
        let config_paths = ["channel-carousel.toml", "config/channel-carousel.toml"];

        for path in config_paths.iter().map(Path::new) {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Override settings from environment variables. A configured `env_file`
    /// must exist; the implicit `.env` lookup is optional.
    pub fn apply_env(&mut self) -> Result<()> {
        match &self.catalog.env_file {
            Some(env_file) => {
                dotenv::from_path(env_file)
                    .with_context(|| format!("Failed to load env file {}", env_file.display()))?;
                tracing::debug!("📄 Loaded environment from: {}", env_file.display());
            }
            None => {
                dotenv::dotenv().ok();
            }
        }

        for var in ["YOUTUBE_API_KEY", "GOOGLE_API_KEY"] {
            if let Ok(api_key) = std::env::var(var) {
                if !api_key.trim().is_empty() {
                    self.catalog.api_key = Some(api_key);
                    break;
                }
            }
        }

        if let Ok(channel_id) = std::env::var("CHANNEL_CAROUSEL_CHANNEL_ID") {
            self.catalog.channel_id = channel_id;
        }

        if let Ok(data_dir) = std::env::var("CHANNEL_CAROUSEL_DATA_DIR") {
            self.output.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(log_level) = std::env::var("CHANNEL_CAROUSEL_LOG_LEVEL") {
            self.output.log_level = log_level;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration. `needs_catalog` is false for offline runs.
    pub fn validate(&self, needs_catalog: bool) -> Result<()> {
        for category in self.categories.all() {
            if category.max_results == 0 {
                return Err(anyhow!("max_results for '{}' must be greater than 0", category.name));
            }
            if category.snapshot_file.trim().is_empty() {
                return Err(anyhow!("snapshot_file for '{}' must not be empty", category.name));
            }
        }

        if needs_catalog {
            if self.catalog.channel_id.trim().is_empty() {
                return Err(anyhow!("catalog.channel_id must not be empty"));
            }
            if self.catalog.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
                return Err(anyhow!(
                    "API key required: set catalog.api_key or YOUTUBE_API_KEY / GOOGLE_API_KEY"
                ));
            }
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Channel Carousel Configuration:\n\
            - Channel: {}\n\
            - API Base: {}\n\
            - Interviews: {} keywords, max {}\n\
            - Highlights: {} keywords, max {}\n\
            - Data Directory: {}\n\
            - Page: {}\n\
            - Strict Markers: {}",
            self.catalog.channel_id,
            self.catalog.api_base,
            self.categories.interviews.keywords.len(),
            self.categories.interviews.max_results,
            self.categories.highlights.keywords.len(),
            self.categories.highlights.max_results,
            self.output.data_dir.display(),
            self.output.page_path.display(),
            self.output.strict_markers
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

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.catalog.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.config.catalog.api_base = api_base.into();
        self
    }

    pub fn with_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.config.catalog.channel_id = channel_id.into();
        self
    }

    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.config.output.data_dir = dir;
        self
    }

    pub fn with_page_path(mut self, path: PathBuf) -> Self {
        self.config.output.page_path = path;
        self
    }

    pub fn with_interview_keywords(mut self, keywords: &[&str]) -> Self {
        self.config.categories.interviews.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_highlight_keywords(mut self, keywords: &[&str]) -> Self {
        self.config.categories.highlights.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.config.categories.interviews.max_results = max_results;
        self.config.categories.highlights.max_results = max_results;
        self
    }

    pub fn strict_markers(mut self, strict: bool) -> Self {
        self.config.output.strict_markers = strict;
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.channel_id, "UCB_qr75-ydFVKSF9Dmo6izg");
        assert_eq!(config.categories.interviews.max_results, 6);
        assert_eq!(config.categories.highlights.region.container_class, "highlights-carousel");
        assert!(config.categories.interviews.keywords.contains(&"react".to_string()));
        assert!(!config.output.strict_markers);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_api_key("key")
            .with_channel("UC123")
            .with_max_results(3)
            .strict_markers(true)
            .build();

        assert_eq!(config.catalog.api_key.as_deref(), Some("key"));
        assert_eq!(config.catalog.channel_id, "UC123");
        assert_eq!(config.categories.highlights.max_results, 3);
        assert!(config.output.strict_markers);
    }

    #[test]
    fn test_config_validation() {
        let config = ConfigBuilder::new().with_api_key("key").build();
        assert!(config.validate(true).is_ok());

        let no_key = ConfigBuilder::new().build();
        assert!(no_key.validate(false).is_ok());

        let zero = ConfigBuilder::new().with_api_key("key").with_max_results(0).build();
        assert!(zero.validate(true).is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("carousel.toml");
        std::fs::write(
            &path,
            "[catalog]\nchannel_id = \"UCabc\"\n\n[output]\nstrict_markers = true\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.catalog.channel_id, "UCabc");
        assert_eq!(config.catalog.api_base, "https://www.googleapis.com/youtube/v3");
        assert!(config.output.strict_markers);
        assert_eq!(config.categories.highlights.snapshot_file, "highlights.json");
    }

    #[test]
    fn test_partial_category_merges_with_its_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("carousel.toml");
        std::fs::write(
            &path,
            "[categories.interviews]\nkeywords = [\"podcast\"]\n\n\
             [categories.highlights.region]\nboundary_label = \"SPONSORS\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        let interviews = &config.categories.interviews;
        assert_eq!(interviews.keywords, vec!["podcast".to_string()]);
        assert_eq!(interviews.name, "interviews");
        assert_eq!(interviews.max_results, 6);
        assert_eq!(interviews.snapshot_file, "interviews.json");
        assert_eq!(interviews.region.container_class, "video-carousel");

        let highlights = &config.categories.highlights;
        assert_eq!(highlights.region.boundary_label, "SPONSORS");
        assert_eq!(highlights.region.container_class, "highlights-carousel");
        assert_eq!(highlights.variant, CardVariant::Highlight);
        assert!(highlights.keywords.contains(&"fastest".to_string()));
    }

    #[test]
    fn test_missing_env_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("carousel.toml");
        std::fs::write(&path, "[catalog]\nenv_file = \"/nonexistent/carousel.env\"\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/carousel.env"));
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("saved.toml");
        let config = ConfigBuilder::new()
            .with_interview_keywords(&["podcast"])
            .build();

        config.save(&path).unwrap();
        let reloaded = Config::from_file(&path).unwrap();
        assert_eq!(reloaded.categories.interviews.keywords, vec!["podcast".to_string()]);
        assert_eq!(reloaded.categories.interviews.variant, CardVariant::Video);
    }
}
