//! every available configuration option and its type is listed in this file
use {
    crate::{
        config::validate::{Validate, format_validation_errors},
        error::R2wError,
        filter::AspectRatio,
        models::SortMode,
    },
    color_eyre::{
        Section, SectionExt,
        eyre::{Context, OptionExt, Result},
    },
    config::{Config, ConfigBuilder},
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
    smart_default::SmartDefault,
    std::path::{Path, PathBuf},
};

/// name of the config file, both globally and in the working directory
pub const CONFIG_FILE_NAME: &str = "reddit2wallpaper.toml";

/// Settings for the subreddit listing request
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[serde(default)]
pub struct ListingCfg {
    /// The base URL of the API
    #[default("https://www.reddit.com".to_string())]
    pub base_url: String,

    /// The subreddit to fetch posts from (without the `r/`)
    #[default("EarthPorn".to_string())]
    pub subreddit: String,

    /// The listing order to request
    ///
    /// Possible values:
    /// - hot (the API's default ranking)
    /// - new (default)
    /// - top
    #[default(SortMode::New)]
    pub sort: SortMode,

    /// The amount of posts to request (1 to 100)
    #[default(25)]
    pub limit: u32,
}

/// Settings for choosing which posts get downloaded
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[serde(default)]
pub struct FilterCfg {
    /// File extensions to accept, matched case-sensitively against the end of the url
    #[default(vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()])]
    pub extensions: Vec<String>,

    /// Minimum width in pixels, as given in the post title (0 = no constraint)
    pub min_width: u32,

    /// Minimum height in pixels, as given in the post title (0 = no constraint)
    pub min_height: u32,

    /// Minimum width:height ratio, e.g. "16:9"
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub aspect_ratio: Option<AspectRatio>,
}

/// Settings for saving images
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[serde(default)]
pub struct DownloadCfg {
    /// The directory to save images to
    #[default(".".to_string())]
    pub path: String,

    /// Create the download directory if it doesn't exist instead of failing
    #[default(false)]
    pub create_dir: bool,

    /// Show a progress bar for each image
    #[default(true)]
    pub progress: bool,
}

/// Configuration options for making HTTP requests
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[serde(default)]
pub struct HttpCfg {
    /// User agent string sent with every request
    #[default(format!("Reddit2Wallpaper/{}", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,

    /// Request timeout in seconds
    #[default(30)]
    pub timeout: u64,

    /// Connection timeout in seconds
    #[default(10)]
    pub connect_timeout: u64,
}

/// The format to log in
#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, SmartDefault, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFormat {
    /// Use the compact output format
    #[default]
    Compact,

    /// Use an excessively pretty output format
    Pretty,
}

/// Settings for logging
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[serde(default)]
pub struct LoggingCfg {
    /// Enable logging
    #[default(true)]
    pub enable: bool,

    /// The max level to log at (trace, debug, info, warn, error, off)
    #[default("warn".to_string())]
    pub level: String,

    /// The output format
    pub format: LoggingFormat,

    /// Enable ANSI escape codes for colors and stuff
    #[default(true)]
    pub ansi: bool,

    /// Display event targets in log messages
    #[default(false)]
    pub event_targets: bool,

    /// Display line numbers in log messages
    #[default(false)]
    pub line_numbers: bool,
}

/// reddit2wallpaper configuration options
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[serde(default)]
pub struct R2wCfg {
    /// Configuration file version (do not modify manually)
    #[default(1)]
    pub version: u32,

    /// Listing settings
    pub listing: ListingCfg,

    /// Filter settings
    pub filter: FilterCfg,

    /// Download settings
    pub download: DownloadCfg,

    /// HTTP client settings
    pub http: HttpCfg,

    /// Logging settings
    pub logging: LoggingCfg,
}

impl R2wCfg {
    /// load config from default locations
    ///
    /// load prio: explicit file > local > global > defaults, with `R2W_*`
    /// environment variables on top of all of them
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Self::create_builder(&Self::default())?;

        if let Some(global) = Self::global_config_path() {
            builder = builder.add_source(config::File::from(global).required(false));
        }

        if let Some(local_config) = Self::find_local_config()? {
            builder = builder.add_source(config::File::from(local_config).required(false));
        }

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("R2W")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("filter.extensions")
                .try_parsing(true),
        );

        let settings = builder.build().wrap_err("Failed to build configuration")?;
        let cfg: R2wCfg = settings
            .try_deserialize::<R2wCfg>()
            .wrap_err("Failed to deserialize configuration")
            .suggestion("Check the types of the values in your reddit2wallpaper.toml")?;

        Ok(cfg)
    }

    /// the global config file path, if the platform has a config dir
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// create a config builder with defaults
    fn create_builder(defaults: &R2wCfg) -> Result<ConfigBuilder<config::builder::DefaultState>> {
        let config_source = Config::try_from(defaults)
            .wrap_err("Failed to convert default config to a config source")?;

        Ok(Config::builder().add_source(config_source))
    }

    /// find the nearest config file in the working directory or its ancestors
    fn find_local_config() -> Result<Option<PathBuf>> {
        let curr_dir = std::env::current_dir()
            .wrap_err("Failed to get current working directory")
            .suggestion("Ensure the current directory exists and is accessible")?;

        Ok(curr_dir
            .ancestors()
            .map(|ancestor| ancestor.join(CONFIG_FILE_NAME))
            .find(|path| path.exists()))
    }

    /// validate every section, collecting all the problems into one error
    pub fn check(&self) -> Result<(), R2wError> {
        self.validate()
            .map_err(|errors| R2wError::Config(format_validation_errors(&errors)))
    }

    /// save config to a file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let toml_str =
            toml::to_string_pretty(self).wrap_err("Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .wrap_err("Failed to create config directory")
                .with_section(|| format!("{}", parent.display()).header("Directory:"))?;
        }

        std::fs::write(path, &toml_str)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))
            .with_section(|| path.display().to_string().header("File path"))
            .with_section(|| format!("{} bytes", toml_str.len()).header("Content size:"))?;

        Ok(())
    }

    /// save config to the global config location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::global_config_path()
            .ok_or_eyre("Unable to determine system config directory")
            .suggestion("Ensure XDG_CONFIG_HOME or HOME environment variables are set")
            .suggestion("On Windows, APPDATA should be set")?;

        self.save_to_file(&path)?;
        Ok(path)
    }
}
