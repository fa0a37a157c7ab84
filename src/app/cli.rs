//! cli stuff
use {
    crate::{config::options::R2wCfg, filter::AspectRatio, models::SortMode},
    clap::{ArgAction, ArgGroup, Parser},
    color_eyre::eyre::{Context, Result},
    schemars::generate::SchemaSettings,
    std::{
        fs::OpenOptions,
        io::{BufWriter, Write},
        path::PathBuf,
    },
};

/// where `--gen-schema --save` writes the schema
const SCHEMA_FILE: &str = "reddit2wallpaper.schema.json";

/// the CLI
#[derive(Parser, Debug, Default)]
#[command(name = "reddit2wallpaper", version, about)]
#[command(group(ArgGroup::new("generator").args(["gen_schema", "gen_default"]).multiple(true)))]
pub struct Cli {
    /// Name of the subreddit to use
    #[arg(short = 'r', long)]
    pub subreddit: Option<String>,

    /// Directory in which to save wallpapers
    #[arg(short = 'o', long)]
    pub download_dir: Option<PathBuf>,

    /// Minimum width for the photo to download
    #[arg(long, value_name = "PX")]
    pub min_width: Option<u32>,

    /// Minimum height for the photo to download
    #[arg(long, value_name = "PX")]
    pub min_height: Option<u32>,

    /// Minimum aspect ratio, e.g. 16:9
    #[arg(short = 'a', long, value_name = "W:H")]
    pub aspect_ratio: Option<AspectRatio>,

    /// Fetch 'top' posts instead of 'new' posts
    #[arg(short = 't', long, conflicts_with = "sort")]
    pub top: bool,

    /// Listing order to fetch
    #[arg(long, value_enum)]
    pub sort: Option<SortMode>,

    /// Amount of posts to fetch (1-100)
    #[arg(short = 'l', long)]
    pub limit: Option<u32>,

    /// Allowed file extension, may be given more than once
    #[arg(short = 'e', long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Create the download directory if it doesn't exist
    #[arg(long)]
    pub create_dir: bool,

    /// Don't draw progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Use this config file on top of the usual ones
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Save instead of printing (with --gen-schema or --gen-default)
    #[arg(long, requires = "generator")]
    pub save: bool,

    /// Generate a JSON schema for the config file
    #[arg(short = 's', long)]
    pub gen_schema: bool,

    /// Generate the default config file
    #[arg(short = 'd', long)]
    pub gen_default: bool,
}

impl Cli {
    /// whether this invocation only generates files
    pub fn wants_generation(&self) -> bool {
        self.gen_schema || self.gen_default
    }

    /// run the generators that were asked for
    ///
    /// # Errors
    ///
    /// returns an error if it fails to generate and/or save the json schema
    /// returns an error if it fails to generate and/or save the default config
    pub fn generate(&self) -> Result<()> {
        if self.gen_schema {
            Self::gen_schema(self.save)?;
        }

        if self.gen_default {
            Self::gen_defaults(self.save)?;
        }

        Ok(())
    }

    /// override config values with the ones given on the command line
    pub fn apply(&self, cfg: &mut R2wCfg) {
        if let Some(ref subreddit) = self.subreddit {
            cfg.listing.subreddit = subreddit.trim_start_matches("r/").to_string();
        }

        if let Some(ref dir) = self.download_dir {
            cfg.download.path = dir.display().to_string();
        }

        if let Some(min_width) = self.min_width {
            cfg.filter.min_width = min_width;
        }

        if let Some(min_height) = self.min_height {
            cfg.filter.min_height = min_height;
        }

        if let Some(ratio) = self.aspect_ratio {
            cfg.filter.aspect_ratio = Some(ratio);
        }

        if self.top {
            cfg.listing.sort = SortMode::Top;
        } else if let Some(sort) = self.sort {
            cfg.listing.sort = sort;
        }

        if let Some(limit) = self.limit {
            cfg.listing.limit = limit;
        }

        if !self.extensions.is_empty() {
            cfg.filter.extensions = self.extensions.clone();
        }

        if self.create_dir {
            cfg.download.create_dir = true;
        }

        if self.no_progress {
            cfg.download.progress = false;
        }

        let level = match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        };

        if let Some(level) = level {
            cfg.logging.enable = true;
            cfg.logging.level = level.to_string();
        }
    }

    /// save a string to a file
    ///
    /// # Errors
    ///
    /// returns an error if it fails to open or write `path`
    pub fn write_to_file(path: &str, contents: &str) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)
            .wrap_err_with(|| format!("failed to open {}", path))?;
        let mut w = BufWriter::new(file);
        w.write_all(contents.as_bytes())
            .wrap_err_with(|| format!("failed to write {}", path))
    }

    /// generate/save the config schema
    ///
    /// # Errors
    ///
    /// returns an error if it fails to convert the schema to a JSON string
    /// returns an error if it fails to save the schema
    pub fn gen_schema(save: bool) -> Result<()> {
        let settings = SchemaSettings::draft2020_12().for_serialize();
        let generator = settings.into_generator();
        let schema = generator.into_root_schema_for::<R2wCfg>();
        let schema_str = serde_json::to_string_pretty(&schema)?;

        if save {
            Self::write_to_file(SCHEMA_FILE, &schema_str)?;
            println!("saved schema to {}", SCHEMA_FILE);
        } else {
            println!("{}", schema_str);
        }

        Ok(())
    }

    /// generate/save the default config file
    ///
    /// # Errors
    ///
    /// returns an error if it fails to convert the default config to TOML
    /// returns an error if it fails to save it to the global config location
    pub fn gen_defaults(save: bool) -> Result<()> {
        let defaults = R2wCfg::default();

        if save {
            let path = defaults.save()?;
            println!("saved default config to {}", path.display());
        } else {
            println!("{}", toml::to_string_pretty(&defaults)?);
        }

        Ok(())
    }
}
