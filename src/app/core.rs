//! the core app
use {
    super::{cli::Cli, logging},
    crate::{
        client::RedditClient,
        config::options::R2wCfg,
        download::{DownloadSummary, PostDownloader},
        error::R2wError,
        filter::FilterSet,
    },
    clap::Parser,
    color_eyre::{
        Section,
        eyre::{Context, Result},
    },
    owo_colors::OwoColorize,
    std::path::PathBuf,
    tracing::info,
};

/// the reddit2wallpaper app
#[derive(Debug, Clone)]
pub struct R2wApp {
    /// the fully resolved configuration
    cfg: R2wCfg,
}

impl R2wApp {
    /// initialize reddit2wallpaper
    ///
    /// - 1. installs the color_eyre error handler hook
    /// - 2. parses the cli, exiting early for the generator flags
    /// - 3. loads the config file and applies cli overrides
    /// - 4. validates the result
    /// - 5. sets up logging
    ///
    /// # Errors
    ///
    /// returns an error if color_eyre fails to install [`color_eyre::install`]
    /// returns an error if a generator fails
    /// returns an error if the configuration can't be loaded or is invalid
    /// returns an error if it fails to setup logging
    pub fn init() -> Result<Self> {
        color_eyre::install()?;

        let argv = Cli::parse();

        if argv.wants_generation() {
            argv.generate()?;
            std::process::exit(0);
        }

        let mut cfg = R2wCfg::load(argv.config.as_deref())?;
        argv.apply(&mut cfg);

        let app = Self::with_config(cfg)?;
        logging::setup(&app.cfg.logging)?;
        info!(subreddit = %app.cfg.listing.subreddit, "configuration loaded");

        Ok(app)
    }

    /// make an app from an already resolved config
    ///
    /// # Errors
    ///
    /// returns an error if the config doesn't validate
    pub fn with_config(cfg: R2wCfg) -> Result<Self> {
        cfg.check()
            .wrap_err("invalid configuration")
            .suggestion("Check your reddit2wallpaper.toml and command line flags")
            .suggestion("Run with --gen-default to see the default config")?;

        Ok(Self { cfg })
    }

    /// the config the app runs with
    pub fn config(&self) -> &R2wCfg {
        &self.cfg
    }

    /// make sure the download directory exists, creating it if allowed
    ///
    /// # Errors
    ///
    /// returns [`R2wError::Config`] if the directory is missing (and creating it isn't allowed)
    /// or if the path isn't a directory
    pub fn prepare_download_dir(&self) -> Result<PathBuf, R2wError> {
        let dir = PathBuf::from(&self.cfg.download.path);

        if !dir.exists() {
            if !self.cfg.download.create_dir {
                return Err(R2wError::Config(format!(
                    "download directory '{}' does not exist",
                    dir.display()
                )));
            }

            std::fs::create_dir_all(&dir).map_err(|e| {
                R2wError::Config(format!(
                    "couldn't create download directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
            info!(dir = %dir.display(), "created download directory");
        }

        if !dir.is_dir() {
            return Err(R2wError::Config(format!(
                "download path '{}' is not a directory",
                dir.display()
            )));
        }

        Ok(dir)
    }

    /// fetch, filter and download
    ///
    /// # Errors
    ///
    /// returns an error if the download directory is unusable, or if the
    /// listing can't be fetched or decoded. failed image downloads are only
    /// counted in the returned summary
    pub async fn run(&self) -> Result<DownloadSummary> {
        let cfg = &self.cfg;
        println!("Reddit2Wallpaper v{}", env!("CARGO_PKG_VERSION"));

        let dir = self
            .prepare_download_dir()
            .suggestion("Create the directory or pass --create-dir")?;

        println!(
            "Looking for {}x{} photos on r/{}",
            cfg.filter.min_width, cfg.filter.min_height, cfg.listing.subreddit
        );

        let client = RedditClient::new(&cfg.http, &cfg.listing.base_url)?;
        println!(
            "Fetching {}",
            client.listing_url(&cfg.listing.subreddit, cfg.listing.sort, cfg.listing.limit)
        );

        let posts = client
            .get_posts(&cfg.listing.subreddit, cfg.listing.sort, cfg.listing.limit)
            .await
            .wrap_err_with(|| format!("failed to fetch posts from r/{}", cfg.listing.subreddit))?;

        let fetched = posts.len();
        let posts = FilterSet::from_settings(&cfg.filter).apply(posts);
        println!("{} of {} posts match", posts.len(), fetched);

        let downloader = PostDownloader::new(client.http().clone(), dir)
            .with_progress(cfg.download.progress);
        let summary = downloader.download_all(&posts).await;

        println!(
            "{} downloaded, {} skipped, {} failed",
            summary.downloaded.green(),
            summary.skipped.yellow(),
            summary.failed.red()
        );

        Ok(summary)
    }
}
