//! saving post images to disk
use {
    crate::{
        error::{R2wError, Result},
        models::Post,
        progress,
    },
    futures_util::StreamExt,
    indicatif::{ProgressBar, ProgressStyle},
    owo_colors::OwoColorize,
    reqwest::Client,
    std::path::{Path, PathBuf},
    tokio::{fs, io::AsyncWriteExt},
    tracing::{debug, info, warn},
};

/// what happened to the posts handed to [`PostDownloader::download_all`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// images written to disk
    pub downloaded: usize,
    /// posts whose file was already there
    pub skipped: usize,
    /// posts that failed to download
    pub failed: usize,
}

/// downloads post images into a directory
#[derive(Debug, Clone)]
pub struct PostDownloader {
    /// the http client (carries the user agent)
    client: Client,
    /// where images are saved
    output_dir: PathBuf,
    /// whether to draw a progress bar per image
    show_progress: bool,
}

impl PostDownloader {
    /// make a new downloader saving into `output_dir`
    pub fn new(client: Client, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
            show_progress: false,
        }
    }

    /// toggle the per-image progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// the directory images are saved to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// where a post's image would be saved, named after the last segment of its url
    ///
    /// # Errors
    ///
    /// returns [`R2wError::InvalidUrl`] if the url has no usable file name
    pub fn destination(&self, post: &Post) -> Result<PathBuf> {
        let url = url::Url::parse(post.url())
            .map_err(|_| R2wError::InvalidUrl(post.url().to_string()))?;
        let filename = url
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
            .ok_or_else(|| R2wError::InvalidUrl(post.url().to_string()))?;

        Ok(self.output_dir.join(filename))
    }

    /// download a single post's image, returning where it was saved
    ///
    /// # Errors
    ///
    /// returns [`R2wError::FileExists`] without touching the network if the file is already there
    /// returns [`R2wError::Download`] if the request fails or returns an error status
    /// returns [`R2wError::IO`] if the file can't be written
    pub async fn download_post(&self, post: &Post) -> Result<PathBuf> {
        let filepath = self.destination(post)?;

        if fs::try_exists(&filepath).await? {
            return Err(R2wError::FileExists { path: filepath });
        }

        let download_err = |source: reqwest::Error| R2wError::Download {
            url: post.url().to_string(),
            source,
        };

        let response = self
            .client
            .get(post.url())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(download_err)?;

        let total_size = response.content_length();
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&filepath)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(R2wError::FileExists { path: filepath });
            }
            Err(e) => return Err(e.into()),
        };

        let pb = self.progress_bar(total_size);
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        let result: Result<()> = async {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(download_err)?;
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
                pb.set_position(written);
            }

            file.flush().await?;
            Ok(())
        }
        .await;

        pb.finish_and_clear();

        if let Err(e) = result {
            drop(file);
            if let Err(rm) = fs::remove_file(&filepath).await {
                warn!(path = %filepath.display(), error = %rm, "couldn't remove partial file");
            }
            return Err(e);
        }

        debug!(path = %filepath.display(), bytes = written, "saved image");
        Ok(filepath)
    }

    /// download every post in order, reporting each one
    ///
    /// a failed post is logged and counted, and the rest still get downloaded
    pub async fn download_all(&self, posts: &[Post]) -> DownloadSummary {
        let mut summary = DownloadSummary::default();

        for post in posts {
            progress!("Downloading '{}' ({})... ", post.title(), post.resolution());

            match self.download_post(post).await {
                Ok(_) => {
                    println!("{}", "done".green());
                    summary.downloaded += 1;
                }
                Err(e) if e.is_skip() => {
                    println!("{}", "already exists, skipped".yellow());
                    summary.skipped += 1;
                }
                Err(e) => {
                    println!("{}", "failed".red());
                    warn!(url = post.url(), error = %e, "couldn't download post");
                    summary.failed += 1;
                }
            }
        }

        info!(
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            failed = summary.failed,
            "finished downloading"
        );

        summary
    }

    /// a byte progress bar, or a hidden one when progress is turned off
    fn progress_bar(&self, total_size: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total_size.unwrap_or(0));
        if let Ok(style) = ProgressStyle::with_template(
            "{bar:40.cyan/blue} {bytes:>10}/{total_bytes:10} ({bytes_per_sec})",
        ) {
            pb.set_style(style.progress_chars("##-"));
        }

        pb
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        tempfile::TempDir,
        wiremock::{
            Mock, MockServer, ResponseTemplate,
            matchers::{method, path},
        },
    };

    fn downloader(dir: &TempDir) -> PostDownloader {
        PostDownloader::new(Client::new(), dir.path())
    }

    #[test]
    fn test_destination_uses_url_basename() {
        let dir = TempDir::new().unwrap();
        let post = Post::new("t", "https://i.redd.it/abc123.jpg?width=640");

        assert_eq!(
            downloader(&dir).destination(&post).unwrap(),
            dir.path().join("abc123.jpg")
        );
    }

    #[test]
    fn test_destination_without_file_name() {
        let dir = TempDir::new().unwrap();
        let dl = downloader(&dir);

        for url in ["https://i.redd.it/", "https://i.redd.it", "not a url", ""] {
            let err = dl.destination(&Post::new("t", url)).unwrap_err();
            assert!(matches!(err, R2wError::InvalidUrl(_)), "{} gave {:?}", url, err);
        }
    }

    #[tokio::test]
    async fn test_download_writes_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sunset.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg bytes".to_vec()))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let post = Post::new("Sunset [1920x1080]", format!("{}/sunset.jpg", server.uri()));
        let saved = downloader(&dir).download_post(&post).await.unwrap();

        assert_eq!(saved, dir.path().join("sunset.jpg"));
        assert_eq!(std::fs::read(saved).unwrap(), b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_existing_file_is_skipped_not_overwritten() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("sunset.jpg"), b"old").unwrap();
        let post = Post::new("Sunset [1920x1080]", format!("{}/sunset.jpg", server.uri()));

        let err = downloader(&dir).download_post(&post).await.unwrap_err();

        assert!(err.is_skip(), "got {:?}", err);
        assert_eq!(std::fs::read(dir.path().join("sunset.jpg")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_error_status_leaves_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let post = Post::new("Gone [1920x1080]", format!("{}/gone.png", server.uri()));
        let err = downloader(&dir).download_post(&post).await.unwrap_err();

        assert!(matches!(err, R2wError::Download { .. }), "got {:?}", err);
        assert!(!dir.path().join("gone.png").exists());
    }

    #[tokio::test]
    async fn test_truncated_body_leaves_no_file() {
        use tokio::{io::AsyncReadExt, net::TcpListener};

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\n\r\npartial")
                .await
                .unwrap();
            socket.flush().await.unwrap();
        });

        let dir = TempDir::new().unwrap();
        let post = Post::new("Cut off [1920x1080]", format!("http://{}/cut.jpg", addr));
        let err = downloader(&dir).download_post(&post).await.unwrap_err();

        assert!(matches!(err, R2wError::Download { .. }), "got {:?}", err);
        assert!(!dir.path().join("cut.jpg").exists());
    }

    #[tokio::test]
    async fn test_download_all_keeps_going_after_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken.jpg"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fine.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("old.jpg"), b"old").unwrap();
        let posts = vec![
            Post::new("Broken", format!("{}/broken.jpg", server.uri())),
            Post::new("Old", format!("{}/old.jpg", server.uri())),
            Post::new("No name", format!("{}/", server.uri())),
            Post::new("Fine", format!("{}/fine.jpg", server.uri())),
        ];

        let summary = downloader(&dir).download_all(&posts).await;

        assert_eq!(
            summary,
            DownloadSummary {
                downloaded: 1,
                skipped: 1,
                failed: 2,
            }
        );
        assert_eq!(std::fs::read(dir.path().join("fine.jpg")).unwrap(), b"ok");
        assert!(!dir.path().join("broken.jpg").exists());
    }
}
