//! data types for the reddit listing api
use {
    crate::resolution::Resolution,
    clap::ValueEnum,
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// the order the listing endpoint returns posts in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// the api's default ranking
    #[default]
    Hot,
    /// newest posts first
    New,
    /// highest scoring posts first
    Top,
}

impl SortMode {
    /// the path segment the api uses for this order
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::New => "new",
            Self::Top => "top",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// top level of a `/r/<subreddit>/<sort>.json` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingResponse {
    /// the listing itself
    #[serde(default)]
    pub data: ListingData,
}

/// the `data` object of a listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingData {
    /// the posts, wrapped in `{ kind, data }` objects
    #[serde(default)]
    pub children: Vec<ListingChild>,
}

/// one wrapped post in a listing
#[derive(Debug, Clone, Deserialize)]
pub struct ListingChild {
    /// the post
    pub data: Post,
}

impl ListingResponse {
    /// unwrap the listing into its posts, in api order
    pub fn into_posts(self) -> Vec<Post> {
        self.data.children.into_iter().map(|c| c.data).collect()
    }
}

/// the fields of a post the api gives us that we care about
#[derive(Debug, Clone, Default, Deserialize)]
struct RawPost {
    /// the post title
    #[serde(default)]
    title: String,
    /// the link the post points at
    #[serde(default)]
    url: String,
}

/// a single reddit post
///
/// the resolution is parsed from the title once, when the post is made
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPost")]
pub struct Post {
    /// the post title
    title: String,
    /// the link the post points at
    url: String,
    /// the resolution claimed by the title
    #[serde(skip)]
    resolution: Resolution,
}

impl From<RawPost> for Post {
    fn from(raw: RawPost) -> Self {
        Self::new(raw.title, raw.url)
    }
}

impl Post {
    /// make a new post, parsing its resolution from the title
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let title = title.into();
        let resolution = Resolution::from_title(&title);

        Self {
            title,
            url: url.into(),
            resolution,
        }
    }

    /// the post title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// the link the post points at
    pub fn url(&self) -> &str {
        &self.url
    }

    /// the resolution claimed by the title
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// shorthand for `resolution().width`
    pub fn width(&self) -> u32 {
        self.resolution.width
    }

    /// shorthand for `resolution().height`
    pub fn height(&self) -> u32 {
        self.resolution.height
    }
}
