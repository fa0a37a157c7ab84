//! post filtering stuff
use {
    crate::{config::options::FilterCfg, error::R2wError, models::Post},
    serde::{Deserialize, Serialize},
    std::{fmt, str::FromStr},
    tracing::debug,
};

/// a minimum width:height ratio, e.g. `16:9`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AspectRatio {
    /// the width term
    pub width: u32,
    /// the height term
    pub height: u32,
}

impl AspectRatio {
    /// make a new ratio, both terms must be positive
    pub fn new(width: u32, height: u32) -> Result<Self, R2wError> {
        if width == 0 || height == 0 {
            return Err(R2wError::Config(format!(
                "invalid aspect ratio {}:{}, both terms must be greater than 0",
                width, height
            )));
        }

        Ok(Self { width, height })
    }

    /// the ratio as a float
    pub fn value(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl FromStr for AspectRatio {
    type Err = R2wError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once([':', 'x', 'X'])
            .ok_or_else(|| R2wError::Config(format!("invalid aspect ratio '{}', expected W:H", s)))?;
        let parse = |term: &str| {
            term.trim().parse::<u32>().map_err(|_| {
                R2wError::Config(format!("invalid aspect ratio '{}', expected W:H", s))
            })
        };

        Self::new(parse(w)?, parse(h)?)
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = R2wError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(value: AspectRatio) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// a single predicate over a post
#[derive(Debug, Clone, PartialEq)]
pub enum PostFilter {
    /// the url must end in `.<ext>` for one of these (case-sensitive)
    Extension(Vec<String>),

    /// the title resolution must be at least this big, 0 means "don't care"
    MinResolution {
        /// minimum width in pixels
        min_width: u32,
        /// minimum height in pixels
        min_height: u32,
    },

    /// width / height must be at least this ratio
    AspectRatio(AspectRatio),
}

impl PostFilter {
    /// build an extension filter, dropping any leading dots
    pub fn extensions<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Extension(
            exts.into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    /// whether the post passes this filter
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Self::Extension(exts) => exts.iter().any(|ext| {
                post.url()
                    .strip_suffix(ext.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
            }),
            Self::MinResolution {
                min_width,
                min_height,
            } => post.width() >= *min_width && post.height() >= *min_height,
            Self::AspectRatio(ratio) => post
                .resolution()
                .ratio()
                .is_some_and(|r| r >= ratio.value()),
        }
    }
}

/// a set of filters that must all pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    /// the filters
    filters: Vec<PostFilter>,
}

impl FilterSet {
    /// make an empty set, which lets everything through
    pub fn new() -> Self {
        Self::default()
    }

    /// add a filter to the set
    pub fn with(mut self, filter: PostFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// build the filters described by the config
    pub fn from_settings(cfg: &FilterCfg) -> Self {
        let mut set = Self::new().with(PostFilter::extensions(&cfg.extensions));

        if cfg.min_width > 0 || cfg.min_height > 0 {
            set = set.with(PostFilter::MinResolution {
                min_width: cfg.min_width,
                min_height: cfg.min_height,
            });
        }

        if let Some(ratio) = cfg.aspect_ratio {
            set = set.with(PostFilter::AspectRatio(ratio));
        }

        set
    }

    /// the filters in this set
    pub fn filters(&self) -> &[PostFilter] {
        &self.filters
    }

    /// whether the post passes every filter
    pub fn matches(&self, post: &Post) -> bool {
        self.filters.iter().all(|f| f.matches(post))
    }

    /// keep the posts that pass every filter, in their original order
    pub fn apply(&self, posts: Vec<Post>) -> Vec<Post> {
        let count_before = posts.len();
        let kept: Vec<Post> = posts.into_iter().filter(|p| self.matches(p)).collect();

        debug!(
            filtered = count_before - kept.len(),
            remaining = kept.len(),
            "applied filters"
        );

        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, url: &str) -> Post {
        Post::new(title, url)
    }

    #[test]
    fn test_extension_is_case_sensitive_and_keeps_order() {
        let posts = vec![
            post("a", "https://i.redd.it/a.jpg"),
            post("b", "https://i.redd.it/b.JPG"),
            post("c", "https://i.imgur.com/c.png"),
            post("d", "https://i.imgur.com/d.gifv"),
            post("e", "https://i.redd.it/e.jpeg"),
            post("f", "https://example.com/notajpg"),
        ];
        let set = FilterSet::new().with(PostFilter::extensions(["jpg", "jpeg", "png"]));
        let titles: Vec<_> = set
            .apply(posts)
            .iter()
            .map(|p| p.title().to_string())
            .collect();

        assert_eq!(titles, ["a", "c", "e"]);
    }

    #[test]
    fn test_extension_ignores_leading_dot() {
        let filter = PostFilter::extensions([".png", ""]);

        assert_eq!(filter, PostFilter::Extension(vec!["png".to_string()]));
        assert!(filter.matches(&post("x", "https://i.redd.it/x.png")));
    }

    #[test]
    fn test_zero_minimum_passes_unknown_resolution() {
        let filter = PostFilter::MinResolution {
            min_width: 0,
            min_height: 0,
        };

        assert!(filter.matches(&post("No res here", "https://i.redd.it/a.png")));
        assert!(filter.matches(&post("Tiny [10x10]", "https://i.redd.it/b.png")));
    }

    #[test]
    fn test_positive_minimum_rejects_unknown_and_small() {
        let filter = PostFilter::MinResolution {
            min_width: 1920,
            min_height: 1080,
        };

        assert!(filter.matches(&post("Exact [1920x1080]", "u")));
        assert!(filter.matches(&post("Bigger [3840x2160]", "u")));
        assert!(!filter.matches(&post("Too short [1920x1000]", "u")));
        assert!(!filter.matches(&post("Too narrow [1280x1440]", "u")));
        assert!(!filter.matches(&post("No res here", "u")));
    }

    #[test]
    fn test_aspect_ratio() {
        let filter = PostFilter::AspectRatio(AspectRatio::new(16, 9).unwrap());

        assert!(filter.matches(&post("Wide [1920x1080]", "u")));
        assert!(filter.matches(&post("Ultrawide [3440x1440]", "u")));
        assert!(!filter.matches(&post("Old monitor [800x600]", "u")));
        assert!(!filter.matches(&post("No res here", "u")));
    }

    #[test]
    fn test_aspect_ratio_does_not_truncate() {
        // with integer division both sides would be 1
        let filter = PostFilter::AspectRatio(AspectRatio::new(3, 2).unwrap());

        assert!(filter.matches(&post("Wide enough [1500x1000]", "u")));
        assert!(!filter.matches(&post("Not wide enough [1450x1000]", "u")));
    }

    #[test]
    fn test_parse_aspect_ratio() {
        assert_eq!("16:9".parse::<AspectRatio>().unwrap(), AspectRatio::new(16, 9).unwrap());
        assert_eq!("21x9".parse::<AspectRatio>().unwrap(), AspectRatio::new(21, 9).unwrap());
        assert_eq!(" 4 : 3 ".parse::<AspectRatio>().unwrap(), AspectRatio::new(4, 3).unwrap());
        assert!(matches!("16:0".parse::<AspectRatio>(), Err(R2wError::Config(_))));
        assert!(matches!("wide".parse::<AspectRatio>(), Err(R2wError::Config(_))));
        assert!(matches!("16:-9".parse::<AspectRatio>(), Err(R2wError::Config(_))));
    }

    #[test]
    fn test_empty_set_passes_everything() {
        let posts = vec![post("a", ""), post("b", "")];
        assert_eq!(FilterSet::new().apply(posts.clone()), posts);
    }

    #[test]
    fn test_combined_filters() {
        let posts = vec![
            post("Sunset [1920x1080]", "https://i.redd.it/sunset.jpg"),
            post("No res here", "https://i.redd.it/nores.png"),
            post("Big [3000x2000]", "https://i.redd.it/big.gif"),
        ];
        let set = FilterSet::new()
            .with(PostFilter::extensions(["jpg", "png"]))
            .with(PostFilter::MinResolution {
                min_width: 1000,
                min_height: 0,
            });
        let kept = set.apply(posts);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title(), "Sunset [1920x1080]");
    }

    #[test]
    fn test_from_settings() {
        let cfg = FilterCfg {
            extensions: vec!["png".to_string()],
            min_width: 0,
            min_height: 0,
            aspect_ratio: None,
        };
        assert_eq!(FilterSet::from_settings(&cfg).filters().len(), 1);

        let cfg = FilterCfg {
            min_height: 1080,
            aspect_ratio: Some(AspectRatio::new(16, 10).unwrap()),
            ..cfg
        };
        let set = FilterSet::from_settings(&cfg);

        assert_eq!(set.filters().len(), 3);
        assert_eq!(
            set.filters()[1],
            PostFilter::MinResolution {
                min_width: 0,
                min_height: 1080
            }
        );
    }
}
