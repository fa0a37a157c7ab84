//! pulling `[WxH]` out of post titles
use {
    regex::Regex,
    serde::{Deserialize, Serialize},
    std::{fmt, sync::LazyLock},
};

/// matches the last bracketed `width x height` token in a title
static RESOLUTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s).*\[\s*([0-9]+)\s*[xX×]\s*([0-9]+)\s*\]").expect("resolution regex is valid")
});

/// pixel dimensions of a post's image, as claimed by its title
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    /// width in pixels
    pub width: u32,
    /// height in pixels
    pub height: u32,
}

impl Resolution {
    /// the resolution of a post whose title doesn't say
    pub const UNKNOWN: Self = Self::new(0, 0);

    /// make a new resolution
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// parse the resolution out of a title like `"Some lake [4032x3024] (OC)"`
    ///
    /// the last bracketed token wins. anything that isn't a pair of positive
    /// integers that fit in a `u32` gives [`Resolution::UNKNOWN`]
    pub fn from_title(title: &str) -> Self {
        let Some(caps) = RESOLUTION_RE.captures(title) else {
            return Self::UNKNOWN;
        };

        let width = caps[1].parse::<u32>().ok();
        let height = caps[2].parse::<u32>().ok();

        match (width, height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Self::new(w, h),
            _ => Self::UNKNOWN,
        }
    }

    /// whether the title actually carried a resolution
    pub fn is_known(&self) -> bool {
        *self != Self::UNKNOWN
    }

    /// width divided by height, or `None` when the height is zero
    pub fn ratio(&self) -> Option<f64> {
        (self.height > 0).then(|| self.width as f64 / self.height as f64)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "{}x{}", self.width, self.height)
        } else {
            write!(f, "?x?")
        }
    }
}
