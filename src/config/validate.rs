//! configuration validation stuff
use crate::{config::options::*, validator};

/// trait for validating config structs
pub trait Validate {
    /// validate the config
    fn validate(&self) -> Result<(), Vec<String>>;

    /// check if the config is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// returns whether a subreddit name only uses the characters reddit allows
fn is_subreddit_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 21
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

validator! { ListingCfg,
    base_url => |v: &String| url::Url::parse(v).is_ok_and(|u| matches!(u.scheme(), "http" | "https")),
        "must be a valid http(s) url";
    subreddit => |v: &String| is_subreddit_name(v),
        "must be 1-21 letters, digits or underscores (without the r/)";
    limit => |v: &u32| (1..=100).contains(v),
        "must be between 1 and 100";
}

validator! { FilterCfg,
    extensions => |v: &Vec<String>| !v.is_empty() && v.iter().all(|e| !e.trim_start_matches('.').trim().is_empty()),
        "must list at least one non-empty extension";
}

validator! { DownloadCfg,
    path => |v: &String| !v.trim().is_empty(),
        "must not be empty";
}

validator! { HttpCfg,
    user_agent => |v: &String| !v.trim().is_empty(),
        "must not be empty";
    timeout => |v: &u64| *v > 0,
        "must be greater than 0";
    connect_timeout => |v: &u64| *v > 0,
        "must be greater than 0";
}

/// valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

validator! { LoggingCfg,
    level => |v: &String| VALID_LOG_LEVELS.contains(&v.to_lowercase().as_str()),
        "must be one of: trace, debug, info, warn, error, off";
}

impl Validate for R2wCfg {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors: Vec<String> = Vec::new();

        macro_rules! validate_nested {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Err(nested_errors) = self.$field.validate() {
                        for err in nested_errors {
                            errors.push(format!("{}.{}", stringify!($field), err));
                        }
                    }
                )*
            };
        }

        validate_nested!(listing, filter, download, http, logging);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// format validation errors for display
pub fn format_validation_errors(errors: &[String]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, err) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, err));
    }
    output
}

#[cfg(test)]
mod tests {
    use {super::*, crate::error::R2wError};

    #[test]
    fn test_defaults_are_valid() {
        assert!(R2wCfg::default().is_valid());
    }

    #[test]
    fn test_collects_every_problem() {
        let mut cfg = R2wCfg::default();
        cfg.listing.subreddit = "r/EarthPorn".to_string();
        cfg.listing.limit = 0;
        cfg.logging.level = "loud".to_string();

        let errors = cfg.validate().unwrap_err();

        assert_eq!(
            errors,
            [
                "listing.subreddit: must be 1-21 letters, digits or underscores (without the r/)",
                "listing.limit: must be between 1 and 100",
                "logging.level: must be one of: trace, debug, info, warn, error, off",
            ]
        );
    }

    #[test]
    fn test_subreddit_names() {
        assert!(is_subreddit_name("EarthPorn"));
        assert!(is_subreddit_name("wallpaper_dump"));
        assert!(!is_subreddit_name(""));
        assert!(!is_subreddit_name("earth porn"));
        assert!(!is_subreddit_name("../../etc"));
    }

    #[test]
    fn test_limit_bounds() {
        let mut cfg = ListingCfg::default();

        cfg.limit = 100;
        assert!(cfg.is_valid());
        cfg.limit = 101;
        assert!(!cfg.is_valid());
    }

    #[test]
    fn test_empty_extensions_rejected() {
        let cfg = FilterCfg {
            extensions: vec![".".to_string()],
            ..FilterCfg::default()
        };

        assert!(!cfg.is_valid());
    }

    #[test]
    fn test_check_wraps_into_config_error() {
        let mut cfg = R2wCfg::default();
        cfg.http.timeout = 0;

        match cfg.check() {
            Err(R2wError::Config(msg)) => {
                assert!(msg.contains("1. http.timeout: must be greater than 0"));
            }
            other => panic!("expected a config error, got {:?}", other),
        }
    }
}
