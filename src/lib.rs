//! reddit2wallpaper downloads wallpaper-sized images from a subreddit
//!
//! posts are fetched from the listing api, filtered by file extension,
//! by the `[WxH]` resolution in their title and optionally by aspect ratio,
//! then saved into a directory (skipping files that are already there)
#![forbid(missing_docs, rustdoc::missing_crate_level_docs)]

mod macros;

pub mod app;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod filter;
pub mod models;
pub mod resolution;
