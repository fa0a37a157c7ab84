//! configuration loading, defaults and validation
pub mod options;
pub mod validate;

pub use options::R2wCfg;
