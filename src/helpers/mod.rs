//! Helper functions shared by the pipeline and available to templates

mod date;
mod url;

pub use date::*;
pub use url::*;
