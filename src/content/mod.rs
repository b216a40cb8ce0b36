//! Content module - discovers, splits and renders markdown documents

mod document;
mod frontmatter;
pub mod loader;
mod markdown;

pub use document::{ContentKind, Document, PostSummary};
pub use frontmatter::{FieldValue, FrontMatter, FrontMatterError};
pub use markdown::{heading_slug, MarkdownRenderer};
