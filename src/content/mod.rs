//! Content module - content nodes and how they are loaded

mod error;
mod frontmatter;
pub mod loader;
mod node;

pub use error::LoadError;
pub use frontmatter::{FrontMatter, ImageResize, ImageSharp, ProcessedImage, Thumbnail};
pub use loader::NodeLoader;
pub use node::{ContentNode, NodeFields, RawNode, TrustedHtml};
