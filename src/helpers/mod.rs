//! Helper functions for building markup
//!
//! Small string builders shared by the excerpt renderer and the index page.

mod html;
mod url;

pub use html::*;
pub use url::*;
