//! Configuration module

mod site;

pub use site::ClassNames;
pub use site::ExcerptConfig;
pub use site::SiteConfig;
pub use site::ThumbnailPolicy;
