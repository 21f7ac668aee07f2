//! Configuration module

mod site;

pub use site::SiteConfig;
pub use site::HeaderConfig;
pub use site::HighlightConfig;
pub use site::IndexConfig;
pub use site::LinkConfig;
pub use site::ProfileConfig;
