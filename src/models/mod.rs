pub mod site_config;
pub mod video;

pub use site_config::SiteConfig;
pub use video::{SortOption, VideoView};
