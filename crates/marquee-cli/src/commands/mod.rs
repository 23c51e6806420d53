pub mod config;
pub mod recommend;
pub mod status;
pub mod titles;

use anyhow::{Context, Result};
use marquee_core::Library;

use crate::config::Config;

pub use recommend::run_recommend;
pub use status::show_status;
pub use titles::list_titles;

/// Load and validate the library named by the effective configuration.
///
/// Any failure here is fatal: no query is answered against a catalog and
/// matrix that do not line up.
pub fn load_library(config: &Config) -> Result<Library> {
    Library::load(&config.catalog_path, &config.similarity_path).with_context(|| {
        format!(
            "Failed to load library from {} and {}",
            config.catalog_path.display(),
            config.similarity_path.display()
        )
    })
}
