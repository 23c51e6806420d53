use anyhow::Result;

use super::load_library;
use crate::config::Config;

/// Load both artifacts and report what was found.
pub fn show_status(config: &Config) -> Result<()> {
    let library = load_library(config)?;
    let matrix = library.matrix();

    println!("\nMarquee Status\n");
    println!("  Catalog:    {}", config.catalog_path.display());
    println!("  Similarity: {}", config.similarity_path.display());
    println!("  Movies:     {}", library.len());
    println!("  Matrix:     {0}x{0}", matrix.dim());
    println!(
        "  Symmetric:  {}",
        if matrix.is_symmetric() { "yes" } else { "no" }
    );
    println!("  Top K:      {}", config.top_k);

    Ok(())
}
