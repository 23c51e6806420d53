use anyhow::Result;

use super::load_library;
use crate::config::Config;

/// List catalog titles in index order, optionally filtered by substring.
pub fn list_titles(config: &Config, filter: Option<&str>) -> Result<()> {
    let library = load_library(config)?;
    let catalog = library.catalog();

    let mut shown = 0;
    for item in catalog.search(filter.unwrap_or_default()) {
        println!("{:>6}  {}", item.index, item.title);
        shown += 1;
    }

    match filter {
        Some(filter) if shown == 0 => println!("No titles match \"{}\".", filter),
        Some(_) => println!("\n{} of {} titles", shown, catalog.len()),
        None => println!("\n{} titles", shown),
    }

    Ok(())
}
