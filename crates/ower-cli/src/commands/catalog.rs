//! Catalog listings: heroes and stat types

use anyhow::{Context, Result};
use ower_core::{Config, GameMode};

use crate::output::{OutputFormat, print_json};

/// Execute the heroes command
pub fn list_heroes(config: &Config, format: OutputFormat) -> Result<()> {
    let catalog = config.hero_catalog().context("Failed to load hero catalog")?;
    if format.is_machine() {
        return print_json(catalog.heroes());
    }
    for hero in catalog.heroes() {
        let role = hero.role.map(|r| r.to_string()).unwrap_or_default();
        println!("{:>3}  {:<16} {}", hero.hero_id, hero.hero_name, role);
    }
    Ok(())
}

/// Execute the types command
pub fn list_types(mode: GameMode, format: OutputFormat) -> Result<()> {
    let categories = mode.categories().entries();
    if format.is_machine() {
        return print_json(categories);
    }
    for category in categories {
        println!("{:<24} {}", category.key, category.label);
    }
    Ok(())
}
