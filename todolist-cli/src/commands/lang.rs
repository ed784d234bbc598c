//! Lang command - pick the language of service messages

use anyhow::{anyhow, Result};
use todolist_core::config::Config;
use todolist_core::Locale;

use super::get_data_dir;
use crate::output;

pub fn run(locale: Option<&str>) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let mut config = Config::load(&data_dir)?;

    let next = match locale {
        Some(tag) => tag.parse::<Locale>().map_err(|e| anyhow!(e))?,
        None => config.locale.toggled(),
    };

    config.set_locale(next);
    config.save(&data_dir)?;

    output::success(&format!("✓ Language set to {}", next));
    Ok(())
}
