use serde::Deserialize;
use std::path::PathBuf;

use impensa_import::DateOrder;

/// Optional settings file at `<config dir>/impensa/config.toml`. A missing
/// file means defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How to resolve ambiguous dates like `01/02/2024`.
    pub date_order: DateOrder,
    /// Overrides the platform data directory for the database file.
    pub db_path: Option<PathBuf>,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        let Some(dirs) = project_dirs() else {
            return Ok(Settings::default());
        };
        let path = dirs.config_dir().join("config.toml");
        if !path.exists() {
            return Ok(Settings::default());
        }
        let text = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn db_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }
        let dirs = project_dirs()
            .ok_or_else(|| anyhow::anyhow!("could not determine a data directory"))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join("expenses.db"))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "impensa", "Impensa")
}
