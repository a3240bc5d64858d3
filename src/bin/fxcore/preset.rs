//! TOML presets
//!
//! ```toml
//! [params]
//! delay_length = 0.02
//! feedback = 0.6
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use serde::Deserialize;
use tracing::info;

use fxcore::params::ParamStore;

#[derive(Debug, Default, Deserialize)]
pub struct Preset {
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
}

impl Preset {
    pub fn load(path: &Path) -> EyreResult<Self> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read preset {}", path.display()))?;
        toml::from_str(&text).wrap_err_with(|| format!("invalid preset {}", path.display()))
    }

    /// Write every value into `store`. Unknown ids are an error so typos
    /// don't go unnoticed.
    pub fn apply(&self, store: &ParamStore) -> EyreResult<()> {
        for (id, &value) in &self.params {
            let index = store
                .index_of(id)
                .ok_or_else(|| eyre!("preset names unknown parameter '{}'", id))?;
            let stored = store.set(index, value).unwrap_or(value);
            info!(id = %id, value = stored, "preset value applied");
        }
        Ok(())
    }
}

/// Load and apply an optional preset.
pub fn apply_optional(path: Option<&Path>, store: &ParamStore) -> EyreResult<()> {
    match path {
        Some(path) => Preset::load(path)?.apply(store),
        None => Ok(()),
    }
}
