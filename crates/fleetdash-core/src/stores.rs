use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One store in the fleet. Identity is the `merchant_id` + `marketplace_id`
/// pair; `store_name` is display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub store_name: String,
    pub merchant_id: String,
    pub marketplace_id: String,
}

impl StoreConfig {
    /// Dashboard URL for this store on the given portal origin.
    #[must_use]
    pub fn dashboard_url(&self, base_url: &str) -> String {
        format!(
            "{}/snowdash?mons_sel_dir_mcid={}&mons_sel_mkid={}",
            base_url.trim_end_matches('/'),
            self.merchant_id,
            self.marketplace_id
        )
    }

}

/// Stores are rostered as `"<region> - <town>"`; displays that only want
/// the town use this. Undelimited names pass through unchanged.
#[must_use]
pub fn short_store_name(store_name: &str) -> &str {
    store_name
        .rsplit_once(" - ")
        .map_or(store_name, |(_, town)| town)
}

#[derive(Debug, Deserialize)]
pub struct StoresFile {
    pub stores: Vec<StoreConfig>,
}

/// Load and validate the store roster from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation (empty roster, blank fields, duplicate store identities).
pub fn load_stores(path: &Path) -> Result<StoresFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let stores_file: StoresFile =
        serde_yaml::from_str(&content).map_err(ConfigError::StoresFileParse)?;

    validate_stores(&stores_file)?;

    Ok(stores_file)
}

fn validate_stores(stores_file: &StoresFile) -> Result<(), ConfigError> {
    if stores_file.stores.is_empty() {
        return Err(ConfigError::Validation(
            "stores file contains no stores".to_string(),
        ));
    }

    let mut seen_identities = HashSet::new();

    for store in &stores_file.stores {
        if store.store_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store_name must be non-empty".to_string(),
            ));
        }
        if store.merchant_id.trim().is_empty() || store.marketplace_id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has a blank merchant_id or marketplace_id",
                store.store_name
            )));
        }

        let identity = (store.merchant_id.clone(), store.marketplace_id.clone());
        if !seen_identities.insert(identity) {
            return Err(ConfigError::Validation(format!(
                "duplicate store identity: merchant_id '{}' marketplace_id '{}' (store '{}')",
                store.merchant_id, store.marketplace_id, store.store_name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "stores_test.rs"]
mod stores_test;
