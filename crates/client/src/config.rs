use std::fs::read_to_string;
use std::path::PathBuf;

use anyhow::Context;
use civil_codes_backend::database::connection::DbConfig;
use civil_codes_backend::models::user::UserId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Without a database the catalog runs on the in-memory backend.
    #[serde(default)]
    pub database: Option<DbConfig>,
    /// Identity that gets the manage actions in the UI regardless of its role.
    #[serde(default)]
    pub admin_id: Option<UserId>,
}

impl AppConfig {
    pub fn from_yaml_file<P: Into<PathBuf>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.into();
        let content = read_to_string(&path).with_context(|| format!("path: {path:?}"))?;
        Self::from_yaml_str(&content).with_context(|| format!("parsing {path:?}"))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, anyhow::Error> {
        Ok(serde_yaml::from_str(content)?)
    }
}
