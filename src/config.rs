use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Config {
    pub http_port: u16,
    pub dataset_path: PathBuf,

    /// Network generations to report, in output order. Must match
    /// columns of the dataset.
    #[serde(default = "default_networks")]
    pub networks: Vec<String>,

    pub geocoder: GeocoderConfig,
}

#[derive(Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_networks() -> Vec<String> {
    vec!["2G".to_string(), "3G".to_string(), "4G".to_string()]
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

pub fn load(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path).context("Failed to read config")?;
    let config = toml::from_str(&data).context("Failed to parse config")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in() {
        let config: Config = toml::from_str(
            r#"
            http_port = 8080
            dataset_path = "towers.csv"

            [geocoder]
            user_agent = "couverture"
            "#,
        )
        .unwrap();
        assert_eq!(config.networks, ["2G", "3G", "4G"]);
        assert_eq!(config.geocoder.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.geocoder.timeout_secs, 10);
    }
}
