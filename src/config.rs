use serde::Deserialize;
use std::path::PathBuf;

use crate::logic::cluster::ClusterConfig;
use crate::logic::map::GeoPoint;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Base of shareable station links (defaults to `base_url`)
    #[serde(default)]
    pub share_url: Option<String>,
    #[serde(default)]
    pub clipboard_command: Option<String>,
    #[serde(default)]
    pub vim_mode: bool,
    #[serde(default = "default_true")]
    pub image_preview_enabled: bool,
    #[serde(default = "default_image_protocol")]
    pub image_protocol: String,
    /// Fixed device position
    #[serde(default)]
    pub location: Option<LocationConfig>,
    /// Endpoint answering `{"latitude": .., "longitude": ..}`
    #[serde(default)]
    pub location_url: Option<String>,
    #[serde(default = "default_cluster_threshold")]
    pub cluster_threshold: usize,
    #[serde(default = "default_cluster_max_zoom")]
    pub cluster_max_zoom: u8,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LocationConfig> for GeoPoint {
    fn from(loc: LocationConfig) -> Self {
        GeoPoint::new(loc.latitude, loc.longitude)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            share_url: None,
            clipboard_command: None,
            vim_mode: false,
            image_preview_enabled: true,
            image_protocol: default_image_protocol(),
            location: None,
            location_url: None,
            cluster_threshold: default_cluster_threshold(),
            cluster_max_zoom: default_cluster_max_zoom(),
            request_timeout_secs: default_request_timeout_secs(),
            preferences_path: None,
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn share_base(&self) -> &str {
        self.share_url.as_deref().unwrap_or(&self.base_url)
    }

    pub fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig {
            threshold: self.cluster_threshold,
            max_zoom: self.cluster_max_zoom,
            ..ClusterConfig::default()
        }
    }
}

fn default_base_url() -> String {
    "https://kelibackend.vercel.app".to_string()
}

fn default_true() -> bool {
    true
}

fn default_image_protocol() -> String {
    "auto".to_string()
}

fn default_cluster_threshold() -> usize {
    50
}

fn default_cluster_max_zoom() -> u8 {
    11
}

fn default_request_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.base_url, "https://kelibackend.vercel.app");
        assert_eq!(config.cluster_threshold, 50);
        assert_eq!(config.cluster_max_zoom, 11);
        assert!(config.image_preview_enabled);
        assert_eq!(config.share_base(), config.base_url);
    }

    #[test]
    fn test_partial_config() {
        let yaml = "
base_url: http://localhost:3000
share_url: https://keli.example
vim_mode: true
location:
  latitude: 65.01
  longitude: 25.47
";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.share_base(), "https://keli.example");
        assert!(config.vim_mode);
        let loc: GeoPoint = config.location.unwrap().into();
        assert_eq!(loc.latitude, 65.01);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(Config::from_yaml("cluster_threshold: [").is_err());
    }
}
