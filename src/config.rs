use dotenvy::dotenv;
use log::error;
use serde::Deserialize;
use std::env;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub search_endpoint: String,
    pub search_file_field: String,
    pub export_path: Option<String>,
    pub map: MapConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom: u8,
    pub tile_url: String,
    pub tile_max_zoom: u8,
    pub tile_attribution: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            search_endpoint: String::from("http://localhost:3000/search"),
            search_file_field: String::from("file"),
            export_path: None,
            map: MapConfig::default(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            center_latitude: 51.505,
            center_longitude: -0.09,
            zoom: 12,
            tile_url: String::from("https://tile.openstreetmap.org/{z}/{x}/{y}.png"),
            tile_max_zoom: 19,
            tile_attribution: String::from(
                "&copy; <a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a>",
            ),
        }
    }
}

pub fn create_test_config() -> Config {
    Config {
        search_endpoint: "http://127.0.0.1:0/search".to_string(),
        ..Config::default()
    }
}

pub fn parse_config(bytes: &[u8]) -> Result<Config, String> {
    toml::from_slice(bytes).map_err(|e| e.to_string())
}

pub fn read_config() -> Config {
    dotenv().ok();
    env::var(CONFIG_PATH_ENV)
        .map_err(|_| format!("{CONFIG_PATH_ENV} .env not set"))
        .and_then(|config_path| std::fs::read(config_path).map_err(|e| e.to_string()))
        .and_then(|bytes| parse_config(&bytes))
        .unwrap_or_else(|err| {
            error!("failed to read config: {err}");
            std::process::exit(1);
        })
}
