use std::sync::LazyLock;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    let config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file("rotaserve.toml"))
        .merge(Env::prefixed("ROTA_").split("__"))
        .extract::<Config>();
    match config {
        Ok(config) => config,
        Err(err) => {
            panic!("CONFIG ERROR: {err}");
        }
    }
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bind_address: String,
    /// JSON dataset to serve; the built-in demo week is used when unset.
    pub data_file: Option<String>,
    pub calendar: Calendar,
}

/// The visible day window and its pixel scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    pub start_hour: i8,
    pub end_hour: i8,
    pub slot_minutes: i64,
    pub slot_height: f64,
    pub min_card_height: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3200".to_string(),
            data_file: None,
            calendar: Calendar::default(),
        }
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 18,
            slot_minutes: 30,
            slot_height: 40.0,
            min_card_height: 28.0,
        }
    }
}

pub fn get_config() -> &'static Config {
    &*CONFIG
}
