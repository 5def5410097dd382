//! Application-level configuration loading, including the runtime card set.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::deck::CardDefinition;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "EMBER_MATCH_BACK_CONFIG_PATH";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    cards: Vec<CardDefinition>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the built-in card set.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        count = app_config.cards.len(),
                        "loaded card set from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Card definitions available as the candidate pool for deck generation.
    pub fn cards(&self) -> &[CardDefinition] {
        &self.cards
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cards: default_cards(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    cards: Vec<RawCard>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let cards = value.cards.into_iter().map(Into::into).collect::<Vec<_>>();
        Self { cards }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of a single card entry inside the configuration file.
struct RawCard {
    id: u32,
    icon: String,
    tip: String,
    #[serde(default)]
    image: Option<String>,
}

impl From<RawCard> for CardDefinition {
    fn from(value: RawCard) -> Self {
        Self {
            content_id: value.id,
            icon: value.icon,
            tip: value.tip,
            image: value.image,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn card(content_id: u32, icon: &str, tip: &str, image: Option<&str>) -> CardDefinition {
    CardDefinition {
        content_id,
        icon: icon.to_string(),
        tip: tip.to_string(),
        image: image.map(str::to_string),
    }
}

/// Built-in fire-safety card set shipped with the binary.
fn default_cards() -> Vec<CardDefinition> {
    vec![
        card(
            1,
            "fas fa-fire-extinguisher",
            "Know how to use a fire extinguisher",
            None,
        ),
        card(2, "fas fa-phone-alt", "Call 911 in case of emergency", None),
        card(
            3,
            "fas fa-smoking-ban",
            "Stay away from matches - they can start fires",
            Some("/images/fire-safety/match.png"),
        ),
        card(
            4,
            "fas fa-door-open",
            "Know your escape routes",
            Some("/images/fire-safety/fire_exit.png"),
        ),
        card(
            5,
            "fas fa-burn",
            "If someone's clothes catch on fire, use stop, drop and roll",
            Some("/images/fire-safety/drop & roll.png"),
        ),
        card(
            6,
            "fas fa-bell",
            "Smoke rises, so get on your hands and knees and crawl towards the nearest exit",
            Some("/images/fire-safety/crawl.png"),
        ),
        card(
            7,
            "fas fa-plug",
            "Don't overload outlets",
            Some("/images/fire-safety/unplug.png"),
        ),
        card(
            8,
            "fas fa-home",
            "Do not park within 15 feet of a fire hydrant",
            Some("/images/fire-safety/fire_hydrant.png"),
        ),
        card(
            9,
            "fas fa-temperature-high",
            "Be careful with candles - keep them away from things that can burn",
            Some("/images/fire-safety/candle.png"),
        ),
        card(
            10,
            "fas fa-tint",
            "Keep a bucket of water or fire blanket nearby",
            None,
        ),
        card(11, "fas fa-child", "Teach children about fire safety", None),
        card(
            12,
            "fas fa-fire-alt",
            "Lighters are not toys - only grown-ups should use them",
            Some("/images/fire-safety/lighter.png"),
        ),
        card(
            13,
            "fas fa-first-aid",
            "Keep a first aid kit accessible",
            Some("/images/fire-safety/medicalkit.png"),
        ),
        card(
            14,
            "fas fa-map-marked-alt",
            "Establish a family meeting point",
            None,
        ),
        card(15, "fas fa-bolt", "Unplug appliances when not in use", None),
    ]
}
