// SPDX-License-Identifier: MPL-2.0
//! This module handles the library's tunable configuration, including loading
//! and saving it to a `settings.toml` file.
//!
//! Every field is optional: an absent field falls back to the matching
//! constant in [`defaults`].
//!
//! # Examples
//!
//! ```no_run
//! use herald::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.pause_between_messages_secs = Some(1.0);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//!
//! // To load/save from a specific path (e.g., for testing)
//! let temp_dir = PathBuf::from("./temp_config_dir");
//! std::fs::create_dir_all(&temp_dir).unwrap();
//! let temp_file = temp_dir.join("test_settings.toml");
//! config::save_to_path(&config, &temp_file).expect("Failed to save to path");
//! let loaded_config = config::load_from_path(&temp_file).expect("Failed to load from path");
//! assert_eq!(loaded_config.pause_between_messages_secs, Some(1.0));
//! std::fs::remove_dir_all(&temp_dir).unwrap();
//! ```

pub mod defaults;

pub use defaults::*;

use crate::animation::pan::{DismissThresholds, FlingThresholds};
use crate::animation::{EdgeTuning, PhysicsTuning};
use crate::domain::{ClosePercent, MessagePause};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "Herald";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pause_between_messages_secs: Option<f64>,
    #[serde(default)]
    pub automatic_duration_secs: Option<f64>,
    #[serde(default)]
    pub dim_gray_opacity: Option<f32>,
    #[serde(default)]
    pub edge: EdgeConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
}

/// Tuning for the top/bottom sliding animator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeConfig {
    #[serde(default)]
    pub show_duration_secs: Option<f64>,
    #[serde(default)]
    pub hide_duration_secs: Option<f64>,
    #[serde(default)]
    pub spring_damping: Option<f32>,
    #[serde(default)]
    pub close_speed_threshold: Option<f32>,
    #[serde(default)]
    pub close_percent_threshold: Option<f32>,
    #[serde(default)]
    pub close_absolute_threshold: Option<f32>,
}

/// Tuning for the physics animator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    #[serde(default)]
    pub show_duration_secs: Option<f64>,
    #[serde(default)]
    pub hide_duration_secs: Option<f64>,
    #[serde(default)]
    pub hide_delay_secs: Option<f64>,
    #[serde(default)]
    pub fling_energy_threshold: Option<f32>,
    #[serde(default)]
    pub fling_speed_threshold: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pause_between_messages_secs: Some(DEFAULT_PAUSE_BETWEEN_MESSAGES_SECS),
            automatic_duration_secs: Some(DEFAULT_AUTOMATIC_DURATION_SECS),
            dim_gray_opacity: Some(DEFAULT_DIM_GRAY_OPACITY),
            edge: EdgeConfig::default(),
            physics: PhysicsConfig::default(),
        }
    }
}

impl Config {
    /// Pause enforced between one message hiding and the next one showing.
    #[must_use]
    pub fn pause_between_messages(&self) -> MessagePause {
        MessagePause::new(
            self.pause_between_messages_secs
                .unwrap_or(DEFAULT_PAUSE_BETWEEN_MESSAGES_SECS),
        )
    }

    /// Display time of messages configured with the automatic duration.
    #[must_use]
    pub fn automatic_duration(&self) -> Duration {
        seconds(self.automatic_duration_secs, DEFAULT_AUTOMATIC_DURATION_SECS)
    }

    /// Opacity of the gray dim overlay.
    #[must_use]
    pub fn dim_gray_opacity(&self) -> f32 {
        self.dim_gray_opacity
            .filter(|value| value.is_finite())
            .unwrap_or(DEFAULT_DIM_GRAY_OPACITY)
            .clamp(0.0, 1.0)
    }

    /// Resolved tuning for the top/bottom animator.
    #[must_use]
    pub fn edge_tuning(&self) -> EdgeTuning {
        let edge = &self.edge;
        EdgeTuning {
            show_duration: seconds(edge.show_duration_secs, EDGE_SHOW_DURATION_SECS),
            hide_duration: seconds(edge.hide_duration_secs, EDGE_HIDE_DURATION_SECS),
            spring_damping: edge
                .spring_damping
                .unwrap_or(EDGE_SPRING_DAMPING)
                .clamp(0.05, 1.0),
            thresholds: DismissThresholds {
                speed: edge
                    .close_speed_threshold
                    .unwrap_or(DEFAULT_CLOSE_SPEED_THRESHOLD),
                percent: ClosePercent::new(
                    edge.close_percent_threshold
                        .unwrap_or(DEFAULT_CLOSE_PERCENT_THRESHOLD),
                ),
                absolute: edge
                    .close_absolute_threshold
                    .unwrap_or(DEFAULT_CLOSE_ABSOLUTE_THRESHOLD),
            },
        }
    }

    /// Resolved tuning for the physics animator.
    #[must_use]
    pub fn physics_tuning(&self) -> PhysicsTuning {
        let physics = &self.physics;
        PhysicsTuning {
            show_duration: seconds(physics.show_duration_secs, PHYSICS_SHOW_DURATION_SECS),
            hide_duration: seconds(physics.hide_duration_secs, PHYSICS_HIDE_DURATION_SECS),
            hide_delay: seconds(physics.hide_delay_secs, PHYSICS_HIDE_DELAY_SECS),
            fling: FlingThresholds {
                energy: physics
                    .fling_energy_threshold
                    .unwrap_or(DEFAULT_FLING_ENERGY_THRESHOLD),
                speed: physics
                    .fling_speed_threshold
                    .unwrap_or(DEFAULT_FLING_SPEED_THRESHOLD),
            },
        }
    }
}

/// Converts optional seconds into a Duration, ignoring negative or
/// non-finite values.
fn seconds(value: Option<f64>, default: f64) -> Duration {
    value
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or_else(|| Duration::from_secs_f64(default))
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!("Ignoring invalid settings at {}: {}", path.display(), err);
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
