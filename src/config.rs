use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::Color32;
use serde::Deserialize;
use tracing::warn;

use crate::style::{StyleTable, TypeTag};
use crate::util::parse_hex_rgb;

/// Physics constants and style overrides for one engine.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Repulsion numerator; force falls off with squared distance.
    pub charge_strength: f32,
    pub softening: f32,
    pub link_distance: f32,
    pub link_stiffness: f32,
    pub centering_strength: f32,
    pub collision_strength: f32,
    pub collision_padding: f32,
    /// Fraction of velocity kept after each tick.
    pub friction: f32,
    pub max_speed: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    /// Temperature held while a node is being dragged.
    pub drag_alpha: f32,
    pub initial_radius: f32,
    pub barnes_hut_theta: f32,
    pub center: [f32; 2],
    pub styles: HashMap<String, StyleOverride>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleOverride {
    pub radius: Option<f32>,
    pub color: Option<HexColor>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct HexColor(pub [u8; 3]);

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        parse_hex_rgb(&value)
            .map(Self)
            .ok_or_else(|| format!("invalid hex color {value:?}, expected #rrggbb"))
    }
}

fn default_alpha_min() -> f32 {
    0.001
}

fn default_alpha_decay() -> f32 {
    1.0 - default_alpha_min().powf(1.0 / 300.0)
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            charge_strength: 12_000.0,
            softening: 100.0,
            link_distance: 100.0,
            link_stiffness: 0.05,
            centering_strength: 0.1,
            collision_strength: 0.7,
            collision_padding: 2.0,
            friction: 0.6,
            max_speed: 40.0,
            alpha_min: default_alpha_min(),
            alpha_decay: default_alpha_decay(),
            drag_alpha: 0.3,
            initial_radius: 10.0,
            barnes_hut_theta: 0.72,
            center: [0.0, 0.0],
            styles: HashMap::new(),
        }
    }
}

impl LayoutConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("invalid layout config TOML")
    }

    /// Default table with the `[styles.<type>]` overrides applied on top.
    pub fn style_table(&self) -> StyleTable {
        let mut table = StyleTable::default();
        let mut keys = self.styles.keys().collect::<Vec<_>>();
        keys.sort();

        for key in keys {
            let Some(entry) = self.styles.get(key) else {
                continue;
            };
            let Some(tag) = TypeTag::parse_known(key) else {
                warn!(key = %key, "ignoring style override for unrecognized entity type");
                continue;
            };
            let mut style = table.style(tag);
            if let Some(radius) = entry.radius.filter(|radius| radius.is_finite() && *radius > 0.0)
            {
                style.radius = radius;
            }
            if let Some(HexColor([r, g, b])) = entry.color {
                style.color = Color32::from_rgb(r, g, b);
            }
            table.set(tag, style);
        }

        table
    }
}

pub fn load_config(path: &Path) -> Result<LayoutConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    LayoutConfig::from_toml_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}
