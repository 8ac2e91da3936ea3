use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use eframe::egui::{Vec2, vec2};

const GOLDEN_RATIO_CONJUGATE: f32 = 0.618_034;

pub(crate) fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

/// Deterministic unit direction for separating two coincident points.
pub(crate) fn fallback_direction(from: usize, to: usize) -> Vec2 {
    let angle =
        ((from as f32) * GOLDEN_RATIO_CONJUGATE + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

pub(crate) fn parse_hex_rgb(value: &str) -> Option<[u8; 3]> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let first = stable_pair("alice");
        let second = stable_pair("alice");
        assert_eq!(first, second);
        assert!((-1.0..=1.0).contains(&first.0));
        assert!((-1.0..=1.0).contains(&first.1));
    }

    #[test]
    fn fallback_direction_is_unit_length() {
        let direction = fallback_direction(3, 7);
        assert!((direction.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_rgb("#e74c3c"), Some([0xe7, 0x4c, 0x3c]));
        assert_eq!(parse_hex_rgb("1abc9c"), Some([0x1a, 0xbc, 0x9c]));
        assert_eq!(parse_hex_rgb("#fff"), None);
        assert_eq!(parse_hex_rgb("#zzzzzz"), None);
    }
}
