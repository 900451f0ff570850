//! Controller tuning: actor frame, animation strip and physics constants.
//!
//! Every field has a default, so a JSON file only needs to name what it
//! overrides. Out-of-range values are clamped by `sanitized()` rather than
//! rejected; only unreadable or unparsable files are errors.

use std::fs;
use std::path::Path;

use glam::IVec2;
use serde::Deserialize;

use crate::collision::{HitBoxShape, Margins};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    pub frame_width: i32,
    pub frame_height: i32,
    pub total_frames: usize,
    pub standing_frame: usize,
    /// Horizontal pixels per tick while moving.
    pub speed: i32,
    pub margins: Margins,
    /// Added to `velocity_y` every airborne tick. Positive is downward.
    pub gravity: f32,
    /// Initial `velocity_y` of a jump. Negative is upward.
    pub jump_strength: f32,
    pub max_fall_speed: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            frame_width: 57,
            frame_height: 100,
            total_frames: 21,
            standing_frame: 0,
            speed: 5,
            margins: Margins::default(),
            gravity: 0.8,
            jump_strength: -15.0,
            max_fall_speed: 15.0,
        }
    }
}

impl ControllerConfig {
    /// Clamp every field to its nearest valid value, warning per change.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut out = self;

        if out.frame_width < 1 || out.frame_height < 1 {
            log::warn!(
                "Config: frame size {}x{} clamped to at least 1x1",
                out.frame_width,
                out.frame_height
            );
            out.frame_width = out.frame_width.max(1);
            out.frame_height = out.frame_height.max(1);
        }
        if out.total_frames == 0 {
            log::warn!("Config: total_frames 0 clamped to 1");
            out.total_frames = 1;
        }
        if out.standing_frame >= out.total_frames {
            log::warn!(
                "Config: standing_frame {} out of range, using {}",
                out.standing_frame,
                out.total_frames - 1
            );
            out.standing_frame = out.total_frames - 1;
        }
        if out.speed < 0 {
            log::warn!("Config: negative speed {} clamped to 0", out.speed);
            out.speed = 0;
        }

        let m = out.margins;
        if m.left < 0 || m.right < 0 || m.top < 0 || m.bottom < 0 {
            log::warn!(
                "Config: negative margins ({}, {}, {}, {}) clamped to 0",
                m.left,
                m.right,
                m.top,
                m.bottom
            );
            out.margins = Margins::new(m.left.max(0), m.right.max(0), m.top.max(0), m.bottom.max(0));
        }

        out.gravity = finite_or("gravity", out.gravity, defaults.gravity);
        out.jump_strength = finite_or("jump_strength", out.jump_strength, defaults.jump_strength);
        out.max_fall_speed = finite_or("max_fall_speed", out.max_fall_speed, defaults.max_fall_speed);

        if out.jump_strength > 0.0 {
            log::warn!(
                "Config: jump_strength {} points downward, clamped to 0",
                out.jump_strength
            );
            out.jump_strength = 0.0;
        }
        if out.max_fall_speed < 0.0 {
            log::warn!(
                "Config: max_fall_speed {} clamped to 0",
                out.max_fall_speed
            );
            out.max_fall_speed = 0.0;
        }
        out
    }

    pub fn frame_size(&self) -> IVec2 {
        IVec2::new(self.frame_width, self.frame_height)
    }

    pub fn hit_box_shape(&self) -> HitBoxShape {
        HitBoxShape::new(self.frame_size(), self.margins)
    }
}

fn finite_or(name: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        log::warn!("Config: {name} is not finite, using {fallback}");
        fallback
    }
}

pub fn load_config_from_path(path: &Path) -> Result<ControllerConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    parse_config(&raw).map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))
}

fn parse_config(raw: &str) -> Result<ControllerConfig, serde_json::Error> {
    let config: ControllerConfig = serde_json::from_str(raw)?;
    Ok(config.sanitized())
}
