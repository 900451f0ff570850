//! What a renderer needs to draw the actor, read after each tick.
//!
//! The controller never looks at this; drawing is a separate consumer of
//! its public state.

use lw_core::animation::SpriteStrip;
use lw_core::geometry::Rect;

use crate::controller::CharacterController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteView {
    /// Where the full sprite frame goes in world space.
    pub dest: Rect,
    /// Current frame within the sprite strip.
    pub source: Rect,
    pub flip_horizontal: bool,
    /// Solid region, for debug overlays.
    pub hit_box: Rect,
}

impl SpriteView {
    pub fn of(controller: &CharacterController) -> Self {
        let config = controller.config();
        let strip = SpriteStrip::new(config.frame_width, config.frame_height);
        Self {
            dest: controller.frame_rect(),
            source: strip.source_rect(controller.current_frame()),
            flip_horizontal: controller.facing().is_mirrored(),
            hit_box: controller.hit_box(),
        }
    }
}

impl std::fmt::Display for SpriteView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "at ({}, {}) src_x {}{}",
            self.dest.x,
            self.dest.y,
            self.source.x,
            if self.flip_horizontal { " flipped" } else { "" }
        )
    }
}
