//! Collision against static rectangular obstacles and the world bounds.
//!
//! The actor's sprite frame is larger than its solid body, so every test runs
//! against a *hit box*: the frame inset by per-side margins. Resolution is
//! axis-separable. The controller resolves X first at the old Y, then Y at
//! the settled X, and each pass corrects against the first colliding
//! obstacle only. First match in authored order wins when several overlap.
//!
//! Vertical resolution tells a landing from a head-bump by looking at where
//! the hit box was on the previous tick. A contact that was neither above nor
//! below the obstacle last tick is lateral and left alone; the horizontal pass
//! owns it.

use std::sync::Arc;

use glam::IVec2;
use lw_core::geometry::Rect;
use lw_core::intent::Direction;
use serde::Deserialize;

/// Slack, in pixels, when deciding whether the actor came from above/below.
const CONTACT_TOLERANCE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obstacle {
    pub rect: Rect,
    pub visible: bool,
}

impl Obstacle {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            visible: true,
        }
    }

    #[allow(dead_code)]
    pub fn hidden(rect: Rect) -> Self {
        Self {
            rect,
            visible: false,
        }
    }

    /// Hidden and zero-area obstacles take no part in collision.
    pub fn is_solid(&self) -> bool {
        self.visible && !self.rect.is_empty()
    }
}

/// Immutable, cheaply clonable snapshot of the obstacle list.
///
/// The controller only ever sees whole snapshots; the authoring side builds
/// a new one and hands it over between ticks.
#[derive(Debug, Clone)]
pub struct ObstacleSet {
    obstacles: Arc<[Obstacle]>,
    version: u64,
}

impl ObstacleSet {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self {
            obstacles: Arc::from(obstacles),
            version: 0,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl Default for ObstacleSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<Obstacle> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = Obstacle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Insets from the sprite frame to the hit box. Sides missing from a config
/// file keep their default inset.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Margins {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Default for Margins {
    /// Insets for the stock 57x100 character sprite.
    fn default() -> Self {
        Self::new(10, 10, 5, 5)
    }
}

impl Margins {
    pub const fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

/// Hit box geometry relative to the frame's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitBoxShape {
    pub offset: IVec2,
    pub size: IVec2,
}

impl HitBoxShape {
    /// Margins that would invert the box floor its size at 1×1.
    pub fn new(frame_size: IVec2, margins: Margins) -> Self {
        let width = (frame_size.x - margins.left - margins.right).max(1);
        let height = (frame_size.y - margins.top - margins.bottom).max(1);
        Self {
            offset: IVec2::new(margins.left, margins.top),
            size: IVec2::new(width, height),
        }
    }

    /// Hit box for a frame whose top-left corner sits at `position`.
    pub fn at(&self, position: IVec2) -> Rect {
        Rect::from_pos_size(position + self.offset, self.size)
    }

    fn x_with_right_at(&self, edge: i32) -> i32 {
        edge - self.offset.x - self.size.x
    }

    fn x_with_left_at(&self, edge: i32) -> i32 {
        edge - self.offset.x
    }

    fn y_with_bottom_at(&self, edge: i32) -> i32 {
        edge - self.offset.y - self.size.y
    }

    fn y_with_top_at(&self, edge: i32) -> i32 {
        edge - self.offset.y
    }
}

pub fn hit_box(frame: Rect, margins: Margins) -> Rect {
    HitBoxShape::new(frame.size(), margins).at(frame.position())
}

/// The playable area `[0, width] × [0, height]`. Floor, ceiling and both
/// walls behave like obstacles that are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldBounds {
    pub width: i32,
    pub height: i32,
}

impl WorldBounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// What a vertical correction amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalContact {
    None,
    Landing,
    HeadBump,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalResolution {
    pub y: i32,
    pub velocity_y: f32,
    pub contact: VerticalContact,
}

impl VerticalResolution {
    fn unchanged(y: i32, velocity_y: f32) -> Self {
        Self {
            y,
            velocity_y,
            contact: VerticalContact::None,
        }
    }

    /// Airborne flag after applying this resolution.
    pub fn airborne_after(&self, was_airborne: bool) -> bool {
        match self.contact {
            VerticalContact::Landing => false,
            VerticalContact::HeadBump => true,
            VerticalContact::None => was_airborne,
        }
    }
}

/// First visible obstacle, in iteration order, that strictly overlaps `hit_box`.
pub fn check_collision<'a>(hit_box: &Rect, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    obstacles
        .iter()
        .find(|obstacle| obstacle.is_solid() && hit_box.intersects(&obstacle.rect))
}

/// Pull `candidate_x` back so the hit box sits flush against the side of
/// `obstacle` it was moving into. No intent, no correction.
pub fn resolve_horizontal(
    candidate_x: i32,
    direction: Direction,
    obstacle: &Obstacle,
    shape: &HitBoxShape,
) -> i32 {
    let hit = shape.at(IVec2::new(candidate_x, 0));
    match direction {
        Direction::Right if hit.right() >= obstacle.rect.left() => {
            shape.x_with_right_at(obstacle.rect.left())
        }
        Direction::Left if hit.left() <= obstacle.rect.right() => {
            shape.x_with_left_at(obstacle.rect.right())
        }
        _ => candidate_x,
    }
}

/// Resolve a vertical overlap with `obstacle`.
///
/// Falling onto a top the hit box was resting above last tick is a landing:
/// snap onto it and stop. Rising into an underside the hit box was below last
/// tick is a head-bump: snap under it and stop rising, still airborne.
/// Anything else is a side contact and passes through untouched.
pub fn resolve_vertical(
    candidate_y: i32,
    velocity_y: f32,
    obstacle: &Obstacle,
    previous_y: i32,
    shape: &HitBoxShape,
) -> VerticalResolution {
    let previous = shape.at(IVec2::new(0, previous_y));
    let candidate = shape.at(IVec2::new(0, candidate_y));
    let top = obstacle.rect.top();
    let bottom = obstacle.rect.bottom();

    if velocity_y >= 0.0
        && candidate.bottom() >= top
        && previous.bottom() <= top + CONTACT_TOLERANCE
    {
        return VerticalResolution {
            y: shape.y_with_bottom_at(top),
            velocity_y: 0.0,
            contact: VerticalContact::Landing,
        };
    }

    if velocity_y < 0.0
        && candidate.top() <= bottom
        && previous.top() >= bottom - CONTACT_TOLERANCE
    {
        return VerticalResolution {
            y: shape.y_with_top_at(bottom),
            velocity_y: 0.0,
            contact: VerticalContact::HeadBump,
        };
    }

    VerticalResolution::unchanged(candidate_y, velocity_y)
}

/// Keep the whole frame inside the left and right walls.
pub fn clamp_horizontal_to_world(candidate_x: i32, frame_width: i32, world: WorldBounds) -> i32 {
    let mut x = candidate_x;
    if x < 0 {
        x = 0;
    }
    if x + frame_width > world.width {
        x = world.width - frame_width;
    }
    x
}

/// Keep the hit box between ceiling and floor, with the same landing and
/// head-bump rules as obstacles. Touching the floor while falling lands.
pub fn clamp_vertical_to_world(
    candidate_y: i32,
    velocity_y: f32,
    shape: &HitBoxShape,
    world: WorldBounds,
) -> VerticalResolution {
    let mut resolution = VerticalResolution::unchanged(candidate_y, velocity_y);

    if shape.at(IVec2::new(0, resolution.y)).bottom() >= world.height {
        resolution.y = shape.y_with_bottom_at(world.height);
        if resolution.velocity_y >= 0.0 {
            resolution.velocity_y = 0.0;
            resolution.contact = VerticalContact::Landing;
        }
    }

    if shape.at(IVec2::new(0, resolution.y)).top() < 0 {
        resolution.y = shape.y_with_top_at(0);
        if resolution.velocity_y < 0.0 {
            resolution.velocity_y = 0.0;
            resolution.contact = VerticalContact::HeadBump;
        }
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> HitBoxShape {
        // 57x100 frame, hit box 37x90 at (10, 5).
        HitBoxShape::new(IVec2::new(57, 100), Margins::new(10, 10, 5, 5))
    }

    fn block(x: i32, y: i32, w: i32, h: i32) -> Obstacle {
        Obstacle::new(Rect::new(x, y, w, h))
    }

    #[test]
    fn hit_box_applies_margins() {
        let frame = Rect::new(100, 200, 57, 100);
        let hb = hit_box(frame, Margins::new(10, 10, 5, 5));
        assert_eq!(hb, Rect::new(110, 205, 37, 90));
    }

    #[test]
    fn inverted_margins_floor_hit_box_at_one_pixel() {
        let hb = hit_box(Rect::new(0, 0, 10, 10), Margins::new(8, 8, 20, 0));
        assert_eq!(hb.w, 1);
        assert_eq!(hb.h, 1);
        assert_eq!(hb.x, 8);
        assert_eq!(hb.y, 20);
    }

    #[test]
    fn check_collision_returns_first_match_in_order() {
        let obstacles = vec![
            block(500, 500, 10, 10),
            block(0, 0, 50, 50),
            block(10, 10, 50, 50),
        ];
        let probe = Rect::new(20, 20, 5, 5);
        let hit = check_collision(&probe, &obstacles).expect("should collide");
        assert_eq!(hit.rect, Rect::new(0, 0, 50, 50));
    }

    #[test]
    fn check_collision_skips_hidden_obstacles() {
        let obstacles = vec![
            Obstacle::hidden(Rect::new(0, 0, 50, 50)),
            block(10, 10, 50, 50),
        ];
        let hit = check_collision(&Rect::new(20, 20, 5, 5), &obstacles).expect("collides");
        assert_eq!(hit.rect, Rect::new(10, 10, 50, 50));
    }

    #[test]
    fn check_collision_ignores_touching_edges() {
        let obstacles = vec![block(10, 0, 10, 10)];
        assert!(check_collision(&Rect::new(0, 0, 10, 10), &obstacles).is_none());
        assert!(check_collision(&Rect::new(0, 0, 10, 10), &[]).is_none());
    }

    #[test]
    fn moving_right_stops_flush_against_left_side() {
        let shape = shape();
        let wall = block(200, 0, 20, 400);
        // Candidate hit box right edge = 160 + 10 + 37 = 207, past the wall.
        let x = resolve_horizontal(160, Direction::Right, &wall, &shape);
        assert_eq!(shape.at(IVec2::new(x, 0)).right(), 200);
        assert_eq!(x, 153);
    }

    #[test]
    fn moving_left_stops_flush_against_right_side() {
        let shape = shape();
        let wall = block(0, 0, 50, 400);
        let x = resolve_horizontal(35, Direction::Left, &wall, &shape);
        assert_eq!(shape.at(IVec2::new(x, 0)).left(), 50);
        assert_eq!(x, 40);
    }

    #[test]
    fn no_intent_means_no_horizontal_correction() {
        let wall = block(0, 0, 50, 400);
        assert_eq!(resolve_horizontal(35, Direction::None, &wall, &shape()), 35);
    }

    #[test]
    fn falling_from_above_lands_on_top() {
        let shape = shape();
        let floor = block(0, 300, 400, 20);
        // Previous hit box bottom = 200 + 5 + 90 = 295, three pixels above.
        let res = resolve_vertical(213, 12.8, &floor, 200, &shape);
        assert_eq!(res.contact, VerticalContact::Landing);
        assert_eq!(res.velocity_y, 0.0);
        assert_eq!(shape.at(IVec2::new(0, res.y)).bottom(), 300);
        assert!(!res.airborne_after(true));
    }

    #[test]
    fn landing_tolerates_one_pixel_of_previous_overlap() {
        let shape = shape();
        let floor = block(0, 300, 400, 20);
        // Previous bottom 301 is one pixel inside the top.
        let res = resolve_vertical(210, 2.0, &floor, 206, &shape);
        assert_eq!(res.contact, VerticalContact::Landing);
        assert_eq!(res.y, 205);
    }

    #[test]
    fn rising_from_below_bumps_head() {
        let shape = shape();
        let ceiling = block(0, 0, 400, 100);
        // Previous hit box top = 110, candidate top = 95.
        let res = resolve_vertical(90, -14.2, &ceiling, 105, &shape);
        assert_eq!(res.contact, VerticalContact::HeadBump);
        assert_eq!(res.velocity_y, 0.0);
        assert_eq!(shape.at(IVec2::new(0, res.y)).top(), 100);
        assert!(res.airborne_after(true));
    }

    #[test]
    fn side_contact_is_not_resolved_vertically() {
        let shape = shape();
        // Wall spans the actor's whole height: it was never above or below.
        let wall = block(40, 0, 20, 1000);
        let res = resolve_vertical(210, 5.0, &wall, 200, &shape);
        assert_eq!(res.contact, VerticalContact::None);
        assert_eq!(res.y, 210);
        assert_eq!(res.velocity_y, 5.0);
        assert!(res.airborne_after(true));
    }

    #[test]
    fn horizontal_world_clamp_keeps_frame_inside_walls() {
        let world = WorldBounds::new(800, 600);
        assert_eq!(clamp_horizontal_to_world(-3, 57, world), 0);
        assert_eq!(clamp_horizontal_to_world(760, 57, world), 743);
        assert_eq!(clamp_horizontal_to_world(300, 57, world), 300);
    }

    #[test]
    fn floor_clamp_lands_when_falling() {
        let shape = shape();
        let world = WorldBounds::new(800, 600);
        let res = clamp_vertical_to_world(520, 9.0, &shape, world);
        assert_eq!(shape.at(IVec2::new(0, res.y)).bottom(), 600);
        assert_eq!(res.y, 505);
        assert_eq!(res.contact, VerticalContact::Landing);
        assert_eq!(res.velocity_y, 0.0);
    }

    #[test]
    fn ceiling_clamp_bumps_when_rising() {
        let shape = shape();
        let world = WorldBounds::new(800, 600);
        let res = clamp_vertical_to_world(-20, -7.0, &shape, world);
        assert_eq!(res.y, -5);
        assert_eq!(shape.at(IVec2::new(0, res.y)).top(), 0);
        assert_eq!(res.contact, VerticalContact::HeadBump);
        assert_eq!(res.velocity_y, 0.0);
    }

    #[test]
    fn world_clamp_leaves_free_motion_alone() {
        let res = clamp_vertical_to_world(200, 3.0, &shape(), WorldBounds::new(800, 600));
        assert_eq!(res, VerticalResolution::unchanged(200, 3.0));
    }

    #[test]
    fn obstacle_set_snapshot_shares_storage() {
        let set: ObstacleSet = vec![block(0, 0, 1, 1), block(2, 2, 1, 1)]
            .into_iter()
            .collect();
        let set = set.with_version(3);
        let clone = set.clone();
        assert_eq!(clone.len(), 2);
        assert_eq!(clone.version(), 3);
        assert!(std::ptr::eq(set.as_slice(), clone.as_slice()));
        assert!(ObstacleSet::default().is_empty());
    }

    #[test]
    fn zero_area_and_hidden_obstacles_are_not_solid() {
        assert!(!Obstacle::new(Rect::new(0, 0, 0, 10)).is_solid());
        assert!(!Obstacle::hidden(Rect::new(0, 0, 10, 10)).is_solid());
        assert!(block(0, 0, 10, 10).is_solid());
    }
}
