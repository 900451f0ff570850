//! Ground sensor: is the actor standing on something?
//!
//! Two probe points sit in the pixel row directly beneath the hit box, one
//! under each outer column. Either probe touching the world floor or a
//! visible obstacle counts as ground, so the actor stays grounded while half
//! hanging over a ledge.

use glam::IVec2;

use crate::collision::{HitBoxShape, Obstacle};

/// Left and right probe points for a frame at `position`.
pub fn probe_points(position: IVec2, shape: &HitBoxShape) -> [IVec2; 2] {
    let hit = shape.at(position);
    let y = hit.bottom();
    [IVec2::new(hit.left(), y), IVec2::new(hit.right() - 1, y)]
}

/// `world_height` of `None` means there is no floor, only obstacles.
pub fn is_on_ground(
    position: IVec2,
    shape: &HitBoxShape,
    obstacles: &[Obstacle],
    world_height: Option<i32>,
) -> bool {
    probe_points(position, shape)
        .iter()
        .any(|&point| is_point_solid(point, obstacles, world_height))
}

fn is_point_solid(point: IVec2, obstacles: &[Obstacle], world_height: Option<i32>) -> bool {
    if world_height.is_some_and(|height| point.y >= height) {
        return true;
    }
    obstacles
        .iter()
        .any(|obstacle| obstacle.is_solid() && obstacle.rect.contains(point))
}
