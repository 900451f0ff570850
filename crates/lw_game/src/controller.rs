//! Kinematic platformer controller: one actor, one tick at a time.
//!
//! Each tick moves horizontally from the input intent, then vertically from
//! the accumulated velocity, resolving each axis against the world bounds and
//! the obstacle snapshot before the next. The vertical state machine has two
//! states, grounded and airborne, and `velocity_y` is zero whenever the actor
//! is grounded.

use glam::IVec2;
use lw_core::animation::{next_frame, FrameCursor};
use lw_core::geometry::Rect;
use lw_core::intent::{Direction, Facing};

use crate::collision::{
    check_collision, clamp_horizontal_to_world, clamp_vertical_to_world, hit_box,
    resolve_horizontal, resolve_vertical, HitBoxShape, ObstacleSet, VerticalContact,
    VerticalResolution, WorldBounds,
};
use crate::config::ControllerConfig;
use crate::ground::is_on_ground;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Grounded,
    Airborne,
}

/// What happened during one tick, for hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub position: IVec2,
    pub frame: usize,
    pub velocity_y: f32,
    pub airborne: bool,
    pub landed: bool,
    pub head_bumped: bool,
    pub walked_off: bool,
    /// No valid world bounds; nothing moved.
    pub skipped: bool,
}

#[derive(Debug, Clone)]
pub struct CharacterController {
    position: IVec2,
    velocity_y: f32,
    direction: Direction,
    facing: Facing,
    airborne: bool,
    frames: FrameCursor,
    shape: HitBoxShape,
    config: ControllerConfig,
    obstacles: ObstacleSet,
    world: Option<WorldBounds>,
}

impl CharacterController {
    pub fn new(config: ControllerConfig) -> Self {
        let config = config.sanitized();
        Self {
            position: IVec2::ZERO,
            velocity_y: 0.0,
            direction: Direction::None,
            facing: Facing::Right,
            airborne: false,
            frames: FrameCursor::new(config.standing_frame, config.total_frames),
            shape: config.hit_box_shape(),
            config,
            obstacles: ObstacleSet::empty(),
            world: None,
        }
    }

    // --- Collaborator interface ------------------------------------------------

    /// Swap in a new obstacle snapshot. Must not be called mid-tick. If the
    /// actor has nothing under its feet afterwards it starts falling.
    pub fn set_obstacles(&mut self, obstacles: ObstacleSet) {
        log::debug!(
            "Obstacle snapshot v{} installed ({} obstacles)",
            obstacles.version(),
            obstacles.len()
        );
        if obstacles.is_empty() {
            log::debug!("Empty obstacle snapshot: only the world bounds are solid");
        }
        self.obstacles = obstacles;
        if !self.on_ground_at(self.position) {
            self.airborne = true;
        }
    }

    /// Record the environment outside a tick, e.g. before the first one so
    /// that `set_obstacles` can see the floor.
    pub fn set_world_bounds(&mut self, world: WorldBounds) {
        self.world = Some(world).filter(WorldBounds::is_valid);
    }

    /// Host-side placement, such as spawning. Leaves state flags alone.
    pub fn set_position(&mut self, position: IVec2) {
        self.position = position;
    }

    /// `Direction::None` is ignored; use `stop_moving`.
    pub fn start_moving(&mut self, direction: Direction) {
        let Some(facing) = Facing::from_direction(direction) else {
            return;
        };
        self.direction = direction;
        self.facing = facing;
    }

    /// Facing is kept so the sprite keeps looking the same way.
    pub fn stop_moving(&mut self) {
        self.direction = Direction::None;
    }

    /// Start a jump if grounded and the ground sensor agrees. Returns whether
    /// one started; mid-air requests are dropped.
    pub fn jump(&mut self) -> bool {
        if self.airborne || !self.on_ground_at(self.position) {
            return false;
        }
        self.velocity_y = self.config.jump_strength;
        self.airborne = true;
        log::debug!("Jump from {:?}, velocity {}", self.position, self.velocity_y);
        true
    }

    #[allow(dead_code)]
    pub fn set_current_frame(&mut self, frame: usize) {
        self.frames.set(frame);
    }

    // --- Simulation ------------------------------------------------------------

    /// Advance one fixed step. Without valid world bounds the tick is a no-op.
    pub fn tick(&mut self, world: Option<WorldBounds>) -> TickReport {
        let Some(world) = world.filter(WorldBounds::is_valid) else {
            log::trace!("Tick skipped: no world bounds");
            return TickReport {
                skipped: true,
                ..self.report()
            };
        };
        self.world = Some(world);

        let start = self.position;
        let mut landed = false;
        let mut head_bumped = false;
        let mut walked_off = false;

        // Phase 1: horizontal movement, resolved at the current y.
        let final_x = self.step_horizontal(start, world);

        // Phase 2: walking off a ledge starts a fall.
        if !self.airborne && !self.on_ground_at(start) {
            self.airborne = true;
            walked_off = true;
        }

        // Phase 3: gravity.
        if self.airborne {
            self.velocity_y = (self.velocity_y + self.config.gravity).min(self.config.max_fall_speed);
        }

        // Phase 4: vertical movement, resolved at the settled x.
        let candidate_y = start.y + self.velocity_y.round() as i32;
        let bounded = clamp_vertical_to_world(candidate_y, self.velocity_y, &self.shape, world);
        self.apply_vertical(bounded, &mut landed, &mut head_bumped);
        let mut final_y = bounded.y;

        let check = self.shape.at(IVec2::new(final_x, final_y));
        if let Some(obstacle) = check_collision(&check, self.obstacles.as_slice()) {
            let resolved =
                resolve_vertical(final_y, self.velocity_y, obstacle, start.y, &self.shape);
            self.apply_vertical(resolved, &mut landed, &mut head_bumped);
            final_y = resolved.y;
        }
        let end = IVec2::new(final_x, final_y);

        // Phase 5: reconcile the state flag with the ground sensor.
        if self.velocity_y == 0.0 {
            let on_ground = self.on_ground_at(end);
            if !self.airborne && !on_ground {
                self.airborne = true;
                walked_off = true;
            } else if self.airborne && on_ground {
                self.airborne = false;
                landed = true;
            }
        }

        if walked_off && self.airborne {
            log::debug!("Left the ground at {:?}", end);
        }
        if landed && !self.airborne {
            log::debug!("Landed at {:?}", end);
        }

        // Phase 6: animation and commit.
        self.frames.current = next_frame(&self.frames, self.direction);
        self.position = end;

        TickReport {
            landed: landed && !self.airborne,
            head_bumped,
            walked_off: walked_off && self.airborne,
            ..self.report()
        }
    }

    fn step_horizontal(&self, start: IVec2, world: WorldBounds) -> i32 {
        let dx = self.direction.sign() * self.config.speed;
        if dx == 0 {
            return start.x;
        }

        let mut x = clamp_horizontal_to_world(start.x + dx, self.config.frame_width, world);
        let check = self.shape.at(IVec2::new(x, start.y));
        if let Some(obstacle) = check_collision(&check, self.obstacles.as_slice()) {
            x = resolve_horizontal(x, self.direction, obstacle, &self.shape);
        }
        x
    }

    fn apply_vertical(
        &mut self,
        resolution: VerticalResolution,
        landed: &mut bool,
        head_bumped: &mut bool,
    ) {
        self.velocity_y = resolution.velocity_y;
        match resolution.contact {
            VerticalContact::Landing => *landed |= self.airborne,
            VerticalContact::HeadBump => {
                *head_bumped = true;
                log::debug!("Head bump at y {}", resolution.y);
            }
            VerticalContact::None => {}
        }
        self.airborne = resolution.airborne_after(self.airborne);
    }

    fn on_ground_at(&self, position: IVec2) -> bool {
        is_on_ground(
            position,
            &self.shape,
            self.obstacles.as_slice(),
            self.world.map(|w| w.height),
        )
    }

    fn report(&self) -> TickReport {
        TickReport {
            position: self.position,
            frame: self.frames.current,
            velocity_y: self.velocity_y,
            airborne: self.airborne,
            landed: false,
            head_bumped: false,
            walked_off: false,
            skipped: false,
        }
    }

    // --- Read-only state ---------------------------------------------------------

    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    #[allow(dead_code)]
    pub fn current_direction(&self) -> Direction {
        self.direction
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    #[allow(dead_code)]
    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    pub fn state(&self) -> MotionState {
        if self.airborne {
            MotionState::Airborne
        } else {
            MotionState::Grounded
        }
    }

    pub fn current_frame(&self) -> usize {
        self.frames.current
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn frame_rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.config.frame_size())
    }

    pub fn hit_box(&self) -> Rect {
        hit_box(self.frame_rect(), self.config.margins)
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }
}
