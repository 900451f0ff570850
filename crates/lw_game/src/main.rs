//! Ledgewalk -- headless host for the platformer character controller.
//!
//! The host owns the fixed-timestep loop; the controller only exposes `tick`.
//! Each frame:
//!
//!   1. `begin_frame()` (real-time) or `advance(fixed_dt)` (headless) feeds the clock
//!   2. the level file is polled and obstacles are swapped in, between ticks only
//!   3. `while should_step()` -- apply the next replay input, run one tick
//!   4. the render view is traced so a drawing backend can be plugged in later
//!
//! Usage: `lw_game [--level PATH] [--replay PATH] [--config PATH] [--realtime]`

mod collision;
mod config;
mod controller;
mod ground;
mod level;
mod replay;
mod view;

use std::path::{Path, PathBuf};
use std::time::Duration;

use collision::WorldBounds;
use config::{load_config_from_path, ControllerConfig};
use controller::{CharacterController, TickReport};
use level::{load_level_from_path, LevelFile, LevelWatcher};
use lw_core::time::TimeState;
use replay::{load_replay_from_path, TickInput};
use view::SpriteView;

const LEVEL_PATH: &str = "assets/levels/meadow.json";
const REPLAY_PATH: &str = "assets/replays/walk_and_jump.json";
const CONFIG_PATH: &str = "assets/config/controller.json";

#[derive(Debug, Clone, PartialEq, Eq)]
struct HostOptions {
    level_path: PathBuf,
    replay_path: PathBuf,
    /// `None` means the default path, which is allowed to be missing.
    config_path: Option<PathBuf>,
    realtime: bool,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            level_path: PathBuf::from(LEVEL_PATH),
            replay_path: PathBuf::from(REPLAY_PATH),
            config_path: None,
            realtime: false,
        }
    }
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<HostOptions, String> {
    let mut options = HostOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--level" => options.level_path = PathBuf::from(expect_value(&mut args, "--level")?),
            "--replay" => options.replay_path = PathBuf::from(expect_value(&mut args, "--replay")?),
            "--config" => {
                options.config_path = Some(PathBuf::from(expect_value(&mut args, "--config")?))
            }
            "--realtime" => options.realtime = true,
            other => return Err(format!("Unknown argument '{other}'")),
        }
    }
    Ok(options)
}

fn expect_value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("Missing value for {flag}"))
}

fn resolve_config(explicit: Option<&Path>) -> Result<ControllerConfig, String> {
    if let Some(path) = explicit {
        return load_config_from_path(path);
    }
    let default_path = Path::new(CONFIG_PATH);
    if !default_path.exists() {
        log::info!(
            "No controller config at '{}', using built-in defaults",
            default_path.display()
        );
        return Ok(ControllerConfig::default());
    }
    load_config_from_path(default_path)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SessionSummary {
    ticks: u64,
    landings: u32,
    head_bumps: u32,
    falls: u32,
}

/// One simulation session: a level, its obstacle snapshot and the actor.
struct Session {
    level_watcher: LevelWatcher,
    level_version: u64,
    world: WorldBounds,
    character: CharacterController,
    summary: SessionSummary,
}

impl Session {
    fn new(level_path: PathBuf, config: ControllerConfig) -> Result<Self, String> {
        let level = load_level_from_path(&level_path)?;
        let world = level.world_bounds();

        let mut character = CharacterController::new(config);
        character.set_world_bounds(world);
        character.set_position(level.spawn_position());
        character.set_obstacles(level.obstacle_set(0));

        log::info!(
            "Level loaded: {} ({}x{}, {} obstacles, spawn {:?}, {:?})",
            level.level_id,
            world.width,
            world.height,
            level.obstacles.len(),
            character.position(),
            character.state()
        );

        Ok(Self {
            level_watcher: LevelWatcher::new(level_path, level),
            level_version: 0,
            world,
            character,
            summary: SessionSummary::default(),
        })
    }

    /// Replace world bounds and obstacles; the actor stays where it is.
    /// On failure the previous snapshot stays active.
    fn apply_level(&mut self, loaded: Result<LevelFile, String>, reason: &str) {
        match loaded {
            Ok(level) => {
                self.level_version += 1;
                self.world = level.world_bounds();
                self.character.set_world_bounds(self.world);
                self.character
                    .set_obstacles(level.obstacle_set(self.level_version));
                log::info!(
                    "Level reloaded ({reason}): {} v{} ({} obstacles)",
                    level.level_id,
                    self.level_version,
                    self.character.obstacles().len()
                );
            }
            Err(err) => {
                log::error!("Level reload failed ({reason}): {err}");
            }
        }
    }

    /// Frame-boundary check; never called inside a tick.
    fn poll_reload(&mut self) {
        if let Some(loaded) = self.level_watcher.poll() {
            self.apply_level(loaded, "file watcher");
        }
    }

    fn step(&mut self, input: TickInput) -> TickReport {
        input.apply(&mut self.character);
        let report = self.character.tick(Some(self.world));

        self.summary.ticks += 1;
        if report.landed {
            self.summary.landings += 1;
        }
        if report.head_bumped {
            self.summary.head_bumps += 1;
        }
        if report.walked_off {
            self.summary.falls += 1;
        }

        if report.skipped {
            log::warn!("Tick {} skipped: world bounds invalid", self.summary.ticks);
        }
        log::trace!(
            "tick {}: pos {:?} frame {} vy {:.2} airborne {} | {}",
            self.summary.ticks,
            report.position,
            report.frame,
            report.velocity_y,
            report.airborne,
            SpriteView::of(&self.character)
        );
        report
    }
}

fn run(options: &HostOptions) -> Result<SessionSummary, String> {
    let config = resolve_config(options.config_path.as_deref())?;
    let replay = load_replay_from_path(&options.replay_path)?;
    let inputs = replay.expanded_inputs();
    let mut session = Session::new(options.level_path.clone(), config)?;
    let mut time = TimeState::with_fixed_dt(replay.fixed_dt);

    log::info!(
        "Running {} ticks from '{}' ({})",
        inputs.len(),
        options.replay_path.display(),
        if options.realtime { "real-time" } else { "headless" }
    );

    let mut next = 0;
    while next < inputs.len() {
        if options.realtime {
            time.begin_frame();
        } else {
            time.advance(time.fixed_dt);
        }
        session.poll_reload();

        while next < inputs.len() && time.should_step() {
            session.step(inputs[next]);
            next += 1;
        }
        time.end_frame();

        if options.realtime {
            std::thread::sleep(Duration::from_secs_f64(time.until_next_step()));
        }
    }

    let view = SpriteView::of(&session.character);
    log::info!(
        "Session finished after {:.2}s simulated: {} {:?}",
        time.total_time,
        view,
        session.character.state()
    );
    Ok(session.summary)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Ledgewalk starting...");

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            log::error!("{err}");
            log::error!(
                "Usage: lw_game [--level PATH] [--replay PATH] [--config PATH] [--realtime]"
            );
            std::process::exit(2);
        }
    };

    match run(&options) {
        Ok(summary) => log::info!(
            "{} ticks, {} landings, {} head bumps, {} falls",
            summary.ticks,
            summary.landings,
            summary.head_bumps,
            summary.falls
        ),
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    }
}
