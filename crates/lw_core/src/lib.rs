pub mod animation;
pub mod geometry;
pub mod intent;
pub mod time;

pub use animation::{next_frame, FrameCursor, SpriteStrip};
pub use geometry::Rect;
pub use intent::{Direction, Facing};
pub use time::TimeState;
