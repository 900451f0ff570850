//! Sprite-strip animation: frame cursor and the movement-driven frame selector.
//!
//! Frames live side by side in a single horizontal strip. One of them is the
//! standing pose; the rest form the walk cycle. When the standing pose is
//! frame 0 the cycle is `1..total`, otherwise the cycle covers every frame.
//! Selection is a pure function of the cursor and movement state, so two
//! runs fed the same ticks always show the same frames.

use crate::geometry::Rect;
use crate::intent::Direction;

/// Animation cursor. `current < total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCursor {
    pub current: usize,
    pub standing: usize,
    pub total: usize,
}

impl FrameCursor {
    /// Starts on the standing frame. `total` is floored at 1 and `standing`
    /// is clamped into range.
    pub fn new(standing: usize, total: usize) -> Self {
        let total = total.max(1);
        let standing = standing.min(total - 1);
        Self {
            current: standing,
            standing,
            total,
        }
    }

    /// First index and length of the walk cycle.
    pub fn cycle(&self) -> (usize, usize) {
        if self.standing == 0 {
            (1, self.total - 1)
        } else {
            (0, self.total)
        }
    }

    /// Wraps out-of-range frames back into `0..total`.
    pub fn set(&mut self, frame: usize) {
        self.current = frame % self.total;
    }

    /// The frame after `current` in the walk cycle. A cursor with no cycle
    /// (a single-frame strip) keeps its current frame.
    pub fn advanced(&self) -> usize {
        let (first, len) = self.cycle();
        if len == 0 {
            return self.current;
        }
        let offset = self.current as i64 - first as i64 + 1;
        first + offset.rem_euclid(len as i64) as usize
    }
}

/// Next frame for one simulation tick.
///
/// Only the movement intent matters: standing still shows the standing pose
/// and any horizontal intent advances the walk cycle, on the ground and in
/// the air alike.
pub fn next_frame(cursor: &FrameCursor, direction: Direction) -> usize {
    if direction.is_moving() {
        cursor.advanced()
    } else {
        cursor.standing
    }
}

/// Layout of a horizontal sprite strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteStrip {
    pub frame_width: i32,
    pub frame_height: i32,
}

impl SpriteStrip {
    pub fn new(frame_width: i32, frame_height: i32) -> Self {
        Self {
            frame_width: frame_width.max(1),
            frame_height: frame_height.max(1),
        }
    }

    /// Source rectangle of `frame` within the strip image.
    pub fn source_rect(&self, frame: usize) -> Rect {
        Rect::new(
            frame as i32 * self.frame_width,
            0,
            self.frame_width,
            self.frame_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cursor_starts_standing() {
        let cursor = FrameCursor::new(0, 21);
        assert_eq!(cursor.current, 0);
        assert_eq!(cursor.cycle(), (1, 20));
    }

    #[test]
    fn cycle_skips_standing_frame_zero() {
        let mut cursor = FrameCursor::new(0, 4);
        let mut seen = Vec::new();
        for _ in 0..6 {
            cursor.current = next_frame(&cursor, Direction::Right);
            seen.push(cursor.current);
        }
        assert_eq!(seen, vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn cycle_covers_all_frames_when_standing_is_not_zero() {
        let mut cursor = FrameCursor::new(2, 3);
        assert_eq!(cursor.cycle(), (0, 3));
        let mut seen = Vec::new();
        for _ in 0..4 {
            cursor.current = next_frame(&cursor, Direction::Left);
            seen.push(cursor.current);
        }
        assert_eq!(seen, vec![0, 1, 2, 0]);
    }

    #[test]
    fn idle_returns_standing_frame() {
        let mut cursor = FrameCursor::new(0, 21);
        cursor.current = 7;
        assert_eq!(next_frame(&cursor, Direction::None), 0);

        let mut cursor = FrameCursor::new(4, 8);
        cursor.current = 6;
        assert_eq!(next_frame(&cursor, Direction::None), 4);
    }

    #[test]
    fn moving_wraps_past_last_frame() {
        let mut cursor = FrameCursor::new(0, 21);
        cursor.current = 20;
        assert_eq!(next_frame(&cursor, Direction::Right), 1);
    }

    #[test]
    fn single_frame_strip_never_moves() {
        let cursor = FrameCursor::new(0, 1);
        assert_eq!(cursor.cycle(), (1, 0));
        assert_eq!(next_frame(&cursor, Direction::Right), 0);
    }

    #[test]
    fn degenerate_cursor_parameters_are_clamped() {
        let cursor = FrameCursor::new(9, 0);
        assert_eq!(cursor.total, 1);
        assert_eq!(cursor.standing, 0);
        assert_eq!(cursor.current, 0);
    }

    #[test]
    fn set_wraps_modulo_total() {
        let mut cursor = FrameCursor::new(0, 21);
        cursor.set(25);
        assert_eq!(cursor.current, 4);
    }

    #[test]
    fn source_rect_steps_along_strip() {
        let strip = SpriteStrip::new(57, 100);
        assert_eq!(strip.source_rect(0), Rect::new(0, 0, 57, 100));
        assert_eq!(strip.source_rect(3), Rect::new(171, 0, 57, 100));
    }
}
