//! Dartboard geometry shared by the painted board and tap input.

use crate::model::dart::{Dart, BULL};

/// Clockwise from the top.
pub const SEGMENT_ORDER: [u8; 20] = [20, 1, 18, 4, 13, 6, 10, 15, 2, 17, 3, 19, 7, 16, 8, 11, 14, 9, 12, 5];

/// Ring radii as fractions of the outer double wire (170 mm on a real board).
pub const INNER_BULL: f32 = 6.35 / 170.0;
pub const OUTER_BULL: f32 = 15.9 / 170.0;
pub const TREBLE_INNER: f32 = 99.0 / 170.0;
pub const TREBLE_OUTER: f32 = 107.0 / 170.0;
pub const DOUBLE_INNER: f32 = 162.0 / 170.0;
pub const DOUBLE_OUTER: f32 = 1.0;

const SEGMENT_DEG: f32 = 18.0;

/// Maps a tap at (`dx`, `dy`) from the board centre, screen coordinates
/// (y grows downwards), on a board whose double wire has `radius`.
pub fn segment_at(dx: f32, dy: f32, radius: f32) -> Dart {
    if radius <= 0.0 {
        return Dart::Miss;
    }
    let r = (dx * dx + dy * dy).sqrt() / radius;
    if r <= INNER_BULL {
        return Dart::Double(BULL);
    }
    if r <= OUTER_BULL {
        return Dart::Single(BULL);
    }
    if r > DOUBLE_OUTER {
        return Dart::Miss;
    }

    let number = SEGMENT_ORDER[segment_index(dx, dy)];
    if r >= DOUBLE_INNER {
        Dart::Double(number)
    } else if (TREBLE_INNER..=TREBLE_OUTER).contains(&r) {
        Dart::Triple(number)
    } else {
        Dart::Single(number)
    }
}

fn segment_index(dx: f32, dy: f32) -> usize {
    // clockwise angle from 12 o'clock
    let deg = dx.atan2(-dy).to_degrees();
    let deg = (deg + 360.0 + SEGMENT_DEG / 2.0) % 360.0;
    (deg / SEGMENT_DEG) as usize % SEGMENT_ORDER.len()
}

/// Start and end angle (radians, clockwise from 12 o'clock) of a segment.
pub fn segment_span(index: usize) -> (f32, f32) {
    let start = index as f32 * SEGMENT_DEG - SEGMENT_DEG / 2.0;
    (start.to_radians(), (start + SEGMENT_DEG).to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: f32 = 170.0;

    #[test]
    fn bulls() {
        assert_eq!(segment_at(0.0, 0.0, R), Dart::Double(BULL));
        assert_eq!(segment_at(10.0, 0.0, R), Dart::Single(BULL));
    }

    #[test]
    fn top_is_twenty() {
        assert_eq!(segment_at(0.0, -50.0, R), Dart::Single(20));
        assert_eq!(segment_at(0.0, -103.0, R), Dart::Triple(20));
        assert_eq!(segment_at(0.0, -166.0, R), Dart::Double(20));
        assert_eq!(segment_at(0.0, -175.0, R), Dart::Miss);
    }

    #[test]
    fn cardinal_points() {
        assert_eq!(segment_at(50.0, 0.0, R), Dart::Single(6));
        assert_eq!(segment_at(0.0, 50.0, R), Dart::Single(3));
        assert_eq!(segment_at(-50.0, 0.0, R), Dart::Single(11));
    }

    #[test]
    fn segment_edges_wrap() {
        // just left of top is still 20, a bit further is 5
        let a = (-8.0f32).to_radians();
        assert_eq!(segment_at(50.0 * a.sin(), -50.0 * a.cos(), R), Dart::Single(20));
        let b = (-12.0f32).to_radians();
        assert_eq!(segment_at(50.0 * b.sin(), -50.0 * b.cos(), R), Dart::Single(5));
    }

    #[test]
    fn scaled_board() {
        assert_eq!(segment_at(0.0, -103.0 / 2.0, R / 2.0), Dart::Triple(20));
        assert_eq!(segment_at(1.0, 1.0, 0.0), Dart::Miss);
    }
}
