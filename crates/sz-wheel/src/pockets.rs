//! Pockets, colours and wheel geometry

use serde::{Deserialize, Serialize};

/// Highest pocket number (single zero wheel)
pub const MAX_POCKET: u8 = 36;

/// Number of pockets
pub const POCKET_COUNT: usize = 37;

/// Physical pocket order, clockwise from zero. Presentation only.
pub const WHEEL_ORDER: [u8; POCKET_COUNT] = [
    0, 32, 15, 19, 4, 21, 2, 25, 17, 34, 6, 27, 13, 36, 11, 30, 8, 23, 10, 5, 24, 16, 33, 1, 20,
    14, 31, 9, 22, 18, 29, 7, 28, 12, 35, 3, 26,
];

/// Red numbers
pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Black numbers
pub const BLACK_NUMBERS: [u8; 18] = [
    2, 4, 6, 8, 10, 11, 13, 15, 17, 20, 22, 24, 26, 28, 29, 31, 33, 35,
];

/// Pocket colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PocketColor {
    Green,
    Red,
    Black,
}

/// Colour of pocket `n`
pub fn color_of(n: u8) -> PocketColor {
    if n == 0 {
        PocketColor::Green
    } else if RED_NUMBERS.contains(&n) {
        PocketColor::Red
    } else {
        PocketColor::Black
    }
}

pub fn is_red(n: u8) -> bool {
    color_of(n) == PocketColor::Red
}

/// Wheel rotation (degrees) that brings pocket `n` under the pointer
pub fn pocket_angle(n: u8) -> Option<f64> {
    let index = WHEEL_ORDER.iter().position(|&p| p == n)?;
    let segment = 360.0 / POCKET_COUNT as f64;
    Some(360.0 - index as f64 * segment - segment / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_order_is_a_permutation() {
        let mut seen = [false; POCKET_COUNT];
        for &p in &WHEEL_ORDER {
            assert!(!seen[p as usize], "{} twice", p);
            seen[p as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_red_and_black_partition_1_to_36() {
        for n in 1..=MAX_POCKET {
            let red = RED_NUMBERS.contains(&n);
            let black = BLACK_NUMBERS.contains(&n);
            assert!(red ^ black, "{} must be exactly one colour", n);
            assert_eq!(is_red(n), red);
        }
        assert_eq!(color_of(0), PocketColor::Green);
    }

    #[test]
    fn test_pocket_angle() {
        let segment = 360.0 / 37.0;
        let zero = pocket_angle(0).unwrap();
        assert!((zero - (360.0 - segment / 2.0)).abs() < 1e-9);

        let last = pocket_angle(26).unwrap();
        assert!((last - (360.0 - 36.0 * segment - segment / 2.0)).abs() < 1e-9);
        assert!(pocket_angle(37).is_none());
    }
}
