//! Points and angular measurements.
//!
//! Angles are radians on the trigonometric circle, always normalized into
//! `[0, 2π)`.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// A geographic coordinate pair.
///
/// Longitude is used as the X axis and latitude as the Y axis when the
/// engine treats points as planar coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Latitude (Y axis)
    pub lat: f64,
    /// Longitude (X axis)
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Which way the Y axis points when measuring bearings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Y grows upwards (maps, mathematics)
    #[default]
    Mathematical,
    /// Y grows downwards (screen and canvas coordinates)
    Screen,
}

/// Direction of travel around the circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    Anticlockwise,
}

/// Folds any finite angle into `[0, 2π)`.
pub(crate) fn normalize(angle: f64) -> f64 {
    let folded = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if folded >= TAU {
        0.0
    } else {
        folded
    }
}

/// Returns the angle between the horizontal axis and the ray from `origin`
/// to `target`.
///
/// The result lies in `[0, 2π)`. When both points coincide the ray is
/// undefined and `0` is returned.
///
/// # Arguments
///
/// * `origin` - Start of the ray
/// * `target` - Point the ray passes through
/// * `orientation` - Whether Y grows upwards or downwards
pub fn bearing(origin: Point, target: Point, orientation: Orientation) -> f64 {
    let dx = target.lng - origin.lng;
    let dy = target.lat - origin.lat;

    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }

    let angle = normalize(dy.atan2(dx));
    match orientation {
        Orientation::Mathematical => angle,
        Orientation::Screen => normalize(TAU - angle),
    }
}

/// Circular distance from `from` to `to` walking in `direction`.
///
/// Both inputs are normalized first, and the result lies in `[0, 2π)`.
/// Equal angles are `0` apart in either direction.
pub fn angular_distance(from: f64, to: f64, direction: Direction) -> f64 {
    let from = normalize(from);
    let to = normalize(to);
    match direction {
        Direction::Anticlockwise => normalize(to - from),
        Direction::Clockwise => normalize(from - to),
    }
}
