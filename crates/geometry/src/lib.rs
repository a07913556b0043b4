//! # Trigon Geometry
//!
//! Pure geometric primitives used to decide who wins a match: every player
//! drops three pins, and a player wins once their triangle fully encloses
//! the opponent's.
//!
//! The engine works on raw (latitude, longitude) pairs treated as planar
//! coordinates, with longitude on the X axis and latitude on the Y axis.
//! Nothing here performs I/O or holds shared state.
//!
//! ## Building blocks
//!
//! * [`bearing`] - angle of the ray between two points, in `[0, 2π)`
//! * [`angular_distance`] - circular distance walked in a given direction
//! * [`point_in_triangle`] - containment via angular-sector inclusion
//! * [`overlap_ratio`] - grid-sampled share of each triangle covered by the other
//!
//! ## Example
//!
//! ```rust
//! use trigon_geometry::{overlap_ratio, Point, Precision};
//!
//! let outer = [Point::new(0.0, 0.0), Point::new(0.0, 10.0), Point::new(10.0, 0.0)];
//! let inner = [Point::new(1.0, 1.0), Point::new(3.0, 1.0), Point::new(1.0, 3.0)];
//!
//! let overlap = overlap_ratio(&outer, &inner, Precision::High).unwrap();
//! assert_eq!(overlap.ratio_b, Some(1.0));
//! ```

pub mod error;
pub mod overlap;
pub mod point;
pub mod triangle;

pub use error::GeometryError;
pub use overlap::{overlap_ratio, Overlap, Precision};
pub use point::{angular_distance, bearing, Direction, Orientation, Point};
pub use triangle::{point_in_triangle, Triangle};
