//! Geometry primitives
//!
//! - `math` - Vec3 and Vec2
//! - `polygon` - signed angles and the winding-number inside test
//! - `ray` - Ray value type used by portal placement

#![allow(dead_code)]

pub mod math;
pub mod polygon;
pub mod ray;

pub use math::{Vec2, Vec3};
pub use polygon::{point_in_polygon, signed_angle_between, WINDING_THRESHOLD};
pub use ray::Ray;
