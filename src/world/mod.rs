//! World module - static level geometry
//!
//! - `level` reads the plain-text level description into quad records
//! - `planes` indexes those quads into axis-grouped collision planes and
//!   tags the portal-capable ones

#![allow(dead_code)]

mod level;
mod planes;

pub use level::*;
pub use planes::*;
