//! Pixel exact collision between 2D sprites.
//!
//! Sprites are reduced to packed visibility [`Mask`]s once, then placed in
//! world space through a [`Collider`] and tested against each other.

#[cfg(test)]
#[macro_use]
extern crate parameterized;

pub mod cache;
pub mod collider;
pub mod config;
pub mod geometry;
pub mod mask;
pub mod overlap;
pub mod source;

pub use collider::{Collider, CollisionSystem};
pub use mask::Mask;
pub use source::{ImageSource, PixelSource, RgbaBuffer, SourceId};
