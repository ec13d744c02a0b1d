//! Math type aliases used throughout the parkour crates.
//!
//! The controller does all of its math in `f32`. These aliases exist so that the rest of the code
//! reads in a backend-neutral vocabulary instead of naming `bevy::math` types directly.

pub type Float = f32;

pub type Vector2 = bevy::math::Vec2;

pub type Vector3 = bevy::math::Vec3;

pub type Quaternion = bevy::math::Quat;
