//! Geometry helpers for chunk bounds and visibility

pub mod aabb;
pub mod frustum;

pub use aabb::Aabb;
pub use frustum::{AlwaysVisible, Frustum, Plane, Visibility};
