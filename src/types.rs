//! Common types and type aliases used throughout the crate
//!
//! This module re-exports glam types for mathematical operations.
//!
//! # Why glam?
//!
//! We use glam as our primary math library because:
//! - **Performance**: SIMD-optimized operations for vectors and matrices
//! - **Ecosystem**: Widely adopted in the Rust gamedev community (Bevy, wgpu, etc.)
//! - **API**: Clean, modern API with comprehensive mathematical operations
//!
//! # Usage
//!
//! ```rust
//! use skin_weights::types::*;
//!
//! let world = Vector3D::new(0.0, 1.5, -0.25);
//! let uv = Vector2D::new(0.5, 0.5);
//! let distance_sq = world.distance_squared(Vector3D::ZERO);
//! # let _ = (uv, distance_sq);
//! ```

// Re-export glam types as our primary math types
pub use glam::{Vec2 as Vector2D, Vec3 as Vector3D};

/// Tolerance used when checking the per-vertex weight sum invariant
pub const WEIGHT_SUM_EPSILON: f32 = 1e-4;
