//! Cosmic expansion background
//!
//! A particle burst from the origin, later joined by a galaxy field and a
//! nebula shell. The simulation only produces buffers; drawing them is the
//! renderer's job. Nothing here is shared with the window manager.

mod params;
mod layers;
mod universe;

pub use params::{
    AnimationParam, ExpansionParams, ParamRange, BLOOM_RADIUS_RANGE, BLOOM_STRENGTH_RANGE, BLOOM_THRESHOLD_RANGE,
    EXPANSION_SPEED_RANGE, PARTICLE_SIZE_RANGE,
};
pub use layers::{GalaxyCluster, LayerKind, Nebula};
pub use universe::{CameraOrbit, Universe};
