use bevy::prelude::*;

pub mod data_for_backends;
pub mod math;
pub mod spatial_ext;

/// Umbrella system set for [`ParkourPipelineStages`].
///
/// The physics backends' plugins are responsible for preventing this entire system set from
/// running when the physics backend itself is paused.
#[derive(SystemSet, Clone, PartialEq, Eq, Debug, Hash)]
pub struct ParkourSystemSet;

/// The various stages of the parkour pipeline.
#[derive(SystemSet, Clone, PartialEq, Eq, Debug, Hash)]
pub enum ParkourPipelineStages {
    /// Data is read from the physics backend into the tracker and the sensor suite.
    Sensors,
    /// The controller decides how the character should be manipulated.
    Logic,
    /// The motor's directives are applied in the physics backend.
    Motors,
}
