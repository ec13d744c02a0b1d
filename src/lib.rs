//! A momentum-driven first-person parkour character controller for Bevy.
//!
//! The heart of the crate is the locomotion state machine in [`ParkourController`]: a dozen
//! mutually exclusive movement modes (walking, sprinting, sliding, wall-running, climbing,
//! ledge-hanging, dashing, grappling, swinging...) reconciled against a single rigid body, with
//! smooth speed transitions, slope handling and timed exit windows. Each motion mode is detected
//! and driven by its own contributor module, and the controller resolves exactly one winning
//! mode per tick in a fixed priority order.
//!
//! The crate does not talk to a physics engine directly. It reads the world through the sensor
//! suite and the rigid body tracker of
//! [`bevy-parkour-physics-integration-layer`](bevy_parkour_physics_integration_layer), and
//! writes its decisions into [`ParkourMotor`] for a backend to apply. This keeps the whole state
//! machine testable against a deterministic physics double.
//!
//! Per frame the pipeline runs as ordered system sets: sensors are read from the backend, the
//! game's input systems fill [`ParkourControls`] during [`ParkourUserControlsSystemSet`], the
//! controller logic runs, and the backend applies the motor.

mod camera_fx;
mod controller;
mod input;
mod movement_state;

pub mod abilities;
pub mod util;

use bevy::prelude::*;

pub use camera_fx::{CameraFx, ParkourCameraSignals};
pub use controller::{
    GrappleFlight, LocomotionState, ParkourController, ParkourControllerConfig,
    ParkourControllerPlugin, ParkourMovementConfig,
};
pub use input::{ParkourButton, ParkourControls};
pub use movement_state::{AbilityRequest, ModeIntents, MovementState};

pub use bevy_parkour_physics_integration_layer::data_for_backends::{
    ParkourLayers, ParkourMotor, ParkourProximitySensor, ParkourProximitySensorOutput,
    ParkourRigidBodyTracker, ParkourSensorSuite, ParkourSpringConstraint, ParkourVelChange,
};
pub use bevy_parkour_physics_integration_layer::math;
pub use bevy_parkour_physics_integration_layer::spatial_ext::{
    update_sensor, update_sensor_suite, ParkourSpatialExt,
};
pub use bevy_parkour_physics_integration_layer::{ParkourPipelineStages, ParkourSystemSet};

/// The game's systems that feed [`ParkourControls`] should be placed in this set, so that the
/// controller always sees input from the same frame.
#[derive(SystemSet, Clone, PartialEq, Eq, Debug, Hash)]
pub struct ParkourUserControlsSystemSet;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::abilities::{
        ParkourClimbConfig, ParkourDashConfig, ParkourGrappleConfig, ParkourLedgeGrabConfig,
        ParkourSlideConfig, ParkourSwingConfig, ParkourWallRunConfig,
    };
    pub use crate::{
        CameraFx, MovementState, ParkourCameraSignals, ParkourController, ParkourControllerConfig,
        ParkourControllerPlugin, ParkourControls, ParkourMotor, ParkourMovementConfig,
        ParkourRigidBodyTracker, ParkourSensorSuite, ParkourSystemSet,
        ParkourUserControlsSystemSet,
    };
}
