//! The motion mode contributors.
//!
//! Each contributor detects its own activation condition from the sensor suite and the controls,
//! keeps its own timers, and - while active - submits a mode request and drives the motor for
//! the parts of the motion it owns. Contributors run in a fixed order inside the controller's
//! tick, strictly before mode resolution, and only ever read raw detection state plus the
//! *previous* tick's resolved intents - never the mode being resolved this tick.

mod climb;
mod dash;
mod grapple;
mod ledge_grab;
mod slide;
mod swing;
mod wall_run;

pub use climb::{ParkourClimb, ParkourClimbConfig};
pub use dash::{ParkourDash, ParkourDashConfig};
pub use grapple::{ParkourGrapple, ParkourGrappleConfig};
pub use ledge_grab::{ParkourLedgeGrab, ParkourLedgeGrabConfig};
pub use slide::{ParkourSlide, ParkourSlideConfig};
pub use swing::{ParkourSwing, ParkourSwingConfig};
pub use wall_run::{ParkourWallRun, ParkourWallRunConfig, WallSide};

use crate::math::{Float, Vector3};
use crate::{ParkourControls, ParkourRigidBodyTracker, ParkourSensorSuite};

/// Everything a contributor may read during its update.
pub struct AbilityContext<'a> {
    pub frame_duration: Float,
    pub tracker: &'a ParkourRigidBodyTracker,
    pub sensors: &'a ParkourSensorSuite,
    pub controls: &'a ParkourControls,
    /// Result of this tick's ground probe.
    pub grounded: bool,
    /// Result of this tick's slope probe.
    pub on_slope: bool,
    pub slope_normal: Vector3,
    pub up: Vector3,
}

impl AbilityContext<'_> {
    /// Project a movement direction onto the detected slope plane.
    pub fn slope_direction(&self, direction: Vector3) -> Vector3 {
        direction.reject_from(self.slope_normal).normalize_or_zero()
    }
}
