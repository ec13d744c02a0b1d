use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityContext, ParkourGrapple, ParkourGrappleConfig};
use crate::camera_fx::ParkourCameraSignals;
use crate::controller::GrappleFlight;
use crate::math::{Float, Vector3};
use crate::movement_state::{AbilityRequest, ModeIntents};
use crate::{ParkourMotor, ParkourSpringConstraint};

/// Configuration for swinging on a cable.
#[derive(Clone, Serialize, Deserialize)]
pub struct ParkourSwingConfig {
    /// Range of the anchor prediction casts.
    pub max_swing_distance: Float,
    /// Spring coefficient of the cable constraint.
    pub joint_spring: Float,
    /// Damper coefficient of the cable constraint.
    pub joint_damper: Float,
    /// Mass scale of the cable constraint.
    pub joint_mass_scale: Float,
    /// Sideways thrust acceleration while attached.
    pub horizontal_thrust_force: Float,
    /// Forward (and cable-shortening) thrust acceleration while attached.
    pub forward_thrust_force: Float,
    /// How fast, in units per second, the cable extends while steering backward.
    pub extend_cable_speed: Float,
    /// Radius of the prediction sphere cast used when the aim ray misses.
    pub prediction_sphere_cast_radius: Float,
}

impl Default for ParkourSwingConfig {
    fn default() -> Self {
        Self {
            max_swing_distance: 25.0,
            joint_spring: 4.5,
            joint_damper: 7.0,
            joint_mass_scale: 4.5,
            horizontal_thrust_force: 35.0,
            forward_thrust_force: 40.0,
            extend_cable_speed: 8.0,
            prediction_sphere_cast_radius: 3.0,
        }
    }
}

/// The swinging contributor.
///
/// While attached it maintains a spring constraint through the motor - the backend owns the
/// actual joint - and applies the player's thrust and cable-length adjustments.
#[derive(Debug, Default)]
pub struct ParkourSwing {
    swing_point: Option<Vector3>,
    predicted_point: Option<Vector3>,
    min_distance: Float,
    max_distance: Float,
}

impl ParkourSwing {
    pub fn active(&self) -> bool {
        self.swing_point.is_some()
    }

    /// The anchor point a swing would attach to right now, for aim feedback.
    pub fn predicted_point(&self) -> Option<Vector3> {
        self.predicted_point
    }

    /// The anchor of the current swing, for rope rendering.
    pub fn swing_point(&self) -> Option<Vector3> {
        self.swing_point
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn update(
        &mut self,
        config: &ParkourSwingConfig,
        ctx: &AbilityContext,
        grapple: &mut ParkourGrapple,
        grapple_config: &ParkourGrappleConfig,
        flight: &mut GrappleFlight,
        normal_fov: Float,
        intents: &mut ModeIntents,
        motor: &mut ParkourMotor,
        camera: &mut ParkourCameraSignals,
    ) {
        // Prediction runs only while unattached - the anchor does not move mid-swing.
        if !self.active() {
            let ray = ctx.sensors.swing_ray.output.as_ref();
            let sphere = ctx.sensors.swing_sphere.output.as_ref();
            // Prefer the direct hit over the predicted one.
            self.predicted_point = ray.or(sphere).map(|hit| hit.point);
        }

        if ctx.controls.swing.just_pressed && !self.active() {
            if let Some(point) = self.predicted_point {
                // Starting a swing explicitly cancels an active grapple and its flight.
                grapple.stop(grapple_config);
                if flight.active() {
                    flight.reset();
                    camera.fov(normal_fov, 0.5);
                }

                self.swing_point = Some(point);
                let distance = ctx.tracker.translation.distance(point);
                self.max_distance = distance * 0.8;
                self.min_distance = distance * 0.25;
            }
        }
        if ctx.controls.swing.just_released && self.active() {
            self.stop();
        }

        if let Some(point) = self.swing_point {
            intents.submit(AbilityRequest::Swing);

            // Player-applied thrust.
            let axes = ctx.controls.move_axes;
            if 0.0 < axes.x {
                motor.lin.acceleration += ctx.controls.right * config.horizontal_thrust_force;
            }
            if axes.x < 0.0 {
                motor.lin.acceleration += -ctx.controls.right * config.horizontal_thrust_force;
            }
            if 0.0 < axes.y {
                motor.lin.acceleration += ctx.controls.forward * config.forward_thrust_force;
            }

            // Shorten the cable by reeling toward the anchor.
            if ctx.controls.jump.held {
                let to_point = point - ctx.tracker.translation;
                motor.lin.acceleration +=
                    to_point.normalize_or_zero() * config.forward_thrust_force;

                let distance = ctx.tracker.translation.distance(point);
                self.max_distance = distance * 0.8;
                self.min_distance = distance * 0.25;
            }
            // Extend the cable by steering backward.
            if axes.y < 0.0 {
                let extended = ctx.tracker.translation.distance(point)
                    + config.extend_cable_speed * ctx.frame_duration;
                self.max_distance = extended * 0.8;
                self.min_distance = extended * 0.25;
            }

            motor.spring = Some(ParkourSpringConstraint {
                anchor: point,
                min_distance: self.min_distance,
                max_distance: self.max_distance,
                spring: config.joint_spring,
                damper: config.joint_damper,
                mass_scale: config.joint_mass_scale,
            });
        }
    }

    /// Detach the cable. The constraint disappears from the motor on the next tick.
    pub(crate) fn stop(&mut self) {
        self.swing_point = None;
    }
}
