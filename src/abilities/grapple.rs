use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityContext, ParkourSwing};
use crate::controller::GrappleFlight;
use crate::math::{Float, Vector3};
use crate::util::OneShot;

/// How long after the launch the grapple state is force-cleared, even without a collision.
const ROPE_STOP_DELAY: Float = 1.0;

/// Configuration for the grappling hook.
#[derive(Clone, Serialize, Deserialize)]
pub struct ParkourGrappleConfig {
    /// Range of the aim ray.
    pub max_grapple_distance: Float,
    /// Delay between firing the hook and launching the character, to let the rope animation
    /// reach the target.
    pub grapple_delay_time: Float,
    /// Extra height added above the grapple point when computing the launch arc. Also the
    /// fallback apex when the grapple point is below the character.
    pub overshoot_y_axis: Float,
    /// Cooldown between grapples.
    pub cooldown: Float,
}

impl Default for ParkourGrappleConfig {
    fn default() -> Self {
        Self {
            max_grapple_distance: 25.0,
            grapple_delay_time: 0.25,
            overshoot_y_axis: 2.0,
            cooldown: 2.5,
        }
    }
}

/// The grappling contributor.
///
/// The contributor itself only aims, times and cancels - the actual flight is the controller's
/// [`jump_to_position`](crate::ParkourController::jump_to_position) operation, which this
/// contributor hands off to through [`GrappleFlight`].
#[derive(Debug, Default)]
pub struct ParkourGrapple {
    grappling: bool,
    grapple_point: Option<Vector3>,
    cooldown: OneShot,
    fire_delay: OneShot,
    miss_delay: OneShot,
    stop_after_launch: OneShot,
}

impl ParkourGrapple {
    /// Whether the hook is currently out (including the pre-launch delay).
    pub fn grappling(&self) -> bool {
        self.grappling
    }

    /// Where the hook is attached or aimed, for rope rendering.
    pub fn grapple_point(&self) -> Option<Vector3> {
        self.grapple_point
    }

    pub(crate) fn update(
        &mut self,
        config: &ParkourGrappleConfig,
        ctx: &AbilityContext,
        swing: &mut ParkourSwing,
        flight: &mut GrappleFlight,
    ) {
        let frame_duration = ctx.frame_duration;
        self.cooldown.tick(frame_duration);

        if self.fire_delay.tick(frame_duration) {
            if let Some(point) = self.grapple_point {
                self.execute(config, ctx, point, flight);
            }
            self.stop_after_launch = OneShot::after(ROPE_STOP_DELAY);
        }
        if self.miss_delay.tick(frame_duration) {
            self.stop(config);
        }
        if self.stop_after_launch.tick(frame_duration) {
            self.stop(config);
        }

        if ctx.controls.grapple.just_pressed && !self.cooldown.pending() {
            // Starting a grapple explicitly cancels an active swing.
            swing.stop();

            self.grappling = true;
            if let Some(hit) = &ctx.sensors.grapple_ray.output {
                self.grapple_point = Some(hit.point);
                self.fire_delay = OneShot::after(config.grapple_delay_time);
            } else {
                // Nothing in range - show the rope flying to its full extent, then retract.
                self.grapple_point = Some(
                    ctx.controls.eye_position
                        + ctx.controls.eye_forward * config.max_grapple_distance,
                );
                self.miss_delay = OneShot::after(config.grapple_delay_time);
            }
        }
    }

    /// Launch the character toward the grapple point.
    fn execute(
        &mut self,
        config: &ParkourGrappleConfig,
        ctx: &AbilityContext,
        point: Vector3,
        flight: &mut GrappleFlight,
    ) {
        // The arc is computed from the feet, so low grapple points still produce a visible hop.
        let lowest_point = ctx.tracker.translation - ctx.up;
        let relative_y = point.y - lowest_point.y;
        let apex = if relative_y < 0.0 {
            // Target below the feet - a computed apex would degenerate, use the overshoot alone.
            config.overshoot_y_axis
        } else {
            relative_y + config.overshoot_y_axis
        };
        flight.jump_to(ctx.tracker.translation, point, apex, ctx.tracker.gravity.y);
    }

    /// Retract the hook and arm the cooldown.
    pub(crate) fn stop(&mut self, config: &ParkourGrappleConfig) {
        self.grappling = false;
        self.grapple_point = None;
        self.fire_delay.cancel();
        self.miss_delay.cancel();
        self.stop_after_launch.cancel();
        self.cooldown = OneShot::after(config.cooldown);
    }
}
