use serde::{Deserialize, Serialize};

use crate::abilities::AbilityContext;
use crate::camera_fx::ParkourCameraSignals;
use crate::math::{Float, Vector3};
use crate::movement_state::{AbilityRequest, ModeIntents};
use crate::util::OneShot;
use crate::ParkourMotor;

/// Configuration for dashing.
#[derive(Clone, Serialize, Deserialize)]
pub struct ParkourDashConfig {
    /// Master switch. When `false` the ability never activates.
    pub enabled: bool,
    /// Impulse along the dash direction.
    pub dash_forward_force: Float,
    /// Upward impulse added on top of the dash direction.
    pub dash_upward_force: Float,
    /// How long the dash keeps control of the character.
    pub dash_duration: Float,
    /// Ceiling on upward speed during the dash, so the upward component cannot launch the
    /// character.
    pub max_dash_y_speed: Float,
    /// Delay between the input and the impulse, to sync with animation and feedback.
    pub windup: Float,
    /// Cooldown between dashes.
    pub cooldown: Float,
    /// Dash along the camera's pitched forward instead of the character's flat forward.
    pub use_camera_forward: bool,
    /// When `true` the movement input steers the dash; when `false` it always goes forward.
    pub allow_all_directions: bool,
    /// Turn gravity off for the duration of the dash.
    pub disable_gravity: bool,
    /// Zero the velocity right before the impulse, so every dash starts from a clean slate.
    pub reset_velocity: bool,
}

impl Default for ParkourDashConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dash_forward_force: 20.0,
            dash_upward_force: 2.0,
            dash_duration: 0.25,
            max_dash_y_speed: 15.0,
            windup: 0.025,
            cooldown: 1.5,
            use_camera_forward: true,
            allow_all_directions: true,
            disable_gravity: false,
            reset_velocity: true,
        }
    }
}

/// The dashing contributor - a single timed impulse with a cooldown.
#[derive(Debug, Default)]
pub struct ParkourDash {
    active: bool,
    cooldown: OneShot,
    windup: OneShot,
    pending_impulse: Vector3,
    duration: OneShot,
}

impl ParkourDash {
    pub fn active(&self) -> bool {
        self.active
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn update(
        &mut self,
        config: &ParkourDashConfig,
        ctx: &AbilityContext,
        previous_intents: &ModeIntents,
        wall_running: bool,
        climbing: bool,
        dash_fov: Float,
        normal_fov: Float,
        intents: &mut ModeIntents,
        motor: &mut ParkourMotor,
        camera: &mut ParkourCameraSignals,
    ) {
        let frame_duration = ctx.frame_duration;
        self.cooldown.tick(frame_duration);
        if self.windup.tick(frame_duration) {
            if config.reset_velocity {
                motor.set_velocity = Some(Vector3::ZERO);
            }
            motor.lin.boost += self.pending_impulse;
        }
        if self.duration.tick(frame_duration) {
            self.active = false;
            camera.fov(normal_fov, 0.2);
        }

        if config.enabled && ctx.controls.dash.just_pressed {
            let blocked = wall_running
                || climbing
                || previous_intents.contains(AbilityRequest::Freeze)
                || previous_intents.contains(AbilityRequest::Unlimited)
                || self.cooldown.pending()
                || self.active;
            if !blocked {
                self.cooldown = OneShot::after(config.cooldown);
                self.active = true;
                camera.fov(dash_fov, 0.2);

                let direction = self.direction(config, ctx);
                self.pending_impulse =
                    direction * config.dash_forward_force + ctx.up * config.dash_upward_force;
                self.windup = OneShot::after(config.windup);
                self.duration = OneShot::after(config.dash_duration);
            }
        }

        if self.active {
            intents.submit(AbilityRequest::Dash);
            intents.cap_vertical_speed(config.max_dash_y_speed);
            if config.disable_gravity {
                motor.use_gravity = false;
            }
        }
    }

    /// The dash direction implied by the configuration and the current input.
    fn direction(&self, config: &ParkourDashConfig, ctx: &AbilityContext) -> Vector3 {
        let forward = if config.use_camera_forward {
            ctx.controls.eye_forward
        } else {
            ctx.controls.forward
        };
        let direction = if config.allow_all_directions && ctx.controls.has_move_input() {
            forward * ctx.controls.move_axes.y + ctx.controls.right * ctx.controls.move_axes.x
        } else {
            forward
        };
        direction.normalize_or_zero()
    }
}
