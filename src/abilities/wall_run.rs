use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityContext, ParkourLedgeGrab};
use crate::camera_fx::ParkourCameraSignals;
use crate::math::Float;
use crate::movement_state::{AbilityRequest, ModeIntents};
use crate::util::OneShot;
use crate::{ParkourMotor, ParkourProximitySensorOutput};

/// Configuration for running along vertical walls.
#[derive(Clone, Serialize, Deserialize)]
pub struct ParkourWallRunConfig {
    /// Forward force applied along the wall while running.
    pub wall_run_force: Float,
    /// Force pressing the character against the wall so it does not detach prematurely.
    pub push_to_wall_force: Float,
    /// Upward impulse of a wall-jump.
    pub wall_jump_up_force: Float,
    /// Impulse away from the wall (along its normal) of a wall-jump.
    pub wall_jump_side_force: Float,
    /// Vertical speed the character moves at while holding the upward/downward run modifiers.
    pub wall_climb_speed: Float,
    /// Longest continuous wall-run, when [`wall_run_limit`](Self::wall_run_limit) is on.
    pub max_wall_run_time: Float,
    /// Whether the wall-run duration is limited at all.
    pub wall_run_limit: bool,
    /// Range of the sideways wall probes.
    pub wall_check_distance: Float,
    /// A wall-run only engages while no floor is within this distance below the character.
    pub min_jump_height: Float,
    /// Duration of the exit window after a wall-jump or a timed-out run, during which the run
    /// cannot re-engage.
    pub exit_wall_time: Float,
    /// Whether gravity keeps acting during the run.
    pub use_gravity: bool,
    /// Upward counterforce that softens gravity while [`use_gravity`](Self::use_gravity) is on.
    pub gravity_counter_force: Float,
    /// Field of view while wall-running.
    pub wall_run_fov: Float,
    /// Camera roll toward the wall, in degrees.
    pub camera_tilt: Float,
    /// Transition time for the camera signals.
    pub transition_time: Float,
}

impl Default for ParkourWallRunConfig {
    fn default() -> Self {
        Self {
            wall_run_force: 200.0,
            push_to_wall_force: 100.0,
            wall_jump_up_force: 7.0,
            wall_jump_side_force: 12.0,
            wall_climb_speed: 3.0,
            max_wall_run_time: 0.7,
            wall_run_limit: true,
            wall_check_distance: 0.7,
            min_jump_height: 2.0,
            exit_wall_time: 0.2,
            use_gravity: false,
            gravity_counter_force: 4.0,
            wall_run_fov: 90.0,
            camera_tilt: 15.0,
            transition_time: 0.25,
        }
    }
}

/// Which wall the character is currently running along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

/// The wall-running contributor.
#[derive(Debug, Default)]
pub struct ParkourWallRun {
    running: Option<WallSide>,
    /// Remaining run time. Clamped at zero.
    run_timer: Float,
    exit_window: OneShot,
}

impl ParkourWallRun {
    pub fn active(&self) -> bool {
        self.running.is_some()
    }

    /// The wall currently being run along.
    pub fn side(&self) -> Option<WallSide> {
        self.running
    }

    pub fn exiting(&self) -> bool {
        self.exit_window.pending()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn update(
        &mut self,
        config: &ParkourWallRunConfig,
        ctx: &AbilityContext,
        ledge: &ParkourLedgeGrab,
        normal_fov: Float,
        intents: &mut ModeIntents,
        motor: &mut ParkourMotor,
        camera: &mut ParkourCameraSignals,
    ) {
        let frame_duration = ctx.frame_duration;
        self.exit_window.tick(frame_duration);

        let wall_left = ctx.sensors.wall_left.output.as_ref();
        let wall_right = ctx.sensors.wall_right.output.as_ref();
        let above_ground = ctx.sensors.floor_gap.output.is_none();
        let forward_input = 0.0 < ctx.controls.move_axes.y;

        let any_wall = wall_left.is_some() || wall_right.is_some();
        if any_wall && forward_input && above_ground && !self.exit_window.pending() {
            // Both walls hit is possible in a tight corridor - stay on the side that was already
            // active, otherwise prefer the right wall. Exactly one wall drives the forces.
            let side = match self.running {
                Some(WallSide::Left) if wall_left.is_some() => WallSide::Left,
                Some(WallSide::Right) if wall_right.is_some() => WallSide::Right,
                _ => {
                    if wall_right.is_some() {
                        WallSide::Right
                    } else {
                        WallSide::Left
                    }
                }
            };
            if self.running.is_none() {
                self.start(config, side, motor, camera);
            } else {
                self.running = Some(side);
            }

            if config.wall_run_limit && self.running.is_some() {
                self.run_timer = (self.run_timer - frame_duration).max(0.0);
                if self.run_timer <= 0.0 {
                    // The timer just ran out - open the exit window exactly once.
                    self.stop(config, normal_fov, camera);
                    self.exit_window = OneShot::after(config.exit_wall_time);
                }
            }

            if ctx.controls.jump.just_pressed && self.running.is_some() {
                self.wall_jump(config, ctx, ledge, normal_fov, motor, camera, wall_left, wall_right);
            }
        } else if self.running.is_some() {
            self.stop(config, normal_fov, camera);
        }

        if let Some(side) = self.running {
            let hit = match side {
                WallSide::Left => wall_left,
                WallSide::Right => wall_right,
            };
            let Some(hit) = hit else {
                self.stop(config, normal_fov, camera);
                return;
            };
            intents.submit(AbilityRequest::WallRun);
            motor.use_gravity = config.use_gravity;

            let wall_normal = hit.normal;
            let mut wall_forward = wall_normal.cross(ctx.up);
            let forward = ctx.controls.forward;
            if (forward + wall_forward).length() < (forward - wall_forward).length() {
                wall_forward = -wall_forward;
            }
            motor.lin.acceleration += wall_forward * config.wall_run_force;

            if ctx.controls.upward_run.held {
                motor.set_vertical_velocity = Some(config.wall_climb_speed);
            }
            if ctx.controls.downward_run.held {
                motor.set_vertical_velocity = Some(-config.wall_climb_speed);
            }

            // Push toward the wall, unless the player is steering away from it.
            let steering_away = match side {
                WallSide::Left => 0.0 < ctx.controls.move_axes.x,
                WallSide::Right => ctx.controls.move_axes.x < 0.0,
            };
            if !steering_away {
                motor.lin.acceleration += -wall_normal * config.push_to_wall_force;
            }

            if config.use_gravity {
                motor.lin.acceleration += ctx.up * config.gravity_counter_force;
            }
        }
    }

    fn start(
        &mut self,
        config: &ParkourWallRunConfig,
        side: WallSide,
        motor: &mut ParkourMotor,
        camera: &mut ParkourCameraSignals,
    ) {
        self.running = Some(side);
        self.run_timer = config.max_wall_run_time;
        motor.set_vertical_velocity = Some(0.0);

        camera.fov(config.wall_run_fov, config.transition_time);
        match side {
            WallSide::Left => camera.tilt(-config.camera_tilt, config.transition_time),
            WallSide::Right => camera.tilt(config.camera_tilt, config.transition_time),
        }
    }

    fn stop(
        &mut self,
        config: &ParkourWallRunConfig,
        normal_fov: Float,
        camera: &mut ParkourCameraSignals,
    ) {
        self.running = None;
        camera.fov(normal_fov, config.transition_time);
        camera.tilt(0.0, config.transition_time);
    }

    #[allow(clippy::too_many_arguments)]
    fn wall_jump(
        &mut self,
        config: &ParkourWallRunConfig,
        ctx: &AbilityContext,
        ledge: &ParkourLedgeGrab,
        normal_fov: Float,
        motor: &mut ParkourMotor,
        camera: &mut ParkourCameraSignals,
        wall_left: Option<&ParkourProximitySensorOutput>,
        wall_right: Option<&ParkourProximitySensorOutput>,
    ) {
        if ledge.holding() || ledge.exiting() {
            return;
        }
        let wall_normal = match self.running {
            Some(WallSide::Left) => wall_left.map(|hit| hit.normal),
            Some(WallSide::Right) => wall_right.map(|hit| hit.normal),
            None => None,
        };
        let Some(wall_normal) = wall_normal else {
            return;
        };

        // Make sure the character can leave the wall before re-attaching.
        self.stop(config, normal_fov, camera);
        self.exit_window = OneShot::after(config.exit_wall_time);

        motor.set_vertical_velocity = Some(0.0);
        motor.lin.boost +=
            ctx.up * config.wall_jump_up_force + wall_normal * config.wall_jump_side_force;
    }
}
