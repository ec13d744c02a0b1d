use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityContext, ParkourLedgeGrab};
use crate::math::{Float, Vector3};
use crate::movement_state::{AbilityRequest, ModeIntents};
use crate::util::OneShot;
use crate::ParkourMotor;

/// Configuration for climbing ladders and other climbable walls.
#[derive(Clone, Serialize, Deserialize)]
pub struct ParkourClimbConfig {
    /// Master switch. When `false` the ability never activates.
    pub enabled: bool,
    /// Upward speed the vertical velocity is pinned to while climbing.
    pub climb_speed: Float,
    /// Longest continuous climb on a single wall, when
    /// [`climb_time_limit`](Self::climb_time_limit) is on.
    pub max_climb_time: Float,
    /// Whether the continuous climb duration is limited at all.
    pub climb_time_limit: bool,
    /// Upward impulse of a climb-jump.
    pub climb_jump_up_force: Float,
    /// Impulse away from the wall (along its normal) of a climb-jump.
    pub climb_jump_back_force: Float,
    /// How many climb-jumps can be performed before touching ground or a new wall again.
    pub climb_jumps: u32,
    /// Walls whose normal differs from the previous wall's by more than this many degrees count
    /// as new walls, resetting the climb timer and the jump charges.
    pub min_wall_normal_angle_change: Float,
    /// Maximum angle, in degrees, between the look direction and the wall for the climb to
    /// engage.
    pub max_wall_look_angle: Float,
    /// Duration of the exit window after a climb-jump, during which climbing cannot re-engage.
    pub exit_wall_time: Float,
    /// Range of the forward detection sphere cast.
    pub detection_length: Float,
    /// Radius of the forward detection sphere cast.
    pub sphere_cast_radius: Float,
}

impl Default for ParkourClimbConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            climb_speed: 3.0,
            max_climb_time: 0.75,
            climb_time_limit: true,
            climb_jump_up_force: 14.0,
            climb_jump_back_force: 12.0,
            climb_jumps: 2,
            min_wall_normal_angle_change: 5.0,
            max_wall_look_angle: 30.0,
            exit_wall_time: 0.2,
            detection_length: 0.7,
            sphere_cast_radius: 0.25,
        }
    }
}

/// The climbing contributor.
#[derive(Debug, Default)]
pub struct ParkourClimb {
    climbing: bool,
    /// Remaining continuous climb time on the current wall. Clamped at zero.
    climb_timer: Float,
    jumps_left: u32,
    last_wall: Option<Entity>,
    last_wall_normal: Vector3,
    exit_window: OneShot,
}

impl ParkourClimb {
    pub fn active(&self) -> bool {
        self.climbing
    }

    /// Whether the post-climb-jump exit window is still open. The controller suppresses its own
    /// force application while this is `true`.
    pub fn exiting(&self) -> bool {
        self.exit_window.pending()
    }

    pub(crate) fn update(
        &mut self,
        config: &ParkourClimbConfig,
        ctx: &AbilityContext,
        ledge: &ParkourLedgeGrab,
        intents: &mut ModeIntents,
        motor: &mut ParkourMotor,
    ) {
        let frame_duration = ctx.frame_duration;
        self.exit_window.tick(frame_duration);
        if !config.enabled {
            self.climbing = false;
            return;
        }

        let front = ctx.sensors.wall_front.output.as_ref();
        let look_angle = front.map(|hit| {
            ctx.controls
                .forward
                .angle_between(-hit.normal)
                .to_degrees()
        });

        // Touching ground or facing a sufficiently different wall recharges the climb.
        let new_wall = front.is_some_and(|hit| {
            self.last_wall != Some(hit.entity)
                || config.min_wall_normal_angle_change
                    < self.last_wall_normal.angle_between(hit.normal).to_degrees()
        });
        if new_wall || ctx.grounded {
            self.climb_timer = config.max_climb_time;
            self.jumps_left = config.climb_jumps;
        }

        let wants_climb = front.is_some()
            && 0.0 < ctx.controls.move_axes.y
            && look_angle.is_some_and(|angle| angle < config.max_wall_look_angle);

        if ledge.holding() {
            self.climbing = false;
        } else if wants_climb && !self.exiting() {
            if !self.climbing && 0.0 < self.climb_timer {
                self.climbing = true;
                if let Some(hit) = front {
                    self.last_wall = Some(hit.entity);
                    self.last_wall_normal = hit.normal;
                }
            }
            self.climb_timer = (self.climb_timer - frame_duration).max(0.0);
            if self.climb_timer <= 0.0 && config.climb_time_limit {
                self.climbing = false;
            }
        } else {
            self.climbing = false;
        }

        if self.climbing && !self.exiting() {
            intents.submit(AbilityRequest::Climb);
            motor.set_vertical_velocity = Some(config.climb_speed);
        }

        // Climb jumping
        if ctx.controls.jump.just_pressed && 0 < self.jumps_left {
            if let Some(hit) = front {
                if !ctx.grounded && !ledge.holding() && !ledge.exiting() {
                    self.climbing = false;
                    self.exit_window = OneShot::after(config.exit_wall_time);
                    motor.set_vertical_velocity = Some(0.0);
                    motor.lin.boost +=
                        ctx.up * config.climb_jump_up_force + hit.normal * config.climb_jump_back_force;
                    self.jumps_left -= 1;
                }
            }
        }
    }
}
