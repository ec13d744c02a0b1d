use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::abilities::AbilityContext;
use crate::math::{Float, Vector3};
use crate::movement_state::{AbilityRequest, ModeIntents};
use crate::util::OneShot;
use crate::ParkourMotor;

/// Configuration for grabbing and hanging from ledges.
#[derive(Clone, Serialize, Deserialize)]
pub struct ParkourLedgeGrabConfig {
    /// Master switch. When `false` the ability never activates.
    pub enabled: bool,
    /// Speed the character is eased toward the ledge anchor while hanging far from it.
    pub move_to_ledge_speed: Float,
    /// Acceleration used for the easing toward the anchor.
    pub ease_acceleration: Float,
    /// Hits further than this are not grabbed, and drifting further than this while hanging
    /// releases the ledge.
    pub max_ledge_grab_distance: Float,
    /// Directional input releases the hold only after hanging at least this long.
    pub min_time_on_ledge: Float,
    /// Impulse along the view direction when jumping off a ledge.
    pub ledge_jump_forward_force: Float,
    /// Upward impulse when jumping off a ledge.
    pub ledge_jump_upward_force: Float,
    /// Delay between releasing the hold and firing the ledge-jump impulse.
    pub ledge_jump_windup: Float,
    /// Duration of the exit window after releasing a ledge. Wall-jumps and climb-jumps are
    /// suppressed while it is open.
    pub exit_ledge_time: Float,
    /// How long after release the released ledge's identity keeps being refused. Prevents
    /// re-grabbing the same ledge the moment after letting go.
    pub last_ledge_clear_delay: Float,
    /// Range of the view-aligned detection sphere cast.
    pub detection_length: Float,
    /// Radius of the detection sphere cast.
    pub sphere_cast_radius: Float,
}

impl Default for ParkourLedgeGrabConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            move_to_ledge_speed: 12.5,
            ease_acceleration: 150.0,
            max_ledge_grab_distance: 2.5,
            min_time_on_ledge: 0.3,
            ledge_jump_forward_force: 14.0,
            ledge_jump_upward_force: 5.0,
            ledge_jump_windup: 0.05,
            exit_ledge_time: 0.25,
            last_ledge_clear_delay: 1.0,
            detection_length: 3.0,
            sphere_cast_radius: 0.4,
        }
    }
}

#[derive(Debug, Default)]
enum LedgePhase {
    #[default]
    Free,
    Holding {
        anchor: Vector3,
        held_for: Float,
    },
}

#[derive(Debug)]
struct PendingLedgeJump {
    windup: OneShot,
    impulse: Vector3,
}

/// The ledge-grabbing contributor.
///
/// While hanging it suppresses the controller's own force application and requests either
/// `Unlimited` (still being pulled toward the anchor) or `Freeze` (settled on the anchor).
#[derive(Debug, Default)]
pub struct ParkourLedgeGrab {
    phase: LedgePhase,
    exit_window: OneShot,
    last_ledge: Option<Entity>,
    clear_last_ledge: OneShot,
    pending_jump: Option<PendingLedgeJump>,
}

impl ParkourLedgeGrab {
    pub fn holding(&self) -> bool {
        matches!(self.phase, LedgePhase::Holding { .. })
    }

    /// Whether the post-release exit window is still open.
    pub fn exiting(&self) -> bool {
        self.exit_window.pending()
    }

    pub(crate) fn update(
        &mut self,
        config: &ParkourLedgeGrabConfig,
        ctx: &AbilityContext,
        intents: &mut ModeIntents,
        motor: &mut ParkourMotor,
    ) {
        let frame_duration = ctx.frame_duration;
        self.exit_window.tick(frame_duration);
        if self.clear_last_ledge.tick(frame_duration) {
            self.last_ledge = None;
        }
        if let Some(pending) = &mut self.pending_jump {
            if pending.windup.tick(frame_duration) {
                motor.set_velocity = Some(Vector3::ZERO);
                motor.lin.boost += pending.impulse;
                self.pending_jump = None;
            }
        }
        if !config.enabled {
            return;
        }

        if !self.holding() {
            if let Some(hit) = &ctx.sensors.ledge.output {
                let distance = ctx.tracker.translation.distance(hit.point);
                let suppressed = self.last_ledge == Some(hit.entity);
                if !suppressed && distance < config.max_ledge_grab_distance {
                    self.phase = LedgePhase::Holding {
                        anchor: hit.point,
                        held_for: 0.0,
                    };
                    self.last_ledge = Some(hit.entity);
                    self.clear_last_ledge.cancel();
                    motor.set_velocity = Some(Vector3::ZERO);
                }
            }
        }

        let mut release = false;
        let mut jump_along = None;
        if let LedgePhase::Holding { anchor, held_for } = &mut self.phase {
            motor.use_gravity = false;
            intents.restrict();

            let to_anchor = *anchor - ctx.tracker.translation;
            let distance = to_anchor.length();
            if 1.0 < distance {
                // still being reeled in - the speed cap must not fight the easing
                intents.submit(AbilityRequest::Unlimited);
                if ctx.tracker.velocity.length() < config.move_to_ledge_speed {
                    motor.lin.acceleration += to_anchor.normalize_or_zero() * config.ease_acceleration;
                }
            } else {
                intents.submit(AbilityRequest::Freeze);
            }

            *held_for += frame_duration;
            if config.max_ledge_grab_distance < distance {
                release = true;
            } else if ctx.controls.jump.just_pressed {
                release = true;
                jump_along = Some(ctx.controls.eye_forward);
            } else if config.min_time_on_ledge < *held_for && ctx.controls.has_move_input() {
                release = true;
            }
        }
        if release {
            self.release(config, motor);
            if let Some(eye_forward) = jump_along {
                self.pending_jump = Some(PendingLedgeJump {
                    windup: OneShot::after(config.ledge_jump_windup),
                    impulse: eye_forward * config.ledge_jump_forward_force
                        + ctx.up * config.ledge_jump_upward_force,
                });
            }
        }
    }

    fn release(&mut self, config: &ParkourLedgeGrabConfig, motor: &mut ParkourMotor) {
        self.phase = LedgePhase::Free;
        self.exit_window = OneShot::after(config.exit_ledge_time);
        self.clear_last_ledge = OneShot::after(config.last_ledge_clear_delay);
        motor.use_gravity = true;
    }
}
