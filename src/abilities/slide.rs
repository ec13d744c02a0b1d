use serde::{Deserialize, Serialize};

use crate::abilities::AbilityContext;
use crate::math::{Float, Vector3};
use crate::movement_state::{AbilityRequest, ModeIntents};
use crate::ParkourMotor;

/// Configuration for sliding.
#[derive(Clone, Serialize, Deserialize)]
pub struct ParkourSlideConfig {
    /// Force applied along the input direction while sliding.
    pub slide_force: Float,
    /// Longest slide on flat ground. On slopes the timer does not drain.
    pub max_slide_time: Float,
    /// Vertical collider scale while sliding.
    pub slide_y_scale: Float,
    /// Downward impulse applied when the slide starts, to keep ground contact.
    pub slide_down_impulse: Float,
    /// How fast, in speed units per second, the flat-ground slide speed decays toward zero.
    pub flat_drain_rate: Float,
}

impl Default for ParkourSlideConfig {
    fn default() -> Self {
        Self {
            slide_force: 200.0,
            max_slide_time: 0.75,
            slide_y_scale: 0.5,
            slide_down_impulse: 5.0,
            flat_drain_rate: 8.0,
        }
    }
}

/// The sliding contributor.
#[derive(Debug, Default)]
pub struct ParkourSlide {
    sliding: bool,
    /// Remaining flat-ground slide time. Clamped at zero.
    slide_timer: Float,
}

impl ParkourSlide {
    pub fn active(&self) -> bool {
        self.sliding
    }

    pub(crate) fn update(
        &mut self,
        config: &ParkourSlideConfig,
        ctx: &AbilityContext,
        previous_intents: &ModeIntents,
        intents: &mut ModeIntents,
        motor: &mut ParkourMotor,
    ) {
        // Swinging and grappling own the rigid body - no slides during either.
        if previous_intents.contains(AbilityRequest::Swing)
            || previous_intents.contains(AbilityRequest::Grapple)
        {
            return;
        }

        if ctx.controls.crouch.just_pressed
            && ctx.grounded
            && ctx.controls.has_move_input()
            && !self.sliding
        {
            self.sliding = true;
            self.slide_timer = config.max_slide_time;
            motor.lin.boost += Vector3::NEG_Y * config.slide_down_impulse;
        }
        if ctx.controls.crouch.just_released && self.sliding {
            self.sliding = false;
        }

        if self.sliding {
            intents.submit(AbilityRequest::Slide);
            if ctx.on_slope {
                // Slope slides ramp into their higher speed cap instead of snapping.
                intents.request_momentum();
            }

            let input_direction = ctx.controls.move_direction().normalize_or_zero();
            if !ctx.on_slope || -0.1 < ctx.tracker.velocity.y {
                // Flat ground (or still moving upward on a slope) - the slide drains.
                motor.lin.acceleration += input_direction * config.slide_force;
                self.slide_timer = (self.slide_timer - ctx.frame_duration).max(0.0);
            } else {
                // Sliding down a slope builds speed instead of draining.
                motor.lin.acceleration += ctx.slope_direction(input_direction) * config.slide_force;
            }

            if self.slide_timer <= 0.0 {
                self.sliding = false;
            }
        }
    }
}
