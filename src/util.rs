use crate::math::{Float, Vector3};

/// A single-fire countdown that replaces deferred one-shot callbacks.
///
/// Every "do X after N seconds" and every cooldown/exit window in the controller is one of
/// these. The remaining time is clamped at zero, and [`tick`](Self::tick) reports the expiry
/// exactly once - subsequent ticks return `false` until the countdown is armed again.
#[derive(Debug, Clone, Default)]
pub struct OneShot {
    remaining: Float,
    armed: bool,
}

impl OneShot {
    /// A countdown that is not armed and will never fire.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Arm the countdown to fire after the given delay.
    pub fn after(seconds: Float) -> Self {
        Self {
            remaining: seconds.max(0.0),
            armed: true,
        }
    }

    /// Advance the countdown. Returns `true` exactly once, on the tick the delay elapses.
    pub fn tick(&mut self, frame_duration: Float) -> bool {
        if !self.armed {
            return false;
        }
        self.remaining = (self.remaining - frame_duration).max(0.0);
        if self.remaining <= 0.0 {
            self.armed = false;
            true
        } else {
            false
        }
    }

    /// Whether the countdown is armed and has not fired yet.
    ///
    /// Cooldowns and exit windows are "open" exactly while this is `true`.
    pub fn pending(&self) -> bool {
        self.armed
    }

    pub fn cancel(&mut self) {
        self.armed = false;
        self.remaining = 0.0;
    }
}

/// Thrown when [`launch_velocity_for_arc`] is given an arc that has no real ballistic solution.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ArcError {
    #[error("gravity must point downward for a ballistic arc")]
    NonDownwardGravity,
    #[error("apex height must be positive")]
    ApexNotPositive,
    #[error("apex height is below the height the arc must climb")]
    ApexBelowClimb,
}

/// Calculate the launch velocity that carries a projectile from `start` to `end` under constant
/// gravity, peaking `apex_height` above the launch point.
///
/// The computation is exact and closed-form: the vertical launch speed follows from the apex
/// height (`v_y = sqrt(-2 g h)`), and the horizontal velocity is the horizontal displacement
/// divided by the total time of flight that vertical motion implies - the time to rise to the
/// apex plus the time to fall from the apex to the end height.
///
/// `gravity` is the (negative) vertical gravity component. Degenerate arcs - non-downward
/// gravity, a non-positive apex, or an end point higher than the apex - return an [`ArcError`]
/// instead of producing NaN velocities. When the end point is far below the launch point,
/// callers are expected to pick a small overshoot apex rather than deriving one from the
/// (negative) relative height.
pub fn launch_velocity_for_arc(
    start: Vector3,
    end: Vector3,
    apex_height: Float,
    gravity: Float,
) -> Result<Vector3, ArcError> {
    if 0.0 <= gravity {
        return Err(ArcError::NonDownwardGravity);
    }
    if apex_height <= 0.0 {
        return Err(ArcError::ApexNotPositive);
    }
    let displacement_y = end.y - start.y;
    if apex_height < displacement_y {
        return Err(ArcError::ApexBelowClimb);
    }
    let displacement_xz = Vector3::new(end.x - start.x, 0.0, end.z - start.z);

    let velocity_y = (-2.0 * gravity * apex_height).sqrt();
    let time_to_apex = (-2.0 * apex_height / gravity).sqrt();
    let time_from_apex = (2.0 * (displacement_y - apex_height) / gravity).sqrt();

    Ok(displacement_xz / (time_to_apex + time_from_apex) + Vector3::Y * velocity_y)
}
