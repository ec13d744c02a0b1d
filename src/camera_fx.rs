use bevy::prelude::*;

use crate::math::Float;

/// A fire-and-forget camera directive emitted by the controller.
///
/// The controller does not tween the camera itself - it only announces the target values and how
/// long the transition should take, and the game's camera system is expected to drain the
/// signals and perform the actual easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraFx {
    /// Ease the field of view toward `target` over `transition_time` seconds.
    Fov { target: Float, transition_time: Float },
    /// Ease the camera roll toward `target` degrees over `transition_time` seconds. Used for the
    /// wall-run lean.
    Tilt { target: Float, transition_time: Float },
}

/// Queue of [`CameraFx`] signals produced during the controller's logic tick.
#[derive(Component, Debug, Default)]
pub struct ParkourCameraSignals {
    queue: Vec<CameraFx>,
}

impl ParkourCameraSignals {
    pub(crate) fn fov(&mut self, target: Float, transition_time: Float) {
        self.queue.push(CameraFx::Fov {
            target,
            transition_time,
        });
    }

    pub(crate) fn tilt(&mut self, target: Float, transition_time: Float) {
        self.queue.push(CameraFx::Tilt {
            target,
            transition_time,
        });
    }

    /// Remove and return the signals queued since the last drain.
    pub fn drain(&mut self) -> impl Iterator<Item = CameraFx> + '_ {
        self.queue.drain(..)
    }
}
