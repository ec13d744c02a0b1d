use bevy::prelude::*;

use crate::math::{Vector2, Vector3};

/// State of a single button binding, sampled once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParkourButton {
    pub held: bool,
    pub just_pressed: bool,
    pub just_released: bool,
}

impl ParkourButton {
    /// Feed the raw "is the key down" sample for this tick and derive the edges from the
    /// previous sample.
    pub fn update(&mut self, held_now: bool) {
        self.just_pressed = held_now && !self.held;
        self.just_released = !held_now && self.held;
        self.held = held_now;
    }
}

/// Per-tick control input for the parkour controller.
///
/// The game's input system translates whatever input devices and bindings it supports into this
/// component during [`ParkourUserControlsSystemSet`](crate::ParkourUserControlsSystemSet). The
/// controller never reads input devices itself - everything it knows about the player's
/// intentions and view comes from here.
#[derive(Component, Debug, Clone)]
pub struct ParkourControls {
    /// Raw movement axes - `x` is rightward strafe, `y` is forward.
    pub move_axes: Vector2,
    /// The character's yaw-only forward direction.
    pub forward: Vector3,
    /// The character's yaw-only rightward direction.
    pub right: Vector3,
    /// World position of the camera, used as the origin for aim casts.
    pub eye_position: Vector3,
    /// The camera's forward direction, including pitch. Aim casts and ledge detection use this.
    pub eye_forward: Vector3,
    pub jump: ParkourButton,
    pub sprint: ParkourButton,
    pub crouch: ParkourButton,
    pub dash: ParkourButton,
    pub grapple: ParkourButton,
    pub swing: ParkourButton,
    /// Modifier for climbing upward during a wall-run.
    pub upward_run: ParkourButton,
    /// Modifier for descending during a wall-run.
    pub downward_run: ParkourButton,
}

impl Default for ParkourControls {
    fn default() -> Self {
        Self {
            move_axes: Vector2::ZERO,
            forward: Vector3::NEG_Z,
            right: Vector3::X,
            eye_position: Vector3::ZERO,
            eye_forward: Vector3::NEG_Z,
            jump: ParkourButton::default(),
            sprint: ParkourButton::default(),
            crouch: ParkourButton::default(),
            dash: ParkourButton::default(),
            grapple: ParkourButton::default(),
            swing: ParkourButton::default(),
            upward_run: ParkourButton::default(),
            downward_run: ParkourButton::default(),
        }
    }
}

impl ParkourControls {
    pub fn has_move_input(&self) -> bool {
        self.move_axes != Vector2::ZERO
    }

    /// The desired movement direction in the character's orientation frame. Not normalized.
    pub fn move_direction(&self) -> Vector3 {
        self.forward * self.move_axes.y + self.right * self.move_axes.x
    }
}
