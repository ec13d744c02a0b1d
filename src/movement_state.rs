use serde::{Deserialize, Serialize};

use crate::math::Float;

/// The single active high-level movement behavior for the current tick.
///
/// The variants are declared in resolution priority order: when several intents are submitted in
/// the same tick, the lowest-declared match wins. Traversal abilities must override ordinary
/// locomotion even when the character is also nominally grounded or crouching, and the transient
/// override states ([`Freeze`](Self::Freeze), [`Unlimited`](Self::Unlimited)) pre-empt normal
/// ground logic but not active traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementState {
    Swinging,
    Grappling,
    Dashing,
    /// Held completely still by another mechanic (e.g. hanging close to a ledge).
    Freeze,
    /// Speed cap lifted by another mechanic (e.g. being pulled toward a ledge).
    Unlimited,
    Climbing,
    WallRunning,
    Sliding,
    Crouching,
    Sprinting,
    Walking,
    #[default]
    Air,
}

/// A mode request a contributor may submit for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityRequest {
    Swing,
    Grapple,
    Dash,
    Freeze,
    Unlimited,
    Climb,
    WallRun,
    Slide,
}

/// The requests submitted by the motion contributors during the current tick.
///
/// A fresh value is built every tick and handed through the contributors' ordered update pass,
/// so requests can never leak from one tick to the next and no contributor ever clears another
/// contributor's state. The controller resolves the winning [`MovementState`] from the collected
/// requests once all contributors have run.
#[derive(Debug, Clone, Default)]
pub struct ModeIntents {
    swing: bool,
    grapple: bool,
    dash: bool,
    freeze: bool,
    unlimited: bool,
    climb: bool,
    wall_run: bool,
    slide: bool,
    restricted: bool,
    keep_momentum: bool,
    max_vertical_speed: Option<Float>,
}

impl ModeIntents {
    /// Submit a mode request for this tick.
    pub fn submit(&mut self, request: AbilityRequest) {
        match request {
            AbilityRequest::Swing => self.swing = true,
            AbilityRequest::Grapple => self.grapple = true,
            AbilityRequest::Dash => self.dash = true,
            AbilityRequest::Freeze => self.freeze = true,
            AbilityRequest::Unlimited => self.unlimited = true,
            AbilityRequest::Climb => self.climb = true,
            AbilityRequest::WallRun => self.wall_run = true,
            AbilityRequest::Slide => self.slide = true,
        }
    }

    pub fn contains(&self, request: AbilityRequest) -> bool {
        match request {
            AbilityRequest::Swing => self.swing,
            AbilityRequest::Grapple => self.grapple,
            AbilityRequest::Dash => self.dash,
            AbilityRequest::Freeze => self.freeze,
            AbilityRequest::Unlimited => self.unlimited,
            AbilityRequest::Climb => self.climb,
            AbilityRequest::WallRun => self.wall_run,
            AbilityRequest::Slide => self.slide,
        }
    }

    /// Suppress the controller's own force application for this tick - the submitting
    /// contributor moves the rigid body itself.
    pub fn restrict(&mut self) {
        self.restricted = true;
    }

    pub fn restricted(&self) -> bool {
        self.restricted
    }

    /// Ask for the speed transition to ramp instead of snap when the target speed changes this
    /// tick.
    pub fn request_momentum(&mut self) {
        self.keep_momentum = true;
    }

    pub fn momentum_requested(&self) -> bool {
        self.keep_momentum
    }

    /// Impose a transient ceiling on upward vertical speed. The lowest submitted ceiling wins.
    pub fn cap_vertical_speed(&mut self, ceiling: Float) {
        self.max_vertical_speed = Some(match self.max_vertical_speed {
            Some(existing) => existing.min(ceiling),
            None => ceiling,
        });
    }

    pub fn vertical_speed_cap(&self) -> Option<Float> {
        self.max_vertical_speed
    }

    /// Resolve the winning movement state for this tick.
    ///
    /// The priority order is total, so two contributors requesting control in the same tick can
    /// never tie - the declaration order of [`MovementState`] decides.
    pub fn resolve(&self, grounded: bool, sprint_held: bool, crouch_held: bool) -> MovementState {
        if self.swing {
            MovementState::Swinging
        } else if self.grapple {
            MovementState::Grappling
        } else if self.dash {
            MovementState::Dashing
        } else if self.freeze {
            MovementState::Freeze
        } else if self.unlimited {
            MovementState::Unlimited
        } else if self.climb {
            MovementState::Climbing
        } else if self.wall_run {
            MovementState::WallRunning
        } else if self.slide {
            MovementState::Sliding
        } else if crouch_held {
            MovementState::Crouching
        } else if grounded && sprint_held {
            MovementState::Sprinting
        } else if grounded {
            MovementState::Walking
        } else {
            MovementState::Air
        }
    }
}
