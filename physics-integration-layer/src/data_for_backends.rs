use std::ops::{Add, AddAssign};

use bevy::prelude::*;

use crate::math::{Float, Quaternion, Vector3};

/// Backend-agnostic collision layer mask used to filter proximity casts.
///
/// The physics backend is responsible for translating these bits into whatever filtering
/// mechanism the physics engine uses (collision groups, query filters, tags on colliders)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParkourLayers(pub u32);

impl ParkourLayers {
    /// Colliders the character can stand on.
    pub const GROUND: Self = Self(1 << 0);
    /// Colliders the character can wall-run on.
    pub const WALL: Self = Self(1 << 1);
    /// Ladders and other climbable colliders.
    pub const LADDER: Self = Self(1 << 2);
    /// Colliders that can be grabbed as ledges.
    pub const LEDGE: Self = Self(1 << 3);
    /// Colliders the grappling hook and the swing cable can latch onto.
    pub const GRAPPLE: Self = Self(1 << 4);
    pub const ALL: Self = Self(u32::MAX);

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for ParkourLayers {
    fn default() -> Self {
        Self::ALL
    }
}

/// Newtonian state of the rigid body.
///
/// The parkour crates take the position and rotation of the rigid body from its
/// `GlobalTransform`, but things like velocity are dependent on the physics engine. The physics
/// backend is responsible for updating this component from the physics engine during
/// [`ParkourPipelineStages::Sensors`](crate::ParkourPipelineStages::Sensors).
#[derive(Component, Debug)]
pub struct ParkourRigidBodyTracker {
    pub translation: Vector3,
    pub rotation: Quaternion,
    pub velocity: Vector3,
    pub gravity: Vector3,
    /// `true` when a new contact with any collider began since the previous sensors update -
    /// a collision-enter event, not a persistent touch.
    ///
    /// The controller uses this to restore normal movement on the first impact after a grapple
    /// launch.
    pub just_collided: bool,
}

impl Default for ParkourRigidBodyTracker {
    fn default() -> Self {
        Self {
            translation: Vector3::ZERO,
            rotation: Quaternion::IDENTITY,
            velocity: Vector3::ZERO,
            gravity: Vector3::ZERO,
            just_collided: false,
        }
    }
}

/// Distance from another collider in a certain direction, and information on that collider.
///
/// The physics backend is responsible for filling [`output`](Self::output) during
/// [`ParkourPipelineStages::Sensors`](crate::ParkourPipelineStages::Sensors), by casting a ray -
/// or a sphere, when [`cast_radius`](Self::cast_radius) is positive - in the `cast_direction`.
/// The controller only writes the cast specification fields; the backend only writes `output`.
#[derive(Debug, Clone)]
pub struct ParkourProximitySensor {
    /// The cast origin in the world coord system.
    pub cast_origin: Vector3,
    /// The direction in the world coord system (unmodified by the entity's transform)
    pub cast_direction: Dir3,
    /// The radius of the cast shape. Zero means a plain ray cast.
    pub cast_radius: Float,
    /// The controller will update this field according to its need. The backend only needs to
    /// read it. A non-positive range means the probe is unused this frame.
    pub cast_range: Float,
    /// Layers the cast is allowed to hit.
    pub layers: ParkourLayers,
    pub output: Option<ParkourProximitySensorOutput>,
}

impl Default for ParkourProximitySensor {
    fn default() -> Self {
        Self {
            cast_origin: Vector3::ZERO,
            cast_direction: Dir3::NEG_Y,
            cast_radius: 0.0,
            cast_range: 0.0,
            layers: ParkourLayers::ALL,
            output: None,
        }
    }
}

/// Information from a [`ParkourProximitySensor`] that has detected another collider.
#[derive(Debug, Clone)]
pub struct ParkourProximitySensorOutput {
    /// The entity of the collider detected by the cast.
    pub entity: Entity,
    /// The point, in the world coord system, where the cast hit the collider.
    pub point: Vector3,
    /// The normal from the detected collider's surface where the cast hits.
    pub normal: Vector3,
    /// The distance to the collider from [`cast_origin`](ParkourProximitySensor::cast_origin)
    /// along the [`cast_direction`](ParkourProximitySensor::cast_direction).
    pub proximity: Float,
}

/// The fixed set of proximity probes the parkour controller needs every frame.
///
/// The controller writes the cast specifications during
/// [`ParkourPipelineStages::Logic`](crate::ParkourPipelineStages::Logic) and the backend fills
/// the outputs during the following
/// [`ParkourPipelineStages::Sensors`](crate::ParkourPipelineStages::Sensors) -
/// [`update_sensor_suite`](crate::spatial_ext::update_sensor_suite) does this for any
/// [`ParkourSpatialExt`](crate::spatial_ext::ParkourSpatialExt) implementation.
#[derive(Component, Debug, Default)]
pub struct ParkourSensorSuite {
    /// Short downward probe that decides whether the character is grounded.
    pub ground: ParkourProximitySensor,
    /// Slightly longer downward probe used for slope detection. Unfiltered, because slopes do
    /// not have to be on the walkable layer to affect sliding physics.
    pub slope: ParkourProximitySensor,
    /// Longer downward probe used to require a minimum height off the floor before wall-running.
    pub floor_gap: ParkourProximitySensor,
    /// Sideways probe for a wall on the character's left.
    pub wall_left: ParkourProximitySensor,
    /// Sideways probe for a wall on the character's right.
    pub wall_right: ParkourProximitySensor,
    /// Forward sphere probe for ladders and other climbables.
    pub wall_front: ParkourProximitySensor,
    /// View-aligned sphere probe for grabbable ledges.
    pub ledge: ParkourProximitySensor,
    /// View-aligned ray used to aim the grappling hook.
    pub grapple_ray: ParkourProximitySensor,
    /// View-aligned ray used for direct swing anchor hits.
    pub swing_ray: ParkourProximitySensor,
    /// View-aligned sphere cast used to predict a swing anchor near the aim line.
    pub swing_sphere: ParkourProximitySensor,
}

impl ParkourSensorSuite {
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ParkourProximitySensor> {
        let Self {
            ground,
            slope,
            floor_gap,
            wall_left,
            wall_right,
            wall_front,
            ledge,
            grapple_ray,
            swing_ray,
            swing_sphere,
        } = self;
        [
            ground,
            slope,
            floor_gap,
            wall_left,
            wall_right,
            wall_front,
            ledge,
            grapple_ray,
            swing_ray,
            swing_sphere,
        ]
        .into_iter()
    }
}

/// Represents a change to the linear velocity of the rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParkourVelChange {
    /// The part of the velocity change that gets multiplied by the frame duration.
    ///
    /// In engines with an external-force concept this should be applied as a force, so that the
    /// simulation applies it smoothly over time and is not sensitive to frame rate.
    pub acceleration: Vector3,
    /// The part of the velocity change that gets added to the velocity as-is.
    pub boost: Vector3,
}

impl ParkourVelChange {
    pub const ZERO: Self = Self {
        acceleration: Vector3::ZERO,
        boost: Vector3::ZERO,
    };

    pub fn acceleration(acceleration: Vector3) -> Self {
        Self {
            acceleration,
            boost: Vector3::ZERO,
        }
    }

    pub fn boost(boost: Vector3) -> Self {
        Self {
            acceleration: Vector3::ZERO,
            boost,
        }
    }

    pub fn cancel_on_axis(&mut self, axis: Vector3) {
        self.acceleration = self.acceleration.reject_from(axis);
        self.boost = self.boost.reject_from(axis);
    }

    /// The velocity change this would amount to over a single frame of the given duration.
    pub fn calc_delta(&self, frame_duration: Float) -> Vector3 {
        self.boost + self.acceleration * frame_duration
    }
}

impl Default for ParkourVelChange {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add<ParkourVelChange> for ParkourVelChange {
    type Output = ParkourVelChange;

    fn add(self, rhs: ParkourVelChange) -> Self::Output {
        Self::Output {
            acceleration: self.acceleration + rhs.acceleration,
            boost: self.boost + rhs.boost,
        }
    }
}

impl AddAssign for ParkourVelChange {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// A spring constraint the backend should maintain between the rigid body and a world anchor.
///
/// Used for swinging. The backend creates the engine's joint when this appears on the motor,
/// updates it while the parameters change, and removes the joint when the field goes back to
/// `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParkourSpringConstraint {
    /// The world-space point the cable is attached to.
    pub anchor: Vector3,
    /// The cable length below which the spring pushes the body away from the anchor.
    pub min_distance: Float,
    /// The cable length above which the spring pulls the body toward the anchor.
    pub max_distance: Float,
    pub spring: Float,
    pub damper: Float,
    pub mass_scale: Float,
}

/// Instructions on how to move the rigid body, produced during
/// [`ParkourPipelineStages::Logic`](crate::ParkourPipelineStages::Logic) and consumed by the
/// physics backend during [`ParkourPipelineStages::Motors`](crate::ParkourPipelineStages::Motors).
///
/// The controller rewrites the entire motor every frame, so a backend should treat each frame's
/// contents as the complete current directive set. The expected application order is:
///
/// 1. [`set_velocity`](Self::set_velocity), then [`set_vertical_velocity`](Self::set_vertical_velocity)
/// 2. [`lin`](Self::lin) - boost as an instantaneous velocity change, acceleration as a force
/// 3. the engine's own gravity, unless [`use_gravity`](Self::use_gravity) is `false`
/// 4. the speed caps, clamping the velocity that came out of the integration
/// 5. [`drag`](Self::drag) as the linear damping for this frame
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ParkourMotor {
    /// Continuous and instantaneous changes to the linear velocity.
    pub lin: ParkourVelChange,
    /// When set, hard-overwrite the full velocity before anything else is applied.
    pub set_velocity: Option<Vector3>,
    /// When set, hard-overwrite the vertical velocity component before forces are applied.
    pub set_vertical_velocity: Option<Float>,
    /// Whether the engine's gravity should act on the rigid body this frame.
    pub use_gravity: bool,
    /// Linear damping for this frame. Zero while airborne or in traversal so that forces are not
    /// dampened.
    pub drag: Float,
    /// Clamp the horizontal velocity components to this magnitude, leaving the vertical
    /// component untouched.
    pub horizontal_speed_cap: Option<Float>,
    /// Clamp the full 3-D velocity to this magnitude. Used on slopes.
    pub full_speed_cap: Option<Float>,
    /// Clamp upward vertical velocity to this ceiling.
    pub vertical_speed_cap: Option<Float>,
    /// Vertical scale of the character's collision shape - 1.0 when standing, lower while
    /// crouching or sliding.
    pub collider_height_scale: Float,
    /// Spring constraint to maintain while swinging.
    pub spring: Option<ParkourSpringConstraint>,
}

impl Default for ParkourMotor {
    fn default() -> Self {
        Self {
            lin: ParkourVelChange::ZERO,
            set_velocity: None,
            set_vertical_velocity: None,
            use_gravity: true,
            drag: 0.0,
            horizontal_speed_cap: None,
            full_speed_cap: None,
            vertical_speed_cap: None,
            collider_height_scale: 1.0,
            spring: None,
        }
    }
}
