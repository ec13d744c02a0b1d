use bevy::prelude::*;

use bevy_parkour::abilities::WallSide;
use bevy_parkour::math::{Float, Vector3};
use bevy_parkour::prelude::*;
use bevy_parkour::util::{launch_velocity_for_arc, ArcError};
use bevy_parkour::{
    update_sensor_suite, AbilityRequest, ModeIntents, ParkourLayers,
    ParkourProximitySensorOutput, ParkourSpatialExt,
};

const FRAME: Float = 1.0 / 60.0;
const GRAVITY: Float = -9.81;
const HALF_HEIGHT: Float = 1.0;
const BODY_RADIUS: Float = 0.3;

/// Axis-aligned test geometry for the fake spatial backend.
enum Geometry {
    /// Infinite horizontal plane at the given height, normal up.
    Floor { y: Float },
    /// Infinite vertical plane `x = x`, normal along the sign of `normal_x`.
    WallX { x: Float, normal_x: Float },
    /// Infinite vertical plane `z = z`, normal along the sign of `normal_z`.
    WallZ { z: Float, normal_z: Float },
    /// Tilted plane through `point` with the given unit normal.
    Slope { point: Vector3, normal: Vector3 },
}

struct Surface {
    entity: Entity,
    geometry: Geometry,
    layers: ParkourLayers,
}

impl Surface {
    fn plane(&self) -> (Vector3, Vector3) {
        match self.geometry {
            Geometry::Floor { y } => (Vector3::new(0.0, y, 0.0), Vector3::Y),
            Geometry::WallX { x, normal_x } => (
                Vector3::new(x, 0.0, 0.0),
                Vector3::new(normal_x.signum(), 0.0, 0.0),
            ),
            Geometry::WallZ { z, normal_z } => (
                Vector3::new(0.0, 0.0, z),
                Vector3::new(0.0, 0.0, normal_z.signum()),
            ),
            Geometry::Slope { point, normal } => (point, normal),
        }
    }
}

/// A deterministic physics double: a handful of infinite planes, plus an analytic application
/// of the motor in [`Rig::tick`].
struct TestWorld {
    entities: World,
    surfaces: Vec<Surface>,
}

impl TestWorld {
    fn new() -> Self {
        Self {
            entities: World::new(),
            surfaces: Vec::new(),
        }
    }

    fn add(&mut self, geometry: Geometry, layers: ParkourLayers) -> Entity {
        let entity = self.entities.spawn_empty().id();
        self.surfaces.push(Surface {
            entity,
            geometry,
            layers,
        });
        entity
    }
}

impl ParkourSpatialExt for TestWorld {
    fn cast_ray(
        &self,
        origin: Vector3,
        direction: Dir3,
        max_range: Float,
        layers: ParkourLayers,
    ) -> Option<ParkourProximitySensorOutput> {
        let direction = *direction;
        let mut nearest: Option<ParkourProximitySensorOutput> = None;
        for surface in &self.surfaces {
            if !surface.layers.intersects(layers) {
                continue;
            }
            let (point, normal) = surface.plane();
            let denom = direction.dot(normal);
            if -1.0e-6 < denom {
                // Back side or parallel.
                continue;
            }
            let t = (point - origin).dot(normal) / denom;
            if t < 0.0 || max_range < t {
                continue;
            }
            if nearest.as_ref().is_none_or(|hit| t < hit.proximity) {
                nearest = Some(ParkourProximitySensorOutput {
                    entity: surface.entity,
                    point: origin + direction * t,
                    normal,
                    proximity: t,
                });
            }
        }
        nearest
    }

    fn cast_sphere(
        &self,
        origin: Vector3,
        direction: Dir3,
        radius: Float,
        max_range: Float,
        layers: ParkourLayers,
    ) -> Option<ParkourProximitySensorOutput> {
        // Good enough for infinite planes: a sphere cast is a ray cast with extended reach.
        self.cast_ray(origin, direction, max_range + radius, layers)
    }
}

/// A controller wired to the fake backend, ticked by hand.
struct Rig {
    controller: ParkourController,
    tracker: ParkourRigidBodyTracker,
    sensors: ParkourSensorSuite,
    controls: ParkourControls,
    motor: ParkourMotor,
    camera: ParkourCameraSignals,
    world: TestWorld,
    settled_last_tick: bool,
}

impl Rig {
    fn new(world: TestWorld, translation: Vector3) -> Self {
        let mut tracker = ParkourRigidBodyTracker::default();
        tracker.translation = translation;
        tracker.gravity = Vector3::new(0.0, GRAVITY, 0.0);
        let mut controls = ParkourControls::default();
        controls.eye_position = translation;
        Self {
            controller: ParkourController::new(ParkourControllerConfig::default()),
            tracker,
            sensors: ParkourSensorSuite::default(),
            controls,
            motor: ParkourMotor::default(),
            camera: ParkourCameraSignals::default(),
            world,
            settled_last_tick: false,
        }
    }

    fn tick(&mut self) {
        self.controller
            .prepare_sensors(&mut self.sensors, &self.tracker, &self.controls);
        update_sensor_suite(&mut self.sensors, &self.world);
        self.controller.tick(
            FRAME,
            &self.tracker,
            &self.sensors,
            &self.controls,
            &mut self.motor,
            &mut self.camera,
        );
        self.apply_motor();
        self.tracker.just_collided = false;
        self.settle_against_geometry();
    }

    fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Apply the motor exactly in the order its docs prescribe.
    fn apply_motor(&mut self) {
        let motor = &self.motor;
        let velocity = &mut self.tracker.velocity;
        if let Some(overwrite) = motor.set_velocity {
            *velocity = overwrite;
        }
        if let Some(vertical) = motor.set_vertical_velocity {
            velocity.y = vertical;
        }
        *velocity += motor.lin.boost;
        *velocity += motor.lin.acceleration * FRAME;
        if motor.use_gravity {
            *velocity += self.tracker.gravity * FRAME;
        }
        if let Some(cap) = motor.full_speed_cap {
            *velocity = velocity.clamp_length_max(cap);
        }
        if let Some(cap) = motor.horizontal_speed_cap {
            let flat = Vector3::new(velocity.x, 0.0, velocity.z);
            if cap < flat.length() {
                let limited = flat.normalize_or_zero() * cap;
                velocity.x = limited.x;
                velocity.z = limited.z;
            }
        }
        if let Some(cap) = motor.vertical_speed_cap {
            if cap < velocity.y {
                velocity.y = cap;
            }
        }
        *velocity /= 1.0 + motor.drag * FRAME;
        self.tracker.translation += *velocity * FRAME;
    }

    /// Minimal contact response so the character can stand on floors and slopes and cannot
    /// push through walls. A settle that begins on this tick counts as a collision-enter.
    fn settle_against_geometry(&mut self) {
        let translation = &mut self.tracker.translation;
        let velocity = &mut self.tracker.velocity;
        let mut settled = false;
        for surface in &self.world.surfaces {
            match surface.geometry {
                Geometry::Floor { y } => {
                    let feet = translation.y - HALF_HEIGHT;
                    if feet < y && velocity.y <= 0.0 {
                        translation.y = y + HALF_HEIGHT;
                        velocity.y = 0.0;
                        settled = true;
                    }
                }
                Geometry::Slope { point, normal } => {
                    // Distance to the plane measured straight down, like the ground probe.
                    let vertical_reach = (*translation - point).dot(normal) / normal.y;
                    if vertical_reach < HALF_HEIGHT {
                        translation.y += HALF_HEIGHT - vertical_reach;
                        let into_plane = velocity.dot(normal);
                        if into_plane < 0.0 {
                            *velocity -= normal * into_plane;
                        }
                        settled = true;
                    }
                }
                Geometry::WallX { x, normal_x } => {
                    if 0.0 < normal_x {
                        if translation.x < x + BODY_RADIUS {
                            translation.x = x + BODY_RADIUS;
                            velocity.x = velocity.x.max(0.0);
                            settled = true;
                        }
                    } else if x - BODY_RADIUS < translation.x {
                        translation.x = x - BODY_RADIUS;
                        velocity.x = velocity.x.min(0.0);
                        settled = true;
                    }
                }
                Geometry::WallZ { z, normal_z } => {
                    if 0.0 < normal_z {
                        if translation.z < z + BODY_RADIUS {
                            translation.z = z + BODY_RADIUS;
                            velocity.z = velocity.z.max(0.0);
                            settled = true;
                        }
                    } else if z - BODY_RADIUS < translation.z {
                        translation.z = z - BODY_RADIUS;
                        velocity.z = velocity.z.min(0.0);
                        settled = true;
                    }
                }
            }
        }
        if settled && !self.settled_last_tick {
            self.tracker.just_collided = true;
        }
        self.settled_last_tick = settled;
    }
}

fn flat_ground_rig() -> Rig {
    let mut world = TestWorld::new();
    world.add(Geometry::Floor { y: 0.0 }, ParkourLayers::GROUND);
    let mut rig = Rig::new(world, Vector3::new(0.0, HALF_HEIGHT, 0.0));
    // One settling tick so the ground probe and drag state are warm.
    rig.tick();
    rig
}

#[test]
fn exactly_one_mode_is_resolved() {
    let all = [
        AbilityRequest::Swing,
        AbilityRequest::Grapple,
        AbilityRequest::Dash,
        AbilityRequest::Freeze,
        AbilityRequest::Unlimited,
        AbilityRequest::Climb,
        AbilityRequest::WallRun,
        AbilityRequest::Slide,
    ];
    let expected = [
        MovementState::Swinging,
        MovementState::Grappling,
        MovementState::Dashing,
        MovementState::Freeze,
        MovementState::Unlimited,
        MovementState::Climbing,
        MovementState::WallRunning,
        MovementState::Sliding,
    ];

    // Even with every contributor requesting control at once, resolution picks the single
    // highest-priority mode - and removing the winner promotes the next one, in order.
    for skip in 0..=all.len() {
        let mut intents = ModeIntents::default();
        for request in &all[skip..] {
            intents.submit(*request);
        }
        let resolved = intents.resolve(true, false, false);
        if skip < all.len() {
            assert_eq!(resolved, expected[skip]);
        } else {
            assert_eq!(resolved, MovementState::Walking);
        }
    }

    // With no requests at all, resolution falls through the key-driven states.
    let intents = ModeIntents::default();
    assert_eq!(intents.resolve(true, true, false), MovementState::Sprinting);
    assert_eq!(intents.resolve(true, true, true), MovementState::Crouching);
    assert_eq!(intents.resolve(false, false, false), MovementState::Air);
}

#[test]
fn speed_snaps_when_momentum_is_not_preserved() {
    let mut rig = flat_ground_rig();
    assert_eq!(rig.controller.mode(), MovementState::Walking);
    let walk_speed = rig.controller.config.movement.walk_speed;
    assert_eq!(rig.controller.state.current_speed, walk_speed);

    // Ordinary transitions snap within a single tick - no multi-tick ramp.
    rig.controls.sprint.update(true);
    rig.tick();
    let sprint_speed = rig.controller.config.movement.sprint_speed;
    assert_eq!(rig.controller.mode(), MovementState::Sprinting);
    assert_eq!(rig.controller.state.current_speed, sprint_speed);

    rig.controls.sprint.update(false);
    rig.tick();
    assert_eq!(rig.controller.state.current_speed, walk_speed);
}

#[test]
fn leaving_a_dash_ramps_speed_monotonically() {
    let mut rig = flat_ground_rig();
    rig.controls.dash.update(true);
    rig.tick();
    rig.controls.dash.update(false);
    assert_eq!(rig.controller.mode(), MovementState::Dashing);
    let dash_speed = rig.controller.config.movement.dash_speed;
    assert_eq!(rig.controller.state.current_speed, dash_speed);

    // Let the dash run out.
    let duration_ticks = (rig.controller.config.dash.dash_duration / FRAME).ceil() as usize + 1;
    rig.run(duration_ticks);
    assert_ne!(rig.controller.mode(), MovementState::Dashing);

    // The excess speed bleeds off monotonically toward the walk speed, never overshooting.
    let walk_speed = rig.controller.config.movement.walk_speed;
    let mut previous = rig.controller.state.current_speed;
    let mut reached = false;
    for _ in 0..600 {
        rig.tick();
        let current = rig.controller.state.current_speed;
        assert!(current <= previous + 1.0e-4, "speed ramp went back up");
        assert!(walk_speed <= current + 1.0e-4, "speed ramp overshot the target");
        previous = current;
        if (current - walk_speed).abs() < 1.0e-4 {
            reached = true;
            break;
        }
    }
    assert!(reached, "speed ramp never converged on the target");
}

#[test]
fn slope_slide_ramps_speed_upward_monotonically() {
    let mut world = TestWorld::new();
    let normal = Vector3::new(0.0, 30.0_f32.to_radians().cos(), -30.0_f32.to_radians().sin());
    world.add(
        Geometry::Slope {
            point: Vector3::ZERO,
            normal,
        },
        ParkourLayers::GROUND,
    );
    let mut rig = Rig::new(world, Vector3::new(0.0, HALF_HEIGHT, 0.0));
    rig.tick();
    assert!(rig.controller.state.on_slope);

    rig.controls.move_axes = Vec2::new(0.0, 1.0);
    rig.controls.crouch.update(true);
    rig.tick();
    assert_eq!(rig.controller.mode(), MovementState::Sliding);

    let slide_speed = rig.controller.config.movement.slide_speed;
    let mut previous = rig.controller.state.current_speed;
    let mut reached = false;
    for _ in 0..600 {
        rig.tick();
        if rig.controller.mode() != MovementState::Sliding {
            break;
        }
        let current = rig.controller.state.current_speed;
        assert!(previous <= current + 1.0e-4, "slide ramp lost speed");
        assert!(current <= slide_speed + 1.0e-4, "slide ramp overshot its cap");
        previous = current;
        if (current - slide_speed).abs() < 1.0e-4 {
            reached = true;
            break;
        }
    }
    assert!(reached, "slide ramp never converged on the slope cap");
}

#[test]
fn launch_arc_reaches_apex_before_landing_on_target() {
    let start = Vector3::ZERO;
    let end = Vector3::new(10.0, 0.0, 0.0);
    let apex = 5.0;
    let velocity = launch_velocity_for_arc(start, end, apex, GRAVITY).unwrap();

    // Integrated analytically under constant gravity: the peak must reach the apex height, and
    // the horizontal displacement at landing time must be exactly the target.
    let peak = velocity.y * velocity.y / (-2.0 * GRAVITY);
    assert!((peak - apex).abs() < 1.0e-4);

    let time_up = velocity.y / -GRAVITY;
    let time_down = (2.0 * apex / -GRAVITY).sqrt();
    let time_of_flight = time_up + time_down;
    let landing = start + Vector3::new(velocity.x, 0.0, velocity.z) * time_of_flight;
    assert!((landing - end).length() < 1.0e-3);

    // The apex is reached before the horizontal displacement is covered.
    assert!(time_up < time_of_flight);
}

#[test]
fn launch_arc_degenerate_cases_never_produce_nan() {
    // An apex below the required climb has no real solution - callers get an error, not NaN.
    assert_eq!(
        launch_velocity_for_arc(Vector3::ZERO, Vector3::new(0.0, 10.0, 0.0), 5.0, GRAVITY),
        Err(ArcError::ApexBelowClimb),
    );
    assert_eq!(
        launch_velocity_for_arc(Vector3::ZERO, Vector3::X, 0.0, GRAVITY),
        Err(ArcError::ApexNotPositive),
    );
    assert_eq!(
        launch_velocity_for_arc(Vector3::ZERO, Vector3::X, 1.0, 0.0),
        Err(ArcError::NonDownwardGravity),
    );

    // A target far below the start works with the fallback overshoot apex.
    let velocity =
        launch_velocity_for_arc(Vector3::ZERO, Vector3::new(5.0, -30.0, 0.0), 2.0, GRAVITY)
            .unwrap();
    assert!(velocity.is_finite());
    assert!(0.0 < velocity.y);
}

#[test]
fn slide_requires_directional_input() {
    let mut rig = flat_ground_rig();
    rig.controls.crouch.update(true);
    rig.tick();
    assert!(!rig.controller.slide.active());
    assert_eq!(rig.controller.mode(), MovementState::Crouching);
    rig.controls.crouch.update(false);
    rig.tick();

    rig.controls.move_axes = Vec2::new(0.0, 1.0);
    rig.controls.crouch.update(true);
    rig.tick();
    assert!(rig.controller.slide.active());
    assert_eq!(rig.controller.mode(), MovementState::Sliding);
}

#[test]
fn wall_run_picks_exactly_one_wall() {
    let mut world = TestWorld::new();
    world.add(Geometry::Floor { y: 0.0 }, ParkourLayers::GROUND);
    world.add(
        Geometry::WallX {
            x: 0.5,
            normal_x: -1.0,
        },
        ParkourLayers::WALL,
    );
    world.add(
        Geometry::WallX {
            x: -0.5,
            normal_x: 1.0,
        },
        ParkourLayers::WALL,
    );
    let mut rig = Rig::new(world, Vector3::new(0.0, 4.0, 0.0));
    rig.controls.move_axes = Vec2::new(0.0, 1.0);
    rig.tick();

    // Both side probes hit - the tie-break must hand the run to a single wall.
    assert!(rig.sensors.wall_left.output.is_some());
    assert!(rig.sensors.wall_right.output.is_some());
    assert_eq!(rig.controller.mode(), MovementState::WallRunning);
    assert_eq!(rig.controller.wall_run.side(), Some(WallSide::Right));
}

#[test]
fn wall_run_keeps_the_previously_active_side() {
    let mut world = TestWorld::new();
    world.add(Geometry::Floor { y: 0.0 }, ParkourLayers::GROUND);
    world.add(
        Geometry::WallX {
            x: -0.5,
            normal_x: 1.0,
        },
        ParkourLayers::WALL,
    );
    let mut rig = Rig::new(world, Vector3::new(0.0, 4.0, 0.0));
    rig.controls.move_axes = Vec2::new(0.0, 1.0);
    rig.run(2);
    assert_eq!(rig.controller.wall_run.side(), Some(WallSide::Left));

    // A second wall appearing on the right must not steal an ongoing left-wall run.
    rig.world.add(
        Geometry::WallX {
            x: 0.5,
            normal_x: -1.0,
        },
        ParkourLayers::WALL,
    );
    rig.run(2);
    assert!(rig.sensors.wall_right.output.is_some());
    assert_eq!(rig.controller.wall_run.side(), Some(WallSide::Left));
}

#[test]
fn wall_run_timeout_opens_the_exit_window_once() {
    let mut world = TestWorld::new();
    world.add(Geometry::Floor { y: 0.0 }, ParkourLayers::GROUND);
    world.add(
        Geometry::WallX {
            x: 0.5,
            normal_x: -1.0,
        },
        ParkourLayers::WALL,
    );
    let mut rig = Rig::new(world, Vector3::new(0.0, 6.0, 0.0));
    rig.controls.move_axes = Vec2::new(0.0, 1.0);
    rig.tick();
    assert!(rig.controller.wall_run.active());

    // Run the timer out.
    let limit_ticks = (rig.controller.config.wall_run.max_wall_run_time / FRAME).ceil() as usize;
    rig.run(limit_ticks + 1);
    assert!(!rig.controller.wall_run.active());
    assert!(rig.controller.wall_run.exiting());

    // The wall is still there and input is still held, but re-attachment has to wait for the
    // exit window to close - and once it does, the run starts again.
    let exit_ticks = (rig.controller.config.wall_run.exit_wall_time / FRAME).ceil() as usize;
    for _ in 0..exit_ticks - 2 {
        rig.tick();
        assert!(!rig.controller.wall_run.active());
    }
    rig.run(4);
    assert!(rig.controller.wall_run.active());
}

#[test]
fn ledge_release_suppresses_regrabbing_the_same_ledge() {
    let mut world = TestWorld::new();
    world.add(
        Geometry::WallZ {
            z: -2.0,
            normal_z: 1.0,
        },
        ParkourLayers::LEDGE,
    );
    let mut rig = Rig::new(world, Vector3::new(0.0, 10.0, 0.0));
    rig.tick();
    assert!(rig.controller.ledge_grab.holding());
    assert!(matches!(
        rig.controller.mode(),
        MovementState::Unlimited | MovementState::Freeze
    ));

    // Hang past the minimum hold time, then steer away to release.
    let hold_ticks =
        (rig.controller.config.ledge_grab.min_time_on_ledge / FRAME).ceil() as usize + 2;
    rig.run(hold_ticks);
    assert!(rig.controller.ledge_grab.holding());
    rig.controls.move_axes = Vec2::new(0.0, 1.0);
    rig.tick();
    assert!(!rig.controller.ledge_grab.holding());
    rig.controls.move_axes = Vec2::ZERO;
    rig.tracker.velocity = Vector3::ZERO;

    // Still aimed at the very same ledge, well within grab distance - but the identity is
    // suppressed for the clear delay, so no re-grab happens.
    let clear_ticks =
        (rig.controller.config.ledge_grab.last_ledge_clear_delay / FRAME) as usize - 2;
    for _ in 0..clear_ticks {
        rig.tick();
        assert!(
            !rig.controller.ledge_grab.holding(),
            "re-grabbed the released ledge inside the suppression window"
        );
    }

    // Once the identity clears, the same ledge becomes grabbable again.
    rig.run(10);
    assert!(rig.controller.ledge_grab.holding());
}

#[test]
fn speed_control_clamps_horizontal_but_not_vertical_velocity() {
    let mut rig = flat_ground_rig();
    let current_speed = rig.controller.state.current_speed;
    rig.tracker.velocity = Vector3::new(50.0, 20.0, 0.0);
    rig.tick();

    let flat = Vector3::new(rig.tracker.velocity.x, 0.0, rig.tracker.velocity.z);
    assert!(flat.length() <= current_speed + 1.0e-3);
    // The vertical component is only touched by gravity and drag here - never by the clamp.
    assert!(15.0 < rig.tracker.velocity.y);
}

#[test]
fn dash_imposes_a_vertical_speed_ceiling() {
    let mut rig = flat_ground_rig();
    rig.controls.dash.update(true);
    rig.tick();
    rig.controls.dash.update(false);
    rig.run(2);
    assert!(rig.controller.dash.active());

    let ceiling = rig.controller.config.dash.max_dash_y_speed;
    rig.tracker.velocity.y = ceiling * 2.0;
    rig.tick();
    assert!(rig.tracker.velocity.y <= ceiling);

    // Ordinary movement never has a vertical ceiling.
    let duration_ticks = (rig.controller.config.dash.dash_duration / FRAME).ceil() as usize;
    rig.run(duration_ticks + 1);
    assert!(!rig.controller.dash.active());
    assert_eq!(rig.controller.state.max_vertical_speed, None);
}

#[test]
fn dash_is_refused_while_wall_running() {
    let mut world = TestWorld::new();
    world.add(Geometry::Floor { y: 0.0 }, ParkourLayers::GROUND);
    world.add(
        Geometry::WallX {
            x: 0.5,
            normal_x: -1.0,
        },
        ParkourLayers::WALL,
    );
    let mut rig = Rig::new(world, Vector3::new(0.0, 4.0, 0.0));
    rig.controls.move_axes = Vec2::new(0.0, 1.0);
    rig.run(2);
    assert!(rig.controller.wall_run.active());

    rig.controls.dash.update(true);
    rig.tick();
    rig.controls.dash.update(false);
    assert!(!rig.controller.dash.active());
    assert_eq!(rig.controller.mode(), MovementState::WallRunning);
}

#[test]
fn climbing_pins_vertical_velocity() {
    let mut world = TestWorld::new();
    world.add(Geometry::Floor { y: 0.0 }, ParkourLayers::GROUND);
    world.add(
        Geometry::WallZ {
            z: -0.5,
            normal_z: 1.0,
        },
        ParkourLayers::LADDER,
    );
    let mut rig = Rig::new(world, Vector3::new(0.0, HALF_HEIGHT, 0.0));
    rig.controls.move_axes = Vec2::new(0.0, 1.0);
    rig.run(2);

    assert!(rig.controller.climb.active());
    assert_eq!(rig.controller.mode(), MovementState::Climbing);
    assert_eq!(
        rig.motor.set_vertical_velocity,
        Some(rig.controller.config.climb.climb_speed),
    );
}

#[test]
fn jump_zeroes_vertical_velocity_and_respects_the_cooldown() {
    let mut rig = flat_ground_rig();
    rig.tracker.velocity.y = -3.0;
    rig.controls.jump.update(true);
    rig.tick();
    rig.controls.jump.update(false);

    // The old downward velocity must not eat into the jump impulse. Gravity and ground drag
    // still act on the launch tick, so the result sits a little under the raw impulse.
    let jump_force = rig.controller.config.movement.jump_force;
    assert_eq!(rig.motor.set_vertical_velocity, Some(0.0));
    assert!(10.0 < rig.tracker.velocity.y && rig.tracker.velocity.y <= jump_force);

    // Landing again within the cooldown does not allow another jump.
    rig.tracker.translation.y = HALF_HEIGHT;
    rig.tracker.velocity = Vector3::ZERO;
    rig.controls.jump.update(true);
    rig.tick();
    assert!(rig.motor.lin.boost.y.abs() < 1.0e-6);
}

#[test]
fn grapple_launches_along_the_computed_arc_and_clears_on_contact() {
    let mut world = TestWorld::new();
    world.add(Geometry::Floor { y: 0.0 }, ParkourLayers::GROUND);
    world.add(
        Geometry::WallZ {
            z: -10.0,
            normal_z: 1.0,
        },
        ParkourLayers::GRAPPLE,
    );
    let mut rig = Rig::new(world, Vector3::new(0.0, HALF_HEIGHT, 0.0));
    rig.tick();

    rig.controls.grapple.update(true);
    rig.tick();
    rig.controls.grapple.update(false);
    assert!(rig.controller.grapple.grappling());
    assert!(!rig.controller.flight_active());

    // After the rope delay the flight launches; after the launch delay the velocity is set.
    let delay_ticks = (rig.controller.config.grapple.grapple_delay_time / FRAME).ceil() as usize;
    rig.run(delay_ticks + 1);
    assert!(rig.controller.flight_active());
    let launch_ticks = (0.1 / FRAME).ceil() as usize;
    rig.run(launch_ticks + 1);
    assert_eq!(rig.controller.mode(), MovementState::Grappling);
    assert!(0.0 < rig.tracker.velocity.y, "grapple launch must rise");
    // While the flight is active the speed caps are lifted entirely.
    assert_eq!(rig.motor.horizontal_speed_cap, None);
    assert_eq!(rig.motor.full_speed_cap, None);

    // Fly until the first contact - the flight must clear and the hook must retract.
    let mut cleared = false;
    for _ in 0..600 {
        rig.tick();
        if !rig.controller.flight_active() {
            cleared = true;
            break;
        }
    }
    assert!(cleared, "flight never cleared");
    assert!(!rig.controller.grapple.grappling());
}

#[test]
fn starting_a_swing_cancels_an_active_grapple() {
    let mut world = TestWorld::new();
    world.add(Geometry::Floor { y: 0.0 }, ParkourLayers::GROUND);
    world.add(
        Geometry::WallZ {
            z: -10.0,
            normal_z: 1.0,
        },
        ParkourLayers::GRAPPLE,
    );
    let mut rig = Rig::new(world, Vector3::new(0.0, HALF_HEIGHT, 0.0));
    rig.tick();

    rig.controls.grapple.update(true);
    rig.tick();
    rig.controls.grapple.update(false);
    assert!(rig.controller.grapple.grappling());

    rig.controls.swing.update(true);
    rig.tick();
    assert!(rig.controller.swing.active());
    assert!(!rig.controller.grapple.grappling());
    assert_eq!(rig.controller.mode(), MovementState::Swinging);
    // The cable constraint is on the motor for the backend to maintain.
    let spring = rig.motor.spring.expect("swing must install the constraint");
    assert_eq!(spring.anchor, Vector3::new(0.0, HALF_HEIGHT, -10.0));
    assert!(spring.min_distance < spring.max_distance);

    rig.controls.swing.update(false);
    rig.tick();
    rig.tick();
    assert!(!rig.controller.swing.active());
    assert_eq!(rig.motor.spring, None);
}

#[test]
fn configs_round_trip_through_ron() {
    let config = ParkourControllerConfig {
        movement: ParkourMovementConfig {
            walk_speed: 42.0,
            ..Default::default()
        },
        ..Default::default()
    };

    let serialized = ron::to_string(&config).expect("Unable to serialize the configuration");
    let deserialized: ParkourControllerConfig =
        ron::from_str(&serialized).expect("Unable to deserialize the configuration");

    assert_eq!(deserialized.movement.walk_speed, 42.0);
    assert_eq!(
        deserialized.wall_run.max_wall_run_time,
        config.wall_run.max_wall_run_time,
    );
}
