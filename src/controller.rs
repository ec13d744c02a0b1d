use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::abilities::{
    AbilityContext, ParkourClimb, ParkourClimbConfig, ParkourDash, ParkourDashConfig,
    ParkourGrapple, ParkourGrappleConfig, ParkourLedgeGrab, ParkourLedgeGrabConfig, ParkourSlide,
    ParkourSlideConfig, ParkourSwing, ParkourSwingConfig, ParkourWallRun, ParkourWallRunConfig,
};
use crate::camera_fx::ParkourCameraSignals;
use crate::math::{Float, Vector3};
use crate::movement_state::{AbilityRequest, ModeIntents, MovementState};
use crate::util::{launch_velocity_for_arc, ArcError, OneShot};
use crate::{
    ParkourControls, ParkourLayers, ParkourMotor, ParkourPipelineStages, ParkourProximitySensor,
    ParkourRigidBodyTracker, ParkourSensorSuite, ParkourSystemSet, ParkourUserControlsSystemSet,
};

/// Speed cap used while another mechanic lifts the limit entirely.
const UNLIMITED_SPEED: Float = 999.0;

/// Delay between a flight launch request and the velocity actually being set.
const LAUNCH_DELAY: Float = 0.1;

/// A flight that got stuck somewhere releases the character after this long.
const FLIGHT_TIMEOUT: Float = 3.0;

pub struct ParkourControllerPlugin;

impl Plugin for ParkourControllerPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                ParkourPipelineStages::Sensors,
                ParkourUserControlsSystemSet,
                ParkourPipelineStages::Logic,
                ParkourPipelineStages::Motors,
            )
                .chain()
                .in_set(ParkourSystemSet),
        );
        app.add_systems(
            Update,
            apply_controller_system.in_set(ParkourPipelineStages::Logic),
        );
    }
}

/// Tuning for the locomotion state machine itself. Supplied once at spawn, never mutated by the
/// controller.
#[derive(Clone, Serialize, Deserialize)]
pub struct ParkourMovementConfig {
    pub walk_speed: Float,
    pub sprint_speed: Float,
    pub crouch_speed: Float,
    /// Speed cap while sliding down a slope.
    pub slide_speed: Float,
    pub wallrun_speed: Float,
    /// Horizontal speed cap while climbing.
    pub climb_speed: Float,
    pub dash_speed: Float,
    /// Speed cap while swinging in the air.
    pub swing_speed: Float,
    /// Base rate of the smooth speed transition.
    pub speed_increase_multiplier: Float,
    /// Additional transition rate factor on slopes. Steeper slopes converge even faster.
    pub slope_increase_multiplier: Float,
    /// Transition rate used when leaving a dash, so the excess speed bleeds off quickly.
    pub dash_speed_change_factor: Float,
    /// Linear damping while grounded.
    pub ground_drag: Float,
    pub jump_force: Float,
    pub jump_cooldown: Float,
    /// Fraction of the movement force that remains available in the air.
    pub air_multiplier: Float,
    /// Vertical collider scale while crouching.
    pub crouch_y_scale: Float,
    /// Downward impulse when the crouch key is pressed, to snap onto the ground.
    pub crouch_down_impulse: Float,
    /// Full height of the character's collider.
    pub player_height: Float,
    /// Extra reach of the ground probe beyond the half height.
    pub ground_probe_margin: Float,
    /// Extra reach of the slope probe beyond the half height. Slightly longer than the ground
    /// probe so slopes register before the ground does.
    pub slope_probe_margin: Float,
    /// Surfaces steeper than this many degrees are walls, not slopes.
    pub max_slope_angle: Float,
    /// Movement force per unit of speed on flat ground.
    pub ground_force_multiplier: Float,
    /// Movement force per unit of speed on slopes.
    pub slope_force_multiplier: Float,
    /// Downward force keeping the character stuck to a slope while moving up it.
    pub slope_stick_force: Float,
    pub normal_fov: Float,
    pub sprint_fov: Float,
    pub slide_fov: Float,
    pub grapple_fov: Float,
    pub dash_fov: Float,
    pub fov_transition_time: Float,
}

impl Default for ParkourMovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 7.0,
            sprint_speed: 10.0,
            crouch_speed: 3.5,
            slide_speed: 30.0,
            wallrun_speed: 8.5,
            climb_speed: 3.0,
            dash_speed: 20.0,
            swing_speed: 17.0,
            speed_increase_multiplier: 1.5,
            slope_increase_multiplier: 2.5,
            dash_speed_change_factor: 50.0,
            ground_drag: 5.0,
            jump_force: 12.0,
            jump_cooldown: 0.25,
            air_multiplier: 0.4,
            crouch_y_scale: 0.5,
            crouch_down_impulse: 5.0,
            player_height: 2.0,
            ground_probe_margin: 0.2,
            slope_probe_margin: 0.3,
            max_slope_angle: 40.0,
            ground_force_multiplier: 10.0,
            slope_force_multiplier: 20.0,
            slope_stick_force: 80.0,
            normal_fov: 80.0,
            sprint_fov: 85.0,
            slide_fov: 85.0,
            grapple_fov: 90.0,
            dash_fov: 90.0,
            fov_transition_time: 0.2,
        }
    }
}

/// Aggregated tuning for the controller and every contributor.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ParkourControllerConfig {
    pub movement: ParkourMovementConfig,
    pub wall_run: ParkourWallRunConfig,
    pub climb: ParkourClimbConfig,
    pub ledge_grab: ParkourLedgeGrabConfig,
    pub slide: ParkourSlideConfig,
    pub dash: ParkourDashConfig,
    pub grapple: ParkourGrappleConfig,
    pub swing: ParkourSwingConfig,
}

/// An in-progress smooth speed transition.
///
/// Replaces a per-frame coroutine: `elapsed` runs from zero to `difference` at a rate scaled by
/// the boost factor (and further by the slope), and the current speed is the linear
/// interpolation between `from` and the target at `elapsed / difference`. The interpolation
/// parameter only ever grows, so the current speed approaches the target monotonically and
/// never overshoots.
#[derive(Debug, Clone)]
struct SpeedRamp {
    from: Float,
    elapsed: Float,
    difference: Float,
    boost: Float,
}

/// Mutable state of the locomotion state machine.
#[derive(Debug)]
pub struct LocomotionState {
    /// The single movement mode resolved this tick.
    pub mode: MovementState,
    /// The mode resolved on the previous tick.
    pub previous_mode: MovementState,
    /// The speed cap currently in effect.
    pub current_speed: Float,
    /// The speed cap the current mode asks for.
    pub target_speed: Float,
    last_target_speed: Float,
    ramp: Option<SpeedRamp>,
    speed_change_factor: Float,
    keep_momentum: bool,
    /// Transient ceiling on upward speed, imposed by whichever contributor is active.
    pub max_vertical_speed: Option<Float>,
    /// Result of this tick's ground probe.
    pub grounded: bool,
    /// Result of this tick's slope probe.
    pub on_slope: bool,
    pub slope_normal: Vector3,
    exiting_slope: bool,
    jump_cooldown: OneShot,
    slide_decay_speed: Float,
    previous_intents: ModeIntents,
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self {
            mode: MovementState::default(),
            previous_mode: MovementState::default(),
            current_speed: 0.0,
            target_speed: 0.0,
            last_target_speed: 0.0,
            ramp: None,
            speed_change_factor: 1.0,
            keep_momentum: false,
            max_vertical_speed: None,
            grounded: false,
            on_slope: false,
            slope_normal: Vector3::Y,
            exiting_slope: false,
            jump_cooldown: OneShot::idle(),
            slide_decay_speed: 0.0,
            previous_intents: ModeIntents::default(),
        }
    }
}

/// The "jump to position" operation - an assisted ballistic flight toward a target point.
///
/// The grappling hook hands off to this, and launch pads can use it through
/// [`ParkourController::jump_to_position`]. While a flight is active the controller applies no
/// movement forces and no speed caps; the flight ends on the first collision after the launch,
/// or after a timeout.
#[derive(Debug, Default)]
pub struct GrappleFlight {
    active: bool,
    pending_velocity: Option<Vector3>,
    launch_delay: OneShot,
    timeout: OneShot,
    enable_movement_on_next_touch: bool,
}

impl GrappleFlight {
    pub fn active(&self) -> bool {
        self.active
    }

    /// Begin a flight with a precomputed launch velocity.
    pub(crate) fn launch(&mut self, velocity: Vector3) {
        self.active = true;
        self.pending_velocity = Some(velocity);
        self.launch_delay = OneShot::after(LAUNCH_DELAY);
        self.timeout = OneShot::after(FLIGHT_TIMEOUT);
    }

    /// Solve the launch arc and begin the flight. A degenerate arc leaves the flight inert.
    pub(crate) fn jump_to(
        &mut self,
        start: Vector3,
        target: Vector3,
        trajectory_height: Float,
        gravity_y: Float,
    ) {
        match launch_velocity_for_arc(start, target, trajectory_height, gravity_y) {
            Ok(velocity) => self.launch(velocity),
            Err(error) => error!("parkour flight has no ballistic solution: {error}"),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.active = false;
        self.pending_velocity = None;
        self.launch_delay.cancel();
        self.timeout.cancel();
        self.enable_movement_on_next_touch = false;
    }
}

/// The locomotion state machine and its motion mode contributors.
///
/// Each tick the controller probes the ground, runs the contributors' ordered update pass,
/// resolves exactly one [`MovementState`] from their requests, moves the speed cap toward the
/// resolved target, applies movement forces unless a contributor owns the rigid body this tick,
/// and emits the speed caps and drag for the backend.
#[derive(Component, Default)]
pub struct ParkourController {
    pub config: ParkourControllerConfig,
    pub state: LocomotionState,
    pub wall_run: ParkourWallRun,
    pub climb: ParkourClimb,
    pub ledge_grab: ParkourLedgeGrab,
    pub slide: ParkourSlide,
    pub dash: ParkourDash,
    pub grapple: ParkourGrapple,
    pub swing: ParkourSwing,
    flight: GrappleFlight,
}

impl ParkourController {
    pub fn new(config: ParkourControllerConfig) -> Self {
        let mut controller = Self {
            config,
            ..Default::default()
        };
        controller.state.speed_change_factor = controller.config.movement.speed_increase_multiplier;
        controller
    }

    /// The movement mode resolved on the most recent tick.
    pub fn mode(&self) -> MovementState {
        self.state.mode
    }

    pub fn grounded(&self) -> bool {
        self.state.grounded
    }

    /// Whether an assisted flight (grapple launch or launch pad) is in progress.
    pub fn flight_active(&self) -> bool {
        self.flight.active()
    }

    /// Launch the character so that it lands exactly on `target`, peaking `trajectory_height`
    /// above the launch point. Used by the grappling hook and by launch-pad style mechanics.
    pub fn jump_to_position(
        &mut self,
        start: Vector3,
        target: Vector3,
        trajectory_height: Float,
        gravity_y: Float,
    ) -> Result<(), ArcError> {
        let velocity = launch_velocity_for_arc(start, target, trajectory_height, gravity_y)?;
        self.flight.launch(velocity);
        Ok(())
    }

    /// Run one tick of the locomotion state machine. See the struct-level docs for the ordering
    /// contract.
    pub fn tick(
        &mut self,
        frame_duration: Float,
        tracker: &ParkourRigidBodyTracker,
        sensors: &ParkourSensorSuite,
        controls: &ParkourControls,
        motor: &mut ParkourMotor,
        camera: &mut ParkourCameraSignals,
    ) {
        if frame_duration <= 0.0 {
            return;
        }
        let Self {
            config,
            state,
            wall_run,
            climb,
            ledge_grab,
            slide,
            dash,
            grapple,
            swing,
            flight,
        } = self;
        let movement = &config.movement;
        *motor = ParkourMotor::default();

        // Ground and slope probes.
        state.grounded = sensors.ground.output.is_some();
        (state.on_slope, state.slope_normal) = match &sensors.slope.output {
            Some(hit) => {
                let angle = Vector3::Y.angle_between(hit.normal).to_degrees();
                (
                    f32::EPSILON < angle && angle < movement.max_slope_angle,
                    hit.normal,
                )
            }
            None => (false, Vector3::Y),
        };

        if state.jump_cooldown.tick(frame_duration) {
            state.exiting_slope = false;
        }

        // Assisted flight bookkeeping.
        if flight.launch_delay.tick(frame_duration) {
            if let Some(velocity) = flight.pending_velocity.take() {
                motor.set_velocity = Some(velocity);
            }
            flight.enable_movement_on_next_touch = true;
            camera.fov(movement.grapple_fov, movement.fov_transition_time);
        }
        if flight.timeout.tick(frame_duration) {
            flight.reset();
            camera.fov(movement.normal_fov, 0.5);
        }
        if flight.enable_movement_on_next_touch && tracker.just_collided {
            flight.reset();
            grapple.stop(&config.grapple);
            camera.fov(movement.normal_fov, 0.5);
        }

        // The contributors' ordered update pass. Contributors read raw detection state and the
        // previous tick's intents - never the mode being resolved below.
        let ctx = AbilityContext {
            frame_duration,
            tracker,
            sensors,
            controls,
            grounded: state.grounded,
            on_slope: state.on_slope,
            slope_normal: state.slope_normal,
            up: Vector3::Y,
        };
        let mut intents = ModeIntents::default();
        ledge_grab.update(&config.ledge_grab, &ctx, &mut intents, motor);
        climb.update(&config.climb, &ctx, ledge_grab, &mut intents, motor);
        wall_run.update(
            &config.wall_run,
            &ctx,
            ledge_grab,
            movement.normal_fov,
            &mut intents,
            motor,
            camera,
        );
        slide.update(
            &config.slide,
            &ctx,
            &state.previous_intents,
            &mut intents,
            motor,
        );
        dash.update(
            &config.dash,
            &ctx,
            &state.previous_intents,
            wall_run.active(),
            climb.active(),
            movement.dash_fov,
            movement.normal_fov,
            &mut intents,
            motor,
            camera,
        );
        swing.update(
            &config.swing,
            &ctx,
            grapple,
            &config.grapple,
            flight,
            movement.normal_fov,
            &mut intents,
            motor,
            camera,
        );
        grapple.update(&config.grapple, &ctx, swing, flight);
        if flight.active() {
            intents.submit(AbilityRequest::Grapple);
        }

        // Mode resolution - first match in the fixed priority order wins.
        let mode = intents.resolve(state.grounded, controls.sprint.held, controls.crouch.held);

        if mode == MovementState::Unlimited {
            // No transition bookkeeping and no camera reset - another mechanic owns the
            // character and the cap is simply lifted.
            state.ramp = None;
            state.current_speed = UNLIMITED_SPEED;
            state.target_speed = UNLIMITED_SPEED;
            state.last_target_speed = UNLIMITED_SPEED;
            state.keep_momentum = false;
        } else {
            // Target speed per mode.
            let desired = match mode {
                MovementState::Swinging => {
                    if !state.grounded {
                        movement.swing_speed
                    } else if controls.sprint.held {
                        movement.sprint_speed
                    } else {
                        movement.walk_speed
                    }
                }
                MovementState::Grappling => movement.sprint_speed,
                MovementState::Dashing => {
                    state.speed_change_factor = movement.dash_speed_change_factor;
                    movement.dash_speed
                }
                MovementState::Freeze => {
                    motor.set_velocity = Some(Vector3::ZERO);
                    0.0
                }
                MovementState::Unlimited => UNLIMITED_SPEED,
                MovementState::Climbing => movement.climb_speed,
                MovementState::WallRunning => movement.wallrun_speed,
                MovementState::Sliding => {
                    if state.mode != MovementState::Sliding {
                        state.slide_decay_speed = movement.sprint_speed;
                    }
                    if state.on_slope {
                        camera.fov(movement.slide_fov, movement.fov_transition_time);
                        movement.slide_speed
                    } else {
                        state.slide_decay_speed = (state.slide_decay_speed
                            - config.slide.flat_drain_rate * frame_duration)
                            .max(0.0);
                        state.slide_decay_speed
                    }
                }
                MovementState::Crouching => movement.crouch_speed,
                MovementState::Sprinting => {
                    camera.fov(movement.sprint_fov, movement.fov_transition_time);
                    movement.sprint_speed
                }
                MovementState::Walking => movement.walk_speed,
                MovementState::Air => {
                    // Keep whichever speed band the character left the ground with.
                    if state.last_target_speed < movement.sprint_speed {
                        movement.walk_speed
                    } else {
                        movement.sprint_speed
                    }
                }
            };

            if state.grounded
                && mode != MovementState::Dashing
                && mode != MovementState::Sliding
                && !controls.sprint.held
                && !flight.active()
            {
                camera.fov(movement.normal_fov, movement.fov_transition_time);
            }

            // Transition policy: ramp when momentum should be preserved, snap otherwise.
            if state.mode == MovementState::Dashing {
                state.keep_momentum = true;
            }
            if intents.momentum_requested() {
                state.keep_momentum = true;
            }
            if desired != state.last_target_speed {
                if state.keep_momentum {
                    state.ramp = Some(SpeedRamp {
                        from: state.current_speed,
                        elapsed: 0.0,
                        difference: (desired - state.current_speed).abs(),
                        boost: state.speed_change_factor,
                    });
                } else {
                    state.ramp = None;
                    state.current_speed = desired;
                }
            }
            state.target_speed = desired;
            state.last_target_speed = desired;

            // Advance the active ramp. Slopes speed up the convergence, steeper slopes more so.
            if let Some(ramp) = &mut state.ramp {
                let slope_factor = if state.on_slope {
                    let slope_angle = Vector3::Y.angle_between(state.slope_normal).to_degrees();
                    movement.slope_increase_multiplier * (1.0 + slope_angle / 90.0)
                } else {
                    1.0
                };
                ramp.elapsed += frame_duration * ramp.boost * slope_factor;
                if ramp.difference <= ramp.elapsed || ramp.difference <= 0.0 {
                    state.current_speed = desired;
                    state.ramp = None;
                    state.speed_change_factor = movement.speed_increase_multiplier;
                    state.keep_momentum = false;
                } else {
                    state.current_speed =
                        ramp.from + (desired - ramp.from) * (ramp.elapsed / ramp.difference);
                }
            }
            if (desired - state.current_speed).abs() < 0.1 {
                state.keep_momentum = false;
            }
        }

        // Jumping.
        if controls.jump.held
            && !state.jump_cooldown.pending()
            && state.grounded
            && !swing.active()
        {
            state.exiting_slope = true;
            state.jump_cooldown = OneShot::after(movement.jump_cooldown);
            motor.set_vertical_velocity = Some(0.0);
            motor.lin.boost += Vector3::Y * movement.jump_force;
        }

        // Crouching input.
        if controls.crouch.just_pressed {
            motor.lin.boost += Vector3::NEG_Y * movement.crouch_down_impulse;
        }
        motor.collider_height_scale = if slide.active() {
            config.slide.slide_y_scale
        } else if controls.crouch.held {
            movement.crouch_y_scale
        } else {
            1.0
        };

        // Movement force - skipped whenever a contributor owns the rigid body this tick.
        let contributor_owns_body = intents.restricted()
            || climb.exiting()
            || flight.active()
            || swing.active()
            || mode == MovementState::Dashing;
        if !contributor_owns_body {
            let move_direction = controls.move_direction();
            if state.on_slope && !state.exiting_slope {
                let slope_direction = move_direction
                    .reject_from(state.slope_normal)
                    .normalize_or_zero();
                motor.lin.acceleration +=
                    slope_direction * state.current_speed * movement.slope_force_multiplier;
                // Extra down-force so upward velocity does not lift the character off the slope.
                if 0.0 < tracker.velocity.y {
                    motor.lin.acceleration += Vector3::NEG_Y * movement.slope_stick_force;
                }
            } else if state.grounded {
                motor.lin.acceleration += move_direction.normalize_or_zero()
                    * state.current_speed
                    * movement.ground_force_multiplier;
            } else {
                motor.lin.acceleration += move_direction.normalize_or_zero()
                    * state.current_speed
                    * movement.ground_force_multiplier
                    * movement.air_multiplier;
            }
            // Gravity is turned off on slopes so the slope force does not fight it. Wall-running
            // manages gravity itself.
            if !wall_run.active() {
                motor.use_gravity = !state.on_slope;
            }
        }

        // Speed caps. An assisted flight must not have its launch velocity clamped.
        state.max_vertical_speed = intents.vertical_speed_cap();
        if !flight.active() {
            if state.on_slope && !state.exiting_slope {
                motor.full_speed_cap = Some(state.current_speed);
            } else {
                motor.horizontal_speed_cap = Some(state.current_speed);
            }
            motor.vertical_speed_cap = state.max_vertical_speed;
        }

        // Ground drag, except while dashing or being pulled by a grapple.
        motor.drag = if state.grounded && mode != MovementState::Dashing && !flight.active() {
            movement.ground_drag
        } else {
            0.0
        };

        state.previous_mode = state.mode;
        state.mode = mode;
        state.previous_intents = intents;
    }

    /// Write the cast specifications for the next sensors update.
    pub fn prepare_sensors(
        &self,
        sensors: &mut ParkourSensorSuite,
        tracker: &ParkourRigidBodyTracker,
        controls: &ParkourControls,
    ) {
        let movement = &self.config.movement;
        let half_height = movement.player_height * 0.5;
        let origin = tracker.translation;

        aim(&mut sensors.ground, origin, Vector3::NEG_Y);
        sensors.ground.cast_range = half_height + movement.ground_probe_margin;
        sensors.ground.layers = ParkourLayers::GROUND;

        aim(&mut sensors.slope, origin, Vector3::NEG_Y);
        sensors.slope.cast_range = half_height + movement.slope_probe_margin;
        sensors.slope.layers = ParkourLayers::ALL;

        aim(&mut sensors.floor_gap, origin, Vector3::NEG_Y);
        sensors.floor_gap.cast_range = self.config.wall_run.min_jump_height;
        sensors.floor_gap.layers = ParkourLayers::GROUND;

        aim(&mut sensors.wall_left, origin, -controls.right);
        sensors.wall_left.cast_range = self.config.wall_run.wall_check_distance;
        sensors.wall_left.layers = ParkourLayers::WALL;

        aim(&mut sensors.wall_right, origin, controls.right);
        sensors.wall_right.cast_range = self.config.wall_run.wall_check_distance;
        sensors.wall_right.layers = ParkourLayers::WALL;

        aim(&mut sensors.wall_front, origin, controls.forward);
        sensors.wall_front.cast_radius = self.config.climb.sphere_cast_radius;
        sensors.wall_front.cast_range = self.config.climb.detection_length;
        sensors.wall_front.layers = ParkourLayers::LADDER;

        aim(&mut sensors.ledge, origin, controls.eye_forward);
        sensors.ledge.cast_radius = self.config.ledge_grab.sphere_cast_radius;
        sensors.ledge.cast_range = self.config.ledge_grab.detection_length;
        sensors.ledge.layers = ParkourLayers::LEDGE;

        aim(&mut sensors.grapple_ray, controls.eye_position, controls.eye_forward);
        sensors.grapple_ray.cast_range = self.config.grapple.max_grapple_distance;
        sensors.grapple_ray.layers = ParkourLayers::GRAPPLE;

        aim(&mut sensors.swing_ray, controls.eye_position, controls.eye_forward);
        sensors.swing_ray.cast_range = self.config.swing.max_swing_distance;
        sensors.swing_ray.layers = ParkourLayers::GRAPPLE;

        aim(&mut sensors.swing_sphere, controls.eye_position, controls.eye_forward);
        sensors.swing_sphere.cast_radius = self.config.swing.prediction_sphere_cast_radius;
        sensors.swing_sphere.cast_range = self.config.swing.max_swing_distance;
        sensors.swing_sphere.layers = ParkourLayers::GRAPPLE;
    }
}

/// Point a sensor without disturbing its direction when the desired one is degenerate.
fn aim(sensor: &mut ParkourProximitySensor, origin: Vector3, direction: Vector3) {
    sensor.cast_origin = origin;
    if let Ok(direction) = Dir3::new(direction) {
        sensor.cast_direction = direction;
    }
}

#[allow(clippy::type_complexity)]
fn apply_controller_system(
    time: Res<Time>,
    mut query: Query<(
        &mut ParkourController,
        &ParkourRigidBodyTracker,
        &mut ParkourSensorSuite,
        &ParkourControls,
        &mut ParkourMotor,
        &mut ParkourCameraSignals,
    )>,
) {
    let frame_duration = time.delta().as_secs_f32();
    if frame_duration == 0.0 {
        return;
    }
    for (mut controller, tracker, mut sensors, controls, mut motor, mut camera) in query.iter_mut()
    {
        let controller = controller.as_mut();
        controller.tick(
            frame_duration,
            tracker,
            &sensors,
            controls,
            &mut motor,
            &mut camera,
        );
        controller.prepare_sensors(&mut sensors, tracker, controls);
    }
}
