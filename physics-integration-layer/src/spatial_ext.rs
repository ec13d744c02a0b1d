use bevy::prelude::*;

use crate::data_for_backends::{
    ParkourLayers, ParkourProximitySensor, ParkourProximitySensorOutput, ParkourSensorSuite,
};
use crate::math::{Float, Vector3};

/// The spatial queries the parkour controller consumes.
///
/// A physics backend implements this over its spatial query pipeline. Tests implement it over a
/// deterministic fake so that the controller can be driven without a physics engine.
pub trait ParkourSpatialExt {
    /// Cast a ray and return the nearest hit on the given layers, if any within `max_range`.
    fn cast_ray(
        &self,
        origin: Vector3,
        direction: Dir3,
        max_range: Float,
        layers: ParkourLayers,
    ) -> Option<ParkourProximitySensorOutput>;

    /// Cast a sphere of the given radius and return the nearest hit on the given layers, if any
    /// within `max_range`.
    fn cast_sphere(
        &self,
        origin: Vector3,
        direction: Dir3,
        radius: Float,
        max_range: Float,
        layers: ParkourLayers,
    ) -> Option<ParkourProximitySensorOutput>;
}

/// Perform the cast described by a single sensor and store the result in its output.
pub fn update_sensor(sensor: &mut ParkourProximitySensor, spatial: &impl ParkourSpatialExt) {
    sensor.output = if sensor.cast_range <= 0.0 {
        None
    } else if 0.0 < sensor.cast_radius {
        spatial.cast_sphere(
            sensor.cast_origin,
            sensor.cast_direction,
            sensor.cast_radius,
            sensor.cast_range,
            sensor.layers,
        )
    } else {
        spatial.cast_ray(
            sensor.cast_origin,
            sensor.cast_direction,
            sensor.cast_range,
            sensor.layers,
        )
    };
}

/// Perform every cast in the suite. Backends can call this from their sensors-stage system.
pub fn update_sensor_suite(suite: &mut ParkourSensorSuite, spatial: &impl ParkourSpatialExt) {
    for sensor in suite.iter_mut() {
        update_sensor(sensor, spatial);
    }
}
