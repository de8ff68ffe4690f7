use bevy::prelude::*;

use crate::SMALL_THRESHOLD;

/// The steering correction that turns `velocity` into full speed
/// straight at `target`. Returns zero when already at the target.
pub fn seek(position: Vec3, velocity: Vec3, target: Vec3, max_speed: f32) -> Vec3 {
    let to_target = target - position;
    if to_target.length_squared() < SMALL_THRESHOLD * SMALL_THRESHOLD {
        return Vec3::ZERO;
    }
    let desired_velocity = to_target.normalize() * max_speed;
    desired_velocity - velocity
}
