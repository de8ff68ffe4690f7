use bevy::prelude::*;

use crate::{
    behaviors::seek::seek,
    course::{Arrival, Course, MoverRng, respawn},
    mover::{Mover, MoverQuery, Velocity},
    neighbors::should_brake,
    speed::BrakeSettings,
};

/// Forces applied to a mover during the current frame. Behaviors add
/// to it while forces accumulate; it is drained into the velocity when
/// movement is committed.
#[derive(Component, Debug, Default, Copy, Clone, PartialEq, Reflect, Deref)]
#[reflect(Component)]
pub struct SteeringForce(pub Vec3);

impl SteeringForce {
    /// Add a force for this frame.
    pub fn add(&mut self, force: Vec3) {
        self.0 += force;
    }

    fn take(&mut self) -> Vec3 {
        std::mem::take(&mut self.0)
    }
}

/// Apply the accumulated force and the brake factor to a velocity,
/// keeping it under `max_speed`.
pub(crate) fn next_velocity(velocity: Vec3, force: Vec3, brake: f32, max_speed: f32) -> Vec3 {
    ((velocity + force) * brake).clamp_length_max(max_speed)
}

/// Step every mover through one frame, one mover at a time in query
/// order: seek its waypoint, scan the others for a reason to brake,
/// update the brake factor, then integrate and check the waypoint. A
/// mover handled later sees the new velocity and position of the movers
/// handled before it.
pub(crate) fn update_movers(
    mut query: Query<MoverQuery>,
    time: Res<Time>,
    course: Res<Course>,
    brake_settings: Res<BrakeSettings>,
    mut rng: ResMut<MoverRng>,
) {
    let delta = time.delta_secs();
    let movers: Vec<Entity> = query.iter().map(|item| item.entity).collect();
    for &entity in &movers {
        let Ok(item) = query.get(entity) else {
            continue;
        };
        let steering = seek(
            item.transform.translation,
            item.velocity.0,
            item.waypoints.current_target(),
            item.mover.max_speed,
        );

        let braking = should_brake(&mut query, entity, &movers);

        let Ok(mut item) = query.get_mut(entity) else {
            continue;
        };
        item.brake.update(braking, &brake_settings);
        item.force.add(steering);
        let force = item.force.take();
        let velocity = next_velocity(
            item.velocity.0,
            force,
            item.brake.get(),
            item.mover.max_speed,
        );
        item.velocity.0 = velocity;
        item.transform.translation += velocity * delta;

        let position = item.transform.translation;
        match item
            .waypoints
            .check_arrival(position, course.arrival_distance_squared)
        {
            Arrival::EnRoute => {}
            Arrival::Advanced => {
                debug!("Mover {entity} reached its on-screen waypoint at {position}");
            }
            Arrival::Finished => {
                respawn(
                    &course,
                    &mut **rng,
                    &mut item.transform,
                    &mut item.velocity,
                    &mut item.waypoints,
                );
                if brake_settings.reset_on_respawn {
                    item.brake.release(&brake_settings);
                }
                debug!(
                    "Respawned mover {entity} at {}",
                    item.transform.translation
                );
            }
        }
    }
}

/// Debug visualization for mover movement. Shows the current velocity
/// as a green arrow, scaled up to be visible at low speeds.
pub(crate) fn debug_movement(mut gizmos: Gizmos, query: Query<(&Transform, &Mover, &Velocity)>) {
    for (transform, mover, velocity) in query.iter() {
        let position = transform.translation;
        let scale = if mover.max_speed > 0.0 {
            mover.radius * 2.0 / mover.max_speed
        } else {
            0.0
        };
        gizmos.arrow(
            position,
            position + velocity.0 * scale,
            Color::srgb(0.0, 1.0, 0.0),
        );
    }
}
