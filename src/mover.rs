use bevy::{ecs::query::QueryData, prelude::*};
use derivative::Derivative;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::{
    course::Waypoints,
    movement::SteeringForce,
    speed::BrakeFactor,
};

/// Represents a mover. Movers seek their [Waypoints], brake when a
/// slower neighbor is close ahead of them and are pushed apart when
/// they overlap. Every entity with a [Mover] component is a neighbor
/// of every other mover.
#[derive(Component, Copy, Clone, Debug, Reflect, Derivative)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
#[derivative(Default)]
#[require(Transform, Velocity, Waypoints, BrakeFactor, SteeringForce)]
#[reflect(Component)]
pub struct Mover {
    /// The collision radius of the mover. Two movers closer than the
    /// sum of their radii are separated immediately.
    #[derivative(Default(value = "0.25"))]
    pub(crate) radius: f32,
    /// The speed limit of the mover, in units per second.
    #[derivative(Default(value = "0.125"))]
    pub(crate) max_speed: f32,
    /// A slower neighbor in front of the mover and closer than this
    /// distance makes the mover brake.
    #[derivative(Default(value = "0.85"))]
    pub(crate) danger_distance: f32,
}

impl Mover {
    /// Set the collision radius. Non-positive values are ignored.
    pub fn with_radius(self, radius: f32) -> Self {
        if radius <= 0.0 {
            return self;
        }
        Self { radius, ..self }
    }

    /// Set the speed limit of the mover. Non-positive values are ignored.
    pub fn with_max_speed(self, speed: f32) -> Self {
        if speed <= 0.0 {
            return self;
        }
        Self {
            max_speed: speed,
            ..self
        }
    }

    /// Set the distance under which a slower neighbor ahead is
    /// considered dangerous. Non-positive values are ignored.
    pub fn with_danger_distance(self, distance: f32) -> Self {
        if distance <= 0.0 {
            return self;
        }
        Self {
            danger_distance: distance,
            ..self
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn danger_distance(&self) -> f32 {
        self.danger_distance
    }
}

/// The current velocity of a mover, in units per second.
#[derive(Component, Debug, Default, Copy, Clone, PartialEq, Reflect, Deref, DerefMut)]
#[reflect(Component)]
pub struct Velocity(pub Vec3);

/// Everything a mover reads and writes during its frame.
#[derive(QueryData)]
#[query_data(mutable)]
pub(crate) struct MoverQuery {
    pub(crate) entity: Entity,
    pub(crate) mover: &'static Mover,
    pub(crate) transform: &'static mut Transform,
    pub(crate) velocity: &'static mut Velocity,
    pub(crate) brake: &'static mut BrakeFactor,
    pub(crate) force: &'static mut SteeringForce,
    pub(crate) waypoints: &'static mut Waypoints,
}

/// Draw each mover as a wire sphere of its radius.
pub(crate) fn debug_movers(mut gizmos: Gizmos, query: Query<(&Transform, &Mover)>) {
    for (transform, mover) in query.iter() {
        gizmos.sphere(transform.translation, mover.radius, Color::srgb(0.0, 1.0, 0.0));
    }
}
