use bevy::prelude::*;

use crate::{
    behaviors::separation::separate_hard,
    mover::{Mover, MoverQuery},
    speed::{BrakeFactor, BrakeSettings},
};

/// How a mover sees one of its neighbors, computed from the vector
/// towards it and both velocities.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct NeighborAssessment {
    /// The neighbor overlaps the mover and must be pushed away.
    pub(crate) overlapping: bool,
    /// The neighbor is ahead of the mover and inside its danger distance.
    pub(crate) dangerous: bool,
    /// The neighbor moves slower than the mover.
    pub(crate) slower: bool,
}

impl NeighborAssessment {
    pub(crate) fn new(
        mover: &Mover,
        velocity: Vec3,
        to_other: Vec3,
        other_radius: f32,
        other_velocity: Vec3,
    ) -> Self {
        let distance = to_other.length();
        // A mover at rest has no forward direction, so nothing is in front
        let forward = velocity.normalize_or_zero();
        let in_front = forward.dot(to_other) > mover.radius;
        Self {
            overlapping: distance < mover.radius + other_radius,
            dangerous: in_front && distance < mover.danger_distance,
            slower: other_velocity.length_squared() < velocity.length_squared(),
        }
    }

    pub(crate) fn should_brake(&self) -> bool {
        self.dangerous && self.slower
    }
}

/// Scan every other mover on behalf of `entity`, in `neighbors` order.
/// Overlapping neighbors are pushed apart on the spot, whatever the
/// outcome. Returns true as soon as a slower neighbor is found close
/// ahead; the remaining neighbors are not scanned.
pub(crate) fn should_brake(
    query: &mut Query<MoverQuery>,
    entity: Entity,
    neighbors: &[Entity],
) -> bool {
    for &other in neighbors {
        if other == entity {
            continue;
        }
        let [mut this, mut that] = match query.get_many_mut([entity, other]) {
            Ok(pair) => pair,
            Err(err) => {
                warn!("Skipping neighbor {other} of mover {entity}: {err}");
                continue;
            }
        };
        let to_other = that.transform.translation - this.transform.translation;
        let assessment = NeighborAssessment::new(
            this.mover,
            this.velocity.0,
            to_other,
            that.mover.radius,
            that.velocity.0,
        );
        if assessment.overlapping {
            let contact_distance = this.mover.radius + that.mover.radius;
            separate_hard(
                &mut this.transform.translation,
                &mut that.transform.translation,
                to_other,
                contact_distance,
            );
        }
        if assessment.should_brake() {
            return true;
        }
    }
    false
}

/// Draw a circle of the danger distance around every mover that is
/// braking hard.
pub(crate) fn debug_brakes(
    mut gizmos: Gizmos,
    query: Query<(&Transform, &Mover, &BrakeFactor)>,
    settings: Res<BrakeSettings>,
) {
    for (transform, mover, brake) in query.iter() {
        if brake.get() >= settings.ceiling {
            continue;
        }
        let range = (settings.ceiling - settings.floor).max(f32::EPSILON);
        let severity = (settings.ceiling - brake.get()) / range;
        gizmos.circle(
            Isometry3d::from_translation(transform.translation),
            mover.danger_distance,
            Color::srgb(1.0, 0.0, 0.0).with_alpha(severity.clamp(0.0, 1.0)),
        );
    }
}
