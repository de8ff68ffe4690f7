use bevy::{ecs::query::QueryData, prelude::*};
use derivative::Derivative;
use rand::{Rng, SeedableRng, rngs::StdRng};
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::mover::{Mover, Velocity};

/// The course every mover runs: where it spawns, the two waypoints it
/// seeks in turn and how close it must get to count as arrived.
#[derive(Resource, Debug, Copy, Clone, Reflect, Derivative)]
#[derivative(Default)]
#[reflect(Resource)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct Course {
    /// Movers spawn at a uniformly random x in [spawn_min_x, spawn_max_x].
    #[derivative(Default(value = "-5.0"))]
    pub spawn_min_x: f32,
    #[derivative(Default(value = "5.0"))]
    pub spawn_max_x: f32,
    /// The height movers spawn at.
    #[derivative(Default(value = "5.0"))]
    pub spawn_y: f32,
    /// On first spawn, movers are additionally lowered by up to this
    /// distance so they don't all start on the same line.
    #[derivative(Default(value = "1.5"))]
    pub initial_drop: f32,
    /// The first waypoint, on screen.
    #[derivative(Default(value = "Vec3::new(0.0, -4.0, 0.0)"))]
    pub on_screen_target: Vec3,
    /// The second waypoint, off screen. Reaching it respawns the mover.
    #[derivative(Default(value = "Vec3::new(0.0, -6.0, 0.0)"))]
    pub off_screen_target: Vec3,
    /// A mover has arrived once its squared distance to the current
    /// waypoint is below this.
    #[derivative(Default(value = "0.5"))]
    pub arrival_distance_squared: f32,
}

impl Course {
    /// Set the horizontal spawn range. The bounds are swapped if given
    /// in the wrong order.
    pub fn with_spawn_range(mut self, min_x: f32, max_x: f32) -> Self {
        self.spawn_min_x = min_x.min(max_x);
        self.spawn_max_x = min_x.max(max_x);
        self
    }

    pub fn with_spawn_y(mut self, y: f32) -> Self {
        self.spawn_y = y;
        self
    }

    pub fn with_initial_drop(mut self, drop: f32) -> Self {
        self.initial_drop = drop.abs();
        self
    }

    pub fn with_targets(mut self, on_screen: Vec3, off_screen: Vec3) -> Self {
        self.on_screen_target = on_screen;
        self.off_screen_target = off_screen;
        self
    }

    pub fn with_arrival_distance_squared(mut self, distance_squared: f32) -> Self {
        self.arrival_distance_squared = distance_squared;
        self
    }

    /// Pick a random spawn point on the spawn line.
    pub fn spawn_point(&self, rng: &mut impl Rng) -> Vec3 {
        let (min_x, max_x) = if self.spawn_min_x <= self.spawn_max_x {
            (self.spawn_min_x, self.spawn_max_x)
        } else {
            (self.spawn_max_x, self.spawn_min_x)
        };
        let x = rng.random_range(min_x..=max_x);
        Vec3::new(x, self.spawn_y, 0.0)
    }

    /// Fresh waypoints, seeking the on-screen target first.
    pub fn waypoints(&self) -> Waypoints {
        Waypoints::new(self.on_screen_target, self.off_screen_target)
    }
}

/// Which of its two waypoints a mover is currently seeking.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Display, Reflect)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum WaypointStage {
    #[default]
    OnScreen,
    OffScreen,
}

/// What happened when a mover checked its current waypoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Arrival {
    /// Still on the way.
    EnRoute,
    /// Reached the on-screen waypoint, now seeking the off-screen one.
    Advanced,
    /// Reached the off-screen waypoint; the mover must respawn.
    Finished,
}

/// The two waypoints of a mover and the stage it is in.
#[derive(Component, Debug, Copy, Clone, PartialEq, Reflect)]
#[reflect(Component)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Waypoints {
    on_screen: Vec3,
    off_screen: Vec3,
    stage: WaypointStage,
}

impl Default for Waypoints {
    fn default() -> Self {
        Course::default().waypoints()
    }
}

impl Waypoints {
    pub fn new(on_screen: Vec3, off_screen: Vec3) -> Self {
        Self {
            on_screen,
            off_screen,
            stage: WaypointStage::OnScreen,
        }
    }

    pub fn stage(&self) -> WaypointStage {
        self.stage
    }

    /// The waypoint the mover is currently seeking.
    pub fn current_target(&self) -> Vec3 {
        match self.stage {
            WaypointStage::OnScreen => self.on_screen,
            WaypointStage::OffScreen => self.off_screen,
        }
    }

    pub fn on_screen_target(&self) -> Vec3 {
        self.on_screen
    }

    pub fn off_screen_target(&self) -> Vec3 {
        self.off_screen
    }

    /// Check the current waypoint against `position`. Moves on to the
    /// off-screen waypoint when the on-screen one is reached.
    pub(crate) fn check_arrival(&mut self, position: Vec3, threshold_squared: f32) -> Arrival {
        if position.distance_squared(self.current_target()) >= threshold_squared {
            return Arrival::EnRoute;
        }
        match self.stage {
            WaypointStage::OnScreen => {
                self.stage = WaypointStage::OffScreen;
                Arrival::Advanced
            }
            WaypointStage::OffScreen => Arrival::Finished,
        }
    }
}

/// Source of randomness for spawn points. Insert a seeded one before
/// adding the plugins to get reproducible runs.
#[derive(Resource, Debug, Clone, Deref, DerefMut)]
pub struct MoverRng(StdRng);

impl Default for MoverRng {
    fn default() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl MoverRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// Put a mover back at the start of the course: a new random spawn
/// point, no velocity and fresh waypoints.
pub(crate) fn respawn(
    course: &Course,
    rng: &mut impl Rng,
    transform: &mut Transform,
    velocity: &mut Velocity,
    waypoints: &mut Waypoints,
) {
    velocity.0 = Vec3::ZERO;
    transform.translation = course.spawn_point(rng);
    *waypoints = course.waypoints();
}

#[derive(QueryData)]
#[query_data(mutable)]
pub(crate) struct CourseAgentQuery {
    entity: Entity,
    transform: &'static mut Transform,
    velocity: &'static mut Velocity,
    waypoints: &'static mut Waypoints,
}

/// Place newly added movers on the course. Their height is jittered
/// downwards so the first wave is spread out.
pub(crate) fn initialize_movers(
    mut query: Query<CourseAgentQuery, Added<Mover>>,
    course: Res<Course>,
    mut rng: ResMut<MoverRng>,
) {
    let max_drop = course.initial_drop.abs();
    for mut item in query.iter_mut() {
        respawn(
            &course,
            &mut **rng,
            &mut item.transform,
            &mut item.velocity,
            &mut item.waypoints,
        );
        item.transform.translation.y += rng.random_range(-max_drop..=0.0);
        debug!(
            "Initialized mover {} at {}",
            item.entity, item.transform.translation
        );
    }
}

/// Draw the two waypoints of the course.
pub(crate) fn debug_course(mut gizmos: Gizmos, course: Res<Course>) {
    let radius = course.arrival_distance_squared.max(0.0).sqrt();
    gizmos.sphere(course.on_screen_target, radius, Color::srgb(0.0, 1.0, 1.0));
    gizmos.sphere(course.off_screen_target, radius, Color::srgb(1.0, 0.0, 1.0));
}
