use bevy::{
    ecs::{intern::Interned, schedule::ScheduleLabel},
    prelude::*,
};

use crate::{
    course::{Course, MoverRng, debug_course, initialize_movers},
    movement::{debug_movement, update_movers},
    mover::debug_movers,
    neighbors::debug_brakes,
    population::{Population, spawn_population},
    speed::BrakeSettings,
};

/// The phases of a mover frame, run in this order. Anything that wants
/// to push movers around should add to their
/// [SteeringForce](crate::prelude::SteeringForce) in
/// [MoverSystemSet::Accumulate]; it is applied on top of seeking in
/// [MoverSystemSet::Commit].
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum MoverSystemSet {
    /// Place movers added since the last frame on the course.
    Initialize,
    /// Extra steering forces from outside the crate.
    Accumulate,
    /// Each mover in turn seeks, scans for braking, integrates and
    /// checks its waypoint.
    Commit,
}

/// Runs the movers: seeking, braking, separation, integration and
/// respawning.
pub struct MoverPlugin {
    schedule: Interned<dyn ScheduleLabel>,
}

impl MoverPlugin {
    /// Run the mover systems in the given schedule instead of [Update].
    /// Movement uses the [Time] delta of that schedule.
    pub fn new(schedule: impl ScheduleLabel) -> Self {
        Self {
            schedule: schedule.intern(),
        }
    }
}

impl Default for MoverPlugin {
    fn default() -> Self {
        Self::new(Update)
    }
}

impl Plugin for MoverPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Course>()
            .init_resource::<BrakeSettings>()
            .init_resource::<MoverRng>();

        app.configure_sets(
            self.schedule,
            (
                MoverSystemSet::Initialize,
                MoverSystemSet::Accumulate,
                MoverSystemSet::Commit,
            )
                .chain(),
        );
        app.add_systems(
            self.schedule,
            (
                initialize_movers.in_set(MoverSystemSet::Initialize),
                update_movers.in_set(MoverSystemSet::Commit),
            ),
        );
    }
}

/// Spawns [Population::size] movers at startup.
pub struct PopulationPlugin;

impl Plugin for PopulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Population>();
        app.add_systems(Startup, spawn_population);
    }
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct DebugMoverSystem;

/// Draws movers, their velocities, their braking and the course with gizmos.
pub struct DebugMoverPlugin;

impl Plugin for DebugMoverPlugin {
    fn build(&self, app: &mut App) {
        let debug_systems = (debug_movers, debug_movement, debug_brakes, debug_course)
            .in_set(DebugMoverSystem);
        app.add_systems(Update, debug_systems);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        course::{WaypointStage, Waypoints},
        mover::{Mover, Velocity},
        speed::BrakeFactor,
    };
    use bevy::{MinimalPlugins, time::TimeUpdateStrategy};

    const FRAME: Duration = Duration::from_millis(100);

    fn run_app_test<T>(setup: impl FnOnce(&mut App) -> T) -> (App, T) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
            .insert_resource(MoverRng::seeded(42))
            .add_plugins(MoverPlugin::default());

        let result = setup(&mut app);

        // The first frame only starts the clock
        app.finish();
        app.cleanup();
        app.update();

        (app, result)
    }

    #[test]
    fn test_population_respects_invariants() {
        let (mut app, ()) = run_app_test(|app| {
            app.insert_resource(Population::new(30))
                .add_plugins(PopulationPlugin);
        });

        for frame in 0..300 {
            app.update();
            let world = app.world_mut();
            let mut query = world.query::<(&Mover, &Velocity, &BrakeFactor)>();
            let mut count = 0;
            for (mover, velocity, brake) in query.iter(world) {
                count += 1;
                assert!(
                    velocity.length() <= mover.max_speed() + 1e-6,
                    "speed {} over the limit on frame {}",
                    velocity.length(),
                    frame
                );
                assert!(
                    (0.3..=1.0).contains(&brake.get()),
                    "brake factor {} out of range on frame {}",
                    brake.get(),
                    frame
                );
            }
            assert_eq!(count, 30);
        }
    }

    #[test]
    fn test_mover_runs_the_course() {
        let (mut app, mover) = run_app_test(|app| {
            app.world_mut()
                .spawn(Mover::default().with_max_speed(2.0))
                .id()
        });

        let stage = |app: &App| app.world().get::<Waypoints>(mover).unwrap().stage();
        let position = |app: &App| app.world().get::<Transform>(mover).unwrap().translation;

        assert_eq!(stage(&app), WaypointStage::OnScreen);
        let start = position(&app);
        assert!((-5.0..=5.0).contains(&start.x));
        assert!(start.y <= 5.0 && start.y > 3.0);

        let mut frames = 0;
        while stage(&app) == WaypointStage::OnScreen {
            app.update();
            frames += 1;
            assert!(frames < 500, "never reached the on-screen waypoint");
        }
        let reached = position(&app);
        assert!(reached.distance_squared(Vec3::new(0.0, -4.0, 0.0)) < 0.5);
        assert_eq!(
            app.world().get::<Waypoints>(mover).unwrap().current_target(),
            Vec3::new(0.0, -6.0, 0.0)
        );

        while stage(&app) == WaypointStage::OffScreen {
            app.update();
            frames += 1;
            assert!(frames < 1000, "never reached the off-screen waypoint");
        }
        // Back at the top with fresh waypoints
        let respawned = position(&app);
        assert_eq!(respawned.y, 5.0);
        assert!((-5.0..=5.0).contains(&respawned.x));
        assert_eq!(app.world().get::<Velocity>(mover).unwrap().0, Vec3::ZERO);
        assert_eq!(
            app.world().get::<Waypoints>(mover).unwrap().current_target(),
            Vec3::new(0.0, -4.0, 0.0)
        );
    }

    #[test]
    fn test_follower_brakes_behind_stalled_mover() {
        let (mut app, (leader, follower)) = run_app_test(|app| {
            let leader = app.world_mut().spawn(Mover::default()).id();
            let follower = app.world_mut().spawn(Mover::default()).id();
            (leader, follower)
        });

        // Stall the leader just below the follower, in its path
        app.world_mut()
            .get_mut::<Transform>(leader)
            .unwrap()
            .translation = Vec3::new(0.0, 4.4, 0.0);
        app.world_mut()
            .get_mut::<Transform>(follower)
            .unwrap()
            .translation = Vec3::new(0.0, 5.0, 0.0);
        app.world_mut().get_mut::<Velocity>(follower).unwrap().0 = Vec3::new(0.0, -0.125, 0.0);
        app.world_mut().get_mut::<Velocity>(leader).unwrap().0 = Vec3::ZERO;
        *app.world_mut().get_mut::<Mover>(leader).unwrap() = Mover::default().with_max_speed(0.001);

        app.update();

        let follower_brake = app.world().get::<BrakeFactor>(follower).unwrap().get();
        assert!(
            (follower_brake - 0.6).abs() < 1e-6,
            "expected the follower to brake, got {follower_brake}"
        );
        assert_eq!(app.world().get::<BrakeFactor>(leader).unwrap().get(), 1.0);
    }
}
