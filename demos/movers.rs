use bevy::prelude::*;
use bevy_movers::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(MoverPlugin::default())
        .add_plugins(PopulationPlugin)
        .add_plugins(DebugMoverPlugin)
        .insert_resource(Population::new(30))
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    // Movers live in the XY plane, look at it head on
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.0, 14.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
