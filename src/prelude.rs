pub use crate::{
    behaviors::seek::seek,
    behaviors::separation::separate_hard,
    course::{Course, MoverRng, WaypointStage, Waypoints},
    movement::SteeringForce,
    mover::{Mover, Velocity},
    plugin::{DebugMoverPlugin, DebugMoverSystem, MoverPlugin, MoverSystemSet, PopulationPlugin},
    population::Population,
    speed::{BrakeFactor, BrakeSettings},
};
