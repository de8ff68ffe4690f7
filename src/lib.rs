mod behaviors;
mod course;
mod movement;
mod mover;
mod neighbors;
mod plugin;
mod population;
pub mod prelude;
mod speed;

pub(crate) const SMALL_THRESHOLD: f32 = 0.0001;
