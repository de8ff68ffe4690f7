use bevy::prelude::*;
use derivative::Derivative;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::mover::Mover;

/// How many movers the [PopulationPlugin](crate::prelude::PopulationPlugin)
/// spawns at startup, and the template they are spawned from.
#[derive(Resource, Debug, Copy, Clone, Reflect, Derivative)]
#[derivative(Default)]
#[reflect(Resource)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct Population {
    #[derivative(Default(value = "30"))]
    pub size: usize,
    pub template: Mover,
}

impl Population {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            ..default()
        }
    }

    pub fn with_template(mut self, template: Mover) -> Self {
        self.template = template;
        self
    }
}

/// Spawn the whole population. Movers are placed on the course by the
/// initialization hook of the mover plugin on their first frame.
pub(crate) fn spawn_population(mut commands: Commands, population: Res<Population>) {
    for index in 0..population.size {
        commands.spawn((population.template, Name::new(format!("Mover {index}"))));
    }
    info!("Spawned {} movers", population.size);
}
