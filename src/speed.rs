use bevy::prelude::*;
use derivative::Derivative;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// How the brake factor of every mover decays while it brakes and
/// recovers once the danger has passed.
#[derive(Resource, Debug, Copy, Clone, Reflect, Derivative)]
#[derivative(Default)]
#[reflect(Resource)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct BrakeSettings {
    /// Multiplier applied to the brake factor on a frame the mover brakes.
    #[derivative(Default(value = "0.6"))]
    pub decay: f32,
    /// Multiplier applied to the brake factor on a frame it doesn't.
    #[derivative(Default(value = "1.02"))]
    pub recovery: f32,
    /// The lowest the brake factor can go.
    #[derivative(Default(value = "0.3"))]
    pub floor: f32,
    /// The highest the brake factor can go.
    #[derivative(Default(value = "1.0"))]
    pub ceiling: f32,
    /// Reset the brake factor to the ceiling when a mover respawns.
    /// Off by default: movers keep their caution into the next life.
    #[derivative(Default(value = "false"))]
    pub reset_on_respawn: bool,
}

impl BrakeSettings {
    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_recovery(mut self, recovery: f32) -> Self {
        self.recovery = recovery;
        self
    }

    /// Set the range the brake factor is kept in. The bounds are
    /// swapped if given in the wrong order.
    pub fn with_range(mut self, floor: f32, ceiling: f32) -> Self {
        self.floor = floor.min(ceiling);
        self.ceiling = floor.max(ceiling);
        self
    }

    pub fn with_reset_on_respawn(mut self, reset: bool) -> Self {
        self.reset_on_respawn = reset;
        self
    }
}

/// Multiplier from [floor, ceiling] applied to the velocity of a
/// mover every frame. It drops while a slower neighbor blocks the way
/// and slowly recovers afterwards.
#[derive(Component, Debug, Copy, Clone, PartialEq, Reflect, Derivative, Deref)]
#[derivative(Default)]
#[reflect(Component)]
pub struct BrakeFactor(#[derivative(Default(value = "1.0"))] f32);

impl BrakeFactor {
    pub fn new(value: f32) -> Self {
        Self(value)
    }

    pub fn get(&self) -> f32 {
        self.0
    }

    /// Step the brake factor for one frame.
    pub(crate) fn update(&mut self, braking: bool, settings: &BrakeSettings) {
        self.0 = if braking {
            (self.0 * settings.decay).max(settings.floor)
        } else {
            (self.0 * settings.recovery).min(settings.ceiling)
        };
    }

    pub(crate) fn release(&mut self, settings: &BrakeSettings) {
        self.0 = settings.ceiling;
    }
}
