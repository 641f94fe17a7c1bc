//! Sphere robot компаньон
//!
//! FSM: Idle / Follow / Destination / FaceToFace
//! - seek/arrive в горизонтальной плоскости, orbit radius для Follow
//! - парение на месте поверх базовой высоты (база следует за землёй)
//! - yaw-only экспоненциальный поворот с разной скоростью по режимам
//!
//! Переходы: внешние команды (CompanionCommand) или внутренние (прибытие, потеря цели).

use bevy::prelude::*;

pub mod behavior;
pub mod components;
pub mod events;
pub mod systems;
pub mod targets;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod behavior_tests;

pub use behavior::{seek_towards, SeekStep};
pub use components::*;
pub use events::*;
pub use systems::*;
pub use targets::{TargetLookup, TargetPose};

/// Фазы кадра компаньона
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompanionSet {
    /// Новые компаньоны (OnEnable)
    Activate,
    /// CompanionCommand события
    Commands,
    /// FSM тик (движение, поворот)
    Tick,
    /// Ground resample (LateUpdate)
    PostTick,
}

/// Companion Plugin
///
/// Все системы в Update (variable frame time), фазы строго по порядку.
pub struct CompanionPlugin;

impl Plugin for CompanionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CompanionCommand>()
            .add_event::<CompanionModeChanged>()
            .init_resource::<crate::DeterministicRng>();

        app.configure_sets(
            Update,
            (
                CompanionSet::Activate,
                CompanionSet::Commands,
                CompanionSet::Tick,
                CompanionSet::PostTick,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                activate_companions.in_set(CompanionSet::Activate),
                apply_companion_commands.in_set(CompanionSet::Commands),
                tick_companions.in_set(CompanionSet::Tick),
                resample_companion_ground.in_set(CompanionSet::PostTick),
            ),
        );
    }
}
