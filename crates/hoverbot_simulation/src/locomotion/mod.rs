//! Head-directed locomotion (arm-swing → движение туда, куда смотрит голова)
//!
//! Input strength 0..1 приходит извне (обычно `SwingIntensityChanged`),
//! скорость разгоняется к input · max_move_speed, гравитация + ground snap,
//! тело доворачивается к голове с ограничением угловой скорости.

use bevy::prelude::*;

pub mod components;
pub mod systems;


pub use components::*;
pub use systems::*;

/// System set locomotion (после SwingSet в SimulationPlugin)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocomotionSet;

/// Locomotion Plugin
///
/// Порядок:
/// 1. drive_locomotion_from_swing: intensity → input
/// 2. move_head_locomotion: движение + поворот тела
pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<crate::swing::SwingIntensityChanged>();

        app.add_systems(
            Update,
            (drive_locomotion_from_swing, move_head_locomotion)
                .chain()
                .in_set(LocomotionSet),
        );
    }
}
