//! Hand swing detection
//!
//! Per-hand velocity estimation → сглаживание окном → threshold + cooldown
//! edge trigger, плюс continuous intensity 0..1 для аналогового управления
//! (arm-swing locomotion).

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;


pub use components::*;
pub use events::*;
pub use systems::*;

/// System set swing detection (locomotion читает его события после)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SwingSet;

/// Swing Plugin
///
/// Регистрирует события и системы в Update (variable frame time, как XR трекинг).
/// Порядок:
/// 1. activate_swing_detectors: OnEnable аналог
/// 2. detect_hand_swings: тик всех детекторов
pub struct SwingPlugin;

impl Plugin for SwingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HandSwung>()
            .add_event::<SwingIntensityChanged>();

        app.add_systems(
            Update,
            (activate_swing_detectors, detect_hand_swings)
                .chain()
                .in_set(SwingSet),
        );
    }
}
