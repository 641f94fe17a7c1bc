//! Hoverbot Simulation Core
//!
//! ECS-симуляция XR компаньона на Bevy 0.16:
//! - swing — детекция взмахов рук (velocity + threshold/cooldown + intensity)
//! - locomotion — движение rig'а по направлению головы (input от swing intensity)
//! - companion — sphere robot: follow / destination / face-to-face + парение
//!
//! Земля: rapier raycast (в сцене) или `FlatGround` resource (headless).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod companion;
pub mod error;
pub mod facing;
pub mod ground;
pub mod locomotion;
pub mod logger;
pub mod math;
pub mod swing;

// Re-export для удобства
pub use companion::{
    CompanionCommand, CompanionConfig, CompanionMode, CompanionModeChanged, CompanionPlugin, CompanionSet,
    SphereCompanion, TargetLookup, TargetPose,
};
pub use error::{CompanionError, ConfigError, TargetCommand};
pub use ground::{FlatGround, GroundProbe, GroundSensor};
pub use locomotion::{HeadLocomotion, LocomotionPlugin, LocomotionSet, LocomotionState, SwingDrivenInput};
pub use logger::*;
pub use swing::{HandSide, HandSwung, SwingConfig, SwingDetector, SwingIntensityChanged, SwingPlugin, SwingSet};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Детерминистичный RNG (seed по умолчанию, create_headless_app перекрывает)
            .init_resource::<DeterministicRng>()
            .add_plugins((SwingPlugin, LocomotionPlugin, CompanionPlugin))
            // Swing → Locomotion → Companion: locomotion читает SwingIntensityChanged того же кадра,
            // компаньон видит уже сдвинутый rig
            .configure_sets(
                Update,
                (
                    LocomotionSet.after(SwingSet),
                    CompanionSet::Activate.after(LocomotionSet),
                ),
            );
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// TransformPlugin держит GlobalTransform для хоста; сами системы считают позы
/// рук/головы/целей из Transform через TransformHelper.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, TransformPlugin))
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
