//! GroundSensing — ground probe для систем
//!
//! Приоритет:
//! 1. `FlatGround` resource (headless симуляция, тесты)
//! 2. Default rapier context (collider'ы сцены)
//! 3. Ничего — земли нет, `GroundSensor` держит последнюю высоту

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use crate::ground::{FlatGround, GroundHit, GroundProbe};

#[derive(SystemParam)]
pub struct GroundSensing<'w, 's> {
    flat: Option<Res<'w, FlatGround>>,
    rapier: ReadRapierContext<'w, 's>,
}

impl GroundSensing<'_, '_> {
    /// Probe для entity `origin_entity` (его собственный collider исключён из raycast'а)
    pub fn probe_for(&self, origin_entity: Entity) -> SensedGround<'_> {
        if let Some(flat) = self.flat.as_deref() {
            return SensedGround::Flat(*flat);
        }

        match self.rapier.single() {
            Ok(context) => SensedGround::Rapier {
                context,
                exclude: origin_entity,
            },
            Err(_) => SensedGround::Nothing,
        }
    }
}

/// Probe, выбранный `GroundSensing` на этот тик
pub enum SensedGround<'a> {
    Flat(FlatGround),
    Rapier {
        context: RapierContext<'a>,
        exclude: Entity,
    },
    Nothing,
}

impl GroundProbe for SensedGround<'_> {
    fn cast_down(&self, origin: Vec3, max_distance: f32, layer_mask: u32) -> Option<GroundHit> {
        match self {
            SensedGround::Flat(flat) => flat.cast_down(origin, max_distance, layer_mask),
            SensedGround::Rapier { context, exclude } => {
                let filter = QueryFilter::default()
                    .groups(CollisionGroups::new(Group::ALL, Group::from_bits_truncate(layer_mask)))
                    .exclude_collider(*exclude);

                context
                    .cast_ray(origin, Vec3::NEG_Y, max_distance, true, filter)
                    .map(|(_, distance)| GroundHit {
                        distance,
                        point: origin + Vec3::NEG_Y * distance,
                    })
            }
            SensedGround::Nothing => None,
        }
    }
}
