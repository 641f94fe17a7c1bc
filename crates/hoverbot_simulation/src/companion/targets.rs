//! Target lookup — разрешение weak handle (Entity) в позу цели

use std::collections::HashMap;
use bevy::prelude::*;
use bevy::transform::helper::TransformHelper;

/// Поза цели на этот тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl TargetPose {
    /// Цель в точке, смотрит в -Z
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            forward: Vec3::NEG_Z,
        }
    }

    pub fn from_global(transform: &GlobalTransform) -> Self {
        Self {
            position: transform.translation(),
            forward: *transform.forward(),
        }
    }
}

/// None: цель невалидна (despawned / без transform)
pub trait TargetLookup {
    fn target_pose(&self, target: Entity) -> Option<TargetPose>;
}

/// World поза считается из Transform по иерархии (ChildOf), а не из GlobalTransform:
/// propagation идёт в PostUpdate, и только что заспавненная цель иначе стоит в origin.
impl TargetLookup for TransformHelper<'_, '_> {
    fn target_pose(&self, target: Entity) -> Option<TargetPose> {
        self.compute_global_transform(target)
            .ok()
            .map(|transform| TargetPose::from_global(&transform))
    }
}

impl TargetLookup for HashMap<Entity, TargetPose> {
    fn target_pose(&self, target: Entity) -> Option<TargetPose> {
        self.get(&target).copied()
    }
}
