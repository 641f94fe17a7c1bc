//! GroundSensor — сэмплинг земли и сглаживание базовой высоты парения

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use crate::ground::GroundProbe;
use crate::math::smooth_damp;

/// Запас к дистанции raycast'а (луч чуть длиннее check distance)
pub const GROUND_PROBE_EPSILON: f32 = 0.1;

/// Параметры ground check
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct GroundSensor {
    /// Максимальная дистанция raycast'а вниз (метры)
    pub check_distance: f32,
    /// Высота парения над землёй (метры)
    pub height_offset: f32,
    /// SmoothDamp время для базовой высоты (секунды)
    pub smooth_time: f32,
    /// Collision layers земли (bitmask)
    pub layer_mask: u32,
}

impl Default for GroundSensor {
    fn default() -> Self {
        Self {
            check_distance: 10.0,
            height_offset: 1.5,
            smooth_time: 0.3,
            layer_mask: u32::MAX,
        }
    }
}

impl GroundSensor {
    /// Дистанция до земли под `origin`, None если земли нет
    pub fn sample(&self, probe: &impl GroundProbe, origin: Vec3) -> Option<f32> {
        probe
            .cast_down(origin, self.check_distance + GROUND_PROBE_EPSILON, self.layer_mask)
            .map(|hit| hit.distance)
    }

    /// Стартовая базовая высота (активация)
    ///
    /// Есть земля → ground + offset, нет → текущая высота.
    pub fn initial_base_hover(&self, probe: &impl GroundProbe, origin: Vec3) -> f32 {
        match self.sample(probe, origin) {
            Some(distance) => origin.y - distance + self.height_offset,
            None => origin.y,
        }
    }

    /// Один шаг сглаживания базовой высоты к ground + offset
    ///
    /// Нет земли → `current` без изменений (velocity тоже не трогаем).
    pub fn update_base_hover(
        &self,
        probe: &impl GroundProbe,
        current: f32,
        origin: Vec3,
        dt: f32,
        velocity: &mut f32,
    ) -> f32 {
        let Some(distance) = self.sample(probe, origin) else {
            return current;
        };

        let ground_y = origin.y - distance;
        smooth_damp(current, ground_y + self.height_offset, velocity, self.smooth_time, dt)
    }
}
