//! Ground sensing — raycast вниз + hover base height
//!
//! - `GroundProbe` — абстракция raycast'а (rapier в игре, `FlatGround` headless/тесты)
//! - `GroundSensor` — параметры сэмплинга + SmoothDamp базовой высоты парения
//! - `GroundSensing` — SystemParam, выбирает probe для конкретного entity

use bevy::prelude::*;

pub mod sensor;
pub mod sensing;


pub use sensor::{GroundSensor, GROUND_PROBE_EPSILON};
pub use sensing::{GroundSensing, SensedGround};

/// Результат raycast'а вниз
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    /// Дистанция от origin до точки попадания
    pub distance: f32,
    /// Точка попадания (world space)
    pub point: Vec3,
}

/// Raycast вниз против геометрии
///
/// Чистый query, без side effects. None: ничего не задели в пределах `max_distance`.
pub trait GroundProbe {
    fn cast_down(&self, origin: Vec3, max_distance: f32, layer_mask: u32) -> Option<GroundHit>;
}

/// Бесконечная горизонтальная плоскость на высоте `height`
///
/// Для headless симуляции без rapier. Маска слоёв игнорируется.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct FlatGround {
    pub height: f32,
}

impl Default for FlatGround {
    fn default() -> Self {
        Self { height: 0.0 }
    }
}

impl GroundProbe for FlatGround {
    fn cast_down(&self, origin: Vec3, max_distance: f32, _layer_mask: u32) -> Option<GroundHit> {
        let distance = origin.y - self.height;
        if distance < 0.0 || distance > max_distance {
            return None;
        }

        Some(GroundHit {
            distance,
            point: Vec3::new(origin.x, self.height, origin.z),
        })
    }
}

/// Нет земли вообще (падаем в пустоту / ground layer пустой)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGround;

impl GroundProbe for NoGround {
    fn cast_down(&self, _origin: Vec3, _max_distance: f32, _layer_mask: u32) -> Option<GroundHit> {
        None
    }
}
