//! Swing events

use bevy::prelude::*;
use crate::swing::HandSide;

/// Event: рука сделала swing (edge trigger, с per-hand cooldown)
#[derive(Event, Debug, Clone)]
pub struct HandSwung {
    /// Entity с SwingDetector
    pub detector: Entity,
    pub hand: HandSide,
    /// Сглаженная скорость руки в момент срабатывания (м/с)
    pub velocity: Vec3,
}

/// Event: continuous swing intensity (каждый не пропущенный тик)
///
/// Отдельно от HandSwung: intensity идёт всегда, даже без срабатывания.
#[derive(Event, Debug, Clone)]
pub struct SwingIntensityChanged {
    pub detector: Entity,
    /// 0 = руки неподвижны, 1 = полный swing
    pub intensity: f32,
}
