//! Head-relative locomotion components
//!
//! Rig двигается туда, куда смотрит голова (горизонтальная проекция),
//! со скоростью input_strength · max_move_speed. Тело доворачивается к голове.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use crate::math::{horizontal, move_towards, signed_angle_y};

/// Допуск "стоим на земле" (метры)
pub const GROUND_SKIN: f32 = 0.05;
/// Ground raycast стартует чуть выше ног, чтобы не начинать внутри пола
pub const FOOT_PROBE_LIFT: f32 = 0.1;
/// Порог "есть движение" для input/speed
const MOVEMENT_EPSILON: f32 = 0.001;

/// Locomotion контроллер (config + weak handles головы/тела)
///
/// Висит на root entity XR rig'а. Двигает его Transform.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[require(LocomotionState, Transform)]
pub struct HeadLocomotion {
    /// Head (HMD) entity: источник направления
    #[serde(skip)]
    pub head: Option<Entity>,
    /// Body entity: доворачивается к голове (None = без поворота)
    #[serde(skip)]
    pub body: Option<Entity>,

    /// Максимальная скорость (м/с) при input = 1
    pub max_move_speed: f32,
    /// Ускорение/торможение (м/с²)
    pub speed_change_rate: f32,
    pub use_gravity: bool,
    /// Гравитация (м/с², положительная)
    pub gravity: f32,
    /// Прижимающая скорость на земле (м/с)
    pub ground_stick_force: f32,
    /// Дальность ground raycast'а от ног
    pub ground_check_distance: f32,
    pub ground_layer_mask: u32,

    /// Скорость поворота тела (градусы/сек)
    pub rotate_speed: f32,
    /// Стоя на месте: доворачиваем тело только если голова ушла дальше (градусы)
    pub idle_head_angle_threshold: f32,
    pub rotate_only_when_moving: bool,
}

impl Default for HeadLocomotion {
    fn default() -> Self {
        Self {
            head: None,
            body: None,
            max_move_speed: 2.0,
            speed_change_rate: 10.0,
            use_gravity: true,
            gravity: 9.81,
            ground_stick_force: 0.2,
            ground_check_distance: 1.0,
            ground_layer_mask: u32::MAX,
            rotate_speed: 360.0,
            idle_head_angle_threshold: 30.0,
            rotate_only_when_moving: false,
        }
    }
}

/// Runtime состояние locomotion
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LocomotionState {
    /// Нормализованный input 0..1
    input_strength: f32,
    /// Текущая горизонтальная скорость (м/с)
    pub current_speed: f32,
    /// Вертикальная скорость (м/с, вниз отрицательная)
    pub vertical_velocity: f32,
    pub grounded: bool,
}

impl LocomotionState {
    pub fn input_strength(&self) -> f32 {
        self.input_strength
    }

    /// Input clamp'ится в 0..1
    pub fn set_input(&mut self, normalized: f32) {
        self.input_strength = normalized.clamp(0.0, 1.0);
    }

    pub fn has_movement(&self) -> bool {
        self.input_strength > MOVEMENT_EPSILON && self.current_speed > MOVEMENT_EPSILON
    }
}

/// Связь rig'а с swing detector'ом: intensity → input_strength
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct SwingDrivenInput {
    pub detector: Entity,
}

impl HeadLocomotion {
    /// Горизонтальное направление головы (ноль если головы нет или смотрит строго вверх/вниз)
    pub fn heading(head_forward: Option<Vec3>) -> Vec3 {
        head_forward.map(|forward| horizontal(forward).normalize_or_zero()).unwrap_or(Vec3::ZERO)
    }

    /// Шаг движения: обновляет state, возвращает смещение rig'а за тик
    ///
    /// `ground_clearance`: высота ног над землёй (None = земли под ногами нет).
    pub fn step(&self, state: &mut LocomotionState, heading: Vec3, ground_clearance: Option<f32>, dt: f32) -> Vec3 {
        if dt <= 0.0 {
            return Vec3::ZERO;
        }

        let target_speed = state.input_strength * self.max_move_speed;
        state.current_speed = move_towards(state.current_speed, target_speed, self.speed_change_rate * dt);

        let grounded = ground_clearance.is_some_and(|clearance| clearance <= GROUND_SKIN);
        if self.use_gravity {
            if grounded {
                state.vertical_velocity = -self.ground_stick_force;
            } else {
                state.vertical_velocity -= self.gravity * dt;
            }
        } else {
            state.vertical_velocity = 0.0;
        }

        let mut displacement = (heading * state.current_speed + Vec3::Y * state.vertical_velocity) * dt;

        // Ground snap: не проваливаемся под землю (и выталкиваемся, если уже под ней)
        if let Some(clearance) = ground_clearance {
            displacement.y = displacement.y.max(-clearance);
        }

        state.grounded = ground_clearance.is_some_and(|clearance| clearance + displacement.y <= GROUND_SKIN);
        displacement
    }

    /// Нужно ли доворачивать тело к `heading`
    pub fn should_rotate_body(&self, state: &LocomotionState, body_forward: Vec3, heading: Vec3) -> bool {
        if heading == Vec3::ZERO {
            return false;
        }

        let moving = state.has_movement();
        if self.rotate_only_when_moving {
            return moving;
        }

        let body_forward = match horizontal(body_forward).try_normalize() {
            Some(forward) => forward,
            None => Vec3::NEG_Z,
        };
        moving || signed_angle_y(body_forward, heading).abs() >= self.idle_head_angle_threshold
    }
}
