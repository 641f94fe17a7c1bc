//! Companion components: режим FSM, конфиг, состояние парения.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use crate::error::{CompanionError, TargetCommand};
use crate::ground::GroundSensor;
use crate::companion::TargetLookup;

/// Режим компаньона
///
/// Цели это weak handles (Entity), liveness проверяется каждый тик через TargetLookup.
/// Destination point живёт внутри варианта → "destination есть iff mode == Destination".
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum CompanionMode {
    /// Висим на месте и парим
    #[default]
    Idle,

    /// Следуем за target, держим orbit radius
    Follow { target: Entity },

    /// Летим в точку, по прибытии → Idle
    Destination { point: Vec3 },

    /// Встаём перед target лицом к лицу
    FaceToFace { target: Entity },
}

impl CompanionMode {
    pub fn name(&self) -> &'static str {
        match self {
            CompanionMode::Idle => "Idle",
            CompanionMode::Follow { .. } => "Follow",
            CompanionMode::Destination { .. } => "Destination",
            CompanionMode::FaceToFace { .. } => "FaceToFace",
        }
    }

    /// Цель режима (Follow / FaceToFace)
    pub fn target(&self) -> Option<Entity> {
        match self {
            CompanionMode::Follow { target } | CompanionMode::FaceToFace { target } => Some(*target),
            CompanionMode::Idle | CompanionMode::Destination { .. } => None,
        }
    }

    /// Режимы, в которых база парения следует за землёй
    ///
    /// Destination землю не пересэмплирует: база замёрзла до прибытия.
    pub fn samples_ground(&self) -> bool {
        !matches!(self, CompanionMode::Destination { .. })
    }
}

/// Параметры компаньона
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct CompanionConfig {
    /// Скорость полёта (м/с)
    pub move_speed: f32,
    /// Follow: минимальная дистанция до target (стоп-дистанция)
    pub orbit_radius: f32,
    /// FaceToFace: на каком расстоянии перед target встаём
    pub face_to_face_distance: f32,
    /// Destination/FaceToFace: стоп-дистанция до точки
    pub stopping_distance: f32,
    /// Амплитуда парения (метры)
    pub float_amplitude: f32,
    /// Частота парения (циклов/сек)
    pub float_speed: f32,
    /// Скорость поворота к направлению полёта (slerp rate, 1/сек)
    pub travel_turn_rate: f32,
    /// Follow внутри orbit radius: поворот к target
    pub orbit_turn_rate: f32,
    /// FaceToFace на месте: поворот к target
    pub face_turn_rate: f32,
    pub ground: GroundSensor,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            orbit_radius: 4.0,
            face_to_face_distance: 2.0,
            stopping_distance: 0.5,
            float_amplitude: 0.25,
            float_speed: 1.0,
            travel_turn_rate: 5.0,
            orbit_turn_rate: 2.0,
            face_turn_rate: 3.0,
            ground: GroundSensor::default(),
        }
    }
}

/// Sphere robot компаньон
///
/// Автоматически добавляет CompanionConfig + Transform через Required Components.
#[derive(Component, Debug, Clone, PartialEq, Default, Reflect)]
#[reflect(Component)]
#[require(CompanionConfig, Transform)]
pub struct SphereCompanion {
    pub(crate) mode: CompanionMode,
    pub(crate) is_moving: bool,
    /// Фаза парения (рандом при активации, дальше фиксирована)
    pub(crate) float_phase: f32,
    /// Базовая высота парения (без float offset)
    pub(crate) base_hover_y: f32,
    /// SmoothDamp state для base_hover_y
    pub(crate) vertical_velocity: f32,
    pub(crate) activated: bool,
}

impl SphereCompanion {
    /// Компаньон, стартующий в заданном режиме
    pub fn with_mode(mode: CompanionMode) -> Self {
        Self { mode, ..default() }
    }

    pub fn current_mode(&self) -> CompanionMode {
        self.mode
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn float_phase(&self) -> f32 {
        self.float_phase
    }

    pub fn base_hover_y(&self) -> f32 {
        self.base_hover_y
    }

    /// Лететь в точку
    pub fn set_destination(&mut self, point: Vec3) {
        self.mode = CompanionMode::Destination { point };
    }

    /// Сбросить destination → Idle (из любого режима)
    pub fn clear_destination(&mut self) {
        self.mode = CompanionMode::Idle;
    }

    /// Следовать за target
    ///
    /// Невалидный target → Idle + ошибка.
    pub fn set_follow_target(
        &mut self,
        target: Option<Entity>,
        targets: &impl TargetLookup,
    ) -> Result<(), CompanionError> {
        match validate_target(TargetCommand::Follow, target, targets) {
            Ok(target) => {
                self.mode = CompanionMode::Follow { target };
                Ok(())
            }
            Err(err) => {
                self.mode = CompanionMode::Idle;
                Err(err)
            }
        }
    }

    /// Перестать следовать → Idle
    pub fn stop_following(&mut self) {
        self.mode = CompanionMode::Idle;
    }

    /// Встать перед target лицом к нему
    ///
    /// Невалидный target → ошибка, режим не меняется.
    pub fn face_to_face(
        &mut self,
        target: Option<Entity>,
        targets: &impl TargetLookup,
    ) -> Result<(), CompanionError> {
        let target = validate_target(TargetCommand::FaceToFace, target, targets)?;
        self.mode = CompanionMode::FaceToFace { target };
        Ok(())
    }
}

fn validate_target(
    command: TargetCommand,
    target: Option<Entity>,
    targets: &impl TargetLookup,
) -> Result<Entity, CompanionError> {
    let Some(target) = target else {
        return Err(CompanionError::MissingTarget { command });
    };

    if targets.target_pose(target).is_none() {
        return Err(CompanionError::InvalidTarget { command, target });
    }

    Ok(target)
}
