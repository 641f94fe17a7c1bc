//! Ошибки, видимые вызывающему коду
//!
//! Деградация из-за данных движка (пропала рука, despawn цели, нет земли) —
//! НЕ ошибка, там свои fallback'и. Сюда попадает только misuse API.

use bevy::prelude::Entity;
use thiserror::Error;

/// Команда компаньону, требующая валидную цель
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetCommand {
    Follow,
    FaceToFace,
}

impl std::fmt::Display for TargetCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetCommand::Follow => write!(f, "set_follow_target"),
            TargetCommand::FaceToFace => write!(f, "face_to_face"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompanionError {
    #[error("{command}: target is missing")]
    MissingTarget { command: TargetCommand },

    #[error("{command}: target {target:?} has no transform (despawned?)")]
    InvalidTarget { command: TargetCommand, target: Entity },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be >= 0 (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("smoothing window must be in 0..={max} (got {value})")]
    SmoothingWindow { value: usize, max: usize },
}
