//! Companion events — команды извне и уведомления о смене режима

use bevy::prelude::*;
use crate::companion::CompanionMode;

/// Команды компаньону (UI, голос, скрипты сцены)
///
/// Применяются в `CompanionSet::Commands` до тика: эффект в том же кадре.
#[derive(Event, Debug, Clone)]
pub enum CompanionCommand {
    SetDestination {
        companion: Entity,
        point: Vec3,
    },

    ClearDestination {
        companion: Entity,
    },

    /// None target → warning, компаньон в Idle
    SetFollowTarget {
        companion: Entity,
        target: Option<Entity>,
    },

    StopFollowing {
        companion: Entity,
    },

    /// None/невалидный target → warning, режим не меняется
    FaceToFace {
        companion: Entity,
        target: Option<Entity>,
    },
}

impl CompanionCommand {
    pub fn companion(&self) -> Entity {
        match self {
            CompanionCommand::SetDestination { companion, .. }
            | CompanionCommand::ClearDestination { companion }
            | CompanionCommand::SetFollowTarget { companion, .. }
            | CompanionCommand::StopFollowing { companion }
            | CompanionCommand::FaceToFace { companion, .. } => *companion,
        }
    }
}

/// Event: режим компаньона сменился (команда или внутренний переход)
#[derive(Event, Debug, Clone)]
pub struct CompanionModeChanged {
    pub companion: Entity,
    pub from: CompanionMode,
    pub to: CompanionMode,
}
