//! Companion systems (activate → commands → tick → post_tick).

use rand::Rng;
use std::collections::HashMap;
use std::f32::consts::TAU;
use bevy::prelude::*;
use bevy::transform::helper::TransformHelper;
use crate::DeterministicRng;
use crate::companion::{
    CompanionCommand, CompanionConfig, CompanionModeChanged, SphereCompanion, TargetLookup, TargetPose,
};
use crate::ground::GroundSensing;

/// Система: активация новых компаньонов
///
/// Фаза парения из DeterministicRng (детерминизм при одинаковом seed),
/// базовая высота от земли под компаньоном.
pub fn activate_companions(
    mut companions: Query<(Entity, &Transform, &CompanionConfig, &mut SphereCompanion), Added<SphereCompanion>>,
    ground: GroundSensing,
    mut rng: ResMut<DeterministicRng>,
) {
    for (entity, transform, config, mut companion) in companions.iter_mut() {
        let phase = rng.rng.gen_range(0.0..TAU);
        let probe = ground.probe_for(entity);
        companion.on_activate(transform, config, &probe, phase);

        crate::log(&format!(
            "🔵 Companion {:?} activated: mode {}, base hover {:.2}",
            entity,
            companion.current_mode().name(),
            companion.base_hover_y()
        ));
    }
}

/// Система: применение CompanionCommand событий
///
/// Невалидные цели не роняют симуляцию: warning в лог.
pub fn apply_companion_commands(
    mut commands: EventReader<CompanionCommand>,
    mut companions: Query<&mut SphereCompanion>,
    targets: TransformHelper,
    mut mode_events: EventWriter<CompanionModeChanged>,
) {
    for command in commands.read() {
        let entity = command.companion();
        let Ok(mut companion) = companions.get_mut(entity) else {
            crate::log_warning(&format!("CompanionCommand: {:?} is not a companion ({:?})", entity, command));
            continue;
        };

        let from = companion.current_mode();
        let result = match command {
            CompanionCommand::SetDestination { point, .. } => {
                companion.set_destination(*point);
                Ok(())
            }
            CompanionCommand::ClearDestination { .. } => {
                companion.clear_destination();
                Ok(())
            }
            CompanionCommand::SetFollowTarget { target, .. } => companion.set_follow_target(*target, &targets),
            CompanionCommand::StopFollowing { .. } => {
                companion.stop_following();
                Ok(())
            }
            CompanionCommand::FaceToFace { target, .. } => companion.face_to_face(*target, &targets),
        };

        if let Err(err) = result {
            crate::log_warning(&format!("Companion {:?}: {}", entity, err));
        }

        let to = companion.current_mode();
        if from != to {
            crate::log(&format!("Companion {:?}: {} → {}", entity, from.name(), to.name()));
            mode_events.write(CompanionModeChanged { companion: entity, from, to });
        }
    }
}

/// Компаньон с конфигом и transform'ом (пишем в Transform)
type CompanionQuery<'w, 's> =
    Query<'w, 's, (Entity, &'static mut Transform, &'static CompanionConfig, &'static mut SphereCompanion)>;

/// Система: тик FSM компаньонов
///
/// Позы целей считаются до тика из актуальных Transform (TransformHelper),
/// потом компаньоны двигаются. ParamSet: оба пути читают/пишут Transform.
pub fn tick_companions(
    mut transforms: ParamSet<(CompanionQuery, TransformHelper)>,
    mut mode_events: EventWriter<CompanionModeChanged>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    let now = time.elapsed_secs();

    let wanted: Vec<Entity> = transforms
        .p0()
        .iter()
        .filter(|(_, _, _, companion)| companion.is_activated())
        .filter_map(|(_, _, _, companion)| companion.current_mode().target())
        .collect();

    let targets: HashMap<Entity, TargetPose> = {
        let helper = transforms.p1();
        wanted
            .into_iter()
            .filter_map(|target| helper.target_pose(target).map(|pose| (target, pose)))
            .collect()
    };

    let mut companions = transforms.p0();
    for (entity, mut transform, config, mut companion) in companions.iter_mut() {
        if !companion.is_activated() {
            continue;
        }

        let from = companion.current_mode();
        companion.tick(&mut transform, config, dt, now, &targets);

        let to = companion.current_mode();
        if from != to {
            crate::log(&format!("Companion {:?}: {} → {}", entity, from.name(), to.name()));
            mode_events.write(CompanionModeChanged { companion: entity, from, to });
        }
    }
}

/// Система: post-tick (LateUpdate аналог), база парения за землёй
pub fn resample_companion_ground(
    mut companions: Query<(Entity, &Transform, &CompanionConfig, &mut SphereCompanion)>,
    ground: GroundSensing,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (entity, transform, config, mut companion) in companions.iter_mut() {
        if !companion.is_activated() {
            continue;
        }

        let probe = ground.probe_for(entity);
        companion.post_tick(transform, config, &probe, dt);
    }
}
