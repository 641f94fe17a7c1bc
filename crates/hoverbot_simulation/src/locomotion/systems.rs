//! Locomotion systems

use std::collections::HashMap;
use bevy::prelude::*;
use bevy::transform::helper::TransformHelper;
use crate::facing::rotate_towards;
use crate::ground::{GroundProbe, GroundSensing};
use crate::locomotion::{HeadLocomotion, LocomotionState, SwingDrivenInput, FOOT_PROBE_LIFT};
use crate::swing::SwingIntensityChanged;

/// Система: swing intensity → locomotion input
pub fn drive_locomotion_from_swing(
    mut intensity_events: EventReader<SwingIntensityChanged>,
    mut rigs: Query<(&SwingDrivenInput, &mut LocomotionState)>,
) {
    for event in intensity_events.read() {
        for (link, mut state) in rigs.iter_mut() {
            if link.detector == event.detector {
                state.set_input(event.intensity);
            }
        }
    }
}

/// Rig'и с locomotion (пишем Transform rig'а)
type RigQuery<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static HeadLocomotion, &'static mut LocomotionState, &'static mut Transform),
>;

/// Тела rig'ов (отдельные entity, доворачиваются к голове)
type BodyQuery<'w, 's> = Query<'w, 's, &'static mut Transform, Without<HeadLocomotion>>;

/// Система: движение rig'а по направлению головы + поворот тела
///
/// Голова и тело это weak handles. Despawned голова = нет направления (стоим, гравитация работает).
/// Направление головы считается до движения из актуальных Transform (TransformHelper).
pub fn move_head_locomotion(
    mut transforms: ParamSet<(TransformHelper, (RigQuery, BodyQuery))>,
    ground: GroundSensing,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    let heads: Vec<Entity> = transforms
        .p1()
        .0
        .iter()
        .filter_map(|(_, locomotion, _, _)| locomotion.head)
        .collect();

    let head_forwards: HashMap<Entity, Vec3> = {
        let helper = transforms.p0();
        heads
            .into_iter()
            .filter_map(|head| {
                helper
                    .compute_global_transform(head)
                    .ok()
                    .map(|transform| (head, transform.forward().as_vec3()))
            })
            .collect()
    };

    let (mut rigs, mut bodies) = transforms.p1();
    for (entity, locomotion, mut state, mut transform) in rigs.iter_mut() {
        let head_forward = locomotion.head.and_then(|head| head_forwards.get(&head).copied());
        let heading = HeadLocomotion::heading(head_forward);

        let probe = ground.probe_for(entity);
        let origin = transform.translation + Vec3::Y * FOOT_PROBE_LIFT;
        let clearance = probe
            .cast_down(origin, locomotion.ground_check_distance + FOOT_PROBE_LIFT, locomotion.ground_layer_mask)
            .map(|hit| hit.distance - FOOT_PROBE_LIFT);

        let was_grounded = state.grounded;
        let displacement = locomotion.step(&mut state, heading, clearance, dt);
        transform.translation += displacement;

        if was_grounded != state.grounded {
            crate::log(&format!(
                "🦶 Locomotion {:?}: grounded {} → {}",
                entity, was_grounded, state.grounded
            ));
        }

        let Some(body_entity) = locomotion.body else {
            continue;
        };

        if body_entity == entity {
            let body_forward = transform.rotation * Vec3::NEG_Z;
            if locomotion.should_rotate_body(&state, body_forward, heading) {
                transform.rotation = rotate_towards(transform.rotation, heading, locomotion.rotate_speed, dt);
            }
        } else if let Ok(mut body) = bodies.get_mut(body_entity) {
            let body_forward = body.rotation * Vec3::NEG_Z;
            if locomotion.should_rotate_body(&state, body_forward, heading) {
                body.rotation = rotate_towards(body.rotation, heading, locomotion.rotate_speed, dt);
            }
        }
    }
}
