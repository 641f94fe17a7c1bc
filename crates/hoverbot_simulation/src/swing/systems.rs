//! Swing detection systems.

use bevy::prelude::*;
use bevy::transform::helper::TransformHelper;
use crate::swing::{HandSwung, SwingDetector, SwingIntensityChanged};

/// Система: активация новых детекторов
///
/// Аналог OnEnable: валидация конфига + сброс позиций на первом тике.
pub fn activate_swing_detectors(mut detectors: Query<(Entity, &mut SwingDetector), Added<SwingDetector>>) {
    for (entity, mut detector) in detectors.iter_mut() {
        if let Err(err) = detector.config.validate() {
            crate::log_warning(&format!("SwingDetector {:?}: invalid config ({}), clamping", entity, err));
        }
        detector.on_activate();
    }
}

/// Система: swing detection
///
/// Читает world позиции рук, тикает детектор,
/// пишет HandSwung (edge) и SwingIntensityChanged (каждый тик).
pub fn detect_hand_swings(
    mut detectors: Query<(Entity, &mut SwingDetector)>,
    hands: TransformHelper,
    mut swung_events: EventWriter<HandSwung>,
    mut intensity_events: EventWriter<SwingIntensityChanged>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    let now = time.elapsed_secs();

    for (entity, mut detector) in detectors.iter_mut() {
        let (left_hand, right_hand) = detector.hands();
        // Из Transform по иерархии: GlobalTransform новой руки до PostUpdate ещё identity
        let left = left_hand.and_then(|hand| hand_position(&hands, hand));
        let right = right_hand.and_then(|hand| hand_position(&hands, hand));

        let Some(frame) = detector.tick(dt, now, left, right) else {
            continue;
        };

        for swing in frame.swings {
            crate::log(&format!(
                "👋 {:?} {:?} swing: speed {:.2} m/s",
                entity,
                swing.hand,
                swing.velocity.length()
            ));
            swung_events.write(HandSwung {
                detector: entity,
                hand: swing.hand,
                velocity: swing.velocity,
            });
        }

        intensity_events.write(SwingIntensityChanged {
            detector: entity,
            intensity: frame.intensity,
        });
    }
}

fn hand_position(hands: &TransformHelper, hand: Entity) -> Option<Vec3> {
    hands
        .compute_global_transform(hand)
        .ok()
        .map(|transform| transform.translation())
}
