//! Tests for companion behavior (чистая логика, без App).

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use bevy::prelude::*;
    use crate::companion::*;
    use crate::ground::{FlatGround, NoGround};
    use crate::math::horizontal_distance;

    const DT: f32 = 0.1;

    fn spawn_companion(position: Vec3, mode: CompanionMode) -> (SphereCompanion, Transform, CompanionConfig) {
        let config = CompanionConfig::default();
        let transform = Transform::from_translation(position);
        let mut companion = SphereCompanion::with_mode(mode);
        companion.on_activate(&transform, &config, &FlatGround { height: 0.0 }, 0.0);
        (companion, transform, config)
    }

    fn forward_of(transform: &Transform) -> Vec3 {
        transform.rotation * Vec3::NEG_Z
    }

    #[test]
    fn test_seek_moves_by_max_step() {
        let step = seek_towards(Vec3::new(0.0, 2.0, 0.0), Vec3::new(10.0, -5.0, 0.0), 0.5, 0.5);
        assert!(!step.arrived);
        assert_eq!(step.position, Vec3::new(0.5, 2.0, 0.0)); // Y не трогаем
        assert_eq!(step.direction, Vec3::X);
    }

    #[test]
    fn test_seek_never_crosses_stop_distance() {
        let step = seek_towards(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 5.0, 0.5);
        assert!(!step.arrived);
        assert!((step.position.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_seek_arrived_within_stop_distance() {
        let current = Vec3::new(0.0, 3.0, 0.0);
        let step = seek_towards(current, Vec3::new(0.3, 100.0, 0.0), 1.0, 0.5);
        assert!(step.arrived);
        assert_eq!(step.position, current);
    }

    #[test]
    fn test_activation_base_from_ground() {
        let (companion, _, _) = spawn_companion(Vec3::new(0.0, 4.0, 0.0), CompanionMode::Idle);
        // Земля на 0 → база = 0 + height_offset 1.5
        assert!((companion.base_hover_y() - 1.5).abs() < 1e-5);
        assert!(companion.is_activated());

        let mut companion = SphereCompanion::default();
        companion.on_activate(
            &Transform::from_xyz(0.0, 7.0, 0.0),
            &CompanionConfig::default(),
            &NoGround,
            1.0,
        );
        assert_eq!(companion.base_hover_y(), 7.0);
        assert_eq!(companion.float_phase(), 1.0);
    }

    #[test]
    fn test_destination_arrival_then_idle() {
        let (mut companion, mut transform, config) = spawn_companion(Vec3::new(0.0, 1.5, 0.0), CompanionMode::Idle);
        let targets: HashMap<Entity, TargetPose> = HashMap::new();
        let destination = Vec3::new(10.0, 0.0, 0.0);
        companion.set_destination(destination);

        // ⌈(10 - 0.5) / 0.5⌉ = 19 тиков полёта
        for tick in 0..19 {
            companion.tick(&mut transform, &config, DT, tick as f32 * DT, &targets);
            assert!(matches!(companion.current_mode(), CompanionMode::Destination { .. }));
            assert!(companion.is_moving());
            assert_eq!(transform.translation.y, companion.base_hover_y()); // без парения в полёте
        }
        assert!(horizontal_distance(transform.translation, destination) <= 0.5 + 1e-3);

        let mut arrived_at = None;
        for tick in 19..22 {
            companion.tick(&mut transform, &config, DT, tick as f32 * DT, &targets);
            if companion.current_mode() == CompanionMode::Idle {
                arrived_at = Some(tick);
                break;
            }
        }
        assert!(arrived_at.is_some(), "never arrived: {:?}", transform.translation);
        assert!(!companion.is_moving());

        // Прибытие терминально: Idle и стоим
        let position = transform.translation;
        for tick in 22..40 {
            companion.tick(&mut transform, &config, DT, tick as f32 * DT, &targets);
            assert_eq!(companion.current_mode(), CompanionMode::Idle);
        }
        assert!(horizontal_distance(position, transform.translation) < 1e-6);
    }

    #[test]
    fn test_follow_stops_at_orbit_radius() {
        let target = Entity::from_raw(1);
        let mut targets = HashMap::new();
        targets.insert(target, TargetPose::at(Vec3::new(10.0, 0.0, 0.0)));

        let (mut companion, mut transform, config) =
            spawn_companion(Vec3::new(0.0, 1.5, 0.0), CompanionMode::Follow { target });

        for tick in 0..60 {
            companion.tick(&mut transform, &config, DT, tick as f32 * DT, &targets);
            let distance = horizontal_distance(transform.translation, Vec3::new(10.0, 0.0, 0.0));
            assert!(distance >= 4.0 - 1e-4, "crossed orbit radius: {}", distance);
        }

        let distance = horizontal_distance(transform.translation, Vec3::new(10.0, 0.0, 0.0));
        assert!((distance - 4.0).abs() < 1e-3, "distance = {}", distance);
        assert!(!companion.is_moving());
        assert!(matches!(companion.current_mode(), CompanionMode::Follow { .. }));

        // Цель ушла дальше: снова догоняем
        targets.insert(target, TargetPose::at(Vec3::new(20.0, 0.0, 0.0)));
        companion.tick(&mut transform, &config, DT, 6.0, &targets);
        assert!(companion.is_moving());

        for tick in 61..120 {
            companion.tick(&mut transform, &config, DT, tick as f32 * DT, &targets);
        }
        let distance = horizontal_distance(transform.translation, Vec3::new(20.0, 0.0, 0.0));
        assert!((distance - 4.0).abs() < 1e-3, "distance = {}", distance);
    }

    #[test]
    fn test_follow_faces_travel_direction() {
        let target = Entity::from_raw(1);
        let mut targets = HashMap::new();
        targets.insert(target, TargetPose::at(Vec3::new(30.0, 0.0, 0.0)));

        let (mut companion, mut transform, config) =
            spawn_companion(Vec3::new(0.0, 1.5, 0.0), CompanionMode::Follow { target });

        for tick in 0..20 {
            companion.tick(&mut transform, &config, DT, tick as f32 * DT, &targets);
        }

        // Экспоненциально довернулись к +X
        assert!(forward_of(&transform).dot(Vec3::X) > 0.99, "forward = {:?}", forward_of(&transform));
        assert!(forward_of(&transform).y.abs() < 1e-4);
    }

    #[test]
    fn test_follow_lost_target_hovers_without_mode_change() {
        let target = Entity::from_raw(1);
        let targets: HashMap<Entity, TargetPose> = HashMap::new();
        let (mut companion, mut transform, config) =
            spawn_companion(Vec3::new(3.0, 1.5, 3.0), CompanionMode::Follow { target });

        companion.tick(&mut transform, &config, DT, 0.5, &targets);

        assert_eq!(companion.current_mode(), CompanionMode::Follow { target });
        assert!(!companion.is_moving());
        assert_eq!(transform.translation.x, 3.0);
        assert_eq!(transform.translation.z, 3.0);
        let expected_y = companion.base_hover_y() + companion.float_offset(&config, 0.5);
        assert!((transform.translation.y - expected_y).abs() < 1e-5);
    }

    #[test]
    fn test_idle_float_oscillation() {
        let targets: HashMap<Entity, TargetPose> = HashMap::new();
        let config = CompanionConfig::default(); // amplitude 0.25, 1 cycle/sec
        let mut transform = Transform::from_xyz(0.0, 2.0, 0.0);
        let mut companion = SphereCompanion::default();
        companion.on_activate(&transform, &config, &NoGround, 0.7);
        let base = companion.base_hover_y();

        companion.tick(&mut transform, &config, 0.05, 0.0, &targets);
        let start_y = transform.translation.y;

        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for step in 1..=20 {
            companion.tick(&mut transform, &config, 0.05, step as f32 * 0.05, &targets);
            min_y = min_y.min(transform.translation.y);
            max_y = max_y.max(transform.translation.y);
        }

        assert!(min_y >= base - 0.25 - 1e-5, "min_y = {}", min_y);
        assert!(max_y <= base + 0.25 + 1e-5, "max_y = {}", max_y);
        // Реально качаемся, а не стоим
        assert!(max_y - min_y > 0.4);
        // Через 1 секунду (период): та же фаза
        assert!((transform.translation.y - start_y).abs() < 1e-4);
    }

    #[test]
    fn test_face_to_face_stands_in_front_and_faces_target() {
        let target = Entity::from_raw(2);
        let mut targets = HashMap::new();
        // Цель в origin, смотрит в -Z → anchor (0, 0, -2)
        targets.insert(target, TargetPose::at(Vec3::ZERO));

        let (mut companion, mut transform, config) =
            spawn_companion(Vec3::new(0.0, 1.5, -10.0), CompanionMode::FaceToFace { target });

        for tick in 0..80 {
            companion.tick(&mut transform, &config, DT, tick as f32 * DT, &targets);
        }

        let anchor = Vec3::new(0.0, 0.0, -2.0);
        assert!(horizontal_distance(transform.translation, anchor) <= 0.5 + 1e-3);
        assert!(!companion.is_moving());
        assert!(matches!(companion.current_mode(), CompanionMode::FaceToFace { .. }));
        // Смотрим на цель (+Z от anchor)
        assert!(forward_of(&transform).dot(Vec3::Z) > 0.99, "forward = {:?}", forward_of(&transform));
    }

    #[test]
    fn test_face_to_face_anchor_ignores_target_pitch() {
        let target = Entity::from_raw(2);
        let mut targets = HashMap::new();
        targets.insert(
            target,
            TargetPose {
                position: Vec3::new(0.0, 1.7, 0.0),
                // Голова смотрит вниз-вперёд по +X
                forward: Vec3::new(1.0, -1.0, 0.0).normalize(),
            },
        );

        let (mut companion, mut transform, config) =
            spawn_companion(Vec3::new(10.0, 1.5, 0.0), CompanionMode::FaceToFace { target });

        for tick in 0..80 {
            companion.tick(&mut transform, &config, DT, tick as f32 * DT, &targets);
        }

        // Anchor = (2, _, 0): горизонтальная проекция forward * 2
        assert!(horizontal_distance(transform.translation, Vec3::new(2.0, 0.0, 0.0)) <= 0.5 + 1e-3);
    }

    #[test]
    fn test_face_to_face_lost_target_goes_idle() {
        let target = Entity::from_raw(2);
        let targets: HashMap<Entity, TargetPose> = HashMap::new();
        let (mut companion, mut transform, config) =
            spawn_companion(Vec3::new(0.0, 1.5, 0.0), CompanionMode::FaceToFace { target });

        companion.tick(&mut transform, &config, DT, 0.0, &targets);
        assert_eq!(companion.current_mode(), CompanionMode::Idle);
    }

    #[test]
    fn test_post_tick_tracks_ground_except_destination() {
        let ground = FlatGround { height: 1.0 };

        // Idle: база ползёт к 1.0 + 1.5
        let (mut companion, transform, config) = spawn_companion(Vec3::new(0.0, 2.0, 0.0), CompanionMode::Idle);
        let before = companion.base_hover_y();
        companion.post_tick(&transform, &config, &ground, DT);
        assert!(companion.base_hover_y() > before);

        // Destination: база заморожена
        let (mut companion, transform, config) = spawn_companion(
            Vec3::new(0.0, 2.0, 0.0),
            CompanionMode::Destination { point: Vec3::new(5.0, 0.0, 0.0) },
        );
        let before = companion.base_hover_y();
        companion.post_tick(&transform, &config, &ground, DT);
        assert_eq!(companion.base_hover_y(), before);
    }

    #[test]
    fn test_post_tick_holds_base_without_ground() {
        let (mut companion, transform, config) = spawn_companion(Vec3::new(0.0, 2.0, 0.0), CompanionMode::Idle);
        let before = companion.base_hover_y();
        companion.post_tick(&transform, &config, &NoGround, DT);
        assert_eq!(companion.base_hover_y(), before);
    }
}
