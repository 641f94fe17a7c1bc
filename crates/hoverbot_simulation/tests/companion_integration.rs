//! Integration тесты компаньона
//!
//! Полный App: CompanionCommand события → FSM → Transform, ground через FlatGround.

use std::time::Duration;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use hoverbot_simulation::{
    create_headless_app, CompanionCommand, CompanionMode, CompanionModeChanged, FlatGround, HeadLocomotion,
    LocomotionState, SimulationPlugin, SphereCompanion,
};

fn simulation_app(ground_height: f32) -> App {
    let mut app = create_headless_app(7);
    app.add_plugins(SimulationPlugin)
        .insert_resource(FlatGround { height: ground_height })
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    app
}

fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

fn mode_changes(app: &App) -> Vec<CompanionModeChanged> {
    let events = app.world().resource::<Events<CompanionModeChanged>>();
    let mut cursor = events.get_cursor();
    cursor.read(events).cloned().collect()
}

#[test]
fn test_follow_command_settles_at_orbit_radius() {
    let mut app = simulation_app(0.0);
    let target_position = Vec3::new(10.0, 0.0, 0.0);
    let target = app.world_mut().spawn(Transform::from_translation(target_position)).id();
    let companion = app
        .world_mut()
        .spawn((SphereCompanion::default(), Transform::from_xyz(0.0, 1.5, 0.0)))
        .id();

    app.world_mut().send_event(CompanionCommand::SetFollowTarget {
        companion,
        target: Some(target),
    });
    app.update();

    let changes = mode_changes(&app);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].from, CompanionMode::Idle);
    assert_eq!(changes[0].to, CompanionMode::Follow { target });

    run_ticks(&mut app, 60);

    let position = app.world().get::<Transform>(companion).unwrap().translation;
    let distance = horizontal_distance(position, target_position);
    assert!((distance - 4.0).abs() < 1e-3, "distance = {}", distance);

    let sphere = app.world().get::<SphereCompanion>(companion).unwrap();
    assert_eq!(sphere.current_mode(), CompanionMode::Follow { target });
    assert!(!sphere.is_moving());
}

#[test]
fn test_destination_command_arrives_and_goes_idle() {
    let mut app = simulation_app(0.0);
    let companion = app
        .world_mut()
        .spawn((SphereCompanion::default(), Transform::from_xyz(0.0, 1.5, 0.0)))
        .id();
    let destination = Vec3::new(0.0, 0.0, -8.0);

    app.world_mut().send_event(CompanionCommand::SetDestination {
        companion,
        point: destination,
    });
    run_ticks(&mut app, 30);

    let position = app.world().get::<Transform>(companion).unwrap().translation;
    assert!(horizontal_distance(position, destination) <= 0.5 + 1e-3, "position = {:?}", position);

    let sphere = app.world().get::<SphereCompanion>(companion).unwrap();
    assert_eq!(sphere.current_mode(), CompanionMode::Idle);
    assert!(!sphere.is_moving());
}

#[test]
fn test_despawned_follow_target_reverts_to_idle() {
    let mut app = simulation_app(0.0);
    let ghost = app.world_mut().spawn(Transform::default()).id();
    app.world_mut().despawn(ghost);

    let companion = app
        .world_mut()
        .spawn((
            SphereCompanion::with_mode(CompanionMode::Destination { point: Vec3::new(50.0, 0.0, 0.0) }),
            Transform::from_xyz(0.0, 1.5, 0.0),
        ))
        .id();

    app.world_mut().send_event(CompanionCommand::SetFollowTarget {
        companion,
        target: Some(ghost),
    });
    app.update();

    let sphere = app.world().get::<SphereCompanion>(companion).unwrap();
    assert_eq!(sphere.current_mode(), CompanionMode::Idle);
}

#[test]
fn test_face_to_face_command_without_target_keeps_mode() {
    let mut app = simulation_app(0.0);
    let target = app.world_mut().spawn(Transform::from_xyz(5.0, 0.0, 0.0)).id();
    let companion = app
        .world_mut()
        .spawn((
            SphereCompanion::with_mode(CompanionMode::Follow { target }),
            Transform::from_xyz(0.0, 1.5, 0.0),
        ))
        .id();

    app.world_mut().send_event(CompanionCommand::FaceToFace { companion, target: None });
    app.update();

    let sphere = app.world().get::<SphereCompanion>(companion).unwrap();
    assert_eq!(sphere.current_mode(), CompanionMode::Follow { target });
    assert!(mode_changes(&app).is_empty());
}

#[test]
fn test_hover_base_follows_ground() {
    let mut app = simulation_app(2.0);
    let companion = app
        .world_mut()
        .spawn((SphereCompanion::default(), Transform::from_xyz(0.0, 6.0, 0.0)))
        .id();

    app.update();
    let base = app.world().get::<SphereCompanion>(companion).unwrap().base_hover_y();
    assert!((base - 3.5).abs() < 1e-4, "base = {}", base);

    // Земля поднялась (но ниже компаньона): база плавно догоняет (SmoothDamp, 0.3 сек)
    app.world_mut().resource_mut::<FlatGround>().height = 3.0;
    run_ticks(&mut app, 60);

    let sphere = app.world().get::<SphereCompanion>(companion).unwrap();
    assert!((sphere.base_hover_y() - 4.5).abs() < 0.01, "base = {}", sphere.base_hover_y());

    // Idle парение в пределах амплитуды вокруг базы
    let y = app.world().get::<Transform>(companion).unwrap().translation.y;
    assert!((y - sphere.base_hover_y()).abs() <= 0.25 + 1e-3, "y = {}", y);
}

#[test]
fn test_command_for_non_companion_is_ignored() {
    let mut app = simulation_app(0.0);
    let not_a_companion = app.world_mut().spawn(Transform::default()).id();

    app.world_mut().send_event(CompanionCommand::StopFollowing {
        companion: not_a_companion,
    });
    app.update();

    assert!(mode_changes(&app).is_empty());
}

#[test]
fn test_target_spawned_mid_run_is_seen_in_place() {
    let mut app = simulation_app(0.0);
    let companion = app
        .world_mut()
        .spawn((SphereCompanion::default(), Transform::from_xyz(5.0, 1.5, 0.0)))
        .id();
    run_ticks(&mut app, 3);

    let target = app.world_mut().spawn(Transform::from_xyz(10.0, 0.0, 0.0)).id();
    app.world_mut().send_event(CompanionCommand::SetFollowTarget {
        companion,
        target: Some(target),
    });
    app.update();

    // Один шаг 0.5 м к (10, 0, 0), а не к origin
    let position = app.world().get::<Transform>(companion).unwrap().translation;
    assert!((position.x - 5.5).abs() < 1e-4, "position = {:?}", position);
}

#[test]
fn test_companion_tracks_walking_rig_in_same_frame() {
    let mut app = simulation_app(0.0);
    let rig = app.world_mut().spawn(HeadLocomotion::default()).id();
    let head = app
        .world_mut()
        .spawn((Transform::from_xyz(0.0, 1.7, 0.0).looking_to(Vec3::X, Vec3::Y), ChildOf(rig)))
        .id();
    app.world_mut().get_mut::<HeadLocomotion>(rig).unwrap().head = Some(head);
    {
        let mut state = app.world_mut().get_mut::<LocomotionState>(rig).unwrap();
        state.set_input(1.0);
        state.current_speed = 2.0;
    }

    let companion = app
        .world_mut()
        .spawn((SphereCompanion::default(), Transform::from_xyz(-10.0, 1.5, 0.0)))
        .id();
    app.world_mut().send_event(CompanionCommand::SetFollowTarget {
        companion,
        target: Some(head),
    });

    // Rig уходит по +X со скоростью 2 м/с, компаньон догоняет на 5 м/с
    run_ticks(&mut app, 60);

    // Locomotion отработал раньше компаньона → ровно orbit radius до текущей позиции головы
    let rig_x = app.world().get::<Transform>(rig).unwrap().translation.x;
    let companion_x = app.world().get::<Transform>(companion).unwrap().translation.x;
    assert!(rig_x > 10.0, "rig_x = {}", rig_x);
    assert!((rig_x - companion_x - 4.0).abs() < 1e-3, "gap = {}", rig_x - companion_x);
}
