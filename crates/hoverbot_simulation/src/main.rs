//! Headless симуляция Hoverbot
//!
//! Rig с головой и двумя руками (руки качаются по скрипту),
//! arm-swing locomotion ведёт rig вперёд, компаньон летает следом.
//! Потом — полёт в точку и face-to-face.

use std::time::Duration;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use hoverbot_simulation::{
    create_headless_app, log, CompanionCommand, FlatGround, HeadLocomotion, SimulationPlugin, SphereCompanion,
    SwingDetector, SwingDrivenInput, SwingSet,
};

const TICK_HZ: f64 = 60.0;
const TICK_COUNT: usize = 1200;

/// Скриптованная рука: качается вперёд-назад вдоль Z
#[derive(Component)]
struct ScriptedHand {
    phase: f32,
}

fn swing_hands(mut hands: Query<(&ScriptedHand, &mut Transform)>, time: Res<Time>) {
    let t = time.elapsed_secs();
    // Первые 8 секунд машем, потом руки опущены
    let amplitude = if t < 8.0 { 0.4 } else { 0.0 };
    for (hand, mut transform) in hands.iter_mut() {
        transform.translation.z = amplitude * (std::f32::consts::TAU * 1.5 * t + hand.phase).sin();
    }
}

fn main() {
    let seed = 42;
    println!("Starting Hoverbot headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(FlatGround::default())
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / TICK_HZ)))
        .add_systems(Update, swing_hands.before(SwingSet));

    let world = app.world_mut();
    let rig = world.spawn(Transform::default()).id();
    let head = world.spawn((Transform::from_xyz(0.0, 1.7, 0.0), ChildOf(rig))).id();
    let left = world
        .spawn((Transform::from_xyz(-0.3, 1.1, 0.0), ScriptedHand { phase: 0.0 }, ChildOf(rig)))
        .id();
    let right = world
        .spawn((
            Transform::from_xyz(0.3, 1.1, 0.0),
            ScriptedHand { phase: std::f32::consts::PI },
            ChildOf(rig),
        ))
        .id();
    let detector = world
        .spawn(SwingDetector::default().with_hands(Some(left), Some(right)))
        .id();
    world.entity_mut(rig).insert((
        HeadLocomotion {
            head: Some(head),
            ..default()
        },
        SwingDrivenInput { detector },
    ));

    let companion = world
        .spawn((SphereCompanion::default(), Transform::from_xyz(3.0, 1.5, 3.0)))
        .id();
    world.send_event(CompanionCommand::SetFollowTarget {
        companion,
        target: Some(head),
    });

    for tick in 0..TICK_COUNT {
        match tick {
            600 => {
                app.world_mut().send_event(CompanionCommand::SetDestination {
                    companion,
                    point: Vec3::new(-5.0, 0.0, 5.0),
                });
            }
            900 => {
                app.world_mut().send_event(CompanionCommand::FaceToFace {
                    companion,
                    target: Some(head),
                });
            }
            _ => {}
        }

        app.update();

        if tick % 100 == 0 {
            let world = app.world();
            if let (Some(rig_transform), Some(companion_transform), Some(sphere)) = (
                world.get::<Transform>(rig),
                world.get::<Transform>(companion),
                world.get::<SphereCompanion>(companion),
            ) {
                log(&format!(
                    "Tick {}: rig {:.2?}, companion {:.2?} ({})",
                    tick,
                    rig_transform.translation,
                    companion_transform.translation,
                    sphere.current_mode().name()
                ));
            }
        }
    }

    println!("Simulation complete!");
}
