//! Vector math helpers для swing/companion/locomotion
//!
//! Всё в горизонтальной плоскости XZ, Y — вверх (Bevy convention).

use bevy::prelude::*;

/// Проекция на горизонтальную плоскость (Y = 0)
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Горизонтальная дистанция (Y игнорируется)
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    horizontal(b - a).length()
}

/// Сдвиг `current` к `target` не больше чем на `max_delta`
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Знаковый угол (градусы) от `from` к `to` вокруг оси Y
///
/// Положительный: поворот против часовой стрелки, если смотреть сверху.
pub fn signed_angle_y(from: Vec3, to: Vec3) -> f32 {
    let from = horizontal(from).normalize_or_zero();
    let to = horizontal(to).normalize_or_zero();
    if from == Vec3::ZERO || to == Vec3::ZERO {
        return 0.0;
    }

    let unsigned = from.angle_between(to).to_degrees();
    if from.cross(to).y < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}

/// Critically damped сглаживание (SmoothDamp)
///
/// Сходится к `target` примерно за `smooth_time` секунд без колебаний.
/// `velocity`: внутреннее состояние, хранится у вызывающего между тиками.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;

    let mut output = target + (change + temp) * decay;

    // Перелёт через target запрещён
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }

    output
}
