//! Facing helpers — yaw-only поворот к направлению
//!
//! Два режима:
//! - `rotate_towards` — ограничение по угловой скорости (градусы/сек), locomotion тела
//! - `turn_towards` — экспоненциальное приближение (slerp по rate·dt), компаньон
//!
//! Forward = -Z (Bevy convention).

use bevy::prelude::*;
use crate::math::horizontal;

/// Yaw-поворот, при котором forward (-Z) смотрит вдоль `direction`
///
/// None если направление нулевое или строго вертикальное.
pub fn yaw_rotation(direction: Vec3) -> Option<Quat> {
    let flat = horizontal(direction);
    if flat.length_squared() <= f32::EPSILON {
        return None;
    }

    let flat = flat.normalize();
    Some(Quat::from_rotation_y((-flat.x).atan2(-flat.z)))
}

/// Повернуть к `desired_forward` не больше чем на `max_degrees_per_second * dt`
pub fn rotate_towards(current: Quat, desired_forward: Vec3, max_degrees_per_second: f32, dt: f32) -> Quat {
    let Some(target) = yaw_rotation(desired_forward) else {
        return current;
    };

    let max_angle = (max_degrees_per_second * dt).to_radians().max(0.0);
    let angle = current.angle_between(target);

    if angle <= max_angle || angle <= f32::EPSILON {
        target
    } else {
        current.slerp(target, max_angle / angle)
    }
}

/// Экспоненциальный поворот к `desired_forward` со скоростью `rate` (1/сек)
pub fn turn_towards(current: Quat, desired_forward: Vec3, rate: f32, dt: f32) -> Quat {
    let Some(target) = yaw_rotation(desired_forward) else {
        return current;
    };

    current.slerp(target, (rate * dt).clamp(0.0, 1.0))
}
