//! Companion behavior — per-tick логика FSM без ECS
//!
//! Lifecycle (вызывается системами, но работает и без App):
//! 1. on_activate — фаза парения + стартовая база от земли
//! 2. tick — движение/поворот по текущему режиму
//! 3. post_tick — пересэмплинг земли (кроме Destination)

use std::f32::consts::TAU;
use bevy::prelude::*;
use crate::companion::{CompanionConfig, CompanionMode, SphereCompanion, TargetLookup};
use crate::facing::turn_towards;
use crate::ground::GroundProbe;
use crate::math::horizontal;

/// Результат шага seek в горизонтальной плоскости
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekStep {
    /// Новая позиция (Y = Y исходной позиции)
    pub position: Vec3,
    /// Уже в пределах stop distance: не двигались
    pub arrived: bool,
    /// Единичное горизонтальное направление к цели (ноль если на месте)
    pub direction: Vec3,
}

/// Шаг к `target` по XZ, не ближе `stop_distance`
///
/// d <= stop → arrived, без движения.
/// Иначе сдвиг на min(max_step, d - stop) вдоль направления.
pub fn seek_towards(current: Vec3, target: Vec3, max_step: f32, stop_distance: f32) -> SeekStep {
    let to_target = horizontal(target - current);
    let distance = to_target.length();
    let direction = to_target.normalize_or_zero();

    if distance <= stop_distance {
        return SeekStep {
            position: current,
            arrived: true,
            direction,
        };
    }

    let step = max_step.max(0.0).min(distance - stop_distance);
    SeekStep {
        position: current + direction * step,
        arrived: false,
        direction,
    }
}

impl SphereCompanion {
    /// Lifecycle: активация (OnEnable)
    pub fn on_activate(
        &mut self,
        transform: &Transform,
        config: &CompanionConfig,
        probe: &impl GroundProbe,
        float_phase: f32,
    ) {
        self.float_phase = float_phase;
        self.base_hover_y = config.ground.initial_base_hover(probe, transform.translation);
        self.vertical_velocity = 0.0;
        self.is_moving = false;
        self.activated = true;
    }

    /// Вертикальное смещение парения в момент `now`
    pub fn float_offset(&self, config: &CompanionConfig, now: f32) -> f32 {
        config.float_amplitude * (TAU * config.float_speed * now + self.float_phase).sin()
    }

    /// Lifecycle: тик FSM
    ///
    /// `now`: монотонное время (секунды) для фазы парения.
    pub fn tick(
        &mut self,
        transform: &mut Transform,
        config: &CompanionConfig,
        dt: f32,
        now: f32,
        targets: &impl TargetLookup,
    ) {
        if dt < 0.0 {
            return;
        }

        match self.mode {
            CompanionMode::Idle => self.hover(transform, config, now),
            CompanionMode::Follow { target } => self.tick_follow(transform, config, dt, now, targets, target),
            CompanionMode::Destination { point } => self.tick_destination(transform, config, dt, point),
            CompanionMode::FaceToFace { target } => self.tick_face_to_face(transform, config, dt, now, targets, target),
        }
    }

    /// Lifecycle: после тика (LateUpdate), база парения следует за землёй
    pub fn post_tick(
        &mut self,
        transform: &Transform,
        config: &CompanionConfig,
        probe: &impl GroundProbe,
        dt: f32,
    ) {
        if !self.mode.samples_ground() {
            return;
        }

        self.base_hover_y = config.ground.update_base_hover(
            probe,
            self.base_hover_y,
            transform.translation,
            dt,
            &mut self.vertical_velocity,
        );
    }

    /// На месте: Y = база + парение
    fn hover(&mut self, transform: &mut Transform, config: &CompanionConfig, now: f32) {
        self.is_moving = false;
        transform.translation.y = self.base_hover_y + self.float_offset(config, now);
    }

    /// Шаг полёта: XZ из seek, Y прибит к базе (без парения), поворот к курсу
    fn travel(&mut self, transform: &mut Transform, config: &CompanionConfig, dt: f32, step: &SeekStep) {
        self.is_moving = true;
        transform.translation = Vec3::new(step.position.x, self.base_hover_y, step.position.z);
        transform.rotation = turn_towards(transform.rotation, step.direction, config.travel_turn_rate, dt);
    }

    fn tick_follow(
        &mut self,
        transform: &mut Transform,
        config: &CompanionConfig,
        dt: f32,
        now: f32,
        targets: &impl TargetLookup,
        target: Entity,
    ) {
        // Цель пропала: ведём себя как Idle, но режим не трогаем
        let Some(pose) = targets.target_pose(target) else {
            self.hover(transform, config, now);
            return;
        };

        let step = seek_towards(transform.translation, pose.position, config.move_speed * dt, config.orbit_radius);
        if !step.arrived {
            self.travel(transform, config, dt, &step);
            return;
        }

        // Внутри orbit radius: парим и медленно поворачиваемся к цели
        self.hover(transform, config, now);
        transform.rotation = turn_towards(transform.rotation, step.direction, config.orbit_turn_rate, dt);
    }

    fn tick_destination(&mut self, transform: &mut Transform, config: &CompanionConfig, dt: f32, point: Vec3) {
        let step = seek_towards(transform.translation, point, config.move_speed * dt, config.stopping_distance);
        if !step.arrived {
            self.travel(transform, config, dt, &step);
            return;
        }

        // Прибыли: destination одноразовый
        self.is_moving = false;
        self.mode = CompanionMode::Idle;
    }

    fn tick_face_to_face(
        &mut self,
        transform: &mut Transform,
        config: &CompanionConfig,
        dt: f32,
        now: f32,
        targets: &impl TargetLookup,
        target: Entity,
    ) {
        let Some(pose) = targets.target_pose(target) else {
            self.mode = CompanionMode::Idle;
            return;
        };

        let facing = horizontal(pose.forward).normalize_or_zero();
        let anchor = pose.position + facing * config.face_to_face_distance;

        let step = seek_towards(transform.translation, anchor, config.move_speed * dt, config.stopping_distance);
        if !step.arrived {
            self.travel(transform, config, dt, &step);
            return;
        }

        self.hover(transform, config, now);
        let look = horizontal(pose.position - transform.translation);
        transform.rotation = turn_towards(transform.rotation, look, config.face_turn_rate, dt);
    }
}
