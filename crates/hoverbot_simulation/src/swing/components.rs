//! Swing detector components: config, per-hand трекер, ring buffer скоростей.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;

/// Максимальное окно сглаживания скорости (кадры)
pub const MAX_SMOOTHING_FRAMES: usize = 10;

/// Какая рука
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum HandSide {
    Left,
    Right,
}

/// Параметры swing detection
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct SwingConfig {
    /// Минимальная линейная скорость для swing (м/с)
    pub swing_speed_threshold: f32,
    /// Минимальное время между swing событиями одной руки (секунды)
    pub trigger_cooldown: f32,
    /// Сглаживание скорости: сколько кадров усреднять (0..=10, 0 = без сглаживания)
    pub velocity_smoothing_frames: usize,
    /// Скорость "полного" swing'а (intensity = 1)
    pub swing_speed_max: f32,
}

impl Default for SwingConfig {
    fn default() -> Self {
        Self {
            swing_speed_threshold: 1.2,
            trigger_cooldown: 0.25,
            velocity_smoothing_frames: 2,
            swing_speed_max: 3.0,
        }
    }
}

impl SwingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("swing_speed_threshold", self.swing_speed_threshold),
            ("trigger_cooldown", self.trigger_cooldown),
            ("swing_speed_max", self.swing_speed_max),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.velocity_smoothing_frames > MAX_SMOOTHING_FRAMES {
            return Err(ConfigError::SmoothingWindow {
                value: self.velocity_smoothing_frames,
                max: MAX_SMOOTHING_FRAMES,
            });
        }

        Ok(())
    }

    /// Окно сглаживания, зажатое в допустимый диапазон
    pub fn smoothing_window(&self) -> usize {
        self.velocity_smoothing_frames.min(MAX_SMOOTHING_FRAMES)
    }

    /// Нормализованная скорость 0..1 для continuous intensity
    ///
    /// Вырожденный конфиг (max <= threshold) → бинарный режим: 1 iff speed >= threshold.
    pub fn normalize_speed(&self, speed: f32) -> f32 {
        if self.swing_speed_max <= self.swing_speed_threshold {
            return if speed >= self.swing_speed_threshold { 1.0 } else { 0.0 };
        }

        if speed <= self.swing_speed_threshold {
            return 0.0;
        }

        ((speed - self.swing_speed_threshold) / (self.swing_speed_max - self.swing_speed_threshold)).clamp(0.0, 1.0)
    }
}

/// Bounded FIFO сырых скоростей (ring buffer фиксированной ёмкости)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityHistory {
    samples: [Vec3; MAX_SMOOTHING_FRAMES],
    start: usize,
    len: usize,
}

impl Default for VelocityHistory {
    fn default() -> Self {
        Self {
            samples: [Vec3::ZERO; MAX_SMOOTHING_FRAMES],
            start: 0,
            len: 0,
        }
    }
}

impl VelocityHistory {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.start = 0;
        self.len = 0;
    }

    /// Добавить сэмпл и вернуть среднее по окну `window`
    ///
    /// window == 0 → identity, история не трогается.
    /// Самые старые сэмплы вытесняются, пока размер > window.
    pub fn push_and_average(&mut self, velocity: Vec3, window: usize) -> Vec3 {
        let window = window.min(MAX_SMOOTHING_FRAMES);
        if window == 0 {
            return velocity;
        }

        // Освобождаем место (окно могло уменьшиться на лету)
        while self.len >= window {
            self.start = (self.start + 1) % MAX_SMOOTHING_FRAMES;
            self.len -= 1;
        }

        let slot = (self.start + self.len) % MAX_SMOOTHING_FRAMES;
        self.samples[slot] = velocity;
        self.len += 1;

        self.iter().sum::<Vec3>() / self.len as f32
    }

    /// Сэмплы от самого старого к самому новому
    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.len).map(move |i| self.samples[(self.start + i) % MAX_SMOOTHING_FRAMES])
    }
}

/// Состояние одной отслеживаемой руки
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandTracker {
    pub previous_position: Vec3,
    /// Сглаженная скорость последнего тика
    pub velocity: Vec3,
    pub history: VelocityHistory,
    /// Время последнего swing события (секунды, монотонные)
    pub last_trigger_time: f32,
}

impl Default for HandTracker {
    fn default() -> Self {
        Self {
            previous_position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            history: VelocityHistory::default(),
            last_trigger_time: f32::NEG_INFINITY,
        }
    }
}

impl HandTracker {
    /// Сброс на новую позицию (без скачка скорости от старых данных)
    pub fn reset(&mut self, position: Vec3) {
        self.previous_position = position;
        self.history.clear();
    }

    /// Шаг трекинга: raw velocity → сглаживание → edge trigger
    ///
    /// Возвращает Some(velocity) если этот тик: swing событие.
    pub fn track(&mut self, position: Vec3, dt: f32, now: f32, config: &SwingConfig) -> Option<Vec3> {
        let raw = (position - self.previous_position) / dt;
        self.previous_position = position;
        self.velocity = self.history.push_and_average(raw, config.smoothing_window());

        if self.velocity.length() < config.swing_speed_threshold {
            return None;
        }
        if now - self.last_trigger_time < config.trigger_cooldown {
            return None;
        }

        self.last_trigger_time = now;
        Some(self.velocity)
    }
}

/// Один swing (edge trigger) за тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSwing {
    pub hand: HandSide,
    pub velocity: Vec3,
}

/// Результат тика детектора
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwingFrame {
    /// Continuous intensity 0..1 (max по обеим рукам)
    pub intensity: f32,
    /// Discrete события этого тика (0..=2)
    pub swings: Vec<HandSwing>,
}

/// Swing detector: компонент на entity XR rig'а
///
/// Руки: weak handles (Entity), позиции читаются каждый тик системой.
/// Despawned рука просто пропускается.
#[derive(Component, Debug, Clone)]
pub struct SwingDetector {
    pub config: SwingConfig,
    left_hand: Option<Entity>,
    right_hand: Option<Entity>,
    left: HandTracker,
    right: HandTracker,
    intensity: f32,
    /// Сброс previous positions + истории на следующем тике
    pending_reset: bool,
}

impl Default for SwingDetector {
    fn default() -> Self {
        Self::new(SwingConfig::default())
    }
}

impl SwingDetector {
    pub fn new(config: SwingConfig) -> Self {
        Self {
            config,
            left_hand: None,
            right_hand: None,
            left: HandTracker::default(),
            right: HandTracker::default(),
            intensity: 0.0,
            pending_reset: true,
        }
    }

    pub fn with_hands(mut self, left: Option<Entity>, right: Option<Entity>) -> Self {
        self.set_hands(left, right);
        self
    }

    /// Назначить руки (runtime). Истории и previous positions сбросятся на следующем тике.
    pub fn set_hands(&mut self, left: Option<Entity>, right: Option<Entity>) {
        self.left_hand = left;
        self.right_hand = right;
        self.pending_reset = true;
    }

    /// Lifecycle: детектор (ре)активирован
    pub fn on_activate(&mut self) {
        self.pending_reset = true;
    }

    pub fn hands(&self) -> (Option<Entity>, Option<Entity>) {
        (self.left_hand, self.right_hand)
    }

    pub fn left_velocity(&self) -> Vec3 {
        self.left.velocity
    }

    pub fn right_velocity(&self) -> Vec3 {
        self.right.velocity
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn tracker(&self, hand: HandSide) -> &HandTracker {
        match hand {
            HandSide::Left => &self.left,
            HandSide::Right => &self.right,
        }
    }

    /// Тик детектора
    ///
    /// `left` / `right`: текущие world позиции рук (None = руки нет / despawned).
    /// dt <= 0 → тик пропущен целиком (None, без мутаций).
    pub fn tick(&mut self, dt: f32, now: f32, left: Option<Vec3>, right: Option<Vec3>) -> Option<SwingFrame> {
        if dt <= 0.0 {
            return None;
        }

        if self.pending_reset {
            if let Some(position) = left {
                self.left.reset(position);
            }
            if let Some(position) = right {
                self.right.reset(position);
            }
            self.left.history.clear();
            self.right.history.clear();
            self.pending_reset = false;
        }

        let mut frame = SwingFrame::default();
        let config = self.config;

        for (hand, tracker, position) in [
            (HandSide::Left, &mut self.left, left),
            (HandSide::Right, &mut self.right, right),
        ] {
            let Some(position) = position else {
                continue;
            };

            if let Some(velocity) = tracker.track(position, dt, now, &config) {
                frame.swings.push(HandSwing { hand, velocity });
            }

            frame.intensity = frame.intensity.max(config.normalize_speed(tracker.velocity.length()));
        }

        self.intensity = frame.intensity;
        Some(frame)
    }
}
