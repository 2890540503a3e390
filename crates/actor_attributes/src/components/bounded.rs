//! BoundedAttribute — пара (current, max) для Health/XP/Level/custom статов

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Числовой стат с верхней границей
///
/// Инвариант: 0.0 ≤ current ≤ max — только после clamped мутаций.
/// Сам тип ничего не проверяет: `apply_delta`, `set_value`, арифметика
/// пишут значение как есть (NaN/∞ тоже).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BoundedAttribute {
    pub current: f32,
    pub max: f32,
}

impl BoundedAttribute {
    pub fn new(current: f32, max: f32) -> Self {
        Self { current, max }
    }

    /// current = max = value
    pub fn full(value: f32) -> Self {
        Self { current: value, max: value }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn set_value(&mut self, value: f32) {
        self.current = value;
    }

    pub fn set_max_value(&mut self, value: f32) {
        self.max = value;
    }

    /// current += delta, без clamp
    pub fn apply_delta(&mut self, delta: f32) {
        self.current += delta;
    }

    /// Прижимает current к [0, max]
    pub fn clamp_to_range(&mut self) {
        self.current = clamp_value(self.current, 0.0, self.max);
    }

    pub fn clamped(mut self) -> Self {
        self.clamp_to_range();
        self
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }
}

/// Clamp без паники: `f32::clamp` падает при min > max или NaN границе,
/// а отрицательный max здесь допустимое (невалидированное) состояние.
pub fn clamp_value(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value < max {
        value
    } else {
        max
    }
}

impl AddAssign<f32> for BoundedAttribute {
    fn add_assign(&mut self, delta: f32) {
        self.current += delta;
    }
}

impl SubAssign<f32> for BoundedAttribute {
    fn sub_assign(&mut self, delta: f32) {
        self.current -= delta;
    }
}

impl Add<f32> for BoundedAttribute {
    type Output = BoundedAttribute;

    fn add(mut self, delta: f32) -> Self::Output {
        self += delta;
        self
    }
}

impl Sub<f32> for BoundedAttribute {
    type Output = BoundedAttribute;

    fn sub(mut self, delta: f32) -> Self::Output {
        self -= delta;
        self
    }
}

// Сравнение только со скаляром (по current). attribute vs attribute не определено.
impl PartialEq<f32> for BoundedAttribute {
    fn eq(&self, other: &f32) -> bool {
        self.current == *other
    }
}

impl PartialOrd<f32> for BoundedAttribute {
    fn partial_cmp(&self, other: &f32) -> Option<Ordering> {
        self.current.partial_cmp(other)
    }
}
