//! Level-up по переполнению XP (opt-in)
//!
//! `apply_xp_delta` сам уровень не поднимает и XP не clamp'ит.
//! Этот модуль — отдельный путь поверх него: все изменения идут через
//! обычные set-операции, так что hooks/observers видят каждый шаг.

use serde::{Deserialize, Serialize};

use crate::components::{AttributesComponent, BoundedAttribute};
use crate::logger;

/// Лимит level-up'ов за один вызов; остаток XP ждёт следующего вызова
pub const MAX_LEVEL_UPS_PER_CALL: u32 = 1000;

/// Правила прокачки
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelingRules {
    /// Множитель max XP на каждом новом уровне (1.0 = фиксированный порог)
    pub xp_growth: f32,
    /// Потолок уровня; None — без ограничения
    pub max_level: Option<i32>,
}

impl Default for LevelingRules {
    fn default() -> Self {
        Self {
            xp_growth: 1.0,
            max_level: None,
        }
    }
}

impl LevelingRules {
    fn allows(&self, next_level: i32) -> bool {
        self.max_level.map_or(true, |cap| next_level <= cap)
    }
}

impl AttributesComponent {
    /// apply_xp_delta + перенос переполнения в уровни
    ///
    /// Пока xp.current ≥ xp.max (и max > 0): level + 1 с `xp_excess`,
    /// max XP умножается на `xp_growth`, xp.current = остаток.
    /// Возвращает число полученных уровней (не больше `MAX_LEVEL_UPS_PER_CALL`).
    pub fn apply_xp_delta_with_level_up(&mut self, delta: f32, rules: &LevelingRules) -> u32 {
        self.apply_xp_delta(delta);

        let mut gained = 0;
        while gained < MAX_LEVEL_UPS_PER_CALL {
            let xp = self.xp();
            if !(xp.max > 0.0 && xp.current >= xp.max) {
                break;
            }

            let Some(next_level) = (self.level().current as i32).checked_add(1) else {
                break;
            };
            if !rules.allows(next_level) {
                break;
            }

            // ∞ XP или max ниже ULP current: вычитание не двигает значение
            let excess = xp.current - xp.max;
            if !excess.is_finite() || !(excess < xp.current) {
                break;
            }

            self.set_level_value(next_level, excess, false);
            self.attributes_mut().xp = BoundedAttribute::new(xp.current, xp.max * rules.xp_growth);
            self.set_xp_value(excess, false);
            gained += 1;
        }

        if gained > 0 {
            logger::log_info(&format!(
                "Owner {:?} gained {} level(s), now level {}",
                self.owner(),
                gained,
                self.level().current
            ));
        }
        gained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{LevelChanged, XpChanged};
    use std::sync::{Arc, Mutex};

    fn leveled_component(xp_max: f32) -> AttributesComponent {
        let mut attributes = AttributesComponent::default();
        attributes.attributes_mut().xp = BoundedAttribute::new(0.0, xp_max);
        attributes.attributes_mut().level = BoundedAttribute::new(1.0, 0.0);
        attributes
    }

    #[test]
    fn test_no_level_up_below_threshold() {
        let mut attributes = leveled_component(100.0);
        let gained = attributes.apply_xp_delta_with_level_up(99.0, &LevelingRules::default());

        assert_eq!(gained, 0);
        assert_eq!(attributes.level().current, 1.0);
        assert_eq!(attributes.xp().current, 99.0);
    }

    #[test]
    fn test_single_level_up_carries_excess() {
        let mut attributes = leveled_component(100.0);

        let excess = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&excess);
        attributes
            .observers_mut()
            .level
            .subscribe(move |e: &LevelChanged| sink.lock().unwrap().push((e.value.current, e.xp_excess)));

        let gained = attributes.apply_xp_delta_with_level_up(130.0, &LevelingRules::default());

        assert_eq!(gained, 1);
        assert_eq!(attributes.level().current, 2.0);
        assert_eq!(attributes.xp().current, 30.0);
        assert_eq!(*excess.lock().unwrap(), vec![(2.0, 30.0)]);
    }

    #[test]
    fn test_multiple_level_ups_with_growth() {
        let mut attributes = leveled_component(100.0);
        let rules = LevelingRules {
            xp_growth: 2.0,
            max_level: None,
        };

        // 100 (→2, max 200) + 200 (→3, max 400) + 50 остаток
        let gained = attributes.apply_xp_delta_with_level_up(350.0, &rules);

        assert_eq!(gained, 2);
        assert_eq!(attributes.level().current, 3.0);
        assert_eq!(attributes.xp().max, 400.0);
        assert_eq!(attributes.xp().current, 50.0);
    }

    #[test]
    fn test_level_cap_stops_leveling() {
        let mut attributes = leveled_component(100.0);
        let rules = LevelingRules {
            xp_growth: 1.0,
            max_level: Some(2),
        };

        let gained = attributes.apply_xp_delta_with_level_up(500.0, &rules);

        assert_eq!(gained, 1);
        assert_eq!(attributes.level().current, 2.0);
        assert_eq!(attributes.xp().current, 400.0); // остаток не съеден
    }

    #[test]
    fn test_zero_max_xp_never_levels() {
        let mut attributes = leveled_component(0.0);
        let gained = attributes.apply_xp_delta_with_level_up(10.0, &LevelingRules::default());

        assert_eq!(gained, 0);
        assert_eq!(attributes.xp().current, 10.0);
    }

    #[test]
    fn test_huge_xp_delta_terminates() {
        let mut attributes = leveled_component(100.0);

        // ULP(1e12) >> 100: xp.current - xp.max == xp.current
        let gained = attributes.apply_xp_delta_with_level_up(1.0e12, &LevelingRules::default());

        assert!(gained <= MAX_LEVEL_UPS_PER_CALL);
        assert_eq!(attributes.xp().current, 1.0e12);
    }

    #[test]
    fn test_infinite_xp_delta_terminates() {
        let mut attributes = leveled_component(100.0);
        let gained = attributes.apply_xp_delta_with_level_up(f32::INFINITY, &LevelingRules::default());

        assert_eq!(gained, 0);
        assert_eq!(attributes.level().current, 1.0);
        assert!(attributes.xp().current.is_infinite());
    }

    #[test]
    fn test_level_ups_capped_per_call() {
        let mut attributes = leveled_component(1.0);

        let gained = attributes.apply_xp_delta_with_level_up(5000.0, &LevelingRules::default());
        assert_eq!(gained, MAX_LEVEL_UPS_PER_CALL);
        assert_eq!(attributes.level().current, 1001.0);
        assert_eq!(attributes.xp().current, 4000.0);

        // Следующий вызов продолжает с остатка
        let gained = attributes.apply_xp_delta_with_level_up(0.0, &LevelingRules::default());
        assert_eq!(gained, MAX_LEVEL_UPS_PER_CALL);
        assert_eq!(attributes.xp().current, 3000.0);
    }

    #[test]
    fn test_level_overflow_stops() {
        let mut attributes = leveled_component(100.0);
        attributes.attributes_mut().level = BoundedAttribute::new(i32::MAX as f32, 0.0);

        let gained = attributes.apply_xp_delta_with_level_up(250.0, &LevelingRules::default());

        assert_eq!(gained, 0);
        assert_eq!(attributes.xp().current, 250.0);
    }

    #[test]
    fn test_xp_notifications_sequence() {
        let mut attributes = leveled_component(100.0);

        let deltas = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&deltas);
        attributes
            .observers_mut()
            .xp
            .subscribe(move |e: &XpChanged| sink.lock().unwrap().push((e.delta, e.value.current)));

        attributes.apply_xp_delta_with_level_up(120.0, &LevelingRules::default());

        // apply (delta 120) → set остатка (delta 0)
        assert_eq!(*deltas.lock().unwrap(), vec![(120.0, 120.0), (0.0, 20.0)]);
    }
}
