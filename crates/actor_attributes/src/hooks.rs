//! Internal hooks — реакция "изнутри" компонента до внешней рассылки
//!
//! Вызываются после мутации и ДО observers. Hook получает `&mut AttributeSet`,
//! поэтому может менять данные (death handling, бонусы за level-up).
//! Observers при этом видят тот же snapshot, что и hook (из event record).

use crate::components::AttributeSet;
use crate::events::{CustomAttributeChanged, HealthChanged, LevelChanged, OwnerKilled, XpChanged};

/// Стратегия hooks, инжектится в `AttributesComponent`
///
/// Все методы по умолчанию no-op — переопределяйте только нужные.
pub trait AttributeHooks: Send + Sync + 'static {
    fn on_health_changed(&mut self, _attributes: &mut AttributeSet, _event: &HealthChanged) {}

    fn on_xp_changed(&mut self, _attributes: &mut AttributeSet, _event: &XpChanged) {}

    /// Сюда удобно класть всё про level-up (новый max XP/Health и т.д.)
    fn on_level_changed(&mut self, _attributes: &mut AttributeSet, _event: &LevelChanged) {}

    fn on_custom_attribute_changed(
        &mut self,
        _attributes: &mut AttributeSet,
        _event: &CustomAttributeChanged,
    ) {
    }

    fn on_owner_killed(&mut self, _attributes: &mut AttributeSet, _event: &OwnerKilled) {}
}

/// Hooks по умолчанию: ничего не делают
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl AttributeHooks for NoHooks {}
