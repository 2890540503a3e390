//! AttributesComponent — Health/XP/Level + custom атрибуты актора
//!
//! Протокол любой мутации: mutate → internal hook → observers → relay outbox.
//! Всё синхронно, на потоке вызывающего. Ни одна операция не падает
//! и ничего не валидирует (кроме clamp одного атрибута).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::bounded::{clamp_value, BoundedAttribute};
use super::table::CustomAttributeTable;
use crate::events::{
    AttributeChanged, AttributeEvent, CustomAttributeChanged, HealthChanged, LevelChanged,
    OwnerKilled, XpChanged,
};
use crate::hooks::{AttributeHooks, NoHooks};
use crate::logger;
use crate::observers::AttributeObservers;

/// Сохраняемая часть компонента
///
/// Save-система хоста (де)сериализует её как есть, формат не наш.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeSet {
    pub health: BoundedAttribute,
    pub xp: BoundedAttribute,
    pub level: BoundedAttribute,
    pub start_level: i32,
    #[serde(default)]
    pub custom: CustomAttributeTable,
}

/// Атрибуты актора (один компонент на entity)
///
/// Хост держит единственную ссылку; `owner` передаётся при создании
/// и попадает в каждый event. До первой мутации нужен `initialize()`
/// (`AttributesPlugin` делает это сам при добавлении компонента).
#[derive(Component)]
pub struct AttributesComponent {
    owner: Entity,
    state: AttributeSet,
    hooks: Box<dyn AttributeHooks>,
    observers: AttributeObservers,
    initialized: bool,
    relay_enabled: bool,
    outbox: Vec<AttributeEvent>,
}

impl Default for AttributesComponent {
    fn default() -> Self {
        Self::new(Entity::PLACEHOLDER)
    }
}

impl fmt::Debug for AttributesComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributesComponent")
            .field("owner", &self.owner)
            .field("state", &self.state)
            .field("observers", &self.observers)
            .field("initialized", &self.initialized)
            .field("relay_enabled", &self.relay_enabled)
            .field("pending_events", &self.outbox.len())
            .finish()
    }
}

impl AttributesComponent {
    pub fn new(owner: Entity) -> Self {
        Self::with_attributes(owner, AttributeSet::default())
    }

    pub fn with_attributes(owner: Entity, state: AttributeSet) -> Self {
        Self {
            owner,
            state,
            hooks: Box::new(NoHooks),
            observers: AttributeObservers::default(),
            initialized: false,
            relay_enabled: false,
            outbox: Vec::new(),
        }
    }

    /// Builder: подменить internal hooks
    pub fn with_hooks(mut self, hooks: impl AttributeHooks) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn set_hooks(&mut self, hooks: impl AttributeHooks) {
        self.hooks = Box::new(hooks);
    }

    pub fn owner(&self) -> Entity {
        self.owner
    }

    pub fn bind_owner(&mut self, owner: Entity) {
        self.owner = owner;
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.state
    }

    /// Прямой доступ для настройки хостом (max значения, start level).
    /// Без hooks и уведомлений.
    pub fn attributes_mut(&mut self) -> &mut AttributeSet {
        &mut self.state
    }

    pub fn observers(&self) -> &AttributeObservers {
        &self.observers
    }

    pub fn observers_mut(&mut self) -> &mut AttributeObservers {
        &mut self.observers
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Снапает всё в "full": health/xp/custom = max, level = start_level
    ///
    /// Каждое присваивание идёт через обычный set-путь (hooks + observers).
    pub fn initialize(&mut self) {
        self.set_health_value(self.state.health.max, false);
        self.set_xp_value(self.state.xp.max, false);
        self.set_level_value(self.state.start_level, 0.0, false);

        let names: Vec<String> = self.state.custom.names().map(str::to_owned).collect();
        for name in names {
            let max = self.state.custom.get(&name).max;
            self.set_custom_attribute_value(&name, max, false);
        }

        self.initialized = true;
        logger::log(&format!("Attributes initialized (owner: {:?})", self.owner));
    }

    /// Регистрирует 0/0 custom атрибут (перезаписывает существующий)
    pub fn add_custom_attribute(&mut self, name: impl Into<String>) {
        self.state.custom.insert_default(name);
    }

    pub fn add_custom_attribute_with(&mut self, name: impl Into<String>, attribute: BoundedAttribute) {
        self.state.custom.insert(name, attribute);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn health(&self) -> BoundedAttribute {
        self.state.health
    }

    pub fn xp(&self) -> BoundedAttribute {
        self.state.xp
    }

    pub fn level(&self) -> BoundedAttribute {
        self.state.level
    }

    pub fn start_level(&self) -> i32 {
        self.state.start_level
    }

    /// Промах → 0/0 атрибут
    pub fn custom_attribute(&self, name: &str) -> BoundedAttribute {
        self.state.custom.get(name)
    }

    pub fn try_custom_attribute(&self, name: &str) -> Option<BoundedAttribute> {
        self.state.custom.try_get(name)
    }

    pub fn should_be_dead(&self) -> bool {
        self.state.health <= 0.0
    }

    // ------------------------------------------------------------------
    // Apply (relative) мутации
    // ------------------------------------------------------------------

    /// health += delta, clamp в [0, max]
    pub fn apply_health_delta(&mut self, delta: f32) -> BoundedAttribute {
        let before = self.state.health.current;
        self.state.health += delta;
        self.state.health.clamp_to_range();

        logger::log(&format!(
            "Health {:?}: {} → {} (delta: {})",
            self.owner, before, self.state.health.current, delta
        ));
        self.notify_health(delta)
    }

    /// xp += delta, БЕЗ clamp (level-up см. `apply_xp_delta_with_level_up`)
    pub fn apply_xp_delta(&mut self, delta: f32) -> BoundedAttribute {
        let before = self.state.xp.current;
        self.state.xp += delta;

        logger::log(&format!(
            "XP {:?}: {} → {} (delta: {})",
            self.owner, before, self.state.xp.current, delta
        ));
        self.notify_xp(delta)
    }

    /// custom += delta, clamp в [0, max], запись обратно в таблицу
    ///
    /// Незарегистрированное имя стартует с 0/0 и после записи появляется в таблице.
    pub fn apply_custom_attribute_delta(&mut self, name: &str, delta: f32) -> BoundedAttribute {
        let mut attribute = self.state.custom.get(name);
        let before = attribute.current;
        attribute += delta;
        attribute.clamp_to_range();
        self.state.custom.insert(name, attribute);

        logger::log(&format!(
            "{} {:?}: {} → {} (delta: {})",
            name, self.owner, before, attribute.current, delta
        ));
        self.notify_custom(name, attribute, delta)
    }

    // ------------------------------------------------------------------
    // Set (absolute) мутации — delta в событии всегда 0.0
    // ------------------------------------------------------------------

    pub fn set_health_value(&mut self, value: f32, should_clamp: bool) {
        self.state.health.current = clamp_if(value, should_clamp, self.state.health.max);

        logger::log(&format!("Health {:?} set to {}", self.owner, self.state.health.current));
        self.notify_health(0.0);
    }

    pub fn set_xp_value(&mut self, value: f32, should_clamp: bool) {
        self.state.xp.current = clamp_if(value, should_clamp, self.state.xp.max);

        logger::log(&format!("XP {:?} set to {}", self.owner, self.state.xp.current));
        self.notify_xp(0.0);
    }

    pub fn set_custom_attribute_value(&mut self, name: &str, value: f32, should_clamp: bool) {
        let mut attribute = self.state.custom.get(name);
        attribute.current = clamp_if(value, should_clamp, attribute.max);
        self.state.custom.insert(name, attribute);

        logger::log(&format!("{} {:?} set to {}", name, self.owner, attribute.current));
        self.notify_custom(name, attribute, 0.0);
    }

    /// level = value. `_should_clamp` принимается, но level никогда не clamp'ится.
    pub fn set_level_value(&mut self, value: i32, xp_excess: f32, _should_clamp: bool) {
        self.state.level.current = value as f32;

        logger::log(&format!(
            "Level {:?} set to {} (xp excess: {})",
            self.owner, value, xp_excess
        ));

        let event = LevelChanged {
            instigator: None,
            owner: self.owner,
            value: self.state.level,
            xp_excess,
        };
        self.hooks.on_level_changed(&mut self.state, &event);
        self.observers.level.broadcast(&event);
        self.push_relay(AttributeEvent::Changed(AttributeChanged::Level(event)));
    }

    /// Сообщает, что владелец убит. Состояние не меняется.
    ///
    /// В событие instigator не пробрасывается (всегда None), только в лог.
    pub fn kill_owner(&mut self, instigator: Option<Entity>) {
        logger::log_info(&format!(
            "Owner {:?} killed (instigator: {:?})",
            self.owner, instigator
        ));

        let event = OwnerKilled {
            instigator: None,
            owner: self.owner,
        };
        self.hooks.on_owner_killed(&mut self.state, &event);
        self.observers.killed.broadcast(&event);
        self.push_relay(AttributeEvent::Killed(event));
    }

    // ------------------------------------------------------------------
    // ECS relay
    // ------------------------------------------------------------------

    pub fn set_relay_enabled(&mut self, enabled: bool) {
        self.relay_enabled = enabled;
        if !enabled {
            self.outbox.clear();
        }
    }

    pub fn is_relay_enabled(&self) -> bool {
        self.relay_enabled
    }

    pub fn has_pending_events(&self) -> bool {
        !self.outbox.is_empty()
    }

    pub(crate) fn drain_events(&mut self) -> Vec<AttributeEvent> {
        std::mem::take(&mut self.outbox)
    }

    // ------------------------------------------------------------------
    // Dispatch: hook → observers → outbox (один и тот же record)
    // ------------------------------------------------------------------

    fn notify_health(&mut self, delta: f32) -> BoundedAttribute {
        let event = HealthChanged {
            instigator: None,
            owner: self.owner,
            value: self.state.health,
            delta,
        };
        self.hooks.on_health_changed(&mut self.state, &event);
        self.observers.health.broadcast(&event);
        self.push_relay(AttributeEvent::Changed(AttributeChanged::Health(event)));
        self.state.health
    }

    fn notify_xp(&mut self, delta: f32) -> BoundedAttribute {
        let event = XpChanged {
            instigator: None,
            owner: self.owner,
            value: self.state.xp,
            delta,
        };
        self.hooks.on_xp_changed(&mut self.state, &event);
        self.observers.xp.broadcast(&event);
        self.push_relay(AttributeEvent::Changed(AttributeChanged::Xp(event)));
        self.state.xp
    }

    fn notify_custom(&mut self, name: &str, value: BoundedAttribute, delta: f32) -> BoundedAttribute {
        let event = CustomAttributeChanged {
            instigator: None,
            owner: self.owner,
            name: name.to_owned(),
            value,
            delta,
        };
        self.hooks.on_custom_attribute_changed(&mut self.state, &event);
        self.observers.custom.broadcast(&event);
        self.push_relay(AttributeEvent::Changed(AttributeChanged::Custom(event)));
        self.state.custom.get(name)
    }

    fn push_relay(&mut self, event: AttributeEvent) {
        if self.relay_enabled {
            self.outbox.push(event);
        }
    }
}

fn clamp_if(value: f32, should_clamp: bool, max: f32) -> f32 {
    if should_clamp {
        clamp_value(value, 0.0, max)
    } else {
        value
    }
}
