//! Attribute события
//!
//! Один и тот же record получают:
//! 1. internal hook (`AttributeHooks`)
//! 2. observers компонента (`ObserverRegistry`)
//! 3. Bevy EventReader'ы — через relay в `AttributesPlugin`
//!
//! `instigator` пока всегда None: компонент не знает, кто вызвал мутацию.
//! `owner` — entity хоста, которому принадлежит компонент.

use bevy::prelude::*;

use crate::components::BoundedAttribute;

/// Health изменился (apply или set)
#[derive(Debug, Clone)]
pub struct HealthChanged {
    pub instigator: Option<Entity>,
    pub owner: Entity,
    /// Snapshot после мутации (и после clamp)
    pub value: BoundedAttribute,
    /// Запрошенная дельта; для set-операций всегда 0.0
    pub delta: f32,
}

/// XP изменился (apply или set)
#[derive(Debug, Clone)]
pub struct XpChanged {
    pub instigator: Option<Entity>,
    pub owner: Entity,
    pub value: BoundedAttribute,
    /// Для set-операций всегда 0.0
    pub delta: f32,
}

/// Level выставлен через `set_level_value`
#[derive(Debug, Clone)]
pub struct LevelChanged {
    pub instigator: Option<Entity>,
    pub owner: Entity,
    pub value: BoundedAttribute,
    /// Остаток XP, перенесённый в новый уровень
    pub xp_excess: f32,
}

/// Custom атрибут изменился
#[derive(Debug, Clone)]
pub struct CustomAttributeChanged {
    pub instigator: Option<Entity>,
    pub owner: Entity,
    pub name: String,
    pub value: BoundedAttribute,
    /// Для set-операций всегда 0.0
    pub delta: f32,
}

/// Событие: владелец убит (`kill_owner`)
///
/// Компонент сам `kill_owner` не вызывает — только хост, увидев `should_be_dead()`.
#[derive(Event, Debug, Clone)]
pub struct OwnerKilled {
    pub instigator: Option<Entity>,
    pub owner: Entity,
}

/// Bevy-событие для ECS систем: любое изменение значения атрибута
#[derive(Event, Debug, Clone)]
pub enum AttributeChanged {
    Health(HealthChanged),
    Xp(XpChanged),
    Level(LevelChanged),
    Custom(CustomAttributeChanged),
}

impl AttributeChanged {
    pub fn owner(&self) -> Entity {
        match self {
            AttributeChanged::Health(event) => event.owner,
            AttributeChanged::Xp(event) => event.owner,
            AttributeChanged::Level(event) => event.owner,
            AttributeChanged::Custom(event) => event.owner,
        }
    }

    pub fn value(&self) -> BoundedAttribute {
        match self {
            AttributeChanged::Health(event) => event.value,
            AttributeChanged::Xp(event) => event.value,
            AttributeChanged::Level(event) => event.value,
            AttributeChanged::Custom(event) => event.value,
        }
    }
}

/// Запись в outbox компонента (ждёт relay в Bevy Events)
#[derive(Debug, Clone)]
pub(crate) enum AttributeEvent {
    Changed(AttributeChanged),
    Killed(OwnerKilled),
}
