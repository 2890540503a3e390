//! ECS системы `AttributesPlugin`
//!
//! Порядок выполнения (chain):
//! 1. initialize_spawned_attributes — bind owner + initialize() для новых компонентов
//! 2. kill_owners_at_zero_health — opt-in автоматический kill_owner
//! 3. relay_attribute_events — outbox компонентов → Bevy Events
//! 4. mark_dead_owners — OwnerKilled → маркер Dead

use bevy::prelude::*;

use crate::components::{AttributesComponent, Dead};
use crate::config::AttributesSettings;
use crate::events::{AttributeChanged, AttributeEvent, OwnerKilled};
use crate::logger;

/// Система: применяет log level из settings (Startup)
pub fn apply_log_level(settings: Res<AttributesSettings>) {
    logger::set_log_level(settings.log_level);
}

/// Система: первичная инициализация только что добавленных компонентов
///
/// Owner, оставленный как PLACEHOLDER, привязывается к entity.
/// Уже инициализированный вручную компонент повторно не снапается.
pub fn initialize_spawned_attributes(
    settings: Res<AttributesSettings>,
    mut query: Query<(Entity, &mut AttributesComponent), Added<AttributesComponent>>,
) {
    for (entity, mut attributes) in query.iter_mut() {
        if attributes.owner() == Entity::PLACEHOLDER {
            attributes.bind_owner(entity);
        }

        // Relay включаем ДО initialize — стартовые уведомления тоже уйдут в ECS
        attributes.set_relay_enabled(settings.relay_events);

        if !attributes.is_initialized() {
            attributes.initialize();
        }
    }
}

/// Система: kill_owner для entity с health ≤ 0 (если включено в settings)
///
/// Dead вставляется сразу, чтобы kill не повторился на следующем тике
/// даже при выключенном relay.
pub fn kill_owners_at_zero_health(
    mut commands: Commands,
    settings: Res<AttributesSettings>,
    mut query: Query<(Entity, &mut AttributesComponent), Without<Dead>>,
) {
    if !settings.kill_on_zero_health {
        return;
    }

    for (entity, mut attributes) in query.iter_mut() {
        if !attributes.should_be_dead() {
            continue;
        }

        attributes.kill_owner(None);
        commands.entity(entity).try_insert(Dead);
    }
}

/// Система: переносит накопленные уведомления в Bevy Events
pub fn relay_attribute_events(
    mut query: Query<&mut AttributesComponent>,
    mut changed_events: EventWriter<AttributeChanged>,
    mut killed_events: EventWriter<OwnerKilled>,
) {
    for mut attributes in query.iter_mut() {
        // Проверка через Deref — не триггерит change detection зря
        if !attributes.has_pending_events() {
            continue;
        }

        for event in attributes.drain_events() {
            match event {
                AttributeEvent::Changed(changed) => {
                    changed_events.write(changed);
                }
                AttributeEvent::Killed(killed) => {
                    killed_events.write(killed);
                }
            }
        }
    }
}

/// Система: маркер Dead для владельцев из OwnerKilled
pub fn mark_dead_owners(mut commands: Commands, mut killed_events: EventReader<OwnerKilled>) {
    for event in killed_events.read() {
        if let Ok(mut entity_commands) = commands.get_entity(event.owner) {
            entity_commands.try_insert(Dead);
        }
    }
}
