//! Actor Attributes
//!
//! Health/XP/Level + custom атрибуты для акторов на Bevy ECS.
//! Компонент — тонкий слой данных + уведомлений:
//! - BoundedAttribute: current/max с clamp по запросу
//! - AttributesComponent: мутации → internal hook → observers
//! - AttributesPlugin: initialize при спавне + relay в Bevy Events
//!
//! Рендер, физика, сохранение и сеть — забота хоста.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod components;
pub mod config;
pub mod events;
pub mod hooks;
pub mod leveling;
pub mod logger;
pub mod observers;
pub mod systems;

// Re-export базовых типов для удобства
pub use components::*;
pub use config::{AttributeTemplate, AttributesSettings, CustomAttributeTemplate, TemplateError};
pub use events::{
    AttributeChanged, CustomAttributeChanged, HealthChanged, LevelChanged, OwnerKilled, XpChanged,
};
pub use hooks::{AttributeHooks, NoHooks};
pub use leveling::LevelingRules;
pub use observers::{AttributeObservers, ObserverHandle, ObserverRegistry};

/// Attributes Plugin
///
/// Регистрирует события, settings и системы в Update.
/// Settings, вставленные до add_plugins, не перезаписываются.
pub struct AttributesPlugin;

impl Plugin for AttributesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AttributesSettings>()
            .add_event::<AttributeChanged>()
            .add_event::<OwnerKilled>()
            .add_systems(Startup, systems::apply_log_level)
            .add_systems(
                Update,
                (
                    systems::initialize_spawned_attributes,
                    systems::kill_owners_at_zero_health,
                    systems::relay_attribute_events,
                    systems::mark_dead_owners,
                )
                    .chain(), // Последовательное выполнение
            );
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless прогонов (тесты, demo)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot всех AttributeSet мира в RON (для сравнения детерминизма)
///
/// Сортировка по Entity index — порядок query не гарантирован.
pub fn snapshot_attributes(world: &mut World) -> String {
    let mut query = world.query::<(Entity, &AttributesComponent)>();
    let mut entries: Vec<(u32, AttributeSet)> = query
        .iter(world)
        .map(|(entity, attributes)| (entity.index(), attributes.attributes().clone()))
        .collect();
    entries.sort_by_key(|(index, _)| *index);

    ron::to_string(&entries).unwrap_or_else(|e| {
        logger::log_error(&format!("Attribute snapshot failed: {}", e));
        String::new()
    })
}
