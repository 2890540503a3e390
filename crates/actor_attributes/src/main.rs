//! Headless demo actor_attributes
//!
//! Спавнит двух акторов из RON шаблонов и бьёт их случайным уроном,
//! пока один не умрёт (auto kill включён через settings).

use actor_attributes::{
    create_headless_app, AttributeTemplate, AttributesComponent, AttributesPlugin,
    AttributesSettings, Dead, DeterministicRng, LevelingRules, OwnerKilled,
};
use actor_attributes::logger::{self, LogLevel};
use bevy::prelude::*;
use rand::Rng;

const KNIGHT: &str = "(max_health: 120.0, max_xp: 100.0, max_level: 20.0, custom: [(name: \"Stamina\", max: 80.0)])";
const GOBLIN: &str = "(max_health: 60.0, max_xp: 50.0, max_level: 10.0, custom: [(name: \"Rage\", max: 30.0)])";

fn main() {
    let seed = 42;
    println!("Starting actor_attributes headless demo (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.insert_resource(AttributesSettings {
        kill_on_zero_health: true,
        log_level: LogLevel::Info,
        ..Default::default()
    })
    .add_plugins(AttributesPlugin);

    let mut spawn = |source: &str| -> Option<Entity> {
        match AttributeTemplate::from_ron(source) {
            Ok(template) => Some(
                app.world_mut()
                    .spawn(AttributesComponent::from_template(Entity::PLACEHOLDER, &template))
                    .id(),
            ),
            Err(e) => {
                logger::log_error(&format!("Bad template: {}", e));
                None
            }
        }
    };

    let (Some(knight), Some(goblin)) = (spawn(KNIGHT), spawn(GOBLIN)) else {
        return;
    };

    // Первый тик — initialize() через AttributesPlugin
    app.update();

    let rules = LevelingRules {
        xp_growth: 1.5,
        max_level: Some(20),
    };

    for tick in 0..200 {
        let damage: f32 = app
            .world_mut()
            .resource_mut::<DeterministicRng>()
            .rng
            .gen_range(1.0..12.0);

        if let Some(mut attributes) = app.world_mut().get_mut::<AttributesComponent>(goblin) {
            attributes.apply_health_delta(-damage);
        }
        if let Some(mut attributes) = app.world_mut().get_mut::<AttributesComponent>(knight) {
            attributes.apply_custom_attribute_delta("Stamina", -5.0);
            attributes.apply_xp_delta_with_level_up(damage, &rules);
        }

        app.update();

        let killed = app.world().resource::<Events<OwnerKilled>>().len();
        if killed > 0 || app.world().get::<Dead>(goblin).is_some() {
            println!("Tick {}: goblin is dead", tick);
            break;
        }
    }

    if let Some(attributes) = app.world().get::<AttributesComponent>(knight) {
        println!(
            "Knight: level {}, xp {}/{}, stamina {}",
            attributes.level().current,
            attributes.xp().current,
            attributes.xp().max,
            attributes.custom_attribute("Stamina").current
        );
    }

    println!("Demo complete!");
}
