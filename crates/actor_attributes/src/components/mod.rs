//! ECS Components атрибутов
//!
//! - bounded: BoundedAttribute (current/max value type)
//! - table: CustomAttributeTable (name → BoundedAttribute)
//! - attributes: AttributesComponent + AttributeSet (сохраняемая часть)

pub mod attributes;
pub mod bounded;
pub mod table;


// Re-exports для удобного импорта
pub use attributes::*;
pub use bounded::*;
pub use table::*;

use bevy::prelude::*;

/// Компонент-маркер: владелец убит (`OwnerKilled` прошёл через ECS)
///
/// Деспавн не автоматический — решает хост.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;
