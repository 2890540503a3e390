//! Конфигурация: runtime settings плагина + RON шаблоны атрибутов

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::components::{AttributeSet, AttributesComponent, BoundedAttribute, CustomAttributeTable};
use crate::logger::{self, LogLevel};

/// Настройки `AttributesPlugin`
#[derive(Resource, Debug, Clone)]
pub struct AttributesSettings {
    /// Дублировать уведомления компонентов в Bevy Events
    pub relay_events: bool,
    /// Вызывать `kill_owner` автоматически при health ≤ 0
    /// (по умолчанию выключено — решение за gameplay кодом)
    pub kill_on_zero_health: bool,
    /// Минимальный уровень глобального logger'а
    pub log_level: LogLevel,
}

impl Default for AttributesSettings {
    fn default() -> Self {
        Self {
            relay_events: true,
            kill_on_zero_health: false,
            log_level: LogLevel::Info,
        }
    }
}

/// Ошибки загрузки шаблона
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("RON parse error: {0}")]
    Parse(String),
    #[error("custom attribute name is empty")]
    EmptyName,
    #[error("custom attribute '{0}' declared twice")]
    DuplicateCustomAttribute(String),
}

/// Стартовые значения атрибутов архетипа (NPC, игрок, враг)
///
/// ```ron
/// (
///     max_health: 100.0,
///     max_xp: 250.0,
///     start_level: 1,
///     custom: [(name: "Mana", max: 50.0)],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeTemplate {
    pub max_health: f32,
    #[serde(default)]
    pub max_xp: f32,
    #[serde(default)]
    pub max_level: f32,
    #[serde(default = "default_start_level")]
    pub start_level: i32,
    #[serde(default)]
    pub custom: Vec<CustomAttributeTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomAttributeTemplate {
    pub name: String,
    pub max: f32,
    /// None → 0.0 (до `initialize`)
    #[serde(default)]
    pub current: Option<f32>,
}

fn default_start_level() -> i32 {
    1
}

impl AttributeTemplate {
    pub fn from_ron(source: &str) -> Result<Self, TemplateError> {
        let template: AttributeTemplate = ron::from_str(source).map_err(|e| {
            logger::log_warning(&format!("Attribute template rejected: {}", e));
            TemplateError::Parse(e.to_string())
        })?;
        template.validate()?;
        Ok(template)
    }

    /// Проверяет только имена custom атрибутов; числа не валидируются
    pub fn validate(&self) -> Result<(), TemplateError> {
        let mut seen = HashSet::new();
        for entry in &self.custom {
            if entry.name.trim().is_empty() {
                return Err(TemplateError::EmptyName);
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(TemplateError::DuplicateCustomAttribute(entry.name.clone()));
            }
        }
        Ok(())
    }

    /// Current значения — 0 (кроме явно заданных custom); `initialize` снапнет в max
    pub fn to_attribute_set(&self) -> AttributeSet {
        let custom: CustomAttributeTable = self
            .custom
            .iter()
            .map(|entry| {
                (
                    entry.name.clone(),
                    BoundedAttribute::new(entry.current.unwrap_or(0.0), entry.max),
                )
            })
            .collect();

        AttributeSet {
            health: BoundedAttribute::new(0.0, self.max_health),
            xp: BoundedAttribute::new(0.0, self.max_xp),
            level: BoundedAttribute::new(0.0, self.max_level),
            start_level: self.start_level,
            custom,
        }
    }
}

impl AttributesComponent {
    pub fn from_template(owner: Entity, template: &AttributeTemplate) -> Self {
        Self::with_attributes(owner, template.to_attribute_set())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORC: &str = r#"(
        max_health: 150.0,
        max_xp: 500.0,
        max_level: 30.0,
        start_level: 2,
        custom: [
            (name: "Rage", max: 100.0),
            (name: "Stamina", max: 80.0, current: Some(10.0)),
        ],
    )"#;

    #[test]
    fn test_parse_full_template() {
        let template = AttributeTemplate::from_ron(ORC).unwrap();

        assert_eq!(template.max_health, 150.0);
        assert_eq!(template.start_level, 2);
        assert_eq!(template.custom.len(), 2);
        assert_eq!(template.custom[1].current, Some(10.0));
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let template = AttributeTemplate::from_ron("(max_health: 50.0)").unwrap();

        assert_eq!(template.max_xp, 0.0);
        assert_eq!(template.start_level, 1);
        assert!(template.custom.is_empty());
    }

    #[test]
    fn test_parse_error() {
        let result = AttributeTemplate::from_ron("(max_health: \"lots\")");
        assert!(matches!(result, Err(TemplateError::Parse(_))));
    }

    #[test]
    fn test_duplicate_custom_rejected() {
        let source = r#"(max_health: 1.0, custom: [(name: "Mana", max: 1.0), (name: "Mana", max: 2.0)])"#;
        let result = AttributeTemplate::from_ron(source);
        assert!(matches!(result, Err(TemplateError::DuplicateCustomAttribute(ref name)) if name == "Mana"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let source = r#"(max_health: 1.0, custom: [(name: " ", max: 1.0)])"#;
        assert!(matches!(AttributeTemplate::from_ron(source), Err(TemplateError::EmptyName)));
    }

    #[test]
    fn test_component_from_template_then_initialize() {
        let template = AttributeTemplate::from_ron(ORC).unwrap();
        let mut attributes = AttributesComponent::from_template(Entity::PLACEHOLDER, &template);

        assert_eq!(attributes.health().current, 0.0);
        assert_eq!(attributes.custom_attribute("Stamina").current, 10.0);

        attributes.initialize();

        assert_eq!(attributes.health().current, 150.0);
        assert_eq!(attributes.xp().current, 500.0);
        assert_eq!(attributes.level().current, 2.0);
        assert_eq!(attributes.custom_attribute("Rage").current, 100.0);
        assert_eq!(attributes.custom_attribute("Stamina").current, 80.0);
    }

    #[test]
    fn test_default_settings() {
        let settings = AttributesSettings::default();
        assert!(settings.relay_events);
        assert!(!settings.kill_on_zero_health);
        assert_eq!(settings.log_level, LogLevel::Info);
    }
}
