//! Таблица custom атрибутов (Mana, Stamina, Rage, ...)
//!
//! Ключ — стабильное имя атрибута. Семантика:
//! - insert: перезаписывает существующий, возвращает старое значение
//! - get: промах → BoundedAttribute::default() (0/0), без ошибки
//! - try_get: строгий вариант, промах → None
//!
//! BTreeMap вместо HashMap: порядок обхода (и порядок уведомлений в
//! `initialize`) детерминирован между прогонами.

use super::bounded::BoundedAttribute;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomAttributeTable {
    entries: BTreeMap<String, BoundedAttribute>,
}

impl CustomAttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        attribute: BoundedAttribute,
    ) -> Option<BoundedAttribute> {
        self.entries.insert(name.into(), attribute)
    }

    /// Вставляет 0/0 атрибут (перезаписывает существующий)
    pub fn insert_default(&mut self, name: impl Into<String>) -> Option<BoundedAttribute> {
        self.insert(name, BoundedAttribute::default())
    }

    pub fn get(&self, name: &str) -> BoundedAttribute {
        self.try_get(name).unwrap_or_default()
    }

    pub fn try_get(&self, name: &str) -> Option<BoundedAttribute> {
        self.entries.get(name).copied()
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut BoundedAttribute> {
        self.entries.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<BoundedAttribute> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundedAttribute)> {
        self.entries.iter().map(|(name, attribute)| (name.as_str(), attribute))
    }
}

impl<S: Into<String>> FromIterator<(S, BoundedAttribute)> for CustomAttributeTable {
    fn from_iter<I: IntoIterator<Item = (S, BoundedAttribute)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(name, attribute)| (name.into(), attribute)).collect(),
        }
    }
}
