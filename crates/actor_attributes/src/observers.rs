//! Observer registry — синхронный multicast
//!
//! Каждый канал хранит callbacks в порядке подписки. `broadcast` вызывает
//! их по очереди на стеке вызывающего. Паника observer'а прерывает
//! оставшуюся рассылку (и саму мутацию) — ловить её некому.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::events::{CustomAttributeChanged, HealthChanged, LevelChanged, OwnerKilled, XpChanged};

/// Глобальный счётчик: handle уникален между всеми каналами и компонентами
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Handle подписки (для unsubscribe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverHandle(u64);

impl ObserverHandle {
    fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

pub type Observer<E> = Box<dyn FnMut(&E) + Send + Sync>;

/// Упорядоченный список observers одного канала
pub struct ObserverRegistry<E> {
    observers: Vec<(ObserverHandle, Observer<E>)>,
}

impl<E> Default for ObserverRegistry<E> {
    fn default() -> Self {
        Self { observers: Vec::new() }
    }
}

impl<E> ObserverRegistry<E> {
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverHandle
    where
        F: FnMut(&E) + Send + Sync + 'static,
    {
        let handle = ObserverHandle::next();
        self.observers.push((handle, Box::new(observer)));
        handle
    }

    /// Идемпотентно: повторный вызов (или чужой handle) просто вернёт false
    pub fn unsubscribe(&mut self, handle: ObserverHandle) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(h, _)| *h != handle);
        self.observers.len() != before
    }

    pub fn is_subscribed(&self, handle: ObserverHandle) -> bool {
        self.observers.iter().any(|(h, _)| *h == handle)
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }

    /// Вызывает всех observers в порядке подписки
    pub fn broadcast(&mut self, event: &E) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }
}

impl<E> fmt::Debug for ObserverRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Пять каналов `AttributesComponent`
#[derive(Debug, Default)]
pub struct AttributeObservers {
    pub health: ObserverRegistry<HealthChanged>,
    pub xp: ObserverRegistry<XpChanged>,
    pub level: ObserverRegistry<LevelChanged>,
    pub custom: ObserverRegistry<CustomAttributeChanged>,
    pub killed: ObserverRegistry<OwnerKilled>,
}

impl AttributeObservers {
    /// Снимает handle с любого канала, где он зарегистрирован
    pub fn unsubscribe(&mut self, handle: ObserverHandle) -> bool {
        // Handles уникальны глобально — максимум один канал вернёт true
        self.health.unsubscribe(handle)
            | self.xp.unsubscribe(handle)
            | self.level.unsubscribe(handle)
            | self.custom.unsubscribe(handle)
            | self.killed.unsubscribe(handle)
    }

    pub fn clear(&mut self) {
        self.health.clear();
        self.xp.clear();
        self.level.clear();
        self.custom.clear();
        self.killed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_broadcast_in_registration_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ObserverRegistry::<u32>::default();

        for tag in ["first", "second", "third"] {
            let calls = Arc::clone(&calls);
            registry.subscribe(move |value: &u32| calls.lock().unwrap().push((tag, *value)));
        }

        registry.broadcast(&7);

        let calls = calls.lock().unwrap();
        assert_eq!(*calls, vec![("first", 7), ("second", 7), ("third", 7)]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let mut registry = ObserverRegistry::<u32>::default();
        let handle = registry.subscribe(|_| {});

        assert!(registry.is_subscribed(handle));
        assert!(registry.unsubscribe(handle));
        assert!(!registry.unsubscribe(handle)); // повторно — no-op
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unsubscribed_observer_not_called() {
        let counter = Arc::new(Mutex::new(0));
        let mut registry = ObserverRegistry::<()>::default();

        let counter_clone = Arc::clone(&counter);
        let handle = registry.subscribe(move |_| *counter_clone.lock().unwrap() += 1);

        registry.broadcast(&());
        registry.unsubscribe(handle);
        registry.broadcast(&());

        assert_eq!(*counter.lock().unwrap(), 1);
    }

    #[test]
    fn test_handles_are_unique_across_registries() {
        let mut a = ObserverRegistry::<u32>::default();
        let mut b = ObserverRegistry::<u32>::default();

        let ha = a.subscribe(|_| {});
        let hb = b.subscribe(|_| {});

        assert_ne!(ha, hb);
        assert!(!b.unsubscribe(ha)); // чужой handle не трогает b
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_attribute_observers_unsubscribe_any_channel() {
        let mut observers = AttributeObservers::default();
        let handle = observers.level.subscribe(|_| {});
        observers.health.subscribe(|_| {});

        assert!(observers.unsubscribe(handle));
        assert!(!observers.unsubscribe(handle));
        assert!(observers.level.is_empty());
        assert_eq!(observers.health.len(), 1);
    }
}
