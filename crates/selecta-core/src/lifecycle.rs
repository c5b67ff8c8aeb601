//! Scoped listener registrations tied to a widget's lifetime.
//!
//! A widget that wants keyboard input while mounted registers a listener in
//! a shared [`ListenerRegistry`] and keeps the returned [`ListenerGuard`].
//! Dropping the guard unregisters it. [`ScopedListener`] adds the effect
//! semantics: the registration is replaced whenever the widget's dependency
//! fingerprint changes, and released on detach.

use crate::widget::WidgetId;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Unique ID for a listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(pub u64);

impl HookId {
    /// Create a new hook ID.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Fingerprint of a dependency tuple, compared to decide re-registration.
pub fn fingerprint<T: Hash + ?Sized>(deps: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    deps.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug)]
struct Registration {
    widget_id: WidgetId,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    active: HashMap<HookId, Registration>,
    total: u64,
}

/// Shared table of live listener registrations.
///
/// Cloning yields another handle to the same table.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a listener for `widget_id` built from dependencies `deps`.
    pub fn register(&self, widget_id: WidgetId, deps: u64) -> ListenerGuard {
        let mut inner = self.lock();
        let id = HookId::new(inner.next_id);
        inner.next_id += 1;
        inner.total += 1;
        inner.active.insert(id, Registration { widget_id });
        log::trace!("listener {id:?} registered for {widget_id:?}");

        ListenerGuard {
            id,
            deps,
            registry: self.clone(),
        }
    }

    fn unregister(&self, id: HookId) -> bool {
        let removed = self.lock().active.remove(&id).is_some();
        if removed {
            log::trace!("listener {id:?} released");
        }
        removed
    }

    /// Whether `widget_id` currently has a live registration.
    pub fn is_registered(&self, widget_id: WidgetId) -> bool {
        self.lock()
            .active
            .values()
            .any(|r| r.widget_id == widget_id)
    }

    /// Number of live registrations.
    pub fn active_count(&self) -> usize {
        self.lock().active.len()
    }

    /// Registrations made since creation, including released ones.
    pub fn total_registrations(&self) -> u64 {
        self.lock().total
    }
}

/// RAII handle for a registration. Dropping it unregisters.
#[derive(Debug)]
pub struct ListenerGuard {
    id: HookId,
    deps: u64,
    registry: ListenerRegistry,
}

impl ListenerGuard {
    /// Registration ID.
    pub const fn id(&self) -> HookId {
        self.id
    }

    /// Dependency fingerprint captured at registration.
    pub const fn deps(&self) -> u64 {
        self.deps
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}

/// Listener slot owned by a widget.
///
/// Empty until [`attach`](Self::attach), re-registered by
/// [`refresh`](Self::refresh) when dependencies change, emptied by
/// [`detach`](Self::detach) or drop.
#[derive(Debug, Default)]
pub struct ScopedListener {
    registry: Option<ListenerRegistry>,
    guard: Option<ListenerGuard>,
}

impl ScopedListener {
    /// Create a detached slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register in `registry`, replacing any previous registration.
    pub fn attach(&mut self, registry: &ListenerRegistry, widget_id: WidgetId, deps: u64) {
        self.guard = None;
        self.guard = Some(registry.register(widget_id, deps));
        self.registry = Some(registry.clone());
    }

    /// Re-register if `deps` differs from the live registration.
    ///
    /// Returns `true` when a new registration was made. Does nothing while
    /// detached.
    pub fn refresh(&mut self, widget_id: WidgetId, deps: u64) -> bool {
        let Some(registry) = &self.registry else {
            return false;
        };
        if self.guard.as_ref().is_some_and(|g| g.deps() == deps) {
            return false;
        }
        // Release before acquiring so the widget never holds two listeners.
        self.guard = None;
        self.guard = Some(registry.register(widget_id, deps));
        true
    }

    /// Release the registration and forget the registry.
    pub fn detach(&mut self) {
        self.guard = None;
        self.registry = None;
    }

    /// Whether a registration is live.
    pub const fn is_attached(&self) -> bool {
        self.guard.is_some()
    }
}
