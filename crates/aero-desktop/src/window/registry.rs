//! Window registry: ownership, singleton kinds, z-order and teardown

use std::collections::BTreeMap;
use super::lifecycle::{next_state, LifecycleEvent, TransitionError};
use super::{Effect, WindowId, WindowInstance, WindowKind, WindowState};

/// Result of an open request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new instance was constructed
    Created(WindowId),
    /// A live singleton already existed and was revealed
    Revealed(WindowId),
}

impl OpenOutcome {
    /// Window the request resolved to
    #[inline]
    pub fn id(self) -> WindowId {
        match self {
            OpenOutcome::Created(id) | OpenOutcome::Revealed(id) => id,
        }
    }

    /// Whether a new instance was constructed
    #[inline]
    pub fn is_created(self) -> bool {
        matches!(self, OpenOutcome::Created(_))
    }
}

/// Owns every open window
#[derive(Debug)]
pub struct WindowRegistry {
    /// All windows by ID
    windows: BTreeMap<WindowId, WindowInstance>,
    /// Next window ID
    next_id: u64,
    /// Next z-order value
    next_z: u32,
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            windows: BTreeMap::new(),
            next_id: 1,
            next_z: 1,
        }
    }

    /// Open a window of `kind`
    ///
    /// A live singleton of the same kind is reused and `factory` is not called.
    pub fn open<F>(&mut self, kind: WindowKind, factory: F) -> OpenOutcome
    where
        F: FnOnce(WindowId) -> WindowInstance,
    {
        if kind.is_singleton() {
            if let Some(id) = self.live_of_kind(kind) {
                return OpenOutcome::Revealed(id);
            }
        }

        let id = self.next_id;
        self.next_id += 1;

        let mut window = factory(id);
        window.id = id;
        window.kind = kind;
        window.z_order = self.next_z;
        self.next_z += 1;

        self.windows.insert(id, window);
        OpenOutcome::Created(id)
    }

    /// Live instance of a kind, if any
    pub fn live_of_kind(&self, kind: WindowKind) -> Option<WindowId> {
        self.windows
            .values()
            .find(|w| w.kind == kind && w.is_live())
            .map(|w| w.id)
    }

    /// Get a window by ID
    pub fn get(&self, id: WindowId) -> Option<&WindowInstance> {
        self.windows.get(&id)
    }

    /// Get a mutable window by ID
    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut WindowInstance> {
        self.windows.get_mut(&id)
    }

    /// Whether `id` names a window that has not started closing
    pub fn is_live(&self, id: WindowId) -> bool {
        self.windows.get(&id).is_some_and(|w| w.is_live())
    }

    /// IDs of all tracked windows, oldest first
    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    /// Iterate all windows
    pub fn iter(&self) -> impl Iterator<Item = &WindowInstance> {
        self.windows.values()
    }

    /// Number of tracked windows
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// No windows are tracked
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Number of live windows of a kind
    pub fn count_of_kind(&self, kind: WindowKind) -> usize {
        self.windows.values().filter(|w| w.kind == kind && w.is_live()).count()
    }

    /// Bring a window to the top; returns its new z-order
    pub fn raise(&mut self, id: WindowId) -> Option<u32> {
        let top = self.windows.values().map(|w| w.z_order).max().unwrap_or(0);
        let window = self.windows.get_mut(&id)?;
        if window.z_order == top {
            return None;
        }
        window.z_order = self.next_z;
        self.next_z += 1;
        Some(window.z_order)
    }

    /// Topmost window that is visible
    pub fn topmost(&self) -> Option<WindowId> {
        self.windows
            .values()
            .filter(|w| w.state.has_geometry())
            .max_by_key(|w| w.z_order)
            .map(|w| w.id)
    }

    /// Drive a window to Closed and forget it
    ///
    /// `teardown` runs between Closing and Closed and must release every
    /// listener, timer and content resource the window owns.
    pub fn close<F>(&mut self, id: WindowId, teardown: F) -> Result<Vec<Effect>, TransitionError>
    where
        F: FnOnce(&mut WindowInstance) -> Vec<Effect>,
    {
        let window = self.windows.get_mut(&id).ok_or(TransitionError::Closed)?;

        window.state = next_state(window.kind, window.state, window.prev_state, LifecycleEvent::Close)?;
        let effects = teardown(window);
        window.state = next_state(
            window.kind,
            window.state,
            window.prev_state,
            LifecycleEvent::TeardownComplete,
        )?;
        debug_assert_eq!(window.state, WindowState::Closed);

        self.windows.remove(&id);
        Ok(effects)
    }

    /// Drive every tracked window to Closed
    pub fn close_all<F>(&mut self, mut teardown: F) -> Vec<Effect>
    where
        F: FnMut(&mut WindowInstance) -> Vec<Effect>,
    {
        let mut effects = Vec::new();
        for id in self.ids() {
            match self.close(id, &mut teardown) {
                Ok(mut closed) => effects.append(&mut closed),
                Err(e) => log::debug!("close_all skipped window {id}: {e}"),
            }
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Rect;

    fn factory(kind: WindowKind) -> impl FnOnce(WindowId) -> WindowInstance {
        move |id| WindowInstance::new(id, kind, "Test", Rect::new(100.0, 100.0, 600.0, 400.0))
    }

    #[test]
    fn test_open_creates_window() {
        let mut reg = WindowRegistry::new();
        let outcome = reg.open(WindowKind::Dialog, factory(WindowKind::Dialog));

        assert!(outcome.is_created());
        assert!(reg.get(outcome.id()).is_some());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_singleton_is_reused() {
        let mut reg = WindowRegistry::new();
        let first = reg.open(WindowKind::Radio, factory(WindowKind::Radio));

        let mut called = false;
        let second = reg.open(WindowKind::Radio, |id| {
            called = true;
            WindowInstance::new(id, WindowKind::Radio, "x", Rect::default())
        });

        assert!(!called);
        assert_eq!(second, OpenOutcome::Revealed(first.id()));
        assert_eq!(reg.count_of_kind(WindowKind::Radio), 1);
    }

    #[test]
    fn test_dialogs_are_not_singletons() {
        let mut reg = WindowRegistry::new();
        let a = reg.open(WindowKind::Dialog, factory(WindowKind::Dialog));
        let b = reg.open(WindowKind::Dialog, factory(WindowKind::Dialog));

        assert_ne!(a.id(), b.id());
        assert_eq!(reg.count_of_kind(WindowKind::Dialog), 2);
    }

    #[test]
    fn test_close_runs_teardown_and_removes() {
        let mut reg = WindowRegistry::new();
        let id = reg.open(WindowKind::Radio, factory(WindowKind::Radio)).id();

        let mut seen_state = None;
        let effects = reg
            .close(id, |w| {
                seen_state = Some(w.state);
                vec![Effect::RemoveElement { window_id: w.id }]
            })
            .unwrap();

        assert_eq!(seen_state, Some(WindowState::Closing));
        assert_eq!(effects, vec![Effect::RemoveElement { window_id: id }]);
        assert!(reg.get(id).is_none());

        let reopened = reg.open(WindowKind::Radio, factory(WindowKind::Radio));
        assert!(reopened.is_created());
        assert_ne!(reopened.id(), id);
    }

    #[test]
    fn test_close_unknown_window() {
        let mut reg = WindowRegistry::new();
        assert_eq!(reg.close(42, |_| Vec::new()), Err(TransitionError::Closed));
    }

    #[test]
    fn test_close_all() {
        let mut reg = WindowRegistry::new();
        reg.open(WindowKind::Radio, factory(WindowKind::Radio));
        reg.open(WindowKind::Dialog, factory(WindowKind::Dialog));
        reg.open(WindowKind::Dialog, factory(WindowKind::Dialog));

        let mut torn_down = 0;
        reg.close_all(|_| {
            torn_down += 1;
            Vec::new()
        });

        assert_eq!(torn_down, 3);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_raise_and_topmost() {
        let mut reg = WindowRegistry::new();
        let a = reg.open(WindowKind::Dialog, factory(WindowKind::Dialog)).id();
        let b = reg.open(WindowKind::Dialog, factory(WindowKind::Dialog)).id();

        assert_eq!(reg.topmost(), Some(b));
        assert!(reg.raise(a).is_some());
        assert_eq!(reg.topmost(), Some(a));
        assert!(reg.raise(a).is_none());
    }
}
