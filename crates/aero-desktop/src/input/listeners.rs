//! Model of the shared document-level pointer listener set
//!
//! Every gesture adds a fresh pointer-move and pointer-up listener and
//! removes both when it ends. Tracking the owner of each registration lets a
//! closing window release whatever it still holds.

use crate::window::WindowId;

/// Listener handle
pub type ListenerId = u64;

/// Document event a listener is bound to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Move,
    Up,
}

#[derive(Clone, Copy, Debug)]
struct Registration {
    id: ListenerId,
    owner: WindowId,
    event: PointerEventKind,
}

/// Document-level listener registrations
#[derive(Debug, Default)]
pub struct DocumentListeners {
    registrations: Vec<Registration>,
    next_id: ListenerId,
}

impl DocumentListeners {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the move/up pair for one gesture
    pub fn add_gesture(&mut self, owner: WindowId) -> [ListenerId; 2] {
        let on_move = self.add(owner, PointerEventKind::Move);
        let on_up = self.add(owner, PointerEventKind::Up);
        [on_move, on_up]
    }

    fn add(&mut self, owner: WindowId, event: PointerEventKind) -> ListenerId {
        self.next_id += 1;
        let id = self.next_id;
        self.registrations.push(Registration { id, owner, event });
        id
    }

    /// Remove specific registrations; returns how many were present
    pub fn remove(&mut self, ids: &[ListenerId]) -> usize {
        let before = self.registrations.len();
        self.registrations.retain(|r| !ids.contains(&r.id));
        before - self.registrations.len()
    }

    /// Remove everything `owner` registered; returns how many were present
    pub fn remove_owned(&mut self, owner: WindowId) -> usize {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.owner != owner);
        before - self.registrations.len()
    }

    /// Total registrations
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// No registrations
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Registrations held by `owner`
    pub fn owned_by(&self, owner: WindowId) -> usize {
        self.registrations.iter().filter(|r| r.owner == owner).count()
    }

    /// Registrations bound to `event`
    pub fn bound_to(&self, event: PointerEventKind) -> usize {
        self.registrations.iter().filter(|r| r.event == event).count()
    }
}
