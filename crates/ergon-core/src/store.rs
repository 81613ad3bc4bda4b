//! Focus store: the engine plus persistence and change notification.
//!
//! Screens hold one `FocusStore` (behind `Arc<Mutex<_>>` when a
//! [`TickDriver`](crate::TickDriver) shares it) and call its actions. After
//! each action that changed something the store
//!
//! 1. writes the persisted subset to the key/value store when it may have
//!    changed, and
//! 2. calls every subscriber with the emitted [`Event`] and the new state.
//!
//! A failed write is logged and remembered in `last_persist_error()`; the
//! in-memory state is kept as is.

use crate::error::StorageError;
use crate::events::Event;
use crate::storage::{KvStore, PersistSlot, FOCUS_STORAGE_KEY};
use crate::timer::{FocusEngine, FocusPreset, PersistedFocus};

pub type SubscriptionId = u64;

type Subscriber = Box<dyn FnMut(&Event, &FocusEngine) + Send>;

pub struct FocusStore<S> {
    engine: FocusEngine,
    slot: PersistSlot<S>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: SubscriptionId,
    last_persist_error: Option<String>,
}

impl<S: KvStore> FocusStore<S> {
    /// Restore from `storage`, falling back to the Pomodoro preset.
    pub fn open(storage: S) -> Self {
        Self::open_with_default(storage, FocusPreset::default())
    }

    /// Restore from `storage`; `default_preset` is used when nothing
    /// (or nothing readable) was stored.
    pub fn open_with_default(storage: S, default_preset: FocusPreset) -> Self {
        let slot = PersistSlot::new(storage, FOCUS_STORAGE_KEY);
        let persisted = slot.load_or(PersistedFocus {
            active_preset: default_preset,
            ..PersistedFocus::default()
        });
        tracing::debug!(
            sessions = persisted.sessions.len(),
            completed_sessions = persisted.completed_sessions,
            "focus store restored"
        );
        Self {
            engine: FocusEngine::from_persisted(persisted),
            slot,
            subscribers: Vec::new(),
            next_subscription: 0,
            last_persist_error: None,
        }
    }

    pub fn engine(&self) -> &FocusEngine {
        &self.engine
    }

    /// Message of the most recent failed write, cleared by the next success.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Register a callback invoked after every state change.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Event, &FocusEngine) + Send + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    // ── Actions ──────────────────────────────────────────────────────

    pub fn start_timer(&mut self) -> Option<Event> {
        self.apply(FocusEngine::start_timer)
    }

    pub fn pause_timer(&mut self) -> Option<Event> {
        self.apply(FocusEngine::pause_timer)
    }

    pub fn resume_timer(&mut self) -> Option<Event> {
        self.apply(FocusEngine::resume_timer)
    }

    pub fn reset_timer(&mut self) -> Option<Event> {
        self.apply(FocusEngine::reset_timer)
    }

    pub fn skip_to_break(&mut self) -> Option<Event> {
        self.apply(FocusEngine::skip_to_break)
    }

    pub fn skip_to_work(&mut self) -> Option<Event> {
        self.apply(FocusEngine::skip_to_work)
    }

    pub fn tick(&mut self) -> Option<Event> {
        self.apply(FocusEngine::tick)
    }

    pub fn set_active_preset(&mut self, preset: FocusPreset) -> Option<Event> {
        self.apply(|engine| engine.set_active_preset(preset))
    }

    pub fn add_custom_preset(&mut self, preset: FocusPreset) -> Option<Event> {
        self.apply(|engine| engine.add_custom_preset(preset))
    }

    pub fn clear_history(&mut self) -> Option<Event> {
        self.apply(FocusEngine::clear_history)
    }

    /// Write the persisted subset now and report the outcome.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        let result = self.slot.save(&self.engine.persisted());
        self.last_persist_error = result.as_ref().err().map(ToString::to_string);
        result
    }

    fn apply<F>(&mut self, action: F) -> Option<Event>
    where
        F: FnOnce(&mut FocusEngine) -> Option<Event>,
    {
        let event = action(&mut self.engine)?;
        if event.touches_persisted() {
            if let Err(e) = self.flush() {
                tracing::warn!(error = %e, "failed to persist focus state");
            }
        }
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event, &self.engine);
        }
        Some(event)
    }
}
