//! Client-side interaction layer for the timetabling admin console.
//!
//! Events from the page go through [`Dispatcher`], which resolves them to
//! typed [`Action`]s, keeps at most one critical action in flight through
//! [`SingleFlightGuard`], marks triggers busy, and reports outcomes through
//! the [`NotificationCenter`].

pub mod actions;
pub mod backend;
pub mod busy;
pub mod config;
pub mod dispatcher;
pub mod document;
pub mod format;
pub mod guard;
pub mod keyboard;
pub mod layout;
pub mod notifications;
pub mod preferences;
pub mod timers;
pub mod validation;

pub use actions::{Action, ActionKind, ActionParseError, ActionRequest};
pub use backend::{ActionBackend, MissingBackend, SimulatedBackend};
pub use busy::{BusyScope, BusyStateController};
pub use config::InteractionConfig;
pub use dispatcher::{AlwaysConfirm, ConfirmPrompt, Dispatcher, EventDisposition, UiEvent};
pub use document::{Document, DocumentError};
pub use guard::{CriticalActionLease, NavigationDecision, SingleFlightGuard};
pub use keyboard::{KeyPress, Shortcut};
pub use layout::Viewport;
pub use notifications::{
    DismissReason, Notification, NotificationCenter, NotificationEvent, NotificationHandle,
};
pub use preferences::{
    MemoryPreferenceBackend, PreferenceBackend, PreferenceError, PreferenceStore,
};
pub use timers::{Debouncer, Throttler};
