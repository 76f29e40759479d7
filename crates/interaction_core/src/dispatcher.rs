//! Routes UI events to actions and wraps each action's lifecycle.
//!
//! `dispatch` is synchronous: it resolves the event, performs the immediate
//! state changes (guard check, busy state, "started" notice) and spawns the
//! external operation. The spawned task owns the busy scope and the
//! critical-action lease, so both are released on every exit path.

use std::{mem, sync::Arc};

use parking_lot::Mutex;
use shared::{
    domain::{ElementId, Severity},
    error::OperationError,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    actions::{Action, ActionRequest},
    backend::ActionBackend,
    busy::BusyStateController,
    config::InteractionConfig,
    document::Document,
    guard::{NavigationDecision, SingleFlightGuard},
    keyboard::{KeyPress, Shortcut},
    layout::{self, Viewport},
    notifications::NotificationCenter,
    timers::{Debouncer, Throttler},
    validation,
};

pub const ALREADY_RUNNING_MESSAGE: &str = "Optimization already running";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Click { target: ElementId },
    Submit { form: ElementId },
    KeyDown(KeyPress),
    Resize(Viewport),
    BeforeNavigate,
}

/// What the host should do with the original event after dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDisposition {
    /// Not an action; default behavior continues.
    Ignored,
    Handled,
    /// Handled, and the host must suppress the default behavior.
    PreventDefault,
    /// Ask the user before leaving the page.
    ConfirmNavigation(String),
}

/// Blocking yes/no question shown before destructive actions.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

pub struct AlwaysConfirm;

impl ConfirmPrompt for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

struct Shared {
    document: Document,
    busy: BusyStateController,
    notifications: NotificationCenter,
    guard: Arc<SingleFlightGuard>,
    backend: Arc<dyn ActionBackend>,
    prompt: Arc<dyn ConfirmPrompt>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

pub struct Dispatcher {
    shared: Arc<Shared>,
    resize: Debouncer<Viewport>,
    save: Throttler<()>,
}

impl Dispatcher {
    pub fn new(
        document: Document,
        backend: Arc<dyn ActionBackend>,
        config: InteractionConfig,
    ) -> Self {
        Self::with_collaborators(
            document,
            backend,
            Arc::new(SingleFlightGuard::new()),
            Arc::new(AlwaysConfirm),
            config,
        )
    }

    pub fn with_collaborators(
        document: Document,
        backend: Arc<dyn ActionBackend>,
        guard: Arc<SingleFlightGuard>,
        prompt: Arc<dyn ConfirmPrompt>,
        config: InteractionConfig,
    ) -> Self {
        let shared = Arc::new(Shared {
            busy: BusyStateController::new(document.clone()),
            notifications: NotificationCenter::new(config.notification_ttl),
            document,
            guard,
            backend,
            prompt,
            tasks: Mutex::new(Vec::new()),
        });

        let layout_document = shared.document.clone();
        let breakpoint = config.mobile_breakpoint;
        let resize = Debouncer::new(config.resize_debounce, move |viewport| {
            layout::update_responsive_elements(&layout_document, viewport, breakpoint)
        });

        let save_shared = Arc::clone(&shared);
        let save = Throttler::new(config.save_throttle, move |()| {
            save_shared.run(Action::Save, None)
        });

        Self {
            shared,
            resize,
            save,
        }
    }

    pub fn document(&self) -> &Document {
        &self.shared.document
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.shared.notifications
    }

    pub fn busy(&self) -> &BusyStateController {
        &self.shared.busy
    }

    pub fn guard(&self) -> &Arc<SingleFlightGuard> {
        &self.shared.guard
    }

    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, event: UiEvent) -> EventDisposition {
        match event {
            UiEvent::Click { target } => self.handle_click(target),
            UiEvent::Submit { form } => self.handle_submit(form),
            UiEvent::KeyDown(press) => self.handle_key(&press),
            UiEvent::Resize(viewport) => {
                self.resize.call(viewport);
                EventDisposition::Handled
            }
            UiEvent::BeforeNavigate => match self.shared.guard.before_navigate() {
                NavigationDecision::Proceed => EventDisposition::Ignored,
                NavigationDecision::Confirm(prompt) => EventDisposition::ConfirmNavigation(prompt),
            },
        }
    }

    /// Waits for every action spawned so far, including ones spawned while waiting.
    pub async fn settle(&self) {
        loop {
            let pending = mem::take(&mut *self.shared.tasks.lock());
            if pending.is_empty() {
                return;
            }
            for task in pending {
                if let Err(err) = task.await {
                    warn!(error = %err, "action task ended abnormally");
                }
            }
        }
    }

    fn handle_click(&self, target: ElementId) -> EventDisposition {
        let Some(request) = ActionRequest::from_target(&self.shared.document, target) else {
            return EventDisposition::Ignored;
        };
        if self.shared.document.is_disabled(request.trigger) {
            debug!(trigger = %request.trigger, "click on disabled trigger ignored");
            return EventDisposition::Ignored;
        }
        match Action::try_from(&request) {
            Ok(action) => {
                self.shared.run(action, Some(request.trigger));
                EventDisposition::Handled
            }
            Err(err) => match err.user_message() {
                Some(message) => {
                    warn!(action = %request.action_name, error = %err, "rejected action parameters");
                    self.shared.notifications.notify(message, Severity::Error);
                    EventDisposition::Handled
                }
                None => {
                    warn!(action = %request.action_name, "unknown action ignored");
                    EventDisposition::Ignored
                }
            },
        }
    }

    fn handle_submit(&self, form: ElementId) -> EventDisposition {
        let document = &self.shared.document;
        let button = validation::submit_button(document, form);
        if let Some(button) = button {
            self.shared.busy.mark_busy(button);
        }

        let errors = validation::validate_form(document, form);
        validation::render_field_errors(document, form, &errors);
        if errors.is_empty() {
            return EventDisposition::Handled;
        }

        debug!(form = %form, invalid = errors.len(), "form submission blocked");
        if let Some(button) = button {
            self.shared.busy.mark_idle(button);
        }
        EventDisposition::PreventDefault
    }

    fn handle_key(&self, press: &KeyPress) -> EventDisposition {
        match Shortcut::resolve(press) {
            Some(Shortcut::Save) => {
                if !self.save.call(()) {
                    debug!("save shortcut throttled");
                }
                EventDisposition::PreventDefault
            }
            Some(Shortcut::Optimize) => {
                self.shared.run(Action::Optimize, None);
                EventDisposition::PreventDefault
            }
            Some(Shortcut::DismissOverlays) => {
                let modals = layout::close_all_modals(&self.shared.document);
                let notices = self.shared.notifications.dismiss_all();
                debug!(modals, notices, "overlays dismissed");
                EventDisposition::Handled
            }
            None => EventDisposition::Ignored,
        }
    }
}

impl Shared {
    fn run(self: &Arc<Self>, action: Action, trigger: Option<ElementId>) {
        let kind = action.kind();
        let lease = if kind.is_critical() {
            match self.guard.try_lease() {
                Some(lease) => Some(lease),
                None => {
                    warn!(action = %kind, "critical action already in flight");
                    self.notifications
                        .notify(ALREADY_RUNNING_MESSAGE, Severity::Warning);
                    return;
                }
            }
        } else {
            None
        };

        if let Action::Delete { name, .. } = &action {
            if !self
                .prompt
                .confirm(&format!("Are you sure you want to delete {name}?"))
            {
                debug!(action = %kind, "deletion declined");
                return;
            }
        }

        let busy = trigger.map(|element| self.busy.scope(element));
        if let Some(message) = started_message(&action) {
            self.notifications.notify(message, Severity::Info);
        }
        info!(action = %kind, trigger = ?trigger, "action started");

        let shared = Arc::clone(self);
        let task = tokio::spawn(async move {
            let _lease = lease;
            let outcome = shared.execute_isolated(&action).await;

            if outcome.is_ok() {
                if let (Action::Delete { .. }, Some(trigger)) = (&action, trigger) {
                    shared.remove_enclosing_row(trigger);
                }
            }
            drop(busy);

            match outcome {
                Ok(()) => {
                    info!(action = %kind, "action completed");
                    shared
                        .notifications
                        .notify(success_message(&action), Severity::Success);
                }
                Err(err) => {
                    warn!(action = %kind, error = %err, "action failed");
                    shared.notifications.notify(
                        format!("{} failed: {err}", kind.title()),
                        Severity::Error,
                    );
                }
            }
        });
        self.track(task);
    }

    /// Runs the operation in its own task so a panic surfaces as an
    /// `OperationError` instead of unwinding through the lifecycle task.
    async fn execute_isolated(&self, action: &Action) -> Result<(), OperationError> {
        let backend = Arc::clone(&self.backend);
        let operation = action.clone();
        match tokio::spawn(async move { backend.execute(&operation).await }).await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => Err(OperationError::internal("operation panicked")),
            Err(_) => Err(OperationError::internal("operation cancelled")),
        }
    }

    fn remove_enclosing_row(&self, trigger: ElementId) {
        let row = self.document.closest(trigger, |el| {
            el.tag() == "tr" || el.has_class("card") || el.has_class("row")
        });
        if let Some(row) = row {
            if let Err(err) = self.document.remove(row) {
                debug!(error = %err, "deleted row already gone");
            }
        }
    }

    fn track(&self, task: JoinHandle<()>) {
        let mut tasks = self.tasks.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(task);
    }
}

fn started_message(action: &Action) -> Option<String> {
    match action {
        Action::Export { format, .. } => {
            Some(format!("Exporting to {}...", format.display_label()))
        }
        Action::Delete { .. } => None,
        Action::Duplicate { .. } => Some("Duplicating item...".to_string()),
        Action::Optimize => Some("Starting optimization...".to_string()),
        Action::Save => Some("Saving changes...".to_string()),
    }
}

fn success_message(action: &Action) -> String {
    match action {
        Action::Export { format, .. } => {
            format!("Successfully exported to {}", format.display_label())
        }
        Action::Delete { name, .. } => format!("Successfully deleted {name}"),
        Action::Duplicate { .. } => "Item duplicated successfully".to_string(),
        Action::Optimize => "Optimization completed successfully".to_string(),
        Action::Save => "Changes saved successfully".to_string(),
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
