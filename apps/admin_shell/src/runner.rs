use std::io::Write;

use anyhow::Result;
use interaction_core::{
    ConfirmPrompt, Dispatcher, EventDisposition, NotificationEvent, PreferenceStore, UiEvent,
};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::script::{Command, Step};

/// Answers every confirmation with the same choice and logs the question.
pub struct FixedAnswer(pub bool);

impl ConfirmPrompt for FixedAnswer {
    fn confirm(&self, message: &str) -> bool {
        tracing::info!(prompt = message, answer = self.0, "confirmation requested");
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub line: usize,
    pub command: &'static str,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StepReport {
    fn new(step: &Step, outcome: impl Into<String>) -> Self {
        Self {
            line: step.line,
            command: command_name(&step.command),
            outcome: outcome.into(),
            detail: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

pub struct Shell {
    dispatcher: Dispatcher,
    preferences: PreferenceStore,
    json: bool,
}

impl Shell {
    pub fn new(dispatcher: Dispatcher, preferences: PreferenceStore, json: bool) -> Self {
        Self {
            dispatcher,
            preferences,
            json,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Replays `steps` in order, then waits for every spawned action.
    pub async fn run(&self, steps: &[Step], out: &mut impl Write) -> Result<Vec<StepReport>> {
        self.preferences
            .load_and_apply(self.dispatcher.document())
            .await;

        let mut reports = Vec::with_capacity(steps.len());
        for step in steps {
            let report = self.execute(step).await;
            writeln!(out, "{}", self.render_report(&report)?)?;
            reports.push(report);
        }
        self.dispatcher.settle().await;
        Ok(reports)
    }

    async fn execute(&self, step: &Step) -> StepReport {
        let document = self.dispatcher.document();
        match &step.command {
            Command::Click(name) | Command::Submit(name) => {
                let Some(element) = document.find_by_name(name) else {
                    tracing::warn!(line = step.line, name = %name, "no such element");
                    return StepReport::new(step, "missing").with_detail(name.clone());
                };
                let event = match step.command {
                    Command::Submit(_) => UiEvent::Submit { form: element },
                    _ => UiEvent::Click { target: element },
                };
                self.dispatch(step, event)
            }
            Command::Fill { name, value } => {
                let outcome = document
                    .find_by_name(name)
                    .map(|field| document.set_attribute(field, "value", value.clone()));
                match outcome {
                    Some(Ok(())) => StepReport::new(step, "filled").with_detail(name.clone()),
                    _ => StepReport::new(step, "missing").with_detail(name.clone()),
                }
            }
            Command::Key(press) => self.dispatch(step, UiEvent::KeyDown(press.clone())),
            Command::Resize(viewport) => self.dispatch(step, UiEvent::Resize(*viewport)),
            Command::Navigate => self.dispatch(step, UiEvent::BeforeNavigate),
            Command::Wait(duration) => {
                tokio::time::sleep(*duration).await;
                StepReport::new(step, "waited")
            }
            Command::Theme(theme) => {
                self.preferences.apply_theme(document, *theme).await;
                StepReport::new(step, "applied").with_detail(theme.as_str())
            }
            Command::Language(language) => {
                self.preferences.apply_language(document, language).await;
                StepReport::new(step, "applied").with_detail(language.clone())
            }
        }
    }

    fn dispatch(&self, step: &Step, event: UiEvent) -> StepReport {
        match self.dispatcher.dispatch(event) {
            EventDisposition::Ignored => StepReport::new(step, "ignored"),
            EventDisposition::Handled => StepReport::new(step, "handled"),
            EventDisposition::PreventDefault => StepReport::new(step, "prevent_default"),
            EventDisposition::ConfirmNavigation(prompt) => {
                StepReport::new(step, "confirm_navigation").with_detail(prompt)
            }
        }
    }

    fn render_report(&self, report: &StepReport) -> Result<String> {
        if self.json {
            return Ok(serde_json::to_string(report)?);
        }
        let mut line = format!("[line {}] {} -> {}", report.line, report.command, report.outcome);
        if let Some(detail) = &report.detail {
            line.push_str(&format!(" ({detail})"));
        }
        Ok(line)
    }
}

pub fn render_event(event: &NotificationEvent, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string(event)?);
    }
    Ok(match event {
        NotificationEvent::Shown(notification) => format!(
            "notify #{} [{}] {}",
            notification.id, notification.severity, notification.message
        ),
        NotificationEvent::Dismissed { id, reason } => format!("dismiss #{id} ({reason:?})"),
    })
}

/// Prints notification events until the center is dropped.
pub async fn print_events(mut events: broadcast::Receiver<NotificationEvent>, json: bool) {
    loop {
        match events.recv().await {
            Ok(event) => match render_event(&event, json) {
                Ok(line) => println!("{line}"),
                Err(err) => tracing::warn!(error = %err, "failed to render notification"),
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notification printer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Click(_) => "click",
        Command::Submit(_) => "submit",
        Command::Fill { .. } => "fill",
        Command::Key(_) => "key",
        Command::Resize(_) => "resize",
        Command::Navigate => "navigate",
        Command::Wait(_) => "wait",
        Command::Theme(_) => "theme",
        Command::Language(_) => "language",
    }
}

#[cfg(test)]
#[path = "tests/runner_tests.rs"]
mod tests;
