use std::{collections::HashSet, time::Duration};

use async_trait::async_trait;
use shared::error::OperationError;

use crate::actions::{Action, ActionKind};

/// External provider of the operations behind each action. The interaction
/// layer only wraps the lifecycle around the call.
#[async_trait]
pub trait ActionBackend: Send + Sync {
    async fn execute(&self, action: &Action) -> Result<(), OperationError>;
}

pub struct MissingBackend;

#[async_trait]
impl ActionBackend for MissingBackend {
    async fn execute(&self, action: &Action) -> Result<(), OperationError> {
        Err(OperationError::unavailable(format!(
            "no backend available for {}",
            action.kind()
        )))
    }
}

/// Stand-in backend that sleeps for a per-action duration and optionally fails.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    failing: HashSet<ActionKind>,
    speedup: u32,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self {
            failing: HashSet::new(),
            speedup: 1,
        }
    }

    pub fn failing(mut self, kind: ActionKind) -> Self {
        self.failing.insert(kind);
        self
    }

    /// Divides every simulated duration by `factor` (minimum 1).
    pub fn with_speedup(mut self, factor: u32) -> Self {
        self.speedup = factor.max(1);
        self
    }

    pub fn duration_for(&self, kind: ActionKind) -> Duration {
        let base = match kind {
            ActionKind::Export => Duration::from_millis(2000),
            ActionKind::Optimize => Duration::from_millis(5000),
            ActionKind::Delete | ActionKind::Duplicate | ActionKind::Save => {
                Duration::from_millis(1000)
            }
        };
        base / self.speedup
    }
}

#[async_trait]
impl ActionBackend for SimulatedBackend {
    async fn execute(&self, action: &Action) -> Result<(), OperationError> {
        let kind = action.kind();
        tokio::time::sleep(self.duration_for(kind)).await;
        if self.failing.contains(&kind) {
            return Err(OperationError::internal(format!("simulated {kind} failure")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn simulated_backend_takes_configured_time() {
        let backend = SimulatedBackend::new();
        let started = tokio::time::Instant::now();
        backend.execute(&Action::Optimize).await.expect("optimize");
        assert!(started.elapsed() >= Duration::from_millis(5000));
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_backend_fails_selected_kinds() {
        let backend = SimulatedBackend::new().failing(ActionKind::Save).with_speedup(10);
        assert!(backend.execute(&Action::Save).await.is_err());
        assert!(backend.execute(&Action::Duplicate { id: None }).await.is_ok());
        assert_eq!(backend.duration_for(ActionKind::Export), Duration::from_millis(200));
    }

    #[tokio::test]
    async fn missing_backend_reports_unavailable() {
        let err = MissingBackend.execute(&Action::Save).await.unwrap_err();
        assert_eq!(err.code, shared::error::ErrorCode::Unavailable);
    }
}
