//! Action identifiers and their typed parameter records.
//!
//! Raw `data-*` attributes are read once, into an [`ActionRequest`], and
//! validated into an [`Action`] at that boundary. Handlers only see typed
//! actions.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::Serialize;
use shared::domain::{ElementId, ExportFormat};
use thiserror::Error;

use crate::document::Document;

pub const ACTION_ATTRIBUTE: &str = "data-action";
/// Parameter attributes copied from the trigger, keyed without the `data-` prefix.
pub const PARAMETER_ATTRIBUTES: [&str; 3] = ["id", "name", "format"];

const DEFAULT_ITEM_NAME: &str = "item";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub action_name: String,
    pub trigger: ElementId,
    pub parameters: BTreeMap<String, String>,
}

impl ActionRequest {
    /// Builds a request from the nearest ancestor (inclusive) of `target`
    /// that carries an action identifier.
    pub fn from_target(document: &Document, target: ElementId) -> Option<Self> {
        let trigger = document.closest_with_attribute(target, ACTION_ATTRIBUTE)?;
        let action_name = document.attribute(trigger, ACTION_ATTRIBUTE)?;
        let parameters = PARAMETER_ATTRIBUTES
            .iter()
            .filter_map(|key| {
                document
                    .attribute(trigger, &format!("data-{key}"))
                    .map(|value| (key.to_string(), value))
            })
            .collect();
        Some(Self {
            action_name,
            trigger,
            parameters,
        })
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Export,
    Delete,
    Duplicate,
    Optimize,
    Save,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        Self::Export,
        Self::Delete,
        Self::Duplicate,
        Self::Optimize,
        Self::Save,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Export => "export",
            Self::Delete => "delete",
            Self::Duplicate => "duplicate",
            Self::Optimize => "optimize",
            Self::Save => "save",
        }
    }

    /// At most one critical action may be in flight at a time.
    pub fn is_critical(self) -> bool {
        matches!(self, Self::Optimize)
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            Self::Export => "Export",
            Self::Delete => "Delete",
            Self::Duplicate => "Duplicate",
            Self::Optimize => "Optimization",
            Self::Save => "Save",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ActionParseError::UnknownAction(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Export { id: String, format: ExportFormat },
    Delete { id: Option<String>, name: String },
    Duplicate { id: Option<String> },
    Optimize,
    Save,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Export { .. } => ActionKind::Export,
            Self::Delete { .. } => ActionKind::Delete,
            Self::Duplicate { .. } => ActionKind::Duplicate,
            Self::Optimize => ActionKind::Optimize,
            Self::Save => ActionKind::Save,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionParseError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("{action} requires parameter '{parameter}'")]
    MissingParameter {
        action: ActionKind,
        parameter: &'static str,
    },
    #[error("{action} parameter '{parameter}' has unsupported value '{value}'")]
    InvalidParameter {
        action: ActionKind,
        parameter: &'static str,
        value: String,
    },
}

impl ActionParseError {
    /// Message shown to the user, or `None` for failures that stay silent.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::UnknownAction(_) => None,
            Self::MissingParameter {
                action: ActionKind::Export,
                parameter: "id",
            } => Some("Export ID not found".to_string()),
            Self::MissingParameter { action, parameter } => {
                Some(format!("{} is missing '{parameter}'", action.title()))
            }
            Self::InvalidParameter {
                action: ActionKind::Export,
                parameter: "format",
                value,
            } => Some(format!("Unsupported export format: {value}")),
            Self::InvalidParameter {
                action,
                parameter,
                value,
            } => Some(format!(
                "{} has an invalid '{parameter}': {value}",
                action.title()
            )),
        }
    }
}

impl TryFrom<&ActionRequest> for Action {
    type Error = ActionParseError;

    fn try_from(request: &ActionRequest) -> Result<Self, Self::Error> {
        let kind: ActionKind = request.action_name.parse()?;
        let id = request.parameter("id").map(str::to_string);
        match kind {
            ActionKind::Export => {
                let id = id.ok_or(ActionParseError::MissingParameter {
                    action: kind,
                    parameter: "id",
                })?;
                let format = match request.parameter("format") {
                    Some(raw) => {
                        raw.parse()
                            .map_err(|_| ActionParseError::InvalidParameter {
                                action: kind,
                                parameter: "format",
                                value: raw.to_string(),
                            })?
                    }
                    None => ExportFormat::default(),
                };
                Ok(Self::Export { id, format })
            }
            ActionKind::Delete => Ok(Self::Delete {
                id,
                name: request
                    .parameter("name")
                    .unwrap_or(DEFAULT_ITEM_NAME)
                    .to_string(),
            }),
            ActionKind::Duplicate => Ok(Self::Duplicate { id }),
            ActionKind::Optimize => Ok(Self::Optimize),
            ActionKind::Save => Ok(Self::Save),
        }
    }
}

#[cfg(test)]
#[path = "tests/actions_tests.rs"]
mod tests;
