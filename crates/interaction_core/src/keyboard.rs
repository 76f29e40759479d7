//! Fixed keyboard bindings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyPress {
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
        }
    }

    pub fn ctrl(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: true,
            meta: false,
        }
    }

    pub fn meta(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: true,
        }
    }

    fn has_command_modifier(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Save,
    Optimize,
    DismissOverlays,
}

impl Shortcut {
    /// Ctrl or Cmd + S saves, Ctrl or Cmd + O optimizes, Escape dismisses overlays.
    pub fn resolve(press: &KeyPress) -> Option<Self> {
        if press.key == "Escape" {
            return Some(Self::DismissOverlays);
        }
        if !press.has_command_modifier() {
            return None;
        }
        match press.key.as_str() {
            "s" => Some(Self::Save),
            "o" => Some(Self::Optimize),
            _ => None,
        }
    }
}
