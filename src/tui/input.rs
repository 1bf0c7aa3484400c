//! Key routing for the dashboard.

#![allow(missing_docs)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Overlay state that changes what a key means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputContext {
    pub detail_open: bool,
    pub help_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Quit,
    /// Close the topmost overlay, or quit when none is open.
    BackOrQuit,
    ToggleSimulation,
    ForceRefresh,
    CursorUp,
    CursorDown,
    SelectCursor,
    ClearSelection,
    ToggleHelp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

pub const HELP_BINDINGS: [HelpBinding; 8] = [
    HelpBinding {
        keys: "q",
        description: "Quit",
    },
    HelpBinding {
        keys: "Esc",
        description: "Close overlay, or quit",
    },
    HelpBinding {
        keys: "p / Space",
        description: "Pause or resume the simulation",
    },
    HelpBinding {
        keys: "r",
        description: "Refresh now",
    },
    HelpBinding {
        keys: "j k / ↑ ↓",
        description: "Move through the feed",
    },
    HelpBinding {
        keys: "Enter",
        description: "Open full analysis",
    },
    HelpBinding {
        keys: "x",
        description: "Close full analysis",
    },
    HelpBinding {
        keys: "?",
        description: "Toggle this help",
    },
];

/// Resolve a key press. Overlay-specific meanings take precedence.
#[must_use]
pub fn resolve_key_event(key: &KeyEvent, context: InputContext) -> Option<InputAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputAction::Quit);
    }
    if context.help_open {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') => Some(InputAction::ToggleHelp),
            KeyCode::Char('q') => Some(InputAction::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char('q') => Some(InputAction::Quit),
        KeyCode::Esc => Some(InputAction::BackOrQuit),
        KeyCode::Char('p' | ' ') => Some(InputAction::ToggleSimulation),
        KeyCode::Char('r') => Some(InputAction::ForceRefresh),
        KeyCode::Char('k') | KeyCode::Up => Some(InputAction::CursorUp),
        KeyCode::Char('j') | KeyCode::Down => Some(InputAction::CursorDown),
        KeyCode::Enter => Some(InputAction::SelectCursor),
        KeyCode::Char('x') if context.detail_open => Some(InputAction::ClearSelection),
        KeyCode::Char('?') => Some(InputAction::ToggleHelp),
        _ => None,
    }
}
