//! Pure update function for the dashboard.
//!
//! `update()` mutates the model and returns the side-effect the runtime
//! should perform. It performs no I/O.

use super::input::{InputAction, InputContext, resolve_key_event};
use super::model::{DashboardCmd, DashboardModel, DashboardMsg};

/// Apply a message to the model and return the next command for the runtime.
pub fn update(model: &mut DashboardModel, msg: DashboardMsg) -> DashboardCmd {
    match msg {
        DashboardMsg::Tick => {
            model.tick = model.tick.wrapping_add(1);
            DashboardCmd::PollSync
        }

        DashboardMsg::Key(key) => {
            let context = InputContext {
                detail_open: model.detail_open,
                help_open: model.help_open,
            };
            resolve_key_event(&key, context)
                .map_or(DashboardCmd::None, |action| apply_input_action(model, action))
        }

        DashboardMsg::Resize { cols, rows } => {
            model.terminal_size = (cols, rows);
            DashboardCmd::None
        }

        DashboardMsg::Refreshed { feed_len } => {
            model.feed_len = feed_len;
            model.clamp_cursor();
            DashboardCmd::None
        }
    }
}

fn apply_input_action(model: &mut DashboardModel, action: InputAction) -> DashboardCmd {
    match action {
        InputAction::Quit => {
            model.quit = true;
            DashboardCmd::Quit
        }
        InputAction::BackOrQuit => {
            if model.help_open {
                model.help_open = false;
                DashboardCmd::None
            } else if model.detail_open {
                model.detail_open = false;
                DashboardCmd::ClearSelection
            } else {
                model.quit = true;
                DashboardCmd::Quit
            }
        }
        InputAction::ToggleSimulation => DashboardCmd::ToggleSimulation,
        InputAction::ForceRefresh => DashboardCmd::Refresh,
        InputAction::CursorUp => {
            model.cursor = model.cursor.saturating_sub(1);
            DashboardCmd::None
        }
        InputAction::CursorDown => {
            if model.cursor + 1 < model.feed_len {
                model.cursor += 1;
            }
            DashboardCmd::None
        }
        InputAction::SelectCursor => {
            if model.feed_len == 0 {
                return DashboardCmd::None;
            }
            model.detail_open = true;
            DashboardCmd::Select(model.cursor)
        }
        InputAction::ClearSelection => {
            model.detail_open = false;
            DashboardCmd::ClearSelection
        }
        InputAction::ToggleHelp => {
            model.help_open = !model.help_open;
            DashboardCmd::None
        }
    }
}
