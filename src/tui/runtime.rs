//! Dashboard runtime: the cooperative loop tying input, sync and drawing.
//!
//! One control flow. Each iteration waits briefly for a terminal event,
//! gives the sync controller a chance to run a due poll, and redraws when
//! something changed. A refresh blocks the loop until the backend answers or
//! the request times out.

#![allow(missing_docs)]

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};

use super::model::{DashboardCmd, DashboardModel, DashboardMsg};
use super::render::{frame_lines, render_frame};
use super::terminal_guard::TerminalGuard;
use super::update::update;
use crate::backend::Backend;
use crate::dashboard::{DashboardView, SelectionController, compose};
use crate::sync::{SimulationToggle, SyncController};

/// Longest wait for input before the loop checks the schedule again.
const INPUT_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardRuntimeConfig {
    pub poll_interval: Duration,
    pub color: bool,
}

/// Everything one dashboard needs, without the terminal.
pub struct DashboardSession<'a, B> {
    sync: &'a mut SyncController<B>,
    toggle: &'a SimulationToggle,
    selection: SelectionController,
    model: DashboardModel,
}

impl<'a, B: Backend> DashboardSession<'a, B> {
    pub fn new(
        sync: &'a mut SyncController<B>,
        toggle: &'a SimulationToggle,
        model: DashboardModel,
    ) -> Self {
        Self {
            sync,
            toggle,
            selection: SelectionController::new(),
            model,
        }
    }

    pub const fn model(&self) -> &DashboardModel {
        &self.model
    }

    pub fn sync(&self) -> &SyncController<B> {
        &*self.sync
    }

    pub const fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Compose the view from the current snapshot and selection.
    pub fn view(&self) -> DashboardView {
        compose(self.sync.snapshot(), self.selection.current())
    }

    /// Begin polling; the first refresh happens now.
    pub fn start(&mut self, period: Duration, now: Instant) {
        let _ = self.sync.start(period, now);
        self.refreshed();
    }

    pub fn stop(&mut self) {
        self.sync.stop();
    }

    /// Feed one message through `update` and carry out what it asks for.
    pub fn dispatch(&mut self, msg: DashboardMsg) {
        let cmd = update(&mut self.model, msg);
        self.execute(cmd);
    }

    pub fn is_done(&self) -> bool {
        self.model.quit
    }

    fn execute(&mut self, cmd: DashboardCmd) {
        match cmd {
            DashboardCmd::None | DashboardCmd::Quit => {}
            DashboardCmd::PollSync => {
                if self.sync.poll(Instant::now()).is_some() {
                    self.refreshed();
                }
            }
            DashboardCmd::Refresh => {
                let _ = self.sync.refresh();
                self.refreshed();
            }
            DashboardCmd::ToggleSimulation => {
                let _ = self.toggle.toggle(self.sync);
                self.refreshed();
            }
            DashboardCmd::Select(index) => {
                let item = self
                    .sync
                    .snapshot()
                    .and_then(|snapshot| snapshot.feed.get(index))
                    .cloned();
                match item {
                    Some(item) => self.selection.select(item),
                    None => self.model.detail_open = false,
                }
            }
            DashboardCmd::ClearSelection => self.selection.clear(),
        }
    }

    /// Resize the cursor range to whatever feed is held now.
    fn refreshed(&mut self) {
        let feed_len = self.sync.snapshot().map_or(0, |s| s.feed.len());
        let cmd = update(&mut self.model, DashboardMsg::Refreshed { feed_len });
        self.execute(cmd);
    }
}

/// Run the live dashboard until the operator quits.
///
/// # Errors
/// Returns I/O errors from the terminal layer. Backend failures never end
/// the loop.
pub fn run_dashboard<B: Backend>(
    sync: &mut SyncController<B>,
    toggle: &SimulationToggle,
    config: &DashboardRuntimeConfig,
) -> io::Result<()> {
    let _guard = TerminalGuard::new()?;
    let mut stdout = io::stdout();
    let model = DashboardModel::new(TerminalGuard::terminal_size(), config.color);
    let mut session = DashboardSession::new(sync, toggle, model);

    let result = run_inner(&mut stdout, &mut session, config);
    session.stop();
    result
}

fn run_inner<W: Write, B: Backend>(
    out: &mut W,
    session: &mut DashboardSession<'_, B>,
    config: &DashboardRuntimeConfig,
) -> io::Result<()> {
    draw(out, session)?;
    session.start(config.poll_interval, Instant::now());
    draw(out, session)?;

    while !session.is_done() {
        let wait = session
            .sync()
            .until_next_poll(Instant::now())
            .map_or(INPUT_POLL, |left| left.min(INPUT_POLL));

        let mut dirty = false;
        if event::poll(wait)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    session.dispatch(DashboardMsg::Key(key));
                    dirty = true;
                }
                Event::Resize(cols, rows) => {
                    session.dispatch(DashboardMsg::Resize { cols, rows });
                    dirty = true;
                }
                _ => {}
            }
        }
        if session.is_done() {
            break;
        }

        let before = session.sync().counters();
        session.dispatch(DashboardMsg::Tick);
        dirty |= session.sync().counters() != before;

        if dirty {
            draw(out, session)?;
        }
    }
    Ok(())
}

fn draw<W: Write, B: Backend>(out: &mut W, session: &DashboardSession<'_, B>) -> io::Result<()> {
    let lines = frame_lines(&session.view(), session.model());
    render_frame(out, &lines, session.model().color)
}
