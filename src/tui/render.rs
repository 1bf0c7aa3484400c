//! Frame layout and drawing.
//!
//! [`frame_lines`] lays a [`DashboardView`] out as styled text lines for a
//! given terminal size; [`render_frame`] writes them with crossterm. Keeping
//! the two apart lets tests check layout without a terminal.

#![allow(missing_docs)]

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use unicode_width::UnicodeWidthChar;

use super::input::HELP_BINDINGS;
use super::model::DashboardModel;
use crate::dashboard::{DashboardView, DetailOverlay, RunState, StatCard, Tone};

/// Rows above the feed list: header, status, gap, three stats, gap, feed title.
const BODY_TOP: usize = 8;
/// Rows below the feed list: gap and footer.
const FOOTER_ROWS: usize = 2;

const FOOTER: &str = " q quit · p pause/resume · r refresh · ↑↓ move · Enter details · ? help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Title,
    Dim,
    Active,
    Paused,
    Approved,
    Rejected,
    Neutral,
    Highlight,
    Cursor,
}

impl Style {
    const fn color(self) -> Option<Color> {
        match self {
            Self::Plain | Self::Neutral | Self::Cursor => None,
            Self::Title => Some(Color::Cyan),
            Self::Dim => Some(Color::DarkGrey),
            Self::Active | Self::Approved => Some(Color::Green),
            Self::Paused | Self::Highlight => Some(Color::Yellow),
            Self::Rejected => Some(Color::Red),
        }
    }

    const fn of_tone(tone: Tone) -> Self {
        match tone {
            Tone::Approved => Self::Approved,
            Tone::Rejected => Self::Rejected,
            Tone::Neutral => Self::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub style: Style,
}

impl Line {
    fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn blank() -> Self {
        Self::new(String::new(), Style::Plain)
    }
}

// ──────────────────── layout ────────────────────

/// Lay out one frame. Lines are cut to the terminal width and height.
#[must_use]
pub fn frame_lines(view: &DashboardView, model: &DashboardModel) -> Vec<Line> {
    let (cols, rows) = model.terminal_size;
    let width = usize::from(cols.max(1));
    let height = usize::from(rows.max(1));

    let mut lines = Vec::with_capacity(height);
    lines.push(Line::new(
        format!(" ⚡ {} · {}", view.header.title, view.header.subtitle),
        Style::Title,
    ));
    let state_style = match view.header.run_state {
        RunState::Active => Style::Active,
        RunState::Paused => Style::Paused,
        RunState::Unknown => Style::Dim,
    };
    lines.push(Line::new(
        format!(
            " ● {}   [p] {}",
            view.header.run_state_label, view.header.control_label
        ),
        state_style,
    ));
    lines.push(Line::blank());
    for card in &view.stats {
        lines.push(stat_line(card));
    }
    lines.push(Line::blank());
    lines.push(Line::new(
        format!(" {} · {}", view.feed_title, view.feed_count),
        Style::Title,
    ));

    let body_rows = height.saturating_sub(BODY_TOP + FOOTER_ROWS);
    if model.help_open {
        lines.extend(help_lines());
    } else if let Some(overlay) = &view.overlay {
        lines.extend(overlay_lines(overlay));
    } else {
        lines.extend(feed_lines(view, model.cursor, body_rows));
    }

    lines.truncate(BODY_TOP + body_rows);
    while lines.len() < height.saturating_sub(1) {
        lines.push(Line::blank());
    }
    lines.push(Line::new(FOOTER, Style::Dim));
    lines.truncate(height);

    for line in &mut lines {
        line.text = fit(&line.text, width);
    }
    lines
}

fn stat_line(card: &StatCard) -> Line {
    Line::new(
        format!(
            "   {} {:<16} {:>14}   {}",
            card.icon, card.label, card.value, card.trend
        ),
        if card.highlight {
            Style::Highlight
        } else {
            Style::Plain
        },
    )
}

fn feed_lines(view: &DashboardView, cursor: usize, capacity: usize) -> Vec<Line> {
    if view.feed.is_empty() {
        return vec![Line::new("   (no activity yet)", Style::Dim)];
    }
    let offset = (cursor + 1).saturating_sub(capacity);
    view.feed
        .iter()
        .enumerate()
        .skip(offset)
        .take(capacity.max(1))
        .map(|(i, card)| {
            let marker = if i == cursor { '▸' } else { ' ' };
            Line::new(
                format!(
                    " {marker} {} {:<12} {:>8}  {} {:<8}  {}  {}",
                    card.task_icon,
                    card.task_label,
                    card.clock,
                    card.verdict_icon,
                    card.verdict_label,
                    card.worker,
                    card.duration
                ),
                if i == cursor {
                    Style::Cursor
                } else {
                    Style::of_tone(card.tone)
                },
            )
        })
        .collect()
}

fn overlay_lines(overlay: &DetailOverlay) -> Vec<Line> {
    let card = &overlay.card;
    let row = |label: &str, value: &str| Line::new(format!(" │   {label:<18}{value}"), Style::Plain);
    vec![
        Line::new(
            format!(
                " ┌─ {} {} · Transaction Analysis",
                card.task_icon, overlay.title
            ),
            Style::Title,
        ),
        Line::new(" │ 📋 Task Details", Style::Title),
        row("Task ID", &card.id),
        row("Worker ID", &card.worker),
        row("Duration", &card.duration),
        row("Submitted", &card.submitted),
        Line::new(" │ 🤖 Agent Verification", Style::Title),
        Line::new(
            format!(" │   {} {}", card.verdict_icon, card.verdict_label),
            Style::of_tone(card.tone),
        ),
        Line::new(format!(" │   {}", card.narrative), Style::Plain),
        Line::new(" │ 💎 Economic Impact", Style::Title),
        row("Tokens Minted", &card.minted),
        row("USD Equivalent", &card.usd),
        row("Skill Multiplier", &card.multiplier),
        row("Transaction Fee", card.fee_note),
        Line::new(" └─ Esc or x to close", Style::Dim),
    ]
}

fn help_lines() -> Vec<Line> {
    let mut lines = vec![Line::new(" ┌─ Keys", Style::Title)];
    lines.extend(HELP_BINDINGS.iter().map(|binding| {
        Line::new(
            format!(" │   {:<12}{}", binding.keys, binding.description),
            Style::Plain,
        )
    }));
    lines.push(Line::new(" └─ Esc or ? to close", Style::Dim));
    lines
}

/// Columns taken by `ch`. A base char followed by U+FE0F renders as emoji,
/// two columns wide.
fn char_width(ch: char, next: Option<&char>) -> usize {
    if next == Some(&'\u{FE0F}') {
        2
    } else {
        UnicodeWidthChar::width(ch).unwrap_or(0)
    }
}

/// Terminal columns `text` occupies.
pub fn display_width(text: &str) -> usize {
    let mut chars = text.chars().peekable();
    let mut width = 0;
    while let Some(ch) = chars.next() {
        width += char_width(ch, chars.peek());
    }
    width
}

/// Cut to `width` terminal columns. A wide char that would straddle the
/// edge is dropped whole.
fn fit(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut used = 0;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        let w = char_width(ch, chars.peek());
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out
}

// ──────────────────── drawing ────────────────────

/// Draw `lines` from the top-left corner.
pub fn render_frame<W: Write>(out: &mut W, lines: &[Line], color: bool) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    for (row, line) in lines.iter().enumerate() {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(out, MoveTo(0, row))?;
        if line.style == Style::Cursor {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        if color && let Some(fg) = line.style.color() {
            queue!(out, SetForegroundColor(fg))?;
        }
        write!(out, "{}", line.text)?;
        queue!(out, SetAttribute(Attribute::Reset))?;
    }
    out.flush()
}

// ──────────────────── tests ────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AggregateStats, SimulationStatus, TaskType, Verdict};
    use crate::dashboard::{Selection, compose};
    use crate::sync::Snapshot;
    use crate::sync::test_support::feed_item;

    fn snapshot(feed_len: usize) -> Snapshot {
        Snapshot {
            stats: AggregateStats {
                total_users: 120,
                total_minted: 340.5,
                total_tasks: 300,
            },
            feed: (0..feed_len)
                .map(|i| feed_item(&format!("tx-{i}"), TaskType::Coding, 4.0, Verdict::Approved))
                .collect(),
            status: SimulationStatus { active: true },
        }
    }

    fn model(cols: u16, rows: u16) -> DashboardModel {
        DashboardModel::new((cols, rows), false)
    }

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn frame_fills_terminal_height() {
        let view = compose(Some(&snapshot(3)), &Selection::None);
        let lines = frame_lines(&view, &model(120, 30));
        assert_eq!(lines.len(), 30);
        assert!(lines[0].text.contains("HEC Overseer"));
        assert!(lines[1].text.contains("System Active"));
        assert!(lines[1].text.contains("⏸ Pause"));
        assert!(lines.last().unwrap().text.contains("q quit"));
    }

    #[test]
    fn stats_and_feed_are_listed() {
        let view = compose(Some(&snapshot(2)), &Selection::None);
        let lines = frame_lines(&view, &model(140, 30));
        let all = texts(&lines).join("\n");
        assert!(all.contains("340.5 EC"));
        assert!(all.contains("≈ $8513 USD @ $25/EC"));
        assert!(all.contains("2 recent"));
        assert_eq!(lines[BODY_TOP].style, Style::Cursor);
        assert!(lines[BODY_TOP].text.contains('▸'));
        assert_eq!(lines[BODY_TOP + 1].style, Style::Approved);
    }

    #[test]
    fn cursor_scrolls_into_view() {
        let view = compose(Some(&snapshot(20)), &Selection::None);
        let mut m = model(140, 14);
        m.feed_len = 20;
        m.cursor = 15;
        let lines = frame_lines(&view, &m);
        let body_rows = 14 - BODY_TOP - FOOTER_ROWS;
        let last_visible = &lines[BODY_TOP + body_rows - 1];
        assert_eq!(last_visible.style, Style::Cursor);
        assert!(last_visible.text.contains("worker-tx-15"));
        assert!(lines[BODY_TOP].text.contains("worker-tx-12"));
    }

    #[test]
    fn overlay_replaces_feed() {
        let item = feed_item("picked", TaskType::Construction, 2.0, Verdict::Rejected);
        let view = compose(Some(&snapshot(2)), &Selection::Selected(item));
        let lines = frame_lines(&view, &model(140, 40));
        let all = texts(&lines).join("\n");
        assert!(all.contains("CONSTRUCTION Task"));
        assert!(all.contains("picked"));
        assert!(all.contains("Tokens Minted"));
        assert!(all.contains("0 EC"));
        assert!(all.contains("$0.00"));
        assert!(all.contains("1.5x"));
        assert!(all.contains("2% burned"));
        assert!(all.contains("Insufficient proof of labor"));
    }

    #[test]
    fn lines_are_cut_to_width() {
        let view = compose(Some(&snapshot(2)), &Selection::None);
        let lines = frame_lines(&view, &model(20, 12));
        assert!(lines.iter().all(|l| display_width(&l.text) <= 20));
        assert_eq!(lines.len(), 12);
    }

    #[test]
    fn fit_counts_emoji_as_two_columns() {
        assert_eq!(display_width("💻 CODING"), 9);
        assert_eq!(display_width("🏗️ X"), 4);
        assert_eq!(fit("💻 CODING", 4), "💻 C");
        assert_eq!(fit("💻 CODING", 1), "");
        assert_eq!(fit("🏗️ X", 2), "🏗️");
        assert_eq!(fit("🏗️ X", 1), "");
        assert_eq!(fit("plain", 3), "pla");
    }

    #[test]
    fn icon_lines_never_exceed_terminal_width() {
        let mut snap = snapshot(0);
        snap.feed = [TaskType::Construction, TaskType::Gardening, TaskType::Coding]
            .into_iter()
            .enumerate()
            .map(|(i, task)| feed_item(&format!("tx-{i}"), task, 2.0, Verdict::Approved))
            .collect();
        let view = compose(Some(&snap), &Selection::None);
        for cols in 8u16..=80 {
            let lines = frame_lines(&view, &model(cols, 16));
            for line in &lines {
                assert!(
                    display_width(&line.text) <= usize::from(cols),
                    "{cols} cols: {:?}",
                    line.text
                );
            }
        }
    }

    #[test]
    fn empty_feed_placeholder() {
        let view = compose(None, &Selection::None);
        let lines = frame_lines(&view, &model(100, 20));
        assert!(lines[1].text.contains("Connecting"));
        assert!(lines[BODY_TOP].text.contains("no activity yet"));
    }

    #[test]
    fn render_without_color_emits_no_color_codes() {
        let view = compose(Some(&snapshot(1)), &Selection::None);
        let lines = frame_lines(&view, &model(100, 20));

        let mut plain = Vec::new();
        render_frame(&mut plain, &lines, false).unwrap();
        let plain = String::from_utf8(plain).unwrap();
        assert!(plain.contains("HEC Overseer"));
        assert!(!plain.contains("38;5;"));

        let mut colored = Vec::new();
        render_frame(&mut colored, &lines, true).unwrap();
        assert!(String::from_utf8(colored).unwrap().contains("38;5;"));
    }
}
