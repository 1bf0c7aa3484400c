//! Property-based tests for dashboard reducer and session invariants.
//!
//! Arbitrary sequences of keys, resizes, ticks and refreshes must keep the
//! cursor inside the feed, keep the overlay flag in step with the selection
//! controller, and never quit without a quit key.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proptest::prelude::*;

use super::model::{DashboardModel, DashboardMsg};
use super::runtime::DashboardSession;
use super::update::update;
use crate::backend::{TaskType, Verdict};
use crate::logger::MemorySink;
use crate::sync::test_support::{ScriptedBackend, feed_item};
use crate::sync::{SimulationToggle, SyncController};

// ──────────────────── strategies ────────────────────

fn arb_key_code() -> impl Strategy<Value = KeyCode> {
    prop_oneof![
        Just(KeyCode::Char('j')),
        Just(KeyCode::Char('k')),
        Just(KeyCode::Char('p')),
        Just(KeyCode::Char(' ')),
        Just(KeyCode::Char('r')),
        Just(KeyCode::Char('x')),
        Just(KeyCode::Char('?')),
        Just(KeyCode::Char('z')),
        Just(KeyCode::Esc),
        Just(KeyCode::Enter),
        Just(KeyCode::Up),
        Just(KeyCode::Down),
    ]
}

/// Keys that never end the session on their own.
fn arb_safe_key_code() -> impl Strategy<Value = KeyCode> {
    arb_key_code().prop_filter("no quit keys", |code| *code != KeyCode::Esc)
}

fn arb_msg() -> impl Strategy<Value = DashboardMsg> {
    prop_oneof![
        4 => arb_key_code().prop_map(|code| DashboardMsg::Key(KeyEvent::new(code, KeyModifiers::NONE))),
        1 => Just(DashboardMsg::Tick),
        1 => (1u16..300, 1u16..100).prop_map(|(cols, rows)| DashboardMsg::Resize { cols, rows }),
        2 => (0usize..40).prop_map(|feed_len| DashboardMsg::Refreshed { feed_len }),
    ]
}

#[derive(Debug, Clone)]
enum SessionOp {
    Key(KeyCode),
    /// Backend now serves this many records.
    Feed(usize),
    FailNext(&'static str),
}

fn arb_session_op() -> impl Strategy<Value = SessionOp> {
    prop_oneof![
        5 => arb_safe_key_code().prop_map(SessionOp::Key),
        2 => (0usize..8).prop_map(SessionOp::Feed),
        1 => prop_oneof![Just("stats"), Just("feed"), Just("status"), Just("command")]
            .prop_map(SessionOp::FailNext),
    ]
}

fn records(count: usize) -> Vec<crate::backend::FeedItem> {
    (0..count)
        .map(|i| feed_item(&format!("t{i}"), TaskType::Coding, 1.0, Verdict::Approved))
        .collect()
}

// ──────────────────── reducer ────────────────────

proptest! {
    #[test]
    fn cursor_always_inside_feed(msgs in prop::collection::vec(arb_msg(), 0..80)) {
        let mut model = DashboardModel::new((80, 24), false);
        for msg in msgs {
            update(&mut model, msg);
            if model.feed_len == 0 {
                prop_assert_eq!(model.cursor, 0);
            } else {
                prop_assert!(model.cursor < model.feed_len);
            }
        }
    }

    #[test]
    fn tick_counter_is_monotonic(msgs in prop::collection::vec(arb_msg(), 0..80)) {
        let mut model = DashboardModel::new((80, 24), false);
        let mut ticks = 0u64;
        for msg in msgs {
            if msg == DashboardMsg::Tick {
                ticks += 1;
            }
            update(&mut model, msg);
            prop_assert_eq!(model.tick, ticks);
        }
    }

    #[test]
    fn only_quit_keys_quit(codes in prop::collection::vec(arb_safe_key_code(), 0..60)) {
        let mut model = DashboardModel::new((80, 24), false);
        update(&mut model, DashboardMsg::Refreshed { feed_len: 5 });
        for code in codes {
            update(&mut model, DashboardMsg::Key(KeyEvent::new(code, KeyModifiers::NONE)));
            prop_assert!(!model.quit);
        }
    }
}

// ──────────────────── session ────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn overlay_flag_tracks_selection(ops in prop::collection::vec(arb_session_op(), 0..50)) {
        let sink = Arc::new(MemorySink::new());
        let mut sync = SyncController::new(ScriptedBackend::healthy(true), 20, sink.clone());
        let toggle = SimulationToggle::new(sink);
        let mut session = DashboardSession::new(&mut sync, &toggle, DashboardModel::new((80, 24), false));
        session.start(Duration::from_secs(60), Instant::now());

        for op in ops {
            match op {
                SessionOp::Key(code) => {
                    session.dispatch(DashboardMsg::Key(KeyEvent::new(code, KeyModifiers::NONE)));
                }
                SessionOp::Feed(count) => session.sync().backend().set_feed(records(count)),
                SessionOp::FailNext(endpoint) => session.sync().backend().fail_next(endpoint),
            }

            prop_assert_eq!(session.model().detail_open, !session.selection().current().is_none());
            prop_assert_eq!(session.view().overlay.is_some(), session.model().detail_open);
            let held = session.sync().snapshot().map_or(0, |s| s.feed.len());
            prop_assert_eq!(session.model().feed_len, held);
        }
    }
}
