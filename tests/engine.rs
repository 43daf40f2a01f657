//! End-to-end tests: a running engine painting onto a `MemoryTerminal`.

use std::thread;
use std::time::{Duration, Instant};
use test_log::test;
use tickscreen::{
    style_text, Color, Engine, EngineState, MemoryTerminal, RenderConfig, RenderError,
    TerminalEvent,
};

fn config() -> RenderConfig {
    RenderConfig::default()
        .with_frame_rate(200)
        .with_retry_backoff(Duration::ZERO)
}

/// Poll `condition` until it holds or two seconds pass.
fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

#[test]
fn running_engine_paints_edit_once() {
    let term = MemoryTerminal::new(10, 3);
    let mut engine = Engine::new(term.clone(), config()).unwrap();
    engine.start(Some((10, 3))).unwrap();
    assert_eq!(engine.state(), EngineState::Running);

    engine.edit_cell(1, 0, "hello").unwrap();
    assert!(wait_for(|| term.flush_count() == 1));
    assert_eq!(term.screen_rows(), vec!["", "hello", ""]);

    // Many idle ticks later, still exactly one repaint.
    let ticks = engine.stats().ticks;
    assert!(wait_for(|| engine.stats().ticks >= ticks + 10));
    assert_eq!(term.flush_count(), 1);
    assert_eq!(engine.stats().repaints, 1);

    engine.shutdown().unwrap();
    assert_eq!(engine.state(), EngineState::Stopped);
}

#[test]
fn snapshot_matches_content_after_repaint() {
    let term = MemoryTerminal::new(4, 2);
    let mut engine = Engine::new(term.clone(), config()).unwrap();
    engine.start(None).unwrap();

    engine.edit_row(0, ["a", "b", "c", "d"]).unwrap();
    assert!(wait_for(|| engine.snapshot_rows() == engine.content_rows()));
    assert_eq!(term.screen_rows()[0], "abcd");

    engine.shutdown().unwrap();
}

#[test]
fn resize_is_reconciled_by_the_loop() {
    let term = MemoryTerminal::new(10, 3);
    let mut engine = Engine::new(term.clone(), config()).unwrap();
    engine.start(None).unwrap();
    engine.edit_cell(0, 1, "keep").unwrap();
    engine.edit_cell(2, 0, "gone").unwrap();
    assert!(wait_for(|| term.flush_count() == 1));

    term.set_size(6, 2);
    assert!(wait_for(|| engine.dimensions() == Some((6, 2))));
    assert!(wait_for(|| term.flush_count() == 2));
    assert_eq!(engine.cell(0, 1).as_deref(), Some("keep"));
    assert_eq!(engine.cell(2, 0), None);
    assert!(matches!(
        engine.edit_cell(2, 0, "x"),
        Err(RenderError::OutOfRange { height: 2, width: 6, .. })
    ));

    term.set_size(8, 4);
    assert!(wait_for(|| engine.dimensions() == Some((8, 4))));
    assert_eq!(engine.cell(0, 1).as_deref(), Some("keep"));
    assert_eq!(engine.cell(3, 7).as_deref(), Some(""));
    assert_eq!(engine.cell(2, 0).as_deref(), Some(""));

    engine.shutdown().unwrap();
    assert_eq!(engine.stats().resizes, 2);
}

#[test]
fn stop_is_observed_and_nothing_paints_afterwards() {
    let term = MemoryTerminal::new(10, 3);
    let mut engine = Engine::new(term.clone(), config().with_frame_rate(1)).unwrap();
    engine.start(None).unwrap();

    // The wakeup means shutdown does not wait out the one second interval.
    let started = Instant::now();
    engine.shutdown().unwrap();
    assert!(started.elapsed() < Duration::from_millis(900));

    term.clear_events();
    engine.edit_cell(0, 0, "late").unwrap();
    thread::sleep(Duration::from_millis(20));
    assert!(term.events().is_empty());
    assert_eq!(engine.cell(0, 0).as_deref(), Some("late"));
}

#[test]
fn stop_without_join_is_fire_and_forget() {
    let term = MemoryTerminal::new(10, 3);
    let mut engine = Engine::new(term, config()).unwrap();
    engine.start(None).unwrap();
    engine.stop();
    assert!(wait_for(|| engine.state() == EngineState::Stopped));
    engine.join().unwrap();
}

#[test]
fn terminal_failure_ends_the_loop() {
    let term = MemoryTerminal::new(10, 3);
    let mut engine = Engine::new(term.clone(), config().with_io_retries(2)).unwrap();
    engine.start(None).unwrap();

    term.fail_next_writes(3);
    engine.edit_cell(0, 0, "x").unwrap();

    assert!(wait_for(|| engine.state() == EngineState::Stopped));
    assert!(matches!(engine.join(), Err(RenderError::Terminal(_))));
    assert_eq!(term.flush_count(), 0);
}

#[test]
fn engine_restarts_after_join() {
    let term = MemoryTerminal::new(10, 3);
    let mut engine = Engine::new(term.clone(), config()).unwrap();
    engine.start(None).unwrap();
    engine.edit_cell(0, 0, "first").unwrap();
    assert!(wait_for(|| term.flush_count() == 1));
    engine.shutdown().unwrap();

    engine.start(None).unwrap();
    // A restart begins from empty grids.
    assert_eq!(engine.cell(0, 0).as_deref(), Some(""));
    engine.edit_cell(0, 0, "second").unwrap();
    assert!(wait_for(|| term.screen_rows()[0] == "second"));
    engine.shutdown().unwrap();
}

#[test]
fn restart_after_failure_recovers_the_terminal() {
    let term = MemoryTerminal::new(10, 3);
    let mut engine = Engine::new(term.clone(), config().with_io_retries(0)).unwrap();
    engine.start(None).unwrap();
    term.fail_next_sizes(1);
    assert!(wait_for(|| engine.state() == EngineState::Stopped));

    // The next start reports the failure and reclaims the terminal.
    assert!(matches!(engine.start(None), Err(RenderError::Terminal(_))));
    assert_eq!(engine.state(), EngineState::Stopped);
    engine.start(None).unwrap();
    engine.edit_cell(0, 0, "back").unwrap();
    assert!(wait_for(|| term.screen_rows()[0] == "back"));
    engine.shutdown().unwrap();
}

#[test]
fn unjoined_failure_is_reported_exactly_once() {
    let term = MemoryTerminal::new(10, 3);
    let mut engine = Engine::new(term.clone(), config().with_io_retries(0)).unwrap();
    engine.start(None).unwrap();
    term.fail_next_sizes(1);
    assert!(wait_for(|| engine.state() == EngineState::Stopped));

    assert!(matches!(engine.open(None), Err(RenderError::Terminal(_))));
    engine.join().unwrap();
    engine.open(None).unwrap();
    assert_eq!(engine.dimensions(), Some((10, 3)));

    engine.start(None).unwrap();
    engine.shutdown().unwrap();
}

#[test]
fn frame_rate_can_change_while_running() {
    let term = MemoryTerminal::new(10, 3);
    let mut engine = Engine::new(term, config().with_frame_rate(5)).unwrap();
    engine.start(None).unwrap();
    engine.set_frame_rate(500).unwrap();

    let ticks = engine.stats().ticks;
    assert!(wait_for(|| engine.stats().ticks >= ticks + 20));
    assert!(engine.set_frame_rate(0).is_err());
    assert_eq!(engine.frame_rate(), 500);
    engine.shutdown().unwrap();
}

#[test]
fn concurrent_row_edits_are_painted_whole() {
    let term = MemoryTerminal::new(8, 4);
    let mut engine = Engine::new(term.clone(), config().with_frame_rate(1000)).unwrap();
    engine.start(None).unwrap();

    thread::scope(|scope| {
        for row in 0..4 {
            let engine = &engine;
            scope.spawn(move || {
                for i in 0..200 {
                    let digit = char::from(b'0' + (i % 10) as u8).to_string();
                    engine.edit_row(row, vec![digit; 8]).unwrap();
                }
            });
        }
    });

    // Every painted row is eight copies of a single digit.
    for event in term.events() {
        if let TerminalEvent::Write(text) = event {
            let line = text.trim_start_matches("\r\n").trim_end_matches("\x1b[K");
            if line.len() == 8 {
                assert!(line.chars().all(|c| c == line.chars().next().unwrap()), "torn row {line:?}");
            }
        }
    }
    engine.shutdown().unwrap();
}

#[test]
fn ticks_never_paint_a_half_applied_update() {
    let term = MemoryTerminal::new(8, 4);
    let mut engine = Engine::new(term.clone(), config().with_frame_rate(1000)).unwrap();
    engine.start(None).unwrap();

    for i in 0..300_u32 {
        let digit = char::from_digit(i % 10, 10).unwrap().to_string();
        engine
            .update(|grid| {
                for row in 0..4 {
                    grid.set_row(row, vec![digit.clone(); 8])?;
                }
                Ok(())
            })
            .unwrap();
        if i % 30 == 0 {
            thread::sleep(Duration::from_millis(2));
        }
    }
    assert!(wait_for(|| engine.snapshot_rows() == engine.content_rows()));
    engine.shutdown().unwrap();

    // Every repaint shows all four rows from the same update.
    let mut rows = Vec::new();
    let mut frames = 0;
    for event in term.events() {
        match event {
            TerminalEvent::Write(text) if text.ends_with("\x1b[K") => {
                let line = text.trim_start_matches("\r\n").trim_end_matches("\x1b[K");
                rows.push(line.to_string());
            }
            TerminalEvent::Flush => {
                assert_eq!(rows.len(), 4);
                assert!(rows.iter().all(|row| *row == rows[0]), "torn frame {rows:?}");
                rows.clear();
                frames += 1;
            }
            _ => {}
        }
    }
    assert!(frames > 0);
}

#[test]
fn styled_content_is_painted_verbatim() {
    let term = MemoryTerminal::new(10, 2);
    let mut engine = Engine::new(term.clone(), config()).unwrap();
    engine.open(None).unwrap();

    let styled = style_text("hi", Color::Red, Color::Black, true);
    assert_eq!(styled, "\x1b[38;5;9m\x1b[48;5;0mhi\x1b[0m");
    engine.edit_cell(0, 0, styled.clone()).unwrap();
    engine.tick().unwrap();

    assert!(term.written().contains(&styled));
    assert_eq!(term.screen_rows()[0], "hi");
}
