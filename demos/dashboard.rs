//! Dashboard demo: a few progress bars and a clock, updated from worker threads.
//!
//! Run with `cargo run --example dashboard`. Set `TICKSCREEN_FPS` to change
//! the frame rate and `RUST_LOG=debug` to see repaint logs on stderr.

use crossterm::{cursor, execute, terminal};
use std::io;
use std::thread;
use std::time::{Duration, Instant};
use tickscreen::{style_text, Color, CrosstermTerminal, Engine, Modifiers, RenderConfig, Style};

const BAR_WIDTH: usize = 30;

fn bar(progress: usize) -> String {
    let filled = progress * BAR_WIDTH / 100;
    format!(
        "[{}{}] {progress:>3}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled)
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    execute!(io::stdout(), terminal::Clear(terminal::ClearType::All), cursor::Hide)?;

    let mut engine = Engine::new(CrosstermTerminal::new(), RenderConfig::from_env())?;
    engine.start(None)?;

    let title = Style::new(Color::Yellow, Color::DarkBlue).with_modifiers(Modifiers::BOLD);
    engine.edit_cell(0, 0, title.paint(" tickscreen dashboard "))?;

    let started = Instant::now();
    thread::scope(|scope| {
        for (i, speed) in [3_u64, 5, 8].into_iter().enumerate() {
            let engine = &engine;
            scope.spawn(move || {
                let row = i + 2;
                let _ = engine.edit_cell(row, 0, format!("job {i} "));
                for progress in 0..=100 {
                    let color = if progress == 100 { Color::Green } else { Color::Cyan };
                    let _ = engine.edit_cell(row, 1, style_text(&bar(progress), color, Color::Black, true));
                    thread::sleep(Duration::from_millis(speed * 10));
                }
            });
        }

        let engine = &engine;
        scope.spawn(move || {
            while started.elapsed() < Duration::from_secs(9) {
                let elapsed = format!("elapsed {:>5.1}s", started.elapsed().as_secs_f32());
                let _ = engine.edit_cell(6, 0, elapsed);
                thread::sleep(Duration::from_millis(100));
            }
        });
    });

    let stats = engine.stats();
    engine.shutdown()?;
    execute!(io::stdout(), cursor::Show)?;
    println!(
        "{} ticks, {} repaints, {} bytes written",
        stats.ticks, stats.repaints, stats.bytes_written
    );
    Ok(())
}
