mod renderer;

use std::{
    io::{Stdout, Write},
    time::{Duration, Instant},
};

use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEventKind},
    execute, queue,
    terminal::{self, ClearType},
};

use crate::generator::GrowingTree;
use renderer::Renderer;

/// Interactive stepper for a reversible generation engine: one key press is
/// one engine step, forward or backward, with an optional autoplay mode.
pub struct App {
    /// How often to check for input while idle
    input_poll_timeout: Duration,
    /// Delay between automatic forward steps when autoplay is on
    autoplay_interval: Duration,
}

impl Default for App {
    fn default() -> Self {
        Self {
            input_poll_timeout: Duration::from_millis(100),
            autoplay_interval: Duration::from_millis(40),
        }
    }
}

impl App {
    const MIN_AUTOPLAY_INTERVAL: Duration = Duration::from_millis(5);
    const MAX_AUTOPLAY_INTERVAL: Duration = Duration::from_millis(640);

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        execute!(stdout, terminal::EnterAlternateScreen)?;
        queue!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        execute!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn status_line(engine: &GrowingTree, autoplay: bool, interval: Duration) -> String {
        format!(
            "[{}] step {} | {} cells remaining | {} active | {} | →/n forward  ←/p back  space autoplay  +/- speed  r reset  q quit",
            engine.phase(),
            engine.steps_taken(),
            engine.remaining_cells(),
            engine.active_cells().len(),
            if autoplay {
                format!("autoplay {}ms", interval.as_millis())
            } else {
                "paused".to_string()
            },
        )
    }

    /// Runs the stepper until the user quits.
    pub fn run(&self, engine: &mut GrowingTree) -> std::io::Result<()> {
        let mut stdout = std::io::stdout();
        App::setup_terminal(&mut stdout)?;
        let result = self.event_loop(engine);
        App::restore_terminal(&mut stdout)?;
        result
    }

    fn event_loop(&self, engine: &mut GrowingTree) -> std::io::Result<()> {
        let mut renderer = Renderer::new();
        let mut autoplay = false;
        let mut interval = self.autoplay_interval;
        let mut last_tick = Instant::now();
        let mut dirty = true;

        tracing::info!("[app] starting stepper loop");
        loop {
            if dirty {
                let status = App::status_line(engine, autoplay, interval);
                renderer.render(engine, &status)?;
                dirty = false;
            }

            let timeout = if autoplay {
                interval.min(self.input_poll_timeout)
            } else {
                self.input_poll_timeout
            };
            if event::poll(timeout)? {
                match event::read()? {
                    event::Event::Key(key) if key.kind == KeyEventKind::Press => {
                        match key.code {
                            KeyCode::Esc | KeyCode::Char('q') => {
                                tracing::info!("[app] quit requested");
                                break;
                            }
                            KeyCode::Right | KeyCode::Char('n') => {
                                engine.advance();
                                dirty = true;
                            }
                            KeyCode::Left | KeyCode::Char('p') => {
                                engine.reverse();
                                dirty = true;
                            }
                            KeyCode::Char(' ') => {
                                autoplay = !autoplay;
                                last_tick = Instant::now();
                                dirty = true;
                            }
                            KeyCode::Char('r') => {
                                engine.reset();
                                autoplay = false;
                                dirty = true;
                            }
                            KeyCode::Char('+') | KeyCode::Char('=') => {
                                interval = (interval / 2).max(App::MIN_AUTOPLAY_INTERVAL);
                                dirty = true;
                            }
                            KeyCode::Char('-') => {
                                interval = (interval * 2).min(App::MAX_AUTOPLAY_INTERVAL);
                                dirty = true;
                            }
                            _ => {}
                        }
                    }
                    event::Event::Resize(..) => {
                        dirty = true;
                    }
                    _ => {}
                }
            }

            if autoplay && last_tick.elapsed() >= interval {
                if engine.is_finished() {
                    autoplay = false;
                    tracing::debug!("[app] autoplay reached finished state");
                } else {
                    engine.advance();
                    last_tick = Instant::now();
                }
                dirty = true;
            }
        }
        tracing::info!("[app] exiting stepper loop");
        Ok(())
    }
}
