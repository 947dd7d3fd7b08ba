use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, error};

use crate::snake::{Direction::{self, *}, DirectionCell};

const POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    Quit,
    Ignore,
}

pub fn key_action(ev: &KeyEvent) -> KeyAction {
    if ev.kind != KeyEventKind::Press {
        return KeyAction::Ignore;
    }

    if ev.modifiers.contains(KeyModifiers::CONTROL) && ev.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    match ev.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Turn(Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Turn(Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Turn(Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Turn(Right),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        _ => KeyAction::Ignore,
    }
}

/// Where key presses come from. `next_key` waits at most `timeout`.
pub trait KeySource: Send + 'static {
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>>;
}

/// Keyboard of the controlling terminal.
pub struct TermKeys;

impl KeySource for TermKeys {
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        if !poll(timeout)? {
            return Ok(None);
        }

        match read()? {
            Event::Key(ev) => Ok(Some(ev)),
            _ => Ok(None),
        }
    }
}

/// Background thread turning key presses into direction writes.
pub struct InputListener {
    stop: Arc<AtomicBool>,
    quit: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl InputListener {
    pub fn spawn<K: KeySource>(direction: DirectionCell, mut keys: K) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let quit = Arc::new(AtomicBool::new(false));

        let handle = {
            let stop = Arc::clone(&stop);
            let quit = Arc::clone(&quit);
            thread::spawn(move || {
                if let Err(e) = listen(&mut keys, &direction, &stop, &quit) {
                    // Without input there is no steering and no way out, end the game
                    error!("input listener failed: {}", e);
                    quit.store(true, Ordering::Release);
                }
            })
        };

        InputListener { stop, quit, handle }
    }

    /// Raised once the player asks to leave or the key source fails.
    pub fn quit_flag(&self) -> &AtomicBool {
        &self.quit
    }

    pub fn shutdown(self) {
        self.stop.store(true, Ordering::Release);
        match self.handle.join() {
            Ok(()) => debug!("input listener stopped"),
            Err(_) => error!("input listener panicked"),
        }
    }
}

fn listen<K: KeySource>(
    keys: &mut K,
    direction: &DirectionCell,
    stop: &AtomicBool,
    quit: &AtomicBool,
) -> io::Result<()> {
    while !stop.load(Ordering::Acquire) {
        let ev = match keys.next_key(Duration::from_millis(POLL_INTERVAL_MS))? {
            Some(ev) => ev,
            None => continue,
        };

        match key_action(&ev) {
            KeyAction::Turn(dir) => direction.change_direction(dir),
            KeyAction::Quit => quit.store(true, Ordering::Release),
            KeyAction::Ignore => {}
        }
    }

    Ok(())
}
