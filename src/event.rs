use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent};

use crate::game::Input;

pub enum Event {
    Key(KeyEvent),
    Tick,
}

/// Pumps terminal key events and a fixed-rate tick onto one channel, so the
/// main loop is the only place game state changes.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());
                if event::poll(timeout).unwrap_or(false) {
                    if let Ok(crossterm::event::Event::Key(key)) = event::read() {
                        if tx.send(Event::Key(key)).is_err() {
                            return;
                        }
                    }
                }
                if last_tick.elapsed() >= tick_rate {
                    last_tick = Instant::now();
                    if tx.send(Event::Tick).is_err() {
                        return;
                    }
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

/// Without release events a held key only shows up as auto-repeat presses;
/// a direction lapses after this many ticks with no repeat.
const HOLD_TICKS: u32 = 6;

/// Level-triggered left/right intent built from press, repeat and release
/// events.
#[derive(Debug, Clone)]
pub struct HeldDirections {
    releases_reported: bool,
    left: u32,
    right: u32,
}

impl HeldDirections {
    pub fn new(releases_reported: bool) -> Self {
        Self {
            releases_reported,
            left: 0,
            right: 0,
        }
    }

    fn hold_for(&self) -> u32 {
        if self.releases_reported {
            u32::MAX
        } else {
            HOLD_TICKS
        }
    }

    pub fn press_left(&mut self) {
        self.left = self.hold_for();
    }

    pub fn press_right(&mut self) {
        self.right = self.hold_for();
    }

    pub fn release_left(&mut self) {
        self.left = 0;
    }

    pub fn release_right(&mut self) {
        self.right = 0;
    }

    pub fn clear(&mut self) {
        self.left = 0;
        self.right = 0;
    }

    /// Reads the intent for this tick and ages any held direction.
    pub fn sample(&mut self) -> Input {
        let input = Input {
            moving_left: self.left > 0,
            moving_right: self.right > 0,
        };
        if !self.releases_reported {
            self.left = self.left.saturating_sub(1);
            self.right = self.right.saturating_sub(1);
        }
        input
    }
}
