use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::Keystroke;

/// Countdown resolution.
pub const TICK_RATE: Duration = Duration::from_secs(1);

/// Everything the UI thread reacts to, delivered through one queue.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// The ticker restarted its interval. Consumed by [`Runner`].
    TicksRestarted,
}

/// Source of session events.
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError>;

    /// Restart the tick interval from now. Returns false when the source has
    /// no ticker of its own.
    fn restart_ticks(&self) -> bool {
        false
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(TICK_RATE)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Production event source: a terminal reader thread and a ticker thread
/// feeding the same channel, so key handling and ticks never interleave.
pub struct CrosstermEventSource {
    rx: Receiver<SessionEvent>,
    ticker_control: Sender<()>,
}

impl CrosstermEventSource {
    pub fn new<T: Ticker>(ticker: T) -> Self {
        let (tx, rx) = mpsc::channel();

        let ticker_control = spawn_ticker(tx.clone(), ticker);

        thread::spawn(move || loop {
            let evt = match event::read() {
                // Windows reports both press and release
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    Some(SessionEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => Some(SessionEvent::Resize),
                Ok(_) => None,
                Err(_) => break,
            };

            if let Some(evt) = evt {
                if tx.send(evt).is_err() {
                    break;
                }
            }
        });

        Self { rx, ticker_control }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new(FixedTicker::default())
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn restart_ticks(&self) -> bool {
        self.ticker_control.send(()).is_ok()
    }
}

/// Tick every `ticker.interval()`. A message on the returned sender restarts
/// the interval and is acknowledged with [`SessionEvent::TicksRestarted`].
fn spawn_ticker<T: Ticker>(tx: Sender<SessionEvent>, ticker: T) -> Sender<()> {
    let (control_tx, control_rx) = mpsc::channel::<()>();
    thread::spawn(move || loop {
        let event = match control_rx.recv_timeout(ticker.interval()) {
            Ok(()) => SessionEvent::TicksRestarted,
            Err(RecvTimeoutError::Timeout) => SessionEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        if tx.send(event).is_err() {
            break;
        }
    });
    control_tx
}

/// Channel-backed event source for tests
pub struct TestEventSource {
    rx: Receiver<SessionEvent>,
    ticker_control: Option<Sender<()>>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<SessionEvent>) -> Self {
        Self {
            rx,
            ticker_control: None,
        }
    }

    /// Like [`TestEventSource::new`] but with a ticker thread feeding the same channel.
    pub fn with_ticker<T: Ticker>(
        tx: Sender<SessionEvent>,
        rx: Receiver<SessionEvent>,
        ticker: T,
    ) -> Self {
        let ticker_control = spawn_ticker(tx, ticker);
        Self {
            rx,
            ticker_control: Some(ticker_control),
        }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn restart_ticks(&self) -> bool {
        self.ticker_control
            .as_ref()
            .is_some_and(|control| control.send(()).is_ok())
    }
}

/// Pulls events off the queue one at a time for the UI thread.
pub struct Runner<E: EventSource> {
    event_source: E,
    poll: Duration,
    // ticks queued before a restart was acknowledged are stale
    awaiting_restart: Cell<bool>,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E) -> Self {
        Self {
            event_source,
            poll: Duration::from_millis(250),
            awaiting_restart: Cell::new(false),
        }
    }

    /// Blocks until the next event. `None` once every producer has gone away.
    pub fn step(&self) -> Option<SessionEvent> {
        loop {
            match self.event_source.recv_timeout(self.poll) {
                Ok(SessionEvent::Tick) if self.awaiting_restart.get() => continue,
                Ok(SessionEvent::TicksRestarted) => self.awaiting_restart.set(false),
                Ok(ev) => return Some(ev),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    /// Put the next tick one full interval from now and drop any tick
    /// already queued. Called when a session clock starts.
    pub fn restart_ticks(&self) {
        if self.event_source.restart_ticks() {
            self.awaiting_restart.set(true);
        }
    }
}

impl Keystroke {
    /// Decode a terminal key press. Keys the session has no use for map to `None`.
    pub fn from_key_event(key: KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Keystroke::Escape)
            }
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => None,
            KeyCode::Char(c) => Some(Keystroke::Character(c)),
            KeyCode::Tab => Some(Keystroke::Character('\t')),
            KeyCode::Enter => Some(Keystroke::Enter),
            KeyCode::Backspace => Some(Keystroke::Backspace),
            KeyCode::Esc => Some(Keystroke::Escape),
            _ => None,
        }
    }
}
