mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use retype::{
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, EventSource, FixedTicker, Runner, SessionEvent},
    source::{load_reference, ReferenceSource},
    Completion, ConfigError, Keystroke, Session,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use tracing::info;

/// typing practice against any text, with live wpm under a countdown
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type out a file, a custom prompt or a generated word list while a countdown runs. Mistakes show in red, live words-per-minute and errors are shown above the text."
)]
pub struct Cli {
    /// file to type out
    #[clap(short = 'f', long, conflicts_with = "prompt")]
    file: Option<PathBuf>,

    /// custom prompt to use
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// number of words to generate when no file or prompt is given
    #[clap(short = 'w', long)]
    number_of_words: Option<usize>,

    /// word list to pull generated words from
    #[clap(short = 'l', long, value_enum)]
    word_list: Option<WordList>,

    /// length of the countdown in seconds
    #[clap(short = 's', long, value_parser = clap::value_parser!(u64).range(1..))]
    number_of_secs: Option<u64>,

    /// title shown on the text panel (defaults to the file or word list name)
    #[clap(short = 't', long)]
    title: Option<String>,

    /// write diagnostics to this file, filtered by RETYPE_LOG
    #[clap(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, PartialEq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum WordList {
    English,
    Programming,
}

/// Command line merged over the config file
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source: ReferenceSource,
    pub number_of_secs: u64,
    pub title: String,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        let source = if let Some(path) = &cli.file {
            ReferenceSource::File(path.clone())
        } else if let Some(prompt) = &cli.prompt {
            ReferenceSource::Prompt(prompt.clone())
        } else {
            ReferenceSource::Words {
                list: cli
                    .word_list
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| config.word_list.clone()),
                count: cli.number_of_words.unwrap_or(config.number_of_words),
            }
        };

        Self {
            title: cli.title.clone().unwrap_or_else(|| source.title()),
            number_of_secs: cli.number_of_secs.unwrap_or(config.number_of_secs),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Typing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ExitType {
    Restart,
    New,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub settings: Settings,
    pub session: Session,
    pub state: AppState,
}

impl App {
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        let reference = load_reference(&settings.source, &mut rand::thread_rng())?;
        info!(
            title = %settings.title,
            len = reference.len(),
            secs = settings.number_of_secs,
            "reference loaded"
        );

        Ok(Self {
            session: Session::new(reference, settings.number_of_secs),
            settings,
            state: AppState::Typing,
        })
    }

    /// Start over. Generated word lists are drawn again for `ExitType::New`.
    fn reset(&mut self, exit_type: ExitType) -> Result<(), ConfigError> {
        let reference = if exit_type == ExitType::New && self.settings.source.is_generated() {
            load_reference(&self.settings.source, &mut rand::thread_rng())?
        } else {
            self.session.reference().clone()
        };

        self.session = Session::new(reference, self.settings.number_of_secs);
        self.state = AppState::Typing;
        Ok(())
    }

    fn on_tick(&mut self) {
        if self.state != AppState::Typing {
            return;
        }
        if let Ok(Some(_)) = self.session.tick() {
            self.state = AppState::Results;
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Option<ExitType> {
        match self.state {
            AppState::Typing => {
                let keystroke = Keystroke::from_key_event(key)?;
                match self.session.on_key(keystroke) {
                    Ok(Some(Completion::Aborted)) => Some(ExitType::Quit),
                    Ok(Some(_)) => {
                        self.state = AppState::Results;
                        None
                    }
                    Ok(None) | Err(_) => None,
                }
            }
            AppState::Results => match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(ExitType::Quit)
                }
                KeyCode::Char('r') => Some(ExitType::Restart),
                KeyCode::Char('n') if self.settings.source.is_generated() => Some(ExitType::New),
                KeyCode::Char('q') | KeyCode::Esc => Some(ExitType::Quit),
                _ => None,
            },
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let _log_guard = match cli.log_file.as_deref().map(logging::init).transpose() {
        Ok(guard) => guard.flatten(),
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::Io, err).exit();
        }
    };

    let config = FileConfigStore::new().load();
    let settings = Settings::resolve(&cli, &config);

    let mut app = match App::new(settings) {
        Ok(app) => app,
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::Io, err).exit();
        }
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(FixedTicker::default()));

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        let Some(event) = runner.step() else {
            break;
        };

        if handle_event(app, &runner, event)? {
            break;
        }
    }

    info!(results = ?app.session.results(), "exiting");
    Ok(())
}

/// Apply one event to the app. Returns `Ok(true)` once the user quits.
fn handle_event<E: EventSource>(
    app: &mut App,
    runner: &Runner<E>,
    event: SessionEvent,
) -> Result<bool, ConfigError> {
    match event {
        SessionEvent::Tick => app.on_tick(),
        SessionEvent::Resize | SessionEvent::TicksRestarted => {}
        SessionEvent::Key(key) => {
            let was_started = app.session.has_started();
            match app.on_key(key) {
                Some(ExitType::Quit) => return Ok(true),
                Some(exit_type) => app.reset(exit_type)?,
                None => {}
            }
            // the countdown starts on the first keystroke; ticks follow its phase
            if !was_started && app.session.has_started() {
                runner.restart_ticks();
            }
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use retype::runtime::TestEventSource;
    use std::sync::mpsc;
    use std::thread;
    use std::time::{Duration, Instant};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn prompt_app(prompt: &str, secs: u64) -> App {
        App::new(Settings {
            source: ReferenceSource::Prompt(prompt.to_string()),
            number_of_secs: secs,
            title: "prompt".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["retype"]);

        assert_eq!(cli.file, None);
        assert_eq!(cli.prompt, None);
        assert_eq!(cli.number_of_words, None);
        assert_eq!(cli.word_list, None);
        assert_eq!(cli.number_of_secs, None);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_file_and_language() {
        let cli = Cli::parse_from(["retype", "-f", "notes.txt", "-l", "programming"]);
        assert_eq!(cli.file, Some(PathBuf::from("notes.txt")));
        assert_eq!(cli.word_list, Some(WordList::Programming));
    }

    #[test]
    fn test_cli_file_conflicts_with_prompt() {
        let res = Cli::try_parse_from(["retype", "-f", "a.txt", "-p", "hello"]);
        assert_eq!(res.unwrap_err().kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_rejects_zero_seconds() {
        assert!(Cli::try_parse_from(["retype", "-s", "0"]).is_err());
        let cli = Cli::parse_from(["retype", "--number-of-secs", "30"]);
        assert_eq!(cli.number_of_secs, Some(30));
    }

    #[test]
    fn test_word_list_display() {
        assert_eq!(WordList::English.to_string(), "english");
        assert_eq!(WordList::Programming.to_string(), "programming");
    }

    #[test]
    fn test_settings_from_config_defaults() {
        let cli = Cli::parse_from(["retype"]);
        let settings = Settings::resolve(&cli, &Config::default());

        assert_eq!(
            settings.source,
            ReferenceSource::Words {
                list: "english".into(),
                count: 25
            }
        );
        assert_eq!(settings.number_of_secs, 60);
        assert_eq!(settings.title, "english");
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "retype",
            "-w",
            "5",
            "-l",
            "programming",
            "-s",
            "15",
            "-t",
            "drill",
        ]);
        let config = Config {
            number_of_words: 80,
            number_of_secs: 120,
            word_list: "english".into(),
        };
        let settings = Settings::resolve(&cli, &config);

        assert_eq!(
            settings.source,
            ReferenceSource::Words {
                list: "programming".into(),
                count: 5
            }
        );
        assert_eq!(settings.number_of_secs, 15);
        assert_eq!(settings.title, "drill");
    }

    #[test]
    fn test_file_title_is_file_name() {
        let cli = Cli::parse_from(["retype", "-f", "/src/lib.rs"]);
        let settings = Settings::resolve(&cli, &Config::default());
        assert_eq!(settings.title, "lib.rs");
    }

    #[test]
    fn test_app_new_rejects_missing_file() {
        let res = App::new(Settings {
            source: ReferenceSource::File(PathBuf::from("/definitely/not/here.txt")),
            number_of_secs: 60,
            title: "x".into(),
        });
        assert!(matches!(res, Err(ConfigError::Unreadable { .. })));
    }

    #[test]
    fn test_typing_to_results_and_retry() {
        let mut app = prompt_app("hi", 60);

        assert_eq!(app.on_key(key(KeyCode::Char('h'))), None);
        assert_eq!(app.on_key(key(KeyCode::Char('i'))), None);
        assert_eq!(app.state, AppState::Results);

        let exit = app.on_key(key(KeyCode::Char('r')));
        assert_eq!(exit, Some(ExitType::Restart));
        app.reset(ExitType::Restart).unwrap();
        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.session.reference().text(), "hi");
        assert_eq!(app.session.cursor_index(), 0);
    }

    #[test]
    fn test_escape_while_typing_quits() {
        let mut app = prompt_app("hello", 60);
        app.on_key(key(KeyCode::Char('h')));
        assert_eq!(app.on_key(key(KeyCode::Esc)), Some(ExitType::Quit));
    }

    #[test]
    fn test_tick_runs_out_the_clock() {
        let mut app = prompt_app("hello", 2);
        app.on_key(key(KeyCode::Char('h')));
        app.on_tick();
        assert_eq!(app.state, AppState::Typing);
        app.on_tick();
        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.session.completion(), Some(Completion::TimeUp));

        // Typing keys on the results screen do not reach the session
        assert_eq!(app.on_key(key(KeyCode::Char('x'))), None);
        assert_eq!(app.session.cursor_index(), 1);
    }

    #[test]
    fn test_new_is_ignored_for_fixed_text() {
        let mut app = prompt_app("hi", 60);
        app.on_key(key(KeyCode::Char('h')));
        app.on_key(key(KeyCode::Char('i')));
        assert_eq!(app.state, AppState::Results);

        assert_eq!(app.on_key(key(KeyCode::Char('n'))), None);
        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.session.cursor_index(), 2);
    }

    #[test]
    fn test_first_keystroke_restarts_the_ticker() {
        let mut app = prompt_app("hello", 60);
        let (tx, rx) = mpsc::channel();
        let interval = Duration::from_millis(40);
        let es = TestEventSource::with_ticker(tx, rx, FixedTicker::new(interval));
        let runner = Runner::new(es);

        // a tick is already queued by the time the user starts typing
        thread::sleep(Duration::from_millis(60));
        let typed_at = Instant::now();
        let quit = handle_event(&mut app, &runner, SessionEvent::Key(key(KeyCode::Char('h'))));
        assert!(!quit.unwrap());

        let event = runner.step().unwrap();
        assert!(matches!(event, SessionEvent::Tick));
        assert!(typed_at.elapsed() >= interval);

        handle_event(&mut app, &runner, event).unwrap();
        assert_eq!(app.session.clock().remaining_seconds(), 59);
        assert_eq!(app.session.history().len(), 1);
    }

    #[test]
    fn test_quit_key_ends_the_loop() {
        let mut app = prompt_app("hello", 60);
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(TestEventSource::new(rx));

        let quit = handle_event(&mut app, &runner, SessionEvent::Key(key(KeyCode::Esc)));
        assert!(quit.unwrap());
    }

    #[test]
    fn test_new_regenerates_word_lists() {
        let mut app = App::new(Settings {
            source: ReferenceSource::Words {
                list: "english".into(),
                count: 10,
            },
            number_of_secs: 60,
            title: "english".into(),
        })
        .unwrap();
        app.state = AppState::Results;

        app.reset(ExitType::New).unwrap();
        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.session.reference().text().split(' ').count(), 10);
    }
}
