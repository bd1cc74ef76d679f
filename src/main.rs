use clap::{Parser, Subcommand, ValueEnum};
use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, mpsc};
use std::thread;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use wave_poem::app::services::prefs;
use wave_poem::app::{
    AppConfig, AppError, FileStore, FontChoice, HttpPoetrySource, Intent, MemoryStore, Palette,
    Result, Session, SettingsStore, ThemeMode, ViewState, run_watch,
};
use wave_poem::ui::render::{render_palette, render_view};
use wave_poem::ui::theme::TerminalTheme;

type AppSession = Session<Arc<dyn SettingsStore>, HttpPoetrySource>;

/// A random classical poem on a wave of colour
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured theme
    #[arg(long, value_enum, global = true)]
    theme: Option<ThemeArg>,

    /// Keep preferences in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Never emit colour escapes
    #[arg(long, global = true)]
    no_color: bool,

    /// Debug logging unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a token and show one poem (default)
    Show,
    /// Show a poem and refresh it periodically.
    ///
    /// While running, press Enter to refresh now or type a number of seconds
    /// to change the delay.
    Watch {
        /// Seconds between refreshes (defaults to the configured delay)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        delay: Option<u32>,

        /// Stop after this many poems
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        cycles: Option<u32>,
    },
    /// Show or set the poem font
    Font {
        #[arg(value_enum)]
        choice: Option<FontArg>,
    },
    /// List the wave colours for the current theme
    Palette,
}

#[derive(ValueEnum, Clone, Copy)]
enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for ThemeMode {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => ThemeMode::Light,
            ThemeArg::Dark => ThemeMode::Dark,
            ThemeArg::System => ThemeMode::SystemDefault,
        }
    }
}

#[derive(ValueEnum, Clone, Copy)]
enum FontArg {
    Primary,
    Secondary,
}

impl From<FontArg> for FontChoice {
    fn from(arg: FontArg) -> Self {
        match arg {
            FontArg::Primary => FontChoice::Primary,
            FontArg::Secondary => FontChoice::Secondary,
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already installed");
    }
}

/// Map one line typed during `watch` to an intent.
fn parse_watch_input(line: &str) -> Option<Intent> {
    let line = line.trim();
    if line.is_empty() {
        return Some(Intent::Refresh);
    }
    match line.parse::<u32>() {
        Ok(secs) if secs > 0 => Some(Intent::SetDelay(secs)),
        _ => None,
    }
}

/// Forward stdin lines to the watch worker until stdin closes or the worker
/// goes away. The thread is detached; a blocked read never holds up exit.
fn spawn_stdin_reader(tx: mpsc::Sender<Intent>) {
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_watch_input(&line) {
                Some(intent) => {
                    debug!(?intent, "watch input");
                    if tx.send(intent).is_err() {
                        break;
                    }
                }
                None => warn!(input = %line.trim(), "expected Enter or a positive number of seconds"),
            }
        }
    });
}

fn build_session(config: &AppConfig, store: Arc<dyn SettingsStore>, dark: bool) -> Result<AppSession> {
    let palette = Palette::load(config.palette_path.as_deref(), dark)?;
    let source = HttpPoetrySource::new(config.api_base_url.clone(), config.request_timeout_secs);
    Ok(Session::new(store, source, palette, config.default_delay_secs))
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref());
    let theme_mode = cli.theme.map(ThemeMode::from).unwrap_or(config.theme_mode);
    let dark = theme_mode.is_dark();
    let theme = TerminalTheme::new(dark, !cli.no_color && std::io::stdout().is_terminal());

    let store: Arc<dyn SettingsStore> = if cli.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::new(config.prefs_path()))
    };
    info!(?theme_mode, dark, ephemeral = cli.ephemeral, "starting");

    match cli.command.unwrap_or(Command::Show) {
        Command::Show => {
            let mut session = build_session(&config, store, dark)?;
            let state = session.activate()?;
            print!("{}", render_view(state, &theme));
        }
        Command::Watch { delay, cycles } => {
            let mut session = build_session(&config, store, dark)?;
            if let Some(delay) = delay {
                session.dispatch(Intent::SetDelay(delay))?;
            }

            let (intent_tx, intent_rx) = mpsc::channel::<Intent>();
            spawn_stdin_reader(intent_tx);

            let (tx, rx) = mpsc::channel::<ViewState>();
            let worker = thread::spawn(move || {
                run_watch(&mut session, &intent_rx, cycles, |state| {
                    tx.send(state.clone()).is_ok()
                })
            });

            for state in rx {
                println!("{}", render_view(&state, &theme));
            }

            match worker.join() {
                Ok(result) => result?,
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        Command::Font { choice: None } => {
            let font = prefs::read_font(&*store)?.unwrap_or_default();
            println!("{} ({})", font.display_name(), font.index());
        }
        Command::Font { choice: Some(choice) } => {
            let current = prefs::read_font(&*store)?;
            let mut session = build_session(&config, store, dark)?;
            session.dispatch(Intent::FontLoaded(current))?;
            let state = session.select_font(FontChoice::from(choice))?;
            println!("{} ({})", state.font.display_name(), state.font.index());
        }
        Command::Palette => {
            let palette = Palette::load(config.palette_path.as_deref(), dark)?;
            print!("{}", render_palette(&palette, &theme));
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Cancelled) => ExitCode::from(130),
        Err(e) => {
            error!(error = %e, "wavepoem failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
