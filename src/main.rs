//! src/main.rs – Easel launcher: artwork table browser and batch selection
mod app;
mod batch_mode;
mod palette;
mod popover;
mod selected_list;
mod table_view;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use crossterm::event::Event;
use tui::{backend::CrosstermBackend, Terminal};

use easel::config::Config;
use easel::export::OutputFormat;
use easel::logging::{self, LogLevel};
use easel::ArticClient;

use crate::app::App;
use crate::batch_mode::BatchConfig;

/*──────────────────────── CLI structures ──────────────────────*/
#[derive(Parser)]
#[command(name = "easel")]
#[command(about = "Browse and select artworks from the Art Institute of Chicago API", long_about = None)]
struct Cli {
    /// Config file (default: easel.toml next to the binary, then the user config dir)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Select the first N artworks without the UI and print them
    Select {
        /// Number of rows to select
        #[arg(short = 'n', long, value_name = "N", allow_hyphen_values = true)]
        count: String,

        /// Output format (csv, json, txt)
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Verbose output on stderr
        #[arg(short, long)]
        verbose: bool,
    },
}

/*──────────────────────── terminal restore ─────────────────────*/
fn restore_terminal() -> io::Result<()> {
    let mut out = io::stdout();
    crossterm::queue!(
        out,
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    out.flush()?;
    crossterm::terminal::disable_raw_mode()
}

/*──────────────────────── main ────────────────────────────────*/
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    /* Load configuration */
    let config_result = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    // Handle batch mode
    if let Some(Commands::Select { count, format, output, verbose }) = cli.command {
        let mut config = config_result?; // For batch mode, we need valid config
        if let Some(level) = cli.log_level {
            config.log.level = level;
        }
        logging::init(&config.batch_log_config())?;

        let output_format: OutputFormat = format.parse().map_err(anyhow::Error::msg)?;
        let batch_config = BatchConfig {
            count,
            output,
            output_format,
            base_url: config.api.base_url.clone(),
            page_size: config.api.page_size,
            verbose,
        };

        let runtime = tokio::runtime::Runtime::new()?;
        return runtime.block_on(batch_mode::run_batch_mode(batch_config));
    }

    // Interactive mode - handle config error gracefully
    let (mut config, config_error) = match config_result {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e.to_string())),
    };
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }

    run_interactive_mode(config, config_error)
}

fn run_interactive_mode(config: Config, config_error: Option<String>) -> anyhow::Result<()> {
    let log_error = logging::init(&config.tui_log_config()).err();

    /* ①  theme from the loaded config */
    palette::set_theme(config.colors.clone());

    /* ②  runtime + fetch pipeline */
    let runtime = tokio::runtime::Runtime::new()?;
    let client = ArticClient::new(config.api.base_url.clone(), config.api.page_size);
    let mut app = App::new(config.api.page_size, runtime.handle().clone(), Arc::new(client));

    if let Some(msg) = config_error {
        app.set_status(msg, true);
    } else if let Some(err) = log_error {
        app.set_status(err.to_string(), true);
    }

    /* ③  leave the terminal usable on SIGTERM / SIGHUP */
    ctrlc::set_handler(|| {
        let _ = restore_terminal();
        process::exit(0);
    })?;

    /* ④  Crossterm / TUI init */
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut term = Terminal::new(backend)?;

    /* ⑤  event/render loop */
    let tick = Duration::from_millis(100);
    let mut last_draw = Instant::now();
    let mut dirty = true;

    let outcome: anyhow::Result<()> = (|| {
        'main: loop {
            if app.poll_fetch_responses() {
                dirty = true;
            }

            if crossterm::event::poll(tick)? {
                match crossterm::event::read()? {
                    Event::Key(k) if app.handle_key(k)? => break 'main,
                    Event::Key(_) => dirty = true,
                    Event::Mouse(m) => {
                        app.handle_mouse(m);
                        dirty = true;
                    }
                    Event::Resize(_, _) => dirty = true,
                    _ => {}
                }
            }

            app.update();

            // Loading indicator and status expiry need periodic redraws too.
            if dirty || last_draw.elapsed() >= Duration::from_millis(500) {
                app.render(&mut term)?;
                last_draw = Instant::now();
                dirty = false;
            }
        }
        Ok(())
    })();

    /* ─── graceful quit: restore console ─── */
    restore_terminal()?;
    runtime.shutdown_timeout(Duration::from_millis(200));
    outcome
}
