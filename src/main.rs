use std::io;
use std::panic;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
        EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use veditor::{logging, Config, Dimension, Editor, EditorOptions};

#[derive(Parser)]
#[command(
    name = "veditor",
    version,
    about = "A terminal markdown editor with a formatting toolbar"
)]
struct Cli {
    /// Markdown file to load into the editor
    file: Option<PathBuf>,

    /// Config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Copy uploaded attachments into this directory
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// Directory the download action writes to
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Editor width: N%, Npx or N columns
    #[arg(long)]
    width: Option<Dimension>,

    /// Editor height: N%, Npx or N rows
    #[arg(long)]
    height: Option<Dimension>,
}

impl Cli {
    fn overrides(&self) -> Config {
        Config {
            width: self.width,
            height: self.height,
            upload_dir: self.upload_dir.clone(),
            download_dir: self.download_dir.clone(),
            menus: None,
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // Logging goes to a file; the terminal belongs to the UI
    let _log_guard = match logging::init(&logging::default_log_dir()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    let config_path = cli.config.clone().or_else(Config::default_path);
    let config = match config_path.as_deref().map(Config::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let config = config.merge(cli.overrides());

    let doc = match &cli.file {
        Some(path) if path.exists() => std::fs::read_to_string(path)?,
        _ => String::new(),
    };

    tracing::info!(file = ?cli.file, "starting editor");
    run_editor(config.into_options(doc))
}

/// Sets up the terminal, runs the TUI editor, and restores the terminal on exit.
fn run_editor(options: EditorOptions) -> io::Result<()> {
    let editor = match Editor::new(options) {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Setup panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run editor
    let result = run_app(&mut terminal, editor);

    // Restore terminal
    restore_terminal()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut editor: Editor,
) -> io::Result<()> {
    loop {
        editor.render_frame(terminal)?;

        // Block up to 100ms waiting for the first event so tick() runs
        // ~10x/sec for upload polling and status expiry.
        if event::poll(Duration::from_millis(100))? {
            // Drain all queued events without blocking, then render immediately.
            loop {
                let ev = event::read()?;
                editor.handle_event(ev);
                if editor.should_quit {
                    break;
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        if editor.should_quit {
            break;
        }
    }

    tracing::info!("editor closed");
    Ok(())
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    Ok(())
}
