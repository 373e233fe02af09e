use anyhow::{Context, Result};
use clap::Parser;
use diff_review::{
    DiffHighlighter, DiffView, DiffViewKey, GitCli, HintMailbox, ScrollHint, ThreadContext,
};
use diff_review_config::AppConfig;
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

mod app;
mod logger;

use app::App;

#[derive(Parser, Debug)]
#[command(name = "diff-review")]
#[command(author, version, about = "Review the diff between two git revisions")]
struct Args {
    /// Base revision
    from: String,

    /// Revision compared against the base
    to: String,

    /// Repository to run git in
    #[arg(short, long, default_value = ".")]
    repo: PathBuf,

    /// Only diff paths matching this pathspec
    #[arg(short, long)]
    pattern: Option<String>,

    /// File to open scrolled to
    #[arg(long)]
    anchor_file: Option<String>,

    /// Lines to highlight in the anchor file ("Line 7", "Lines 10-15")
    #[arg(long, requires = "anchor_file")]
    anchor_lines: Option<String>,

    /// Review thread JSON whose position becomes the anchor
    #[arg(long, conflicts_with = "anchor_file")]
    thread: Option<PathBuf>,

    /// Syntax highlighting theme
    #[arg(long, value_parser = parse_theme)]
    theme: Option<String>,
}

fn parse_theme(name: &str) -> Result<String, String> {
    let themes = DiffHighlighter::available_themes();
    if themes.iter().any(|theme| *theme == name) {
        Ok(name.to_string())
    } else {
        Err(format!("unknown theme, expected one of: {}", themes.join(", ")))
    }
}

impl Args {
    /// `to` carries the changes under review, `from` is the base.
    fn key(&self) -> DiffViewKey {
        let key = DiffViewKey::new(&self.to, &self.from);
        match &self.pattern {
            Some(pattern) => key.with_pattern(pattern),
            None => key,
        }
    }

    fn hint(&self) -> Result<Option<ScrollHint>> {
        match &self.thread {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read thread file {}", path.display()))?;
                let thread: ThreadContext = serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse thread file {}", path.display()))?;
                Ok(thread.anchor())
            }
            None => Ok(ScrollHint::from_raw(
                self.anchor_file.as_deref(),
                self.anchor_lines.as_deref(),
            )),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_file = logger::init()?;
    log::info!("Starting diff-review, logging to {}", log_file.display());

    let mut config = AppConfig::load();
    if let Some(theme) = &args.theme {
        config.highlight_theme = theme.clone();
    }

    let mut mailbox = HintMailbox::new();
    if let Some(hint) = args.hint()? {
        mailbox.post(hint);
    }

    let view = DiffView::new(args.key(), mailbox.take());
    let git = GitCli::new(&args.repo).with_context_lines(config.context_lines);
    let mut app = App::new(view, git, &config)?;
    app.start_fetch();
    app.start_commit_lookup();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        log::error!("Exiting with error: {:#}", err);
    }
    log::info!("Exiting diff-review");
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.process_messages();
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
    Ok(())
}
