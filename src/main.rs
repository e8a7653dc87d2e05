// tracetty: time-travel algorithm visualizer for recorded execution traces

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tracetty::backend::{load_saved_response, HttpBackend, TraceFetcher};
use tracetty::config::{self, Config};
use tracetty::generator::{generate_array, generate_graph, ArrayKind, TraversalFamily};
use tracetty::templates::{self, Template};
use tracetty::ui::{App, RunSettings};

const LOG_ENV: &str = "TRACETTY_LOG";

#[derive(Parser)]
#[command(name = "tracetty", version)]
#[command(about = "Step through an algorithm's execution trace in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program on the execution backend and replay its trace
    Run {
        /// Program to run; omit when using --template
        #[arg(required_unless_present = "template", conflicts_with = "template")]
        file: Option<PathBuf>,
        /// Run a starter program instead of a file (see `tracetty templates`)
        #[arg(long)]
        template: Option<String>,
        /// Backend base URL (overrides the config file)
        #[arg(long)]
        backend: Option<String>,
        #[arg(long)]
        language: Option<String>,
        /// Standard input for the program; may be repeated
        #[arg(long = "input")]
        inputs: Vec<String>,
        /// Milliseconds per step while playing
        #[arg(long)]
        speed: Option<u64>,
    },
    /// Replay a saved backend response
    View {
        response: PathBuf,
        /// Program text to show next to the trace
        #[arg(long)]
        source: Option<PathBuf>,
        #[arg(long)]
        speed: Option<u64>,
    },
    /// List the starter programs, or print one
    Templates {
        /// Slug or name of the template to print
        name: Option<String>,
    },
    /// Print a generated test input
    Gen {
        #[command(subcommand)]
        kind: GenKind,
    },
}

#[derive(Subcommand)]
enum GenKind {
    /// Array plus a binary-search driver call
    Array {
        #[arg(long)]
        size: Option<usize>,
        /// `sorted` or `random`
        #[arg(long)]
        kind: Option<ArrayKind>,
        /// Append to this file instead of printing
        #[arg(long)]
        append: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Connected adjacency mapping plus a traversal driver call
    Graph {
        #[arg(long)]
        nodes: Option<usize>,
        #[arg(long)]
        directed: bool,
        /// `dfs` or `bfs`
        #[arg(long)]
        traversal: Option<TraversalFamily>,
        #[arg(long)]
        append: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_logging() -> Result<()> {
    let log_path = config::log_file_path();
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(log_file)
        .with_ansi(false) // The TUI owns the terminal
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;
    let config = Config::load();

    match cli.command {
        Command::Run {
            file,
            template,
            backend,
            language,
            inputs,
            speed,
        } => {
            let (source, template) = match (file, template) {
                (Some(file), _) => (read_source(&file)?, None),
                (None, Some(name)) => {
                    let template = find_template(&name)?;
                    (template.code.to_string(), Some(template))
                }
                (None, None) => bail!("a program file or --template is required"),
            };
            let base_url = backend.unwrap_or_else(|| config.backend_url.clone());
            let http = HttpBackend::new(base_url, config.request_timeout)
                .context("building HTTP client")?;
            info!(endpoint = %http.endpoint(), template = ?template.map(|t| t.slug), "starting run");

            let settings = RunSettings {
                language: language.unwrap_or_else(|| config.language.clone()),
                testcases: inputs,
                generator: config.generator.clone(),
            };
            let mut app = App::new(source, speed.unwrap_or(config.speed_ms))
                .with_backend(TraceFetcher::new(Arc::new(http)), settings);
            if let Some(template) = template {
                app = app.with_template(template);
            }
            app.start_run();
            run_tui(app)
        }
        Command::View {
            response,
            source,
            speed,
        } => {
            let steps = load_saved_response(&response)
                .with_context(|| format!("loading {}", response.display()))?;
            let source = match source {
                Some(path) => read_source(&path)?,
                None => String::new(),
            };
            let app = App::new(source, speed.unwrap_or(config.speed_ms)).with_trace(steps);
            run_tui(app)
        }
        Command::Templates { name } => list_templates(name.as_deref()),
        Command::Gen { kind } => generate(kind, &config),
    }
}

fn find_template(name: &str) -> Result<&'static Template> {
    templates::find(name)
        .with_context(|| format!("unknown template '{}'; see `tracetty templates`", name))
}

fn list_templates(name: Option<&str>) -> Result<()> {
    if let Some(name) = name {
        print!("{}", find_template(name)?.code);
        return Ok(());
    }
    for template in &templates::TEMPLATES {
        println!(
            "{:<16} {:<26} {}",
            template.slug, template.name, template.description
        );
    }
    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn seeded(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(rand::random);
    info!(seed, "generator seed");
    StdRng::seed_from_u64(seed)
}

fn generate(kind: GenKind, config: &Config) -> Result<()> {
    let defaults = &config.generator;
    let (snippet, append) = match kind {
        GenKind::Array {
            size,
            kind,
            append,
            seed,
        } => {
            let generated = generate_array(
                &mut seeded(seed),
                size.unwrap_or(defaults.array_size),
                kind.unwrap_or(defaults.array_kind),
            );
            (generated.snippet, append)
        }
        GenKind::Graph {
            nodes,
            directed,
            traversal,
            append,
            seed,
        } => {
            let generated = generate_graph(
                &mut seeded(seed),
                nodes.unwrap_or(defaults.graph_nodes),
                directed || defaults.directed,
                traversal.unwrap_or(defaults.traversal),
            );
            (generated.snippet, append)
        }
    };

    match append {
        Some(path) => {
            let mut file = OpenOptions::new()
                .append(true)
                .open(&path)
                .with_context(|| format!("opening {}", path.display()))?;
            file.write_all(snippet.as_bytes())
                .with_context(|| format!("appending to {}", path.display()))?;
        }
        None => print!("{}", snippet),
    }
    Ok(())
}

fn run_tui(mut app: App) -> Result<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("terminal UI failed")
}
