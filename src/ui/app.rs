//! Main TUI application state and logic

use crate::backend::{SimulateRequest, TraceFetcher};
use crate::config::GeneratorSettings;
use crate::generator::{generate_array, generate_graph, TraversalFamily};
use crate::layout::{compose, Scene};
use crate::playback::PlaybackController;
use crate::snapshot::{Event as StepEvent, Snapshot};
use crate::templates::{self, InputFamily, Template};
use crate::ui::panes::{
    render_source_pane, render_status_bar, render_visual_pane, render_watch_pane,
    SourceScrollState, StatusRenderData, WatchScrollState,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Upper bound on how long the loop blocks waiting for input
const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Speed change per `+`/`-` press
const SPEED_STEP_MS: u64 = 100;
const SPACE_DEBOUNCE: Duration = Duration::from_millis(200);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Visual,
    Watch,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> visual -> watch)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Visual,
            FocusedPane::Visual => FocusedPane::Watch,
            FocusedPane::Watch => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Watch,
            FocusedPane::Visual => FocusedPane::Source,
            FocusedPane::Watch => FocusedPane::Visual,
        }
    }
}

/// What a run sends to the backend besides the program text
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub language: String,
    pub testcases: Vec<String>,
    pub generator: GeneratorSettings,
}

/// The main application state
pub struct App {
    /// Playback over the current trace
    pub controller: PlaybackController,

    /// Background runner; `None` when replaying a saved response
    fetcher: Option<TraceFetcher>,
    settings: Option<RunSettings>,
    /// Starter program currently in the source pane, if any
    template: Option<&'static Template>,

    /// Program text shown in the source pane and sent on re-run
    pub source_code: String,

    pub focused_pane: FocusedPane,
    pub source_scroll: SourceScrollState,
    pub watch_scroll: WatchScrollState,

    pub should_quit: bool,
    pub status_message: String,
    /// Whether the status message reports a failure
    pub status_is_error: bool,

    /// Last time space was pressed (for debouncing)
    last_space_press: Option<Instant>,
}

impl App {
    pub fn new(source_code: String, speed_ms: u64) -> Self {
        App {
            controller: PlaybackController::new(speed_ms),
            fetcher: None,
            settings: None,
            template: None,
            source_code,
            focused_pane: FocusedPane::Visual,
            source_scroll: SourceScrollState::default(),
            watch_scroll: WatchScrollState::default(),
            should_quit: false,
            status_message: String::from("Ready!"),
            status_is_error: false,
            last_space_press: None,
        }
    }

    /// Start with an already recorded trace
    pub fn with_trace(mut self, steps: Vec<Snapshot>) -> Self {
        self.status_message = format!("Loaded {} steps", steps.len());
        self.controller.load(steps);
        self
    }

    /// Attach a backend so the program can be (re)run from the UI
    pub fn with_backend(mut self, fetcher: TraceFetcher, settings: RunSettings) -> Self {
        self.fetcher = Some(fetcher);
        self.settings = Some(settings);
        self
    }

    /// Mark the source as one of the starter programs
    pub fn with_template(mut self, template: &'static Template) -> Self {
        self.template = Some(template);
        self
    }

    pub fn template(&self) -> Option<&'static Template> {
        self.template
    }

    pub fn is_loading(&self) -> bool {
        self.fetcher.as_ref().is_some_and(TraceFetcher::is_pending)
    }

    /// Scene for the current step
    pub fn current_scene(&self) -> Option<Scene> {
        self.controller.current().map(compose)
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = false;
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = true;
    }

    /// Submit the current program text. The old trace is dropped at once.
    pub fn start_run(&mut self) {
        let Some(settings) = self.settings.as_ref() else {
            self.set_error("No backend attached; replaying a saved trace");
            return;
        };
        let request = SimulateRequest::new(
            self.source_code.clone(),
            settings.language.clone(),
            settings.testcases.clone(),
        );
        let Some(fetcher) = self.fetcher.as_mut() else {
            self.set_error("No backend attached; replaying a saved trace");
            return;
        };
        let run = fetcher.submit(request);
        self.controller.clear();
        self.source_scroll.target_line_row = None;
        self.watch_scroll.offset = 0;
        self.set_status(format!("Running (run {})...", run.get()));
    }

    /// Pick up a finished run, if any
    pub fn poll_fetcher(&mut self) {
        let Some(outcome) = self.fetcher.as_mut().and_then(TraceFetcher::poll) else {
            return;
        };
        match outcome.result {
            Ok(steps) => {
                let count = steps.len();
                self.controller.load(steps);
                let raised = self
                    .controller
                    .steps()
                    .iter()
                    .any(|s| s.event == StepEvent::Exception);
                if raised {
                    self.set_error(format!("Loaded {} steps; the program raised", count));
                } else {
                    self.set_status(format!("Loaded {} steps", count));
                }
            }
            Err(err) => {
                warn!(error = %err, "run failed");
                self.set_error(err.to_string());
            }
        }
    }

    /// Replace the program text with a starter program and run it
    pub fn load_template(&mut self, template: &'static Template) {
        if self.fetcher.is_none() {
            self.set_error("Templates need a backend; replaying a saved trace");
            return;
        }
        info!(template = template.slug, "loading template");
        self.source_code = template.code.to_string();
        self.template = Some(template);
        self.source_scroll = SourceScrollState::default();
        self.start_run();
        if !self.status_is_error {
            self.set_status(format!("Loaded {}; running...", template.name));
        }
    }

    /// Input family `g` generates: the loaded template's, else an array
    fn default_inputs(&self) -> Option<InputFamily> {
        match self.template {
            Some(template) => template.inputs,
            None => Some(InputFamily::Array),
        }
    }

    /// Traversal `G` targets: the loaded graph template's, else the
    /// configured one
    fn graph_traversal(&self) -> TraversalFamily {
        match self.template.and_then(|t| t.inputs) {
            Some(InputFamily::Graph(traversal)) => traversal,
            _ => self
                .settings
                .as_ref()
                .map(|s| s.generator.traversal)
                .unwrap_or_default(),
        }
    }

    /// Append a generated snippet to the program text and re-run
    pub fn generate_and_run(&mut self, family: InputFamily) {
        let generator = self
            .settings
            .as_ref()
            .map(|s| s.generator.clone())
            .unwrap_or_default();
        let mut rng = rand::rng();
        let (snippet, what) = match family {
            InputFamily::Graph(traversal) => {
                let generated = generate_graph(
                    &mut rng,
                    generator.graph_nodes,
                    generator.directed,
                    traversal,
                );
                (generated.snippet, "graph")
            }
            InputFamily::Array => {
                let generated =
                    generate_array(&mut rng, generator.array_size, generator.array_kind);
                (generated.snippet, "array")
            }
        };
        info!(kind = what, "appending generated input");
        if !self.source_code.ends_with('\n') && !self.source_code.is_empty() {
            self.source_code.push('\n');
        }
        self.source_code.push_str(&snippet);
        self.start_run();
        if !self.status_is_error {
            self.set_status(format!("Appended generated {}; running...", what));
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.poll_fetcher();
            if self.controller.tick(Instant::now()) && self.controller.is_at_end() {
                self.set_status("Playback complete");
            }

            // Wake up in time for the next scheduled advance
            let timeout = self
                .controller
                .next_deadline()
                .map(|d| d.saturating_duration_since(Instant::now()))
                .map_or(POLL_INTERVAL, |d| d.min(POLL_INTERVAL));

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);
        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        // Source on the left, visualization over watch on the right
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(pane_area);
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[1]);

        let scene = self.current_scene();
        let current_line = scene.as_ref().map_or(0, |s| s.position as usize);
        let is_error = scene.as_ref().is_some_and(|s| s.error.is_some());

        render_source_pane(
            frame,
            columns[0],
            &self.source_code,
            current_line,
            is_error,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        let placeholder = if self.is_loading() {
            "Running program..."
        } else {
            "Nothing to display. Press r to run."
        };
        render_visual_pane(
            frame,
            right_rows[0],
            scene.as_ref(),
            self.focused_pane == FocusedPane::Visual,
            placeholder,
        );

        render_watch_pane(
            frame,
            right_rows[1],
            scene.as_ref(),
            self.focused_pane == FocusedPane::Watch,
            &mut self.watch_scroll,
        );

        render_status_bar(
            frame,
            status_area,
            StatusRenderData {
                message: &self.status_message,
                playback: self.controller.status(),
                mode: scene.as_ref().map(|s| s.classification.mode),
                is_loading: self.is_loading(),
                is_error: self.status_is_error || is_error,
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.controller.set_playing(false);
                if self.controller.step_backward() {
                    self.set_status("Stepped backward");
                } else {
                    self.set_status("Already at the first step");
                }
            }
            KeyCode::Right => {
                self.controller.set_playing(false);
                if self.controller.step_forward() {
                    self.set_status("Stepped forward");
                } else {
                    self.set_status("Already at the last step");
                }
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Watch => {
                    self.watch_scroll.offset = self.watch_scroll.offset.saturating_sub(1);
                }
                FocusedPane::Visual => {}
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Watch => {
                    self.watch_scroll.offset = self.watch_scroll.offset.saturating_add(1);
                }
                FocusedPane::Visual => {}
            },
            KeyCode::Char(' ') => {
                // Debounced against key repeat
                let now = Instant::now();
                if self
                    .last_space_press
                    .is_some_and(|last| now.duration_since(last) < SPACE_DEBOUNCE)
                {
                    return;
                }
                self.last_space_press = Some(now);
                if self.controller.is_empty() {
                    self.set_status("Nothing to play");
                    return;
                }
                let playing = !self.controller.is_playing();
                self.controller.set_playing_at(playing, now);
                self.set_status(if playing { "Playing..." } else { "Paused" });
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let speed = self
                    .controller
                    .speed_ms()
                    .saturating_sub(SPEED_STEP_MS)
                    .max(SPEED_STEP_MS);
                self.controller.set_speed(speed);
                self.set_status(format!("Speed {}ms per step", self.controller.speed_ms()));
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                let speed = self.controller.speed_ms().saturating_add(SPEED_STEP_MS);
                self.controller.set_speed(speed);
                self.set_status(format!("Speed {}ms per step", self.controller.speed_ms()));
            }
            KeyCode::Enter => {
                self.controller.set_playing(false);
                self.controller.jump_to_end();
                self.set_status("Jumped to end");
            }
            KeyCode::Backspace => {
                self.controller.set_playing(false);
                self.controller.jump_to_start();
                self.set_status("Jumped to start");
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                debug!("re-run requested");
                self.start_run();
            }
            KeyCode::Char('g') => match self.default_inputs() {
                Some(family) => self.generate_and_run(family),
                None => {
                    let name = self.template.map_or("This program", |t| t.name);
                    self.set_error(format!("{} takes no generated input", name));
                }
            },
            KeyCode::Char('G') => self.generate_and_run(InputFamily::Graph(self.graph_traversal())),
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.load_template(templates::next_after(self.template));
            }
            _ => {}
        }
    }
}
