//! Explorer console.
//!
//! An interactive TUI over the drill-down tree: move the selection with the
//! arrow keys and press Enter to (re)load the selected row's children.
//! The console's event loop is the only owner of the tree; fetches run on
//! tokio tasks and are applied here between input polls.
//!
//! Fetch failures never reach the screen. They are logged and the node is
//! simply left without children.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use rfx_hierarchy::{
    spawn_fetch, Activation, FetchCompletion, NodeId, RenderedRow, TreeController,
};
use rfx_network::FetchGateway;
use rfx_protocol::{NodeRole, ServiceRegistry};

use crate::config::ExplorerConfig;

const PAGE_STEP: usize = 10;

struct ExplorerConsole {
    controller: TreeController,
    gateway: Arc<dyn FetchGateway>,
    completions_tx: mpsc::UnboundedSender<FetchCompletion>,
    completions_rx: mpsc::UnboundedReceiver<FetchCompletion>,
    base_url: String,
    /// Selected row, tracked by id so it survives re-renders above it.
    selected: Option<NodeId>,
    /// Fallback position when the selected row disappears.
    selected_index: usize,
    list_state: ListState,
    started_at: chrono::DateTime<chrono::Utc>,
}

impl ExplorerConsole {
    fn new(controller: TreeController, gateway: Arc<dyn FetchGateway>, base_url: String) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let selected = controller.rows().first().map(|row| row.id);
        Self {
            controller,
            gateway,
            completions_tx,
            completions_rx,
            base_url,
            selected,
            selected_index: 0,
            list_state: ListState::default(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Index of the selected row in `rows`, re-anchoring the selection if
    /// its row was removed.
    fn selection(&mut self, rows: &[RenderedRow]) -> Option<usize> {
        if rows.is_empty() {
            self.selected = None;
            return None;
        }
        let index = self
            .selected
            .and_then(|id| rows.iter().position(|row| row.id == id))
            .unwrap_or_else(|| self.selected_index.min(rows.len() - 1));
        self.selected = Some(rows[index].id);
        self.selected_index = index;
        Some(index)
    }

    fn move_selection(&mut self, delta: isize) {
        let rows = self.controller.rows();
        let Some(current) = self.selection(&rows) else {
            return;
        };
        let last = rows.len() - 1;
        let target = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as usize).min(last)
        };
        self.select_index(&rows, target);
    }

    fn select_index(&mut self, rows: &[RenderedRow], index: usize) {
        if let Some(row) = rows.get(index) {
            self.selected = Some(row.id);
            self.selected_index = index;
        }
    }

    /// Activate the selected row, dispatching a fetch when one is needed.
    fn activate_selected(&mut self) {
        let rows = self.controller.rows();
        let Some(index) = self.selection(&rows) else {
            return;
        };
        let id = rows[index].id;
        match self.controller.activate(id) {
            Ok(Activation::Fetching(ticket)) => {
                spawn_fetch(self.gateway.clone(), ticket, self.completions_tx.clone());
            }
            Ok(Activation::Rendered { children }) => {
                tracing::debug!(node = %id, children, "Versions rendered from registry");
            }
            Ok(Activation::Leaf) => {}
            Err(e) => tracing::debug!(error = %e, "Activation ignored"),
        }
    }

    /// Apply every completion that has arrived. Returns how many were taken.
    fn drain_completions(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            let node = completion.node;
            let outcome = self.controller.apply(completion);
            tracing::debug!(node = %node, outcome = ?outcome, "Completion applied");
            drained += 1;
        }
        drained
    }

    /// Handle keyboard input. Returns `true` if the console should exit.
    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match (code, modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => return true,
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => self.move_selection(-1),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => self.move_selection(1),
            (KeyCode::PageUp, _) => self.move_selection(-(PAGE_STEP as isize)),
            (KeyCode::PageDown, _) => self.move_selection(PAGE_STEP as isize),
            (KeyCode::Home, _) => {
                let rows = self.controller.rows();
                self.select_index(&rows, 0);
            }
            (KeyCode::End, _) => {
                let rows = self.controller.rows();
                self.select_index(&rows, rows.len().saturating_sub(1));
            }
            (KeyCode::Enter, _) | (KeyCode::Char(' '), _) | (KeyCode::Right, _) => {
                self.activate_selected();
            }
            _ => {}
        }
        false
    }

    /// Render the full console layout.
    fn render(&mut self, frame: &mut Frame) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(6),    // Tree
                Constraint::Length(4), // Key help
            ])
            .split(frame.area());

        self.render_status_bar(frame, outer[0]);
        self.render_tree(frame, outer[1]);
        render_help(frame, outer[2]);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Reflection Explorer ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let status_line = Line::from(vec![
            Span::styled("  Reflection API: ", Style::default().fg(Color::Gray)),
            Span::styled(self.base_url.clone(), Style::default().fg(Color::White)),
            Span::styled("  |  Services: ", Style::default().fg(Color::Gray)),
            Span::styled(
                self.controller.registry().len().to_string(),
                Style::default().fg(Color::Green),
            ),
            Span::styled("  |  Since: ", Style::default().fg(Color::Gray)),
            Span::styled(
                self.started_at.format("%H:%M:%S").to_string(),
                Style::default().fg(Color::Magenta),
            ),
        ]);

        frame.render_widget(Paragraph::new(status_line).block(block), area);
    }

    fn render_tree(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Services ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        let rows = self.controller.rows();
        if rows.is_empty() {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  No services registered.",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            frame.render_widget(Paragraph::new(text).block(block), area);
            return;
        }

        let selected = self.selection(&rows);
        let items: Vec<ListItem> = rows.iter().map(|row| ListItem::new(row_line(row))).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        self.list_state.select(selected);
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}

fn render_help(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Keys ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let legend: Vec<Span> = [
        NodeRole::ServiceGroup,
        NodeRole::VersionEndpoint,
        NodeRole::ServiceDefinition,
        NodeRole::Method,
        NodeRole::Field,
    ]
    .into_iter()
    .flat_map(|role| {
        [
            Span::raw("  "),
            Span::styled(role.as_str(), role_style(role)),
        ]
    })
    .collect();

    let text = vec![
        Line::from(Span::styled(
            "  ↑/↓ j/k move  PgUp/PgDn page  Home/End jump  Enter/Space/→ load children  q/Esc quit",
            Style::default().fg(Color::Gray),
        )),
        Line::from(legend),
    ];
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn role_style(role: NodeRole) -> Style {
    match role {
        NodeRole::ServiceGroup => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        NodeRole::VersionEndpoint => Style::default().fg(Color::Yellow),
        NodeRole::ServiceDefinition => Style::default().fg(Color::Green),
        NodeRole::Method => Style::default().fg(Color::Magenta),
        NodeRole::Field => Style::default().fg(Color::Gray),
    }
}

/// Render one tree row into a display line.
fn row_line(row: &RenderedRow) -> Line<'static> {
    let branch = if row.depth == 0 {
        " ".repeat(row.indent)
    } else {
        format!("{}- ", " ".repeat(row.indent))
    };
    Line::from(vec![
        Span::styled(branch, Style::default().fg(Color::DarkGray)),
        Span::styled(row.label.clone(), role_style(row.role)),
    ])
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the explorer console event loop until the operator quits.
pub async fn run_explorer_console(
    config: &ExplorerConfig,
    registry: Arc<ServiceRegistry>,
    gateway: Arc<dyn FetchGateway>,
) -> Result<(), anyhow::Error> {
    use std::io::IsTerminal;
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(anyhow::anyhow!("Explorer console requires a terminal (TTY)."));
    }

    // Set up panic hook to restore terminal.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let controller = TreeController::new(registry, config.renderer(), config.tree.stale_responses);
    let mut console = ExplorerConsole::new(controller, gateway, config.reflection.base_url.clone());
    let mut terminal = setup_terminal()?;

    tracing::info!(
        base_url = %config.reflection.base_url,
        policy = ?config.tree.stale_responses,
        "Explorer console started"
    );

    let tick_rate = Duration::from_millis(100); // ~10fps

    loop {
        console.drain_completions();

        terminal.draw(|frame| {
            console.render(frame);
        })?;

        if event::poll(tick_rate)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press
                    && console.handle_key(key_event.code, key_event.modifiers)
                {
                    break;
                }
            }
        }
    }

    restore_terminal(&mut terminal)?;
    tracing::info!("Explorer console closed");
    Ok(())
}
