//! Watch pane rendering
//!
//! Lists the bindings of the current step that the specialized view did not
//! consume, in recorded order. The return value of a return step is listed
//! last and highlighted. When the current step raised, the error message and
//! traceback are shown below the bindings.

use crate::layout::{Scene, WatchEntry};
use crate::snapshot::Event;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

const RETURN_BINDING: &str = "__return__";

/// Scroll state for the watch pane
#[derive(Debug, Default)]
pub struct WatchScrollState {
    pub offset: usize,
}

fn entry_line(entry: &WatchEntry) -> Line<'static> {
    let (name, name_style) = if entry.name == RETURN_BINDING {
        (
            "return".to_string(),
            Style::default()
                .fg(DEFAULT_THEME.return_value)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (entry.name.clone(), Style::default().fg(DEFAULT_THEME.fg))
    };
    Line::from(vec![
        Span::styled(format!("{name:>10}"), name_style),
        Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(
            entry.value.to_string(),
            Style::default().fg(DEFAULT_THEME.number),
        ),
    ])
}

/// Render the watch pane
pub fn render_watch_pane(
    frame: &mut Frame,
    area: Rect,
    scene: Option<&Scene>,
    is_focused: bool,
    scroll_state: &mut WatchScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };
    let block = Block::default()
        .title(" Watch ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut items: Vec<ListItem> = Vec::new();
    match scene {
        None => items.push(
            ListItem::new("(no trace)").style(Style::default().fg(DEFAULT_THEME.comment)),
        ),
        Some(scene) => {
            let function = scene.function_name.as_deref().unwrap_or("<module>");
            items.push(ListItem::new(Line::from(vec![
                Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
                Span::styled(
                    format!("{}()", function),
                    Style::default()
                        .fg(DEFAULT_THEME.function)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" │ {} @ line {}", scene.event.as_str(), scene.position),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
            ])));

            let (returns, locals): (Vec<&WatchEntry>, Vec<&WatchEntry>) = scene
                .residual
                .iter()
                .partition(|e| e.name == RETURN_BINDING);
            if locals.is_empty() && returns.is_empty() {
                items.push(
                    ListItem::new("  (nothing else to show)")
                        .style(Style::default().fg(DEFAULT_THEME.comment)),
                );
            }
            items.extend(locals.into_iter().map(|e| ListItem::new(entry_line(e))));
            if scene.event == Event::Return {
                items.extend(returns.into_iter().map(|e| ListItem::new(entry_line(e))));
            }

            if let Some(error) = &scene.error {
                items.push(ListItem::new(""));
                for line in error.lines() {
                    items.push(
                        ListItem::new(line.to_string())
                            .style(Style::default().fg(DEFAULT_THEME.error)),
                    );
                }
            }
        }
    }

    let visible_height = area.height.saturating_sub(2) as usize;
    let max_offset = items.len().saturating_sub(visible_height);
    scroll_state.offset = scroll_state.offset.min(max_offset);

    let visible: Vec<ListItem> = items.into_iter().skip(scroll_state.offset).collect();
    frame.render_widget(List::new(visible).block(block), area);
}
