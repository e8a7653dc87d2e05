//! Visualization pane
//!
//! Draws the [`Geometry`] of the current scene. Graphs and trees go on a
//! braille [`Canvas`] in layout coordinates, DP tables are a [`Table`],
//! sorting bars a [`BarChart`], and search arrays are rows of boxed cells
//! with pointer labels underneath.
//!
//! Layout space has y growing downward; the canvas has y growing upward, so
//! every y coordinate is negated before drawing.

use crate::layout::array::ArrayCell;
use crate::layout::dp::{DpCell, DpGeometry, DpTable, MemoTiles};
use crate::layout::graph::{GraphGeometry, NodeState, CENTER};
use crate::layout::sorting::{SortingGeometry, MAX_BAR_HEIGHT};
use crate::layout::tree::TreeGeometry;
use crate::layout::{ArrayGeometry, Geometry, Scene};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table,
    },
    Frame,
};

const CELL_CHARS: usize = 4;
const NODE_RADIUS: f64 = 10.0;
const CANVAS_MARGIN: f64 = 40.0;

/// Render the visualization pane; `placeholder` is shown when there is no
/// scene yet
pub fn render_visual_pane(
    frame: &mut Frame,
    area: Rect,
    scene: Option<&Scene>,
    is_focused: bool,
    placeholder: &str,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };
    let title = match scene {
        Some(scene) => format!(" Visualization · {} ", scene.classification.mode),
        None => " Visualization ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(scene) = scene else {
        frame.render_widget(
            Paragraph::new(placeholder.to_string())
                .style(Style::default().fg(DEFAULT_THEME.comment)),
            inner,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);
    render_header(frame, chunks[0], scene);

    let body = chunks[1];
    match &scene.geometry {
        Geometry::Array(geo) => render_array(frame, body, geo),
        Geometry::Graph(geo) => render_graph(frame, body, geo),
        Geometry::Tree(geo) => render_tree(frame, body, geo),
        Geometry::Dp(DpGeometry::Table(table)) => render_dp_table(frame, body, table),
        Geometry::Dp(DpGeometry::Memo(memo)) => render_memo(frame, body, memo),
        Geometry::Dp(DpGeometry::Empty) => render_note(frame, body, "(empty table)"),
        Geometry::Sorting(geo) => render_sorting(frame, body, geo),
        Geometry::Generic => render_note(
            frame,
            body,
            "No specialized view for this step; bindings are in the watch pane.",
        ),
    }
}

fn render_header(frame: &mut Frame, area: Rect, scene: &Scene) {
    let evidence: Vec<&str> = scene
        .classification
        .evidence
        .iter()
        .map(String::as_str)
        .collect();
    let mut spans = vec![Span::styled(
        format!(
            "{}() ",
            scene.function_name.as_deref().unwrap_or("<module>")
        ),
        Style::default().fg(DEFAULT_THEME.function),
    )];
    if !evidence.is_empty() {
        spans.push(Span::styled(
            format!("uses {}", evidence.join(", ")),
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }
    if scene.error.is_some() {
        spans.push(Span::styled(
            "  raised",
            Style::default()
                .fg(DEFAULT_THEME.error)
                .add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_note(frame: &mut Frame, area: Rect, text: &str) {
    frame.render_widget(
        Paragraph::new(text.to_string()).style(Style::default().fg(DEFAULT_THEME.comment)),
        area,
    );
}

fn fit(text: &str) -> String {
    let clipped: String = text.chars().take(CELL_CHARS).collect();
    format!("{:^width$}", clipped, width = CELL_CHARS)
}

fn array_cell_style(cell: &ArrayCell) -> Style {
    let on = |bg: Color| {
        Style::default()
            .bg(bg)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    };
    if cell.found {
        on(DEFAULT_THEME.success)
    } else if cell.mid {
        on(DEFAULT_THEME.secondary)
    } else if cell.left || cell.right {
        on(DEFAULT_THEME.primary)
    } else if !cell.in_range {
        Style::default().fg(DEFAULT_THEME.dimmed)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

fn render_array(frame: &mut Frame, area: Rect, geo: &ArrayGeometry) {
    let comment = Style::default().fg(DEFAULT_THEME.comment);
    let mut lines: Vec<Line> = Vec::new();

    for row in &geo.rows {
        lines.push(Line::from(Span::styled(format!("{}:", row.name), comment)));
        lines.push(Line::from(
            row.cells
                .iter()
                .map(|c| Span::styled(format!("[{}]", fit(&c.value)), array_cell_style(c)))
                .collect::<Vec<_>>(),
        ));
        lines.push(Line::from(
            row.cells
                .iter()
                .map(|c| Span::styled(format!(" {} ", fit(&c.index.to_string())), comment))
                .collect::<Vec<_>>(),
        ));
        if row.pointers_drawn {
            lines.push(Line::from(
                row.cells
                    .iter()
                    .map(|c| {
                        Span::styled(
                            format!(" {} ", fit(c.label.as_deref().unwrap_or(""))),
                            Style::default().fg(DEFAULT_THEME.secondary),
                        )
                    })
                    .collect::<Vec<_>>(),
            ));
        }
        lines.push(Line::default());
    }

    if let Some(range) = &geo.answer_range {
        let mid = range.mid.map_or_else(|| "-".to_string(), |m| m.to_string());
        lines.push(Line::from(vec![
            Span::styled("answer range ", comment),
            Span::styled(
                format!("[{}, {}]", range.low, range.high),
                Style::default().fg(DEFAULT_THEME.primary),
            ),
            Span::styled(" mid ", comment),
            Span::styled(mid, Style::default().fg(DEFAULT_THEME.secondary)),
        ]));
    }
    if let Some(target) = &geo.target {
        lines.push(Line::from(vec![
            Span::styled("target ", comment),
            Span::styled(target.clone(), Style::default().fg(DEFAULT_THEME.number)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn node_color(state: NodeState) -> Color {
    match state {
        NodeState::Current => DEFAULT_THEME.secondary,
        NodeState::Visited => DEFAULT_THEME.success,
        NodeState::Unvisited => DEFAULT_THEME.comment,
    }
}

fn render_graph(frame: &mut Frame, area: Rect, geo: &GraphGeometry) {
    if geo.nodes.is_empty() {
        render_note(frame, area, "(no graph bound)");
        return;
    }
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-CANVAS_MARGIN, 2.0 * CENTER.x + CANVAS_MARGIN])
        .y_bounds([-(2.0 * CENTER.y + CANVAS_MARGIN), CANVAS_MARGIN])
        .paint(|ctx| {
            for edge in &geo.edges {
                ctx.draw(&CanvasLine {
                    x1: edge.start.x,
                    y1: -edge.start.y,
                    x2: edge.end.x,
                    y2: -edge.end.y,
                    color: DEFAULT_THEME.edge,
                });
            }
            ctx.layer();
            for node in &geo.nodes {
                let color = node_color(node.state);
                ctx.draw(&Circle {
                    x: node.position.x,
                    y: -node.position.y,
                    radius: NODE_RADIUS,
                    color,
                });
                ctx.print(
                    node.position.x,
                    -node.position.y,
                    Span::styled(
                        node.name.clone(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });
    frame.render_widget(canvas, area);
}

fn render_tree(frame: &mut Frame, area: Rect, geo: &TreeGeometry) {
    if geo.nodes.is_empty() {
        render_note(frame, area, "(empty tree)");
        return;
    }
    let (min_x, max_x, max_y) = geo.nodes.iter().fold(
        (f64::MAX, f64::MIN, f64::MIN),
        |(lo, hi, y), n| {
            (
                lo.min(n.position.x),
                hi.max(n.position.x),
                y.max(n.position.y),
            )
        },
    );
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([min_x - CANVAS_MARGIN, max_x + CANVAS_MARGIN])
        .y_bounds([-(max_y + CANVAS_MARGIN), 0.0])
        .paint(|ctx| {
            for edge in &geo.edges {
                ctx.draw(&CanvasLine {
                    x1: edge.start.x,
                    y1: -edge.start.y,
                    x2: edge.end.x,
                    y2: -edge.end.y,
                    color: DEFAULT_THEME.edge,
                });
            }
            ctx.layer();
            for node in &geo.nodes {
                ctx.print(
                    node.position.x,
                    -node.position.y,
                    Span::styled(
                        node.label.clone(),
                        Style::default()
                            .fg(DEFAULT_THEME.primary)
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });
    frame.render_widget(canvas, area);
}

fn dp_cell_style(cell: &DpCell) -> Style {
    if cell.active {
        Style::default()
            .bg(DEFAULT_THEME.secondary)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else if cell.in_active_row {
        Style::default()
            .bg(DEFAULT_THEME.current_line_bg)
            .fg(DEFAULT_THEME.fg)
    } else if cell.dimmed {
        Style::default().fg(DEFAULT_THEME.dimmed)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

fn render_dp_table(frame: &mut Frame, area: Rect, table: &DpTable) {
    let comment = Style::default().fg(DEFAULT_THEME.comment);
    let mut by_row: Vec<Vec<&DpCell>> = vec![Vec::new(); table.rows];
    for cell in &table.cells {
        by_row[cell.row].push(cell);
    }

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain((0..table.columns).map(|c| Cell::from(c.to_string()))),
    )
    .style(comment);
    let rows: Vec<Row> = by_row
        .iter()
        .enumerate()
        .map(|(r, cells)| {
            Row::new(
                std::iter::once(Cell::from(r.to_string()).style(comment)).chain(
                    cells
                        .iter()
                        .map(|c| Cell::from(c.value.clone()).style(dp_cell_style(c))),
                ),
            )
        })
        .collect();
    let widths = std::iter::once(Constraint::Length(3))
        .chain(std::iter::repeat(Constraint::Length(CELL_CHARS as u16 + 1)).take(table.columns));

    frame.render_widget(
        Table::new(rows, widths).header(header).column_spacing(1),
        area,
    );
}

fn render_memo(frame: &mut Frame, area: Rect, memo: &MemoTiles) {
    let comment = Style::default().fg(DEFAULT_THEME.comment);
    let mut lines = vec![Line::from(Span::styled("memo", comment))];
    if memo.tiles.is_empty() {
        lines.push(Line::from(Span::styled("(empty)", comment)));
    }
    for tile in &memo.tiles {
        let style = if tile.active {
            Style::default()
                .bg(DEFAULT_THEME.secondary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DEFAULT_THEME.fg)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>6} ", tile.key), comment),
            Span::styled(format!(" {} ", tile.value), style),
        ]));
    }
    if let Some(current) = &memo.current {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("n = ", comment),
            Span::styled(current.clone(), Style::default().fg(DEFAULT_THEME.number)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_sorting(frame: &mut Frame, area: Rect, geo: &SortingGeometry) {
    if geo.bars.is_empty() {
        render_note(frame, area, "(empty array)");
        return;
    }
    let bars: Vec<Bar> = geo
        .bars
        .iter()
        .map(|b| {
            let color = if b.pointers.is_empty() {
                DEFAULT_THEME.primary
            } else {
                DEFAULT_THEME.secondary
            };
            let label = if b.pointers.is_empty() {
                b.index.to_string()
            } else {
                b.pointers.join(",")
            };
            Bar::default()
                .value(b.height.round() as u64)
                .text_value(b.value.clone())
                .label(Line::from(label))
                .style(Style::default().fg(color))
                .value_style(Style::default().bg(color).fg(Color::Black))
        })
        .collect();

    let count = geo.bars.len() as u16;
    let bar_width = (area.width / count.max(1)).saturating_sub(1).clamp(1, 7);
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(MAX_BAR_HEIGHT as u64);
    frame.render_widget(chart, area);
}
