//! Status bar rendering with keybindings and state indicators

use crate::classify::Mode;
use crate::playback::PlaybackStatus;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Data needed to render the status bar
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub playback: PlaybackStatus,
    pub mode: Option<Mode>,
    pub is_loading: bool,
    pub is_error: bool,
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: StatusRenderData<'_>) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let playback = data.playback;
    let step_text = if playback.total == 0 {
        " Step -/- ".to_string()
    } else {
        format!(" Step {}/{} ", playback.index + 1, playback.total)
    };
    let bar_bg = Style::default().bg(DEFAULT_THEME.current_line_bg);

    let left_spans = vec![
        Span::styled(
            step_text,
            Style::default()
                .bg(if data.is_error {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.primary
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", data.mode.map_or("-", Mode::as_str)),
            bar_bg.fg(DEFAULT_THEME.function),
        ),
        Span::styled(
            format!("{}ms ", playback.speed_ms),
            bar_bg.fg(DEFAULT_THEME.comment),
        ),
        Span::styled("| ", bar_bg.fg(DEFAULT_THEME.comment)),
        Span::styled(
            format!("{} ", data.message),
            bar_bg.fg(if data.is_error {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.fg
            }),
        ),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(bar_bg)
            .alignment(Alignment::Left),
        layout[0],
    );

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar_bg.fg(DEFAULT_THEME.fg);
    let sep_style = bar_bg.fg(DEFAULT_THEME.comment);

    let mut right_spans = Vec::new();
    for (i, (key, desc)) in [
        (" ←/→ ", " step "),
        (" ⎵ ", " play "),
        (" +/- ", " speed "),
        (" ↵/⌫ ", " end/start "),
        (" r ", " run "),
        (" g/G ", " gen "),
        (" t ", " template "),
        (" q ", " quit "),
    ]
    .into_iter()
    .enumerate()
    {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(key, key_style));
        right_spans.push(Span::styled(desc, desc_style));
    }

    let badge = |text: &'static str, bg: Color| {
        Span::styled(
            text,
            Style::default()
                .bg(bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    };
    let indicator = if data.is_loading {
        Some(badge(" … RUNNING ", DEFAULT_THEME.primary))
    } else if playback.playing {
        Some(badge(" ▶ PLAYING ", DEFAULT_THEME.secondary))
    } else if playback.total > 0 && playback.index + 1 >= playback.total {
        Some(badge(" END ", DEFAULT_THEME.error))
    } else if playback.total > 0 && playback.index == 0 {
        Some(badge(" START ", DEFAULT_THEME.success))
    } else {
        None
    };
    if let Some(indicator) = indicator {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(indicator);
    }

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(bar_bg)
            .alignment(Alignment::Right),
        layout[1],
    );
}
