//! Source code pane rendering with syntax highlighting
//!
//! This module renders the program under inspection with basic Python
//! syntax highlighting and a marker on the line of the current step.
//!
//! # Features
//!
//! - Highlighting for keywords, builtins, strings, numbers and comments
//! - Current line highlighting, red when the step raised an error
//! - The current line is held at a fixed visual row while stepping
//! - Line numbering

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const KEYWORDS: &[&str] = &[
    "and", "as", "break", "class", "continue", "def", "elif", "else", "except", "finally", "for",
    "from", "global", "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass",
    "raise", "return", "try", "while", "with", "yield",
];

const CONSTANTS: &[&str] = &["None", "True", "False"];

const BUILTINS: &[&str] = &[
    "dict", "enumerate", "float", "int", "len", "list", "max", "min", "print", "range", "set",
    "sorted", "str", "sum", "tuple", "zip",
];

/// Simple syntax highlighting for Python source
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut word_start: Option<usize> = None;
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];

        if c == '#' {
            flush(&mut spans, line, word_start.take(), offset, Some(c));
            spans.push(Span::styled(
                &line[offset..],
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            return Line::from(spans);
        }

        if c == '"' || c == '\'' {
            flush(&mut spans, line, word_start.take(), offset, Some(c));
            let mut end = i + 1;
            while end < chars.len() && chars[end].1 != c {
                end += if chars[end].1 == '\\' { 2 } else { 1 };
            }
            let stop = chars.get(end + 1).map_or(line.len(), |(o, _)| *o);
            spans.push(Span::styled(
                &line[offset..stop],
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end + 1;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' {
            flush(&mut spans, line, word_start.take(), offset, Some(c));
            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                ':' => Style::default().fg(DEFAULT_THEME.keyword),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(&line[offset..offset + c.len_utf8()], style));
            i += 1;
            continue;
        }

        word_start.get_or_insert(offset);
        i += 1;
    }
    flush(&mut spans, line, word_start, line.len(), None);

    Line::from(spans)
}

/// Push the pending identifier, if any, ending at byte `end`
fn flush<'a>(
    spans: &mut Vec<Span<'a>>,
    line: &'a str,
    start: Option<usize>,
    end: usize,
    next: Option<char>,
) {
    if let Some(start) = start {
        let word = &line[start..end];
        spans.push(Span::styled(word, word_style(word, next == Some('('))));
    }
}

fn word_style(word: &str, is_call: bool) -> Style {
    if KEYWORDS.contains(&word) {
        Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD)
    } else if CONSTANTS.contains(&word) || word.chars().all(|c| c.is_ascii_digit()) {
        Style::default().fg(DEFAULT_THEME.number)
    } else if BUILTINS.contains(&word) {
        Style::default().fg(DEFAULT_THEME.builtin)
    } else if is_call {
        Style::default().fg(DEFAULT_THEME.function)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    /// Visual row the current line is pinned to; `None` until first render
    pub target_line_row: Option<usize>,
}

/// Render the source code pane. `current_line` is 1-based; 0 means no line.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: usize,
    is_error: bool,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    if current_line > 0 && current_line <= total_lines {
        scroll_state.offset = (current_line - 1).saturating_sub(target_row);
        if total_lines > visible_height {
            scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
        } else {
            scroll_state.offset = 0;
        }
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;
            let line_num_str = format!("{:4} ", line_num);

            let (num_style, content_style) = match (is_current, is_error) {
                (true, true) => (
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                    Style::default()
                        .bg(DEFAULT_THEME.error)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                (true, false) => (
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                    Style::default().bg(DEFAULT_THEME.current_line_bg),
                ),
                _ => (Style::default().fg(DEFAULT_THEME.comment), Style::default()),
            };

            let mut content = highlight_source_code(line);
            if is_current && is_error {
                for span in &mut content.spans {
                    span.style = content_style;
                }
            } else if is_current {
                for span in &mut content.spans {
                    span.style = span.style.patch(content_style);
                }
            }

            let mut spans = vec![Span::styled(line_num_str, num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(visible_lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &Line<'_>) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn highlighting_preserves_text() {
        let src = "    if arr[mid] == 'x': # found ✓";
        let line = highlight_source_code(src);
        assert_eq!(texts(&line).concat(), src);
    }

    #[test]
    fn keywords_and_calls_are_styled() {
        let line = highlight_source_code("def dfs(graph):");
        let def = line.spans.iter().find(|s| s.content == "def").unwrap();
        assert_eq!(def.style.fg, Some(DEFAULT_THEME.keyword));
        let call = line.spans.iter().find(|s| s.content == "dfs").unwrap();
        assert_eq!(call.style.fg, Some(DEFAULT_THEME.function));
    }

    #[test]
    fn unterminated_string_runs_to_end() {
        let line = highlight_source_code("s = \"abc");
        assert_eq!(line.spans.last().unwrap().content, "\"abc");
    }
}
