use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use continuity_core::{render_message, InputBuffer, MemoryField, NoticeKind, Role, KNOWLEDGE_LABEL};
use unicode_width::UnicodeWidthChar;
use crate::app::App;

const TOAST_WIDTH: u16 = 48;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, chat, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_question_input(app, frame, input_area);
    render_footer(app, frame, footer_area);

    // Render popups (in order of priority)
    if app.settings.open {
        render_settings(app, frame, area);
    } else if app.session.memory.is_open() {
        render_memory_dialog(app, frame, area);
    }

    render_toasts(app, frame, area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" AI Knowledge Agent ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("@ {} ", app.session.endpoint()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        Role::Assistant => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    }
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" IT Team Continuity Assistant ");

    let conversation = &app.session.conversation;
    let chat_text = if conversation.is_empty() && !conversation.is_pending() {
        Text::from(vec![
            Line::from(Span::styled(
                "Welcome to AI Knowledge Agent",
                Style::default().fg(Color::Cyan).bold(),
            )),
            Line::default(),
            Line::from(Span::styled(
                "Ask questions about IT issues or add new solutions to help the team learn and improve.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in conversation.messages() {
            let rendered = render_message(msg);
            lines.push(Line::from(Span::styled(
                format!("{}:", rendered.label),
                role_style(rendered.role),
            )));
            // Content is shown verbatim, no markdown
            for line in &rendered.body {
                lines.push(Line::from(line.to_string()));
            }
            if let Some(knowledge) = &rendered.knowledge {
                let dim = Style::default().fg(Color::DarkGray);
                lines.push(Line::from(Span::styled(
                    format!("│ {}", KNOWLEDGE_LABEL.to_uppercase()),
                    dim.add_modifier(Modifier::BOLD),
                )));
                for line in knowledge {
                    lines.push(Line::from(Span::styled(format!("│ {}", line), dim)));
                }
            }
            lines.push(Line::default());
        }

        if conversation.is_pending() {
            lines.push(Line::from(Span::styled("AI Assistant:", role_style(Role::Assistant))));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Thinking{}", dots),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let inner = chat_block.inner(area);
    frame.render_widget(chat_block, area);

    // Measure with the same wrapping that draws it, so the last row stays reachable
    let chat = Paragraph::new(chat_text).wrap(Wrap { trim: false });
    let rows = u16::try_from(chat.line_count(inner.width)).unwrap_or(u16::MAX);
    app.fit_scroll(rows, inner.height);

    frame.render_widget(chat.scroll((app.chat_scroll, 0)), inner);
}

fn render_question_input(app: &App, frame: &mut Frame, area: Rect) {
    let pending = app.session.conversation.is_pending();
    let (title, border_color) = if pending {
        (" Waiting for answer... ", Color::DarkGray)
    } else {
        (" Ask about an IT issue... ", Color::Yellow)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let show_cursor = !app.dialog_open();
    render_input_line(frame, inner, &app.session.conversation.input, Color::Cyan, show_cursor);
}

/// Draw one line of an input buffer, scrolled horizontally so the cursor stays visible
fn render_input_line(frame: &mut Frame, area: Rect, input: &InputBuffer, color: Color, show_cursor: bool) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let (visible_text, cursor_x) = input_window(input.text(), input.cursor(), area.width as usize);

    frame.render_widget(
        Paragraph::new(visible_text).style(Style::default().fg(color)),
        Rect::new(area.x, area.y, area.width, 1),
    );

    if show_cursor {
        frame.set_cursor_position((area.x + cursor_x, area.y));
    }
}

/// The slice of `text` that fits in `width` columns with the cursor on screen,
/// and the cursor's column within it. Wide characters take two columns.
fn input_window(text: &str, cursor: usize, width: usize) -> (String, u16) {
    let col = |c: char| c.width().unwrap_or(0);
    let chars: Vec<char> = text.chars().collect();
    let cursor_col: usize = chars.iter().take(cursor).map(|&c| col(c)).sum();

    let mut start = 0;
    let mut start_col = 0;
    while start < cursor && cursor_col - start_col >= width {
        start_col += col(chars[start]);
        start += 1;
    }

    let mut used = 0;
    let visible: String = chars[start..]
        .iter()
        .take_while(|&&c| {
            used += col(c);
            used <= width
        })
        .collect();

    let cursor_x = (cursor_col - start_col).min(width.saturating_sub(1));
    (visible, cursor_x as u16)
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let keys: &[(&str, &str)] = if app.settings.open {
        &[(" Enter ", " save "), (" Esc ", " cancel ")]
    } else if app.session.memory.is_open() {
        &[(" Tab ", " field "), (" Ctrl-J ", " newline "), (" Enter ", " add "), (" Esc ", " close ")]
    } else {
        &[
            (" Enter ", " send "),
            (" ↑/↓ ", " scroll "),
            (" Ctrl-T ", " add memory "),
            (" Ctrl-S ", " settings "),
            (" Esc ", " dismiss "),
            (" Ctrl-C ", " quit "),
        ]
    };

    let mode = if app.dialog_open() { " DIALOG " } else { " CHAT " };
    let mut spans = vec![Span::styled(mode, Style::default().bg(Color::Blue).fg(Color::White))];
    for (key, label) in keys {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(*label, label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Centered popup area, clamped to the screen
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_memory_dialog(app: &App, frame: &mut Frame, area: Rect) {
    let memory = &app.session.memory;
    let popup = popup_area(area, 64, 16);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Add New Memory ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let [intro_area, issue_area, solution_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new("Store an issue and its solution for the AI to learn from")
            .style(Style::default().fg(Color::DarkGray)),
        intro_area,
    );

    let field_block = |title: &'static str, focused: bool| {
        let color = if focused && !memory.is_pending() { Color::Cyan } else { Color::DarkGray };
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title)
    };

    let issue_focused = memory.focus == MemoryField::Issue;
    let issue_block = field_block(" Issue ", issue_focused);
    let issue_inner = issue_block.inner(issue_area);
    frame.render_widget(issue_block, issue_area);
    render_input_line(frame, issue_inner, &memory.issue, Color::White, issue_focused && !memory.is_pending());

    // The solution can span several lines; show it wrapped without a cursor column
    let solution_block = field_block(" Solution ", !issue_focused);
    let solution = Paragraph::new(memory.solution.text().to_string())
        .style(Style::default().fg(Color::White))
        .block(solution_block)
        .wrap(Wrap { trim: false });
    frame.render_widget(solution, solution_area);

    let status = if memory.is_pending() {
        Span::styled("Adding Memory...", Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC))
    } else {
        Span::styled(
            format!("{} characters", memory.solution.char_count()),
            Style::default().fg(Color::DarkGray),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(status)), status_area);
}

fn render_settings(app: &App, frame: &mut Frame, area: Rect) {
    let popup = popup_area(area, 60, 7);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Settings ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let instructions = Paragraph::new("Backend URL (e.g., http://localhost:8000)")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(instructions, Rect::new(inner.x, inner.y, inner.width, 1));

    let input_area = Rect::new(inner.x, inner.y + 2, inner.width, 1);
    render_input_line(frame, input_area, &app.settings.url, Color::Cyan, true);

    let hint = Paragraph::new("Applies to the next request. Not saved between runs.")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, Rect::new(inner.x, inner.y + 4, inner.width, 1));
}

fn render_toasts(app: &App, frame: &mut Frame, area: Rect) {
    let width = TOAST_WIDTH.min(area.width);
    let mut y = area.y + 1;

    for toast in app.toasts.iter() {
        let height = 4;
        if y + height > area.y + area.height {
            break;
        }
        let toast_area = Rect::new(area.x + area.width - width, y, width, height);
        let color = match toast.notice.kind {
            NoticeKind::Success => Color::Green,
            NoticeKind::Validation | NoticeKind::Connection => Color::Red,
        };

        frame.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(format!(" {} ", toast.notice.title), Style::default().fg(color).bold()));
        let body = Paragraph::new(toast.notice.description.as_str())
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(body, toast_area);

        y += height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use continuity_core::Session;
    use ratatui::{backend::TestBackend, Terminal};
    use crate::testing::CannedBackend;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    async fn wait_for_answer(app: &mut App) {
        for _ in 0..50 {
            if !app.session.conversation.is_pending() {
                return;
            }
            tokio::task::yield_now().await;
            app.poll_requests().await;
        }
    }

    #[tokio::test]
    async fn test_long_answer_scrolls_to_last_row() {
        let line = format!("{}{}{}", "a".repeat(15), "b".repeat(15), "c".repeat(15));
        let answer = format!("{}\nZZEND", vec![line.as_str(); 6].join("\n"));
        let context = format!("{}\nCTXEND", "k".repeat(28));
        let backend = CannedBackend::new(&answer, Some(&context));
        let session = Session::new(Arc::new(backend), Default::default());
        let mut app = App::new(session, Duration::from_secs(4));

        app.session.conversation.input.set("how do I reset the vpn?");
        app.submit_question();
        wait_for_answer(&mut app).await;
        assert_eq!(app.session.conversation.len(), 2);

        let mut terminal = Terminal::new(TestBackend::new(30, 16)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        let shown = screen(&terminal);
        assert!(shown.contains("ZZEND"));
        assert!(shown.contains("CTXEND"));

        app.scroll_up(1000);
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        assert!(!screen(&terminal).contains("CTXEND"));

        app.scroll_down(1000);
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        assert!(screen(&terminal).contains("CTXEND"));
        assert_eq!(app.chat_scroll, app.chat_rows - app.chat_height);
    }

    #[test]
    fn test_input_window_fits_ascii() {
        assert_eq!(input_window("hello", 5, 10), ("hello".to_string(), 5));
        assert_eq!(input_window("abcdefghij", 10, 4), ("hij".to_string(), 3));
        assert_eq!(input_window("abcdefghij", 2, 4), ("abcd".to_string(), 2));
    }

    #[test]
    fn test_input_window_counts_wide_chars_as_two_columns() {
        // Each of these takes two terminal cells
        let text = "网络连接失败";
        let (visible, cursor_x) = input_window(text, 2, 20);
        assert_eq!(visible, text);
        assert_eq!(cursor_x, 4);

        let (visible, cursor_x) = input_window(text, 6, 8);
        assert_eq!(visible, "接失败");
        assert_eq!(cursor_x, 6);
    }
}
