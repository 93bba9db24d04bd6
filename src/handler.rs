use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use continuity_core::{InputBuffer, MemoryField};
use crate::app::App;
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    // Apply a finished request first so this key sees the settled state
    app.poll_requests().await;
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => handle_paste(app, &text),
        AppEvent::Resize => app.scroll_to_bottom(),
        AppEvent::Tick => app.tick(),
    }
    app.poll_requests().await;
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work everywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.settings.open {
        handle_settings(app, key);
    } else if app.session.memory.is_open() {
        handle_memory(app, key);
    } else {
        handle_chat(app, key);
    }
}

fn handle_chat(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('t') if ctrl => app.open_memory(),
        KeyCode::Char('s') if ctrl => app.open_settings(),
        KeyCode::Char('d') if ctrl => app.should_quit = true,
        KeyCode::Enter => app.submit_question(),
        KeyCode::Esc => {
            app.toasts.dismiss();
        }
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(app.chat_height.max(2) / 2),
        KeyCode::PageDown => app.scroll_down(app.chat_height.max(2) / 2),
        _ => {
            edit_input(&mut app.session.conversation.input, key);
        }
    }
}

fn handle_memory(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let pending = app.session.memory.is_pending();

    if key.code == KeyCode::Enter {
        if !pending {
            app.submit_memory();
        }
        return;
    }

    let memory = &mut app.session.memory;
    match key.code {
        KeyCode::Esc => memory.close(),
        KeyCode::Tab | KeyCode::BackTab => memory.toggle_focus(),
        // Solution accepts line breaks
        KeyCode::Char('j') if ctrl && !pending && memory.focus == MemoryField::Solution => {
            memory.solution.insert('\n');
        }
        _ if !pending => {
            edit_input(memory.focused_input(), key);
        }
        _ => {}
    }
}

fn handle_settings(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_settings(),
        KeyCode::Enter => app.save_settings(),
        _ => {
            edit_input(&mut app.settings.url, key);
        }
    }
}

/// Shared line editing. Returns true if the key was consumed.
fn edit_input(input: &mut InputBuffer, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }
    match key.code {
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        KeyCode::Char(c) => input.insert(c),
        _ => return false,
    }
    true
}

fn handle_paste(app: &mut App, text: &str) {
    let (input, multiline) = if app.settings.open {
        (&mut app.settings.url, false)
    } else if app.session.memory.is_open() {
        if app.session.memory.is_pending() {
            return;
        }
        let multiline = app.session.memory.focus == MemoryField::Solution;
        (app.session.memory.focused_input(), multiline)
    } else {
        (&mut app.session.conversation.input, false)
    };

    for c in text.chars() {
        match c {
            '\r' => {}
            '\n' if !multiline => input.insert(' '),
            _ => input.insert(c),
        }
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.dialog_open() {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(3),
        MouseEventKind::ScrollUp => app.scroll_up(3),
        _ => {}
    }
}
