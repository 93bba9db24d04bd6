use std::collections::VecDeque;
use std::time::{Duration, Instant};
use continuity_core::{InputBuffer, Notice, Notifier, Session};

/// At most this many toasts are kept; older ones are dropped first
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    shown_at: Instant,
}

/// On-screen notices that disappear after `ttl` or when dismissed
#[derive(Debug)]
pub struct Toasts {
    items: VecDeque<Toast>,
    ttl: Duration,
}

impl Toasts {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dismiss the newest toast
    pub fn dismiss(&mut self) -> bool {
        self.items.pop_back().is_some()
    }

    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items.retain(|toast| now.duration_since(toast.shown_at) < ttl);
    }
}

impl Notifier for Toasts {
    fn notify(&mut self, notice: Notice) {
        tracing::debug!(%notice, "showing notice");
        if self.items.len() == MAX_TOASTS {
            self.items.pop_front();
        }
        self.items.push_back(Toast {
            notice,
            shown_at: Instant::now(),
        });
    }
}

/// Backend URL dialog. Edits are applied only on save.
#[derive(Debug, Default)]
pub struct SettingsForm {
    pub open: bool,
    pub url: InputBuffer,
}

pub struct App {
    pub should_quit: bool,
    pub session: Session,
    pub settings: SettingsForm,
    pub toasts: Toasts,

    // Chat view state
    pub chat_scroll: u16,
    pub chat_height: u16, // Visible rows of the chat area, set on render
    pub chat_rows: u16,   // Wrapped rows of the transcript at the last render
    pub follow_bottom: bool, // Jump to the newest row on the next render
    seen_messages: usize,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
}

impl App {
    pub fn new(session: Session, notice_ttl: Duration) -> Self {
        Self {
            should_quit: false,
            session,
            settings: SettingsForm::default(),
            toasts: Toasts::new(notice_ttl),
            chat_scroll: 0,
            chat_height: 0,
            chat_rows: 0,
            follow_bottom: false,
            seen_messages: 0,
            animation_frame: 0,
        }
    }

    pub fn dialog_open(&self) -> bool {
        self.settings.open || self.session.memory.is_open()
    }

    /// Tick animation frame and expire old toasts (called by Tick event)
    pub fn tick(&mut self) {
        if self.session.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        self.toasts.expire(Instant::now());
    }

    /// Apply any finished backend requests
    pub async fn poll_requests(&mut self) {
        let was_pending = self.session.conversation.is_pending();
        self.session.poll(&mut self.toasts).await;
        if was_pending && !self.session.conversation.is_pending() {
            self.follow_transcript();
        }
    }

    pub fn submit_question(&mut self) {
        if self.session.submit_input() {
            self.follow_transcript();
        }
    }

    pub fn submit_memory(&mut self) {
        self.session.submit_memory_form(&mut self.toasts);
    }

    pub fn open_memory(&mut self) {
        self.session.memory.open();
    }

    pub fn open_settings(&mut self) {
        let current = self.session.endpoint().url().to_string();
        self.settings.url.set(current);
        self.settings.open = true;
    }

    pub fn save_settings(&mut self) {
        let url = self.settings.url.text().to_string();
        self.session.set_endpoint(url);
        self.settings.open = false;
    }

    pub fn cancel_settings(&mut self) {
        self.settings.open = false;
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(rows).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.follow_bottom = false;
        self.chat_scroll = self.chat_scroll.saturating_sub(rows);
    }

    /// Scroll to the newest entry when the transcript has grown
    fn follow_transcript(&mut self) {
        let len = self.session.conversation.len();
        if len != self.seen_messages {
            self.seen_messages = len;
            self.scroll_to_bottom();
        }
    }

    /// Applied on the next render, once the wrapped height is known
    pub fn scroll_to_bottom(&mut self) {
        self.follow_bottom = true;
    }

    /// Record the measured transcript height and clamp the scroll to it
    pub fn fit_scroll(&mut self, chat_rows: u16, chat_height: u16) {
        self.chat_rows = chat_rows;
        self.chat_height = chat_height;
        if self.follow_bottom {
            self.chat_scroll = self.max_scroll();
            self.follow_bottom = false;
        } else {
            self.chat_scroll = self.chat_scroll.min(self.max_scroll());
        }
    }

    fn max_scroll(&self) -> u16 {
        self.chat_rows.saturating_sub(self.chat_height)
    }
}
