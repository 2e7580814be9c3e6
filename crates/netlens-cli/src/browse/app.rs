use crossterm::event::{KeyCode, KeyEvent};
use netlens_application::{FilterDebouncer, PagedResource, ResourceBrowser};
use netlens_core::query::{FetchResult, PageState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

/// Screen state of the browse view. Typing edits the focused filter field;
/// the debouncer decides when the browser refetches.
pub struct App<R: PagedResource> {
    pub title: String,
    browser: Arc<ResourceBrowser<R>>,
    debouncer: FilterDebouncer,
    follower: JoinHandle<()>,
    results: watch::Receiver<FetchResult<R::Item>>,
    pub result: FetchResult<R::Item>,
    pub page: PageState,
    pub focused: usize,
}

impl<R: PagedResource> App<R> {
    pub fn new(browser: Arc<ResourceBrowser<R>>, debounce: Duration, title: String) -> Self {
        let debouncer = FilterDebouncer::new(browser.kind(), debounce);
        let follower = browser.follow_filters(debouncer.committed());
        let results = browser.subscribe();
        let page = PageState::new(browser.kind().default_limit());
        Self {
            title,
            browser,
            debouncer,
            follower,
            results,
            result: FetchResult::default(),
            page,
            focused: 0,
        }
    }

    pub fn fields(&self) -> &'static [&'static str] {
        self.browser.kind().filter_fields()
    }

    pub fn field_value(&self, field: &str) -> &str {
        self.debouncer.draft().get(field)
    }

    /// Pulls the latest fetch state and page position.
    pub async fn update(&mut self) {
        if self.results.has_changed().unwrap_or(false) {
            self.result = self.results.borrow_and_update().clone();
        }
        self.page = self.browser.page_state().await;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        match key.code {
            KeyCode::Esc => return KeyAction::Quit,
            KeyCode::Tab => {
                self.focused = (self.focused + 1) % self.fields().len();
            }
            KeyCode::BackTab => {
                let len = self.fields().len();
                self.focused = (self.focused + len - 1) % len;
            }
            KeyCode::Char(c) => self.edit(|value| value.push(c)),
            KeyCode::Backspace => self.edit(|value| {
                value.pop();
            }),
            KeyCode::Enter => self.debouncer.flush(),
            KeyCode::Right => {
                if self.page.can_next(self.result.total) {
                    let browser = self.browser.clone();
                    tokio::spawn(async move { browser.next_page().await });
                }
            }
            KeyCode::Left => {
                if self.page.can_previous(self.result.total) {
                    let browser = self.browser.clone();
                    tokio::spawn(async move { browser.previous_page().await });
                }
            }
            KeyCode::F(5) => {
                let browser = self.browser.clone();
                tokio::spawn(async move { browser.refresh().await });
            }
            _ => {}
        }
        KeyAction::Continue
    }

    fn edit(&mut self, change: impl FnOnce(&mut String)) {
        let field = self.fields()[self.focused];
        let mut value = self.field_value(field).to_string();
        change(&mut value);
        if let Err(err) = self.debouncer.edit(field, value) {
            tracing::warn!(error = %err, "Filter edit rejected");
        }
    }
}

impl<R: PagedResource> Drop for App<R> {
    fn drop(&mut self) {
        self.follower.abort();
    }
}
