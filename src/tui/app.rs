//! Application State
//!
//! Wraps a [`SearchView`] with terminal concerns: the text input, scrolling,
//! the help overlay, and the channel searches report back on.

use crate::models::MaterialRecord;
use crate::tui::event::AppAction;
use crate::view::{RelayClient, RelayError, SearchTicket, SearchView};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tui_textarea::TextArea;

const PLACEHOLDER: &str = "Enter a compound or element (e.g. Cr, CrO3, CrO*). * are wildcards.";

/// Current screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Screen {
    #[default]
    Search,
    Help,
}

/// Events from spawned searches
#[derive(Debug)]
pub enum AppEvent {
    SearchFinished {
        ticket: SearchTicket,
        outcome: Result<Vec<MaterialRecord>, RelayError>,
    },
}

/// Main application state
pub struct App {
    pub search: SearchView,
    pub relay: RelayClient,

    // UI State
    pub screen: Screen,
    pub should_quit: bool,
    pub input: TextArea<'static>,
    pub scroll_offset: u16,
    pub max_scroll: u16,

    event_rx: mpsc::Receiver<AppEvent>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl App {
    pub fn new(relay: RelayClient) -> Self {
        let (event_tx, event_rx) = mpsc::channel(16);

        Self {
            search: SearchView::new(),
            relay,
            screen: Screen::Search,
            should_quit: false,
            input: new_input(),
            scroll_offset: 0,
            max_scroll: 0,
            event_rx,
            event_tx,
        }
    }

    /// Apply finished searches
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchFinished { ticket, outcome } => {
                if let Err(e) = &outcome {
                    warn!(query = %ticket.query, error = %e, "Search failed");
                }
                if self.search.finish_search(&ticket, outcome) {
                    self.scroll_offset = 0;
                }
            }
        }
    }

    /// Handle a user action
    pub async fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::Quit | AppAction::ForceQuit => {
                self.should_quit = true;
            }
            AppAction::Submit => {
                if self.screen == Screen::Search {
                    self.submit();
                }
            }
            AppAction::ToggleHelp => {
                self.screen = if self.screen == Screen::Help {
                    Screen::Search
                } else {
                    Screen::Help
                };
            }
            AppAction::Escape => {
                if self.screen == Screen::Help {
                    self.screen = Screen::Search;
                } else {
                    self.should_quit = true;
                }
            }
            AppAction::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            AppAction::ScrollDown => {
                if self.scroll_offset < self.max_scroll {
                    self.scroll_offset += 1;
                }
            }
            AppAction::ScrollPageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
            }
            AppAction::ScrollPageDown => {
                self.scroll_offset = (self.scroll_offset + 10).min(self.max_scroll);
            }
            AppAction::Input(key) => {
                if self.screen == Screen::Help {
                    self.screen = Screen::Search;
                } else {
                    self.input.input(key);
                    self.search.set_query(self.input.lines().join(""));
                }
            }
            AppAction::Tick => {}
        }
    }

    /// Start a search on a background task; the input stays editable
    fn submit(&mut self) {
        if !self.search.can_submit() {
            return;
        }

        let Some(ticket) = self.search.begin_search() else {
            return;
        };

        info!(query = %ticket.query, "Submitting search");

        let relay = self.relay.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let outcome = relay.search(&ticket.query).await;
            tx.send(AppEvent::SearchFinished { ticket, outcome }).await.ok();
        });
    }

    /// Update max scroll based on content
    pub fn update_scroll_bounds(&mut self, content_height: u16, viewport_height: u16) {
        self.max_scroll = content_height.saturating_sub(viewport_height);
        if self.scroll_offset > self.max_scroll {
            self.scroll_offset = self.max_scroll;
        }
    }
}

fn new_input() -> TextArea<'static> {
    let mut input = TextArea::default();
    input.set_cursor_line_style(ratatui::style::Style::default());
    input.set_placeholder_text(PLACEHOLDER);
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use mockito::{Matcher, Server};
    use std::time::Duration;

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(AppAction::Input(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::NONE,
            )))
            .await;
        }
    }

    async fn settle(app: &mut App) {
        for _ in 0..200 {
            app.poll_events();
            if !app.search.loading {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("search did not settle");
    }

    #[tokio::test]
    async fn test_typing_updates_query() {
        let mut app = App::new(RelayClient::new("http://127.0.0.1:1"));
        type_text(&mut app, "CrO3").await;
        assert_eq!(app.search.query, "CrO3");
    }

    #[tokio::test]
    async fn test_empty_submit_sets_error() {
        let mut app = App::new(RelayClient::new("http://127.0.0.1:1"));
        app.handle_action(AppAction::Submit).await;

        assert_eq!(app.search.error, "Please enter a search term.");
        assert!(!app.search.loading);
    }

    #[tokio::test]
    async fn test_submit_runs_search_in_background() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/oxidation-state")
            .match_query(Matcher::UrlEncoded("query".into(), "Fe2O3".into()))
            .with_status(200)
            .with_body(r#"{"data":[{"material_id":"mp-19770","formula_pretty":"Fe2O3"}]}"#)
            .create_async()
            .await;

        let mut app = App::new(RelayClient::new(server.url()));
        type_text(&mut app, "Fe2O3").await;
        app.scroll_offset = 5;
        app.handle_action(AppAction::Submit).await;
        assert!(app.search.loading);

        settle(&mut app).await;

        mock.assert_async().await;
        assert_eq!(app.search.results.len(), 1);
        assert_eq!(app.search.results[0].material_id, "mp-19770");
        assert_eq!(app.scroll_offset, 0);
    }

    #[tokio::test]
    async fn test_escape_closes_help_before_quitting() {
        let mut app = App::new(RelayClient::new("http://127.0.0.1:1"));
        app.handle_action(AppAction::ToggleHelp).await;
        assert_eq!(app.screen, Screen::Help);

        app.handle_action(AppAction::Escape).await;
        assert_eq!(app.screen, Screen::Search);
        assert!(!app.should_quit);

        app.handle_action(AppAction::Escape).await;
        assert!(app.should_quit);
    }

    #[test]
    fn test_scroll_bounds_clamp_offset() {
        let mut app = App::new(RelayClient::new("http://127.0.0.1:1"));
        app.scroll_offset = 30;
        app.update_scroll_bounds(40, 20);
        assert_eq!(app.max_scroll, 20);
        assert_eq!(app.scroll_offset, 20);
    }
}
