//! Search View State
//!
//! Front-end agnostic form state: query text, result list, loading flag and
//! error message.
//!
//! Synchronous callers use [`SearchView::submit`]. Front ends that run the
//! request elsewhere (the terminal UI spawns it) use
//! [`SearchView::begin_search`] / [`SearchView::finish_search`]; every begin
//! issues a new [`SearchTicket`] and only the latest ticket's outcome is
//! applied, so an older search finishing late can't overwrite a newer one.

use tracing::info;

use crate::models::MaterialRecord;
use crate::view::relay::{RelayClient, RelayError};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a search term.";

/// Identifies one in-flight search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    pub query: String,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchView {
    pub query: String,
    pub results: Vec<MaterialRecord>,
    pub loading: bool,
    /// Empty when there is nothing to show
    pub error: String,
    generation: u64,
}

impl SearchView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Whether the submit control accepts input
    pub fn can_submit(&self) -> bool {
        !self.loading
    }

    /// Validate and enter the loading state.
    ///
    /// Returns `None` (and sets the error) when the query is blank.
    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        if self.query.trim().is_empty() {
            self.error = EMPTY_QUERY_MESSAGE.to_string();
            return None;
        }

        self.error.clear();
        self.loading = true;
        self.generation += 1;

        Some(SearchTicket {
            generation: self.generation,
            query: self.query.clone(),
        })
    }

    /// Apply a search outcome. Returns `false` if the ticket was superseded.
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Vec<MaterialRecord>, RelayError>,
    ) -> bool {
        if ticket.generation != self.generation {
            info!(
                stale = ticket.generation,
                current = self.generation,
                "Discarding superseded search result"
            );
            return false;
        }

        match outcome {
            Ok(records) => self.results = records,
            Err(e) => self.error = e.to_string(),
        }
        self.loading = false;
        true
    }

    /// Run a full search against the relay
    pub async fn submit(&mut self, relay: &RelayClient) {
        let Some(ticket) = self.begin_search() else {
            return;
        };

        let outcome = relay.search(&ticket.query).await;
        self.finish_search(&ticket, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn record(id: &str) -> MaterialRecord {
        MaterialRecord {
            material_id: id.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_blank_query_sets_error_without_calling_relay() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/oxidation-state")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let relay = RelayClient::new(server.url());

        for query in ["", "   ", "\t\n"] {
            let mut view = SearchView::new();
            view.set_query(query);
            view.submit(&relay).await;

            assert_eq!(view.error, "Please enter a search term.");
            assert!(!view.loading);
            assert!(view.results.is_empty());
        }

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_success_replaces_results() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/oxidation-state")
            .match_query(Matcher::UrlEncoded("query".into(), "CrO3".into()))
            .with_status(200)
            .with_body(r#"{"data":[{"material_id":"mp-1","formula_pretty":"CrO3"}]}"#)
            .create_async()
            .await;

        let mut view = SearchView::new();
        view.results = vec![record("mp-old-1"), record("mp-old-2")];
        view.error = "previous failure".to_string();
        view.set_query("CrO3");
        view.submit(&RelayClient::new(server.url())).await;

        assert!(!view.loading);
        assert!(!view.has_error());
        assert_eq!(view.results.len(), 1);
        assert_eq!(view.results[0].material_id, "mp-1");
        assert_eq!(view.results[0].formula_pretty, "CrO3");
    }

    #[tokio::test]
    async fn test_error_status_sets_generic_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/oxidation-state")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"error":"Internal Server Error"}"#)
            .create_async()
            .await;

        let mut view = SearchView::new();
        view.results = vec![record("mp-kept")];
        view.set_query("Fe");
        view.submit(&RelayClient::new(server.url())).await;

        assert!(!view.loading);
        assert_eq!(view.error, "Failed to fetch data.");
        assert_eq!(view.results, vec![record("mp-kept")]);
    }

    #[tokio::test]
    async fn test_transport_failure_clears_loading() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let mut view = SearchView::new();
        view.set_query("Fe");
        view.submit(&RelayClient::new(format!("http://127.0.0.1:{}", port)))
            .await;

        assert!(!view.loading);
        assert!(view.has_error());
    }

    #[test]
    fn test_begin_search_enters_loading() {
        let mut view = SearchView::new();
        view.error = "old".to_string();
        view.set_query(" CrO* ");

        let ticket = view.begin_search().unwrap();

        assert!(view.loading);
        assert!(!view.can_submit());
        assert!(!view.has_error());
        assert_eq!(ticket.query, " CrO* ");
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut view = SearchView::new();
        view.set_query("Cr");
        let first = view.begin_search().unwrap();
        view.set_query("Fe");
        let second = view.begin_search().unwrap();
        assert!(second.generation() > first.generation());

        assert!(view.finish_search(&second, Ok(vec![record("mp-fe")])));
        assert!(!view.finish_search(&first, Ok(vec![record("mp-cr")])));

        assert_eq!(view.results, vec![record("mp-fe")]);
        assert!(!view.loading);
    }

    #[test]
    fn test_stale_result_does_not_end_newer_loading() {
        let mut view = SearchView::new();
        view.set_query("Cr");
        let first = view.begin_search().unwrap();
        let _second = view.begin_search().unwrap();

        assert!(!view.finish_search(&first, Err(RelayError::Decode("late".to_string()))));
        assert!(view.loading);
        assert!(!view.has_error());
    }
}
