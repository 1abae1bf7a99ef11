//! Search View
//!
//! State model for the search form and the client it uses to reach the
//! relay. Rendered by the terminal UI and the `search` subcommand; the
//! browser page in [`crate::routes::ui`] mirrors the same behavior in script.

pub mod relay;
pub mod state;

pub use relay::{RelayClient, RelayError};
pub use state::{SearchTicket, SearchView, EMPTY_QUERY_MESSAGE};
