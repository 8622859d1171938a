//! Admin panel for the shorturl service.
//!
//! [`AdminPanel`] fetches the mapping list from an [`AdminApi`] backend,
//! projects it into table rows for a [`View`], and turns operator actions
//! (create, delete) into backend calls followed by a refresh.
//!
//! # Example
//!
//! ```rust,no_run
//! use shorturl_client::HttpAdminClient;
//! use shorturl_core::ApiVariant;
//! use shorturl_panel::{AdminPanel, HtmlTableView, InitOutcome, SessionConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = SessionConfig::from_page_url(
//!     "http://short.example:8081/?apikey=secret",
//!     ApiVariant::V1,
//! )?;
//! let client = HttpAdminClient::new(
//!     "http://short.example:8081/",
//!     session.variant.clone(),
//!     session.api_key.clone(),
//! )?;
//! let panel = AdminPanel::new(session, client, HtmlTableView::new());
//!
//! if panel.initialize().await? == InitOutcome::Active {
//!     println!("{}", panel.view().markup());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`AdminApi`]: shorturl_core::AdminApi

pub mod error;
pub mod html;
pub mod listeners;
pub mod panel;
pub mod session;
pub mod view;

pub use error::SessionError;
pub use html::HtmlTableView;
pub use listeners::{Listener, Listeners};
pub use panel::{AdminPanel, Dispatch, InitOutcome, PanelEvent, UNAUTHORIZED_ALERT};
pub use session::SessionConfig;
pub use view::{Link, TableRow, View};
