//! Backend clients implementing [`AdminApi`](shorturl_core::AdminApi).

pub mod http;
pub mod memory;

pub use http::{HttpAdminClient, API_KEY_HEADER};
pub use memory::InMemoryAdminApi;
