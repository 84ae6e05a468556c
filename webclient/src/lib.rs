// exported modules
pub mod error;
pub mod model;
pub mod poll;

// client impls
pub mod gradeserver;

// re-exports
pub use error::*;
pub use gradeserver::GradeServerClient;
pub use model::*;
pub use poll::{JobStatusPoller, PollEnd, PollHandle, PollState, POLL_INTERVAL};

use std::sync::Arc;

pub fn new_client(base_url: Url, auth_token: Option<String>) -> Arc<dyn Client> {
    let mut cli = GradeServerClient::new(base_url);
    if let Some(token) = auth_token {
        cli = cli.with_auth_token(token);
    }
    Arc::new(cli)
}
