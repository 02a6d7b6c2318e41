mod error;
mod handlers;
mod router;
mod types;

pub use handlers::grid::mature_click;
pub use router::handle_request;
pub use types::{AppState, Request};
