// The http module is the web adapter: routing, session resolution and the
// mapping from core outcomes to status codes. No business logic lives here.

#[path = "app.rs"]
pub mod app;

#[path = "auth.rs"]
mod auth;

#[path = "error.rs"]
pub mod error;

#[path = "routes/mod.rs"]
mod routes;

pub use app::{build_router, AppState};
