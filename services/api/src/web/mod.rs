pub mod auth;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;

// Re-export the handlers the binary wires into the router.
pub use middleware::require_auth;
pub use rest::{export_paper_handler, generate_paper_handler, list_papers_handler};
