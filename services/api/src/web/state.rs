//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use questify_core::ports::{PaperGenerator, PaperStore};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PaperStore>,
    /// `None` when no generation credential was configured at startup.
    /// The generate endpoint reports that per request instead of the
    /// whole service refusing to boot.
    pub generator: Option<Arc<dyn PaperGenerator>>,
    pub config: Arc<Config>,
}
