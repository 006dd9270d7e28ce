// Clippy allows for reasonable defaults
// These suppress warnings where the suggested change doesn't improve readability
#![allow(clippy::new_without_default)] // Default not always appropriate for stateful types
#![allow(clippy::derivable_impls)] // Explicit Default impls can be clearer
#![allow(clippy::unnecessary_map_or)] // map_or can be clearer than alternatives
#![allow(clippy::redundant_closure)] // |x| f(x) can be clearer than f
#![allow(clippy::unwrap_or_default)] // unwrap_or_else(Default::default) can be clearer

// Module declarations
pub mod client;
pub mod config;
pub mod models;
pub mod presentation;
pub mod render;
pub mod report;
pub mod session;
pub mod shutdown;
mod utils;

// Re-export the types most callers need
pub use client::{BackendError, HttpSearchBackend, SearchBackend};
pub use models::*;
pub use presentation::{Presenter, TerminalPresenter};
pub use render::{build_view, render_text, HtmlRenderer, ResultsView, ViewBlock};
pub use session::{SearchError, SearchSessionController, DEFAULT_POLL_INTERVAL};
pub use utils::{app_dir, default_config_path};
