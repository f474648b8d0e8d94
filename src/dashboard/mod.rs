//! Dashboard view state and its controller
//!
//! Split into logical modules for better maintainability

pub mod controller;
pub mod state;
pub mod updaters;
pub mod utils;

// Re-export main types and functions for external use
pub use controller::{AccountContext, DashboardController};
pub use utils::format_summary;
