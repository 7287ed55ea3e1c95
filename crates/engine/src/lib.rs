//! Cyoa engine library.
//!
//! ## Structure
//!
//! - `use_cases/` - Story navigation and management orchestration
//! - `infrastructure/` - Ports and their SQLite adapters, clock, configuration
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
