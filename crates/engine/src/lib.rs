//! Catalog Engine library.
//!
//! Maintains per-category trees of attributes over a transactional store.
//!
//! ## Structure
//!
//! - `use_cases/` - Tree validation, mutation, and read operations
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
