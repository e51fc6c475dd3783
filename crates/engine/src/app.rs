//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, TaxonomyRepo};
use crate::use_cases;

/// Main application state.
///
/// Holds the use cases wired to one store and one clock.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub taxonomy: use_cases::TaxonomyUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(repo: Arc<dyn TaxonomyRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            use_cases: UseCases {
                taxonomy: use_cases::TaxonomyUseCases::new(repo, clock),
            },
        }
    }
}
