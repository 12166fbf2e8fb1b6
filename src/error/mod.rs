mod types;

pub use types::{RelockError, Result};

// Re-export for convenience
pub use RelockError as Error;
