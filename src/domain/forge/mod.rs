pub mod error;
pub mod progress;
pub mod service;

pub use error::ForgeServiceError;
pub use progress::{ProgressLog, ScheduledLines};
pub use service::{ForgeOutcome, ForgeService, ForgeServiceApi};
