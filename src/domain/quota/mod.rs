pub mod counter;
pub mod gate;

pub use counter::{Decision, QuotaState, UsageCounter, UsagePhase};
pub use gate::UsageGate;

/// Canonical quota pool for the image forge demo
pub const FORGE_FEATURE_KEY: &str = "cvp_forge_usage";
pub const DEFAULT_FORGE_LIMIT: u32 = 2;
