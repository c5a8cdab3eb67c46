pub mod moderation_driver;

pub use moderation_driver::{ModerationDriver, RunSummary};
