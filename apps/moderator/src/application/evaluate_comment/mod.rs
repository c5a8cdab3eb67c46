pub mod dto;
pub mod use_case;

pub use dto::Thresholds;
pub use use_case::DecisionEngine;
