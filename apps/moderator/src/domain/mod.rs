pub mod comment;
pub mod errors;
pub mod ledger;
