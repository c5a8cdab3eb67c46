pub mod evaluate_comment;
