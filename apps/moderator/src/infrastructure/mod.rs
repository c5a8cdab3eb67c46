pub mod classifiers;
pub mod persistence;
pub mod security;
pub mod youtube;
