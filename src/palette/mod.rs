pub mod analyze;
pub mod builder;
pub mod unify;
