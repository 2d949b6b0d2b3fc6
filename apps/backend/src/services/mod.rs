pub mod actions;
pub mod games;
