pub mod mode;
pub mod runner;
