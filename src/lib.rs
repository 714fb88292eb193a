pub mod config;
pub mod error;
pub mod reference;
pub mod solver;
