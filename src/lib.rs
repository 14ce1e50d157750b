pub mod api;
pub mod application;
pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod generator;
pub mod io;
pub mod storage;

pub use domain::*;
pub use storage::Repository;
