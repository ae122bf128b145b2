pub mod runner;
pub mod scenario;
