pub mod cli;
pub mod companies;
pub mod config;
pub mod orchestrator;
pub mod render;
pub mod report;
pub mod sections;
pub mod service;
pub mod util;
