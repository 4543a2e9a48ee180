pub mod ai;
pub mod api;
pub mod cli;
pub mod core;
pub mod gemini;
pub mod planner;
