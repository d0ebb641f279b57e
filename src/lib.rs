// Library exports for the snake planner
// The server binary, the replay tool and the integration tests all build on these

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod planner;
pub mod replay;
pub mod search;
pub mod snapshot;
pub mod types;
