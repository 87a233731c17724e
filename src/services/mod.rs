// Service module exports
// Block storage backends and configuration loading

pub mod block;
pub mod database;
pub mod memory;
pub mod settings;
pub mod store;
