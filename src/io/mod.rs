pub mod backend;
pub mod config_io;
pub mod store;
pub mod workspace_io;
