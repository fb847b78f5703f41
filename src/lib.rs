pub mod app_state;
pub mod classifier;
pub mod error;
pub mod io_struct;
pub mod preprocess;
pub mod server;
