pub mod file_ops;
pub mod logging;

pub use logging::init_logger;
