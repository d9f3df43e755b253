//! Command implementations

pub mod batch;
pub mod mirror;

pub use batch::run_batch;
pub use mirror::run_mirror;
