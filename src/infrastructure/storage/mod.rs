pub mod local;

pub use local::JobStorage;
