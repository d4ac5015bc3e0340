pub mod error;
pub mod pool;
pub mod registry;
pub mod store;

pub use error::StoreError;
pub use registry::LockRegistry;
