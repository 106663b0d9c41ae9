pub mod host_store;

pub use host_store::{HostStore, StoreError};
