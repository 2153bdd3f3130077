pub mod blob;
pub mod fs;
pub mod memory;

mod error;

pub use blob::{BlobEntry, BlobStore, BoxFuture, latest};
pub use error::Error;
pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;

pub type Result<T, E = Error> = std::result::Result<T, E>;
