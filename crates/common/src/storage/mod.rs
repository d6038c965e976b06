//! Cross-process coordinated storage
//!
//! Small JSON documents shared between every process that runs the REST
//! client against the same cache directory. Access is serialized with OS
//! advisory locks so no reader ever observes a half-written document.

pub mod coordinated;
pub mod error;

pub use coordinated::CoordinatedFile;
pub use error::{StorageError, StorageResult};
