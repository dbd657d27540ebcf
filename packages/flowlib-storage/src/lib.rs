pub mod dataset;
pub mod identity;
pub mod store;

mod error;

pub use error::Error;
pub use identity::DatasetIdentity;
pub use store::{CorpusSnapshot, RecordStore};

pub type Result<T, E = Error> = std::result::Result<T, E>;
