pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Storage(#[from] flowlib_storage::Error),
	#[error("Index build failed: {message}")]
	IndexBuild { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
}
