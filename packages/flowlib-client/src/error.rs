pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Search request failed: {0}")]
	Http(#[from] reqwest::Error),
	#[error("Search request failed with status {status}.")]
	Status { status: u16 },
	#[error("{message}")]
	Api { message: String },
	#[error("Search response could not be decoded: {0}")]
	Decode(#[from] serde_json::Error),
}
