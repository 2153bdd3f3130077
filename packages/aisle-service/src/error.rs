pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Upstream unavailable: {message}")]
	UpstreamUnavailable { message: String },
}
impl From<aisle_storage::Error> for Error {
	fn from(err: aisle_storage::Error) -> Self {
		match err {
			aisle_storage::Error::InvalidPath(message) => Self::InvalidRequest { message },
			aisle_storage::Error::Io(inner) => Self::Storage { message: inner.to_string() },
		}
	}
}

impl From<aisle_providers::Error> for Error {
	fn from(err: aisle_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
