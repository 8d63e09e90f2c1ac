pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Forbidden: {message}")]
	Forbidden { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub(crate) fn invalid(message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into() }
	}

	pub(crate) fn not_found(message: impl Into<String>) -> Self {
		Self::NotFound { message: message.into() }
	}
}

impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<scrmbld_storage::Error> for Error {
	fn from(err: scrmbld_storage::Error) -> Self {
		match err {
			scrmbld_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			scrmbld_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			scrmbld_storage::Error::NotFound(message) => Self::NotFound { message },
			scrmbld_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}
