pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Local store and setup failures. Remote failures only surface here from remote-only
/// operations such as locking.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Io(#[from] std::io::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	Remote(#[from] RemoteError),
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Classification of a failed call against the remote note store.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
	/// The remote could not be reached: offline, refused, timed out, or a gateway failure.
	#[error("Remote unreachable: {message}")]
	Unreachable { message: String },
	/// The remote answered and refused the request.
	#[error("Remote rejected the request with status {status}: {message}")]
	Rejected { status: u16, message: String },
	#[error("Remote error: {message}")]
	Unknown { message: String },
}
