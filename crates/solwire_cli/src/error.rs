use solwire::MessageError;
use solwire::OffchainError;
use solwire::Rejection;
use solwire::VerifyError;

/// Errors surfaced by the `solwire` command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
	#[error("`{value}` is not a valid base58 address")]
	InvalidAddress { value: String },

	#[error("`{value}` is not valid base58: {source}")]
	InvalidBase58 {
		value: String,
		source: bs58::decode::Error,
	},

	#[error("{field} must be 32 bytes, got {len}")]
	InvalidLength { field: &'static str, len: usize },

	#[error(transparent)]
	Message(#[from] MessageError),

	#[error("{source} [{rejection}]")]
	Offchain {
		source: OffchainError,
		rejection: Rejection,
	},

	#[error(transparent)]
	Verify(#[from] VerifyError),

	#[error("Failed to serialize JSON output: {0}")]
	Json(#[from] serde_json::Error),
}

impl From<OffchainError> for CliError {
	fn from(source: OffchainError) -> Self {
		let rejection = Rejection::from(&source);
		Self::Offchain { source, rejection }
	}
}

impl CliError {
	/// Process exit code for this error.
	pub fn exit_code(&self) -> i32 {
		match self {
			Self::InvalidAddress { .. }
			| Self::InvalidBase58 { .. }
			| Self::InvalidLength { .. } => 2,
			Self::Verify(_) => 3,
			Self::Message(_) | Self::Offchain { .. } | Self::Json(_) => 1,
		}
	}
}
