use solana_address::Address;

/// Errors produced while compiling, serializing or parsing a [`Message`].
///
/// [`Message`]: crate::Message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum MessageError {
	#[error("program id {program_id:?} is not present in the account key table")]
	InvalidProgramReference { program_id: Address },

	#[error("account {address:?} is not present in the account key table")]
	InvalidAccountReference { address: Address },

	#[error("{count} account keys exceed the single-byte table limit of 255")]
	TooManyAccountKeys { count: usize },

	#[error("{count} instructions exceed the single-byte limit of 255")]
	TooManyInstructions { count: usize },

	#[error("instruction {index} references {count} accounts, the limit is 255")]
	TooManyInstructionAccounts { index: usize, count: usize },

	#[error("instruction {index} carries {len} data bytes, the limit is 255")]
	InstructionDataTooLong { index: usize, len: usize },

	#[error("header field `{field}` overflows a single byte")]
	HeaderOverflow { field: &'static str },

	#[error("message ended after {offset} bytes while reading {context}")]
	Truncated {
		offset: usize,
		context: &'static str,
	},

	#[error("{count} unexpected bytes after the last instruction")]
	TrailingBytes { count: usize },

	#[error("instruction {instruction} uses index {index} but the table holds {len} keys")]
	IndexOutOfRange {
		instruction: usize,
		index: u8,
		len: usize,
	},

	#[error("unknown compute budget instruction {discriminant}")]
	UnknownComputeBudgetInstruction { discriminant: u8 },

	#[error("compute budget instruction data is too short ({len} bytes)")]
	ComputeBudgetDataTooShort { len: usize },
}

/// Why an offchain envelope header was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HeaderFault {
	SigningDomain,
	UnsupportedVersion(u8),
	UnsupportedFormat(u8),
	NoSigners,
	EmptyMessage,
	/// The length field disagrees with the number of bytes that follow it.
	LengthMismatch { declared: u16 },
	Truncated,
	SignerNotListed,
}

impl core::fmt::Display for HeaderFault {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Self::SigningDomain => f.write_str("missing offchain signing domain"),
			Self::UnsupportedVersion(version) => write!(f, "unsupported version {version}"),
			Self::UnsupportedFormat(format) => write!(f, "unsupported message format {format}"),
			Self::NoSigners => f.write_str("signer list is empty"),
			Self::EmptyMessage => f.write_str("message body is empty"),
			Self::LengthMismatch { declared } => {
				write!(f, "declared length {declared} does not match the message body")
			}
			Self::Truncated => f.write_str("header is truncated"),
			Self::SignerNotListed => f.write_str("requesting signer is not in the signer list"),
		}
	}
}

/// Why an offchain body does not match its declared format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentFault {
	/// The body contains non-ASCII bytes but the format is `RestrictedAscii`.
	NotAscii,
	/// The body is not valid UTF-8.
	NotUtf8,
}

impl core::fmt::Display for ContentFault {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Self::NotAscii => f.write_str("body is not 7-bit ascii"),
			Self::NotUtf8 => f.write_str("body is not valid utf-8"),
		}
	}
}

/// Errors produced by the offchain message codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum OffchainError {
	#[error("invalid offchain message header: {0}")]
	InvalidHeader(HeaderFault),

	#[error("offchain message is {len} bytes, the maximum is {max}")]
	MessageTooLong { len: usize, max: usize },

	#[error("invalid offchain message content: {0}")]
	InvalidContent(ContentFault),

	#[error("utf-8 offchain messages require blind signing to be enabled")]
	BlindSigningRequired,

	#[error("{count} signers exceed the single-byte limit of 255")]
	TooManySigners { count: usize },
}

impl From<HeaderFault> for OffchainError {
	fn from(fault: HeaderFault) -> Self {
		Self::InvalidHeader(fault)
	}
}

/// Errors produced while checking an ed25519 signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
	#[error("signature must be 64 bytes, got {len}")]
	InvalidSignatureLength { len: usize },

	#[error("public key is not a valid ed25519 point")]
	InvalidPublicKey,

	#[error("signature does not match the message")]
	InvalidSignature,
}
