//! Status words an external signer answers with.

use crate::OffchainError;

/// A structured refusal from the external signer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Rejection {
	/// The operator declined the request.
	UserCancel = 0x6985,
	InvalidMessageHeader = 0x6a81,
	InvalidMessageFormat = 0x6a82,
	InvalidMessageSize = 0x6a83,
	/// The signer lacks a capability the payload needs, such as blind signing.
	NotSupported = 0x6808,
}

impl Rejection {
	pub const fn status_word(self) -> u16 {
		self as u16
	}

	/// Whether the refusal came from a person rather than the payload.
	pub const fn is_user_decision(self) -> bool {
		matches!(self, Self::UserCancel)
	}
}

impl TryFrom<u16> for Rejection {
	type Error = u16;

	fn try_from(status: u16) -> Result<Self, Self::Error> {
		match status {
			0x6985 => Ok(Self::UserCancel),
			0x6a81 => Ok(Self::InvalidMessageHeader),
			0x6a82 => Ok(Self::InvalidMessageFormat),
			0x6a83 => Ok(Self::InvalidMessageSize),
			0x6808 => Ok(Self::NotSupported),
			other => Err(other),
		}
	}
}

impl core::fmt::Display for Rejection {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let reason = match self {
			Self::UserCancel => "user cancelled",
			Self::InvalidMessageHeader => "invalid message header",
			Self::InvalidMessageFormat => "invalid message format",
			Self::InvalidMessageSize => "message too long",
			Self::NotSupported => "not supported",
		};
		write!(f, "{reason} ({:#06x})", self.status_word())
	}
}

impl From<&OffchainError> for Rejection {
	fn from(error: &OffchainError) -> Self {
		match error {
			OffchainError::InvalidHeader(_) | OffchainError::TooManySigners { .. } => {
				Self::InvalidMessageHeader
			}
			OffchainError::MessageTooLong { .. } => Self::InvalidMessageSize,
			OffchainError::InvalidContent(_) => Self::InvalidMessageFormat,
			OffchainError::BlindSigningRequired => Self::NotSupported,
		}
	}
}
