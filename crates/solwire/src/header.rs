use bytemuck::Pod;
use bytemuck::Zeroable;

use crate::MessageError;

/// The three signature counts that open every serialized message.
///
/// The struct is `repr(C)` with single-byte fields so its in-memory layout is
/// exactly the 3-byte wire header.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct MessageHeader {
	pub num_required_signatures: u8,
	pub num_readonly_signed_accounts: u8,
	pub num_readonly_unsigned_accounts: u8,
}

impl MessageHeader {
	/// Serialized size of the header.
	pub const LEN: usize = size_of::<Self>();

	pub const fn new(
		num_required_signatures: u8,
		num_readonly_signed_accounts: u8,
		num_readonly_unsigned_accounts: u8,
	) -> Self {
		Self {
			num_required_signatures,
			num_readonly_signed_accounts,
			num_readonly_unsigned_accounts,
		}
	}

	/// Adds another instruction's declared counts, failing on the first field
	/// that no longer fits in a byte.
	pub fn checked_add(self, other: Self) -> Result<Self, MessageError> {
		let sum = |a: u8, b: u8, field: &'static str| {
			a.checked_add(b)
				.ok_or(MessageError::HeaderOverflow { field })
		};

		Ok(Self {
			num_required_signatures: sum(
				self.num_required_signatures,
				other.num_required_signatures,
				"num_required_signatures",
			)?,
			num_readonly_signed_accounts: sum(
				self.num_readonly_signed_accounts,
				other.num_readonly_signed_accounts,
				"num_readonly_signed_accounts",
			)?,
			num_readonly_unsigned_accounts: sum(
				self.num_readonly_unsigned_accounts,
				other.num_readonly_unsigned_accounts,
				"num_readonly_unsigned_accounts",
			)?,
		})
	}

	pub fn as_bytes(&self) -> &[u8] {
		bytemuck::bytes_of(self)
	}

	pub fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
		bytemuck::cast(bytes)
	}
}
