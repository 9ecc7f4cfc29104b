//! Logical instructions, before they are compiled against a key table.
//!
//! An [`Instruction`] knows its program id, the accounts it touches, its
//! encoded data and how much it adds to the [`MessageHeader`]. Known program
//! instructions get a dedicated variant; anything else goes through
//! [`CustomInstruction`].
//!
//! # Account metadata helpers
//!
//! The free functions [`writable_signer`], [`writable`], [`readonly_signer`],
//! and [`readonly`] produce [`AccountMeta`] values with the matching flags.

use solana_address::Address;
use solwire_sdk_ids::compute_budget;
use solwire_sdk_ids::system_program;

use crate::MessageError;
use crate::MessageHeader;
use crate::wire::WireReader;

/// One account referenced by an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AccountMeta {
	pub address: Address,
	pub is_signer: bool,
	pub is_writable: bool,
}

impl AccountMeta {
	pub const fn new(address: Address, is_signer: bool, is_writable: bool) -> Self {
		Self {
			address,
			is_signer,
			is_writable,
		}
	}
}

/// Creates an account that is both a signer and writable.
///
/// ```
/// use solwire::Address;
/// use solwire::writable_signer;
///
/// let address = Address::from([1u8; 32]);
/// let meta = writable_signer(&address);
/// assert!(meta.is_signer);
/// assert!(meta.is_writable);
/// ```
#[inline]
pub const fn writable_signer(address: &Address) -> AccountMeta {
	AccountMeta::new(*address, true, true)
}

/// Creates an account that is writable but not a signer.
#[inline]
pub const fn writable(address: &Address) -> AccountMeta {
	AccountMeta::new(*address, false, true)
}

/// Creates an account that is a signer but read-only.
#[inline]
pub const fn readonly_signer(address: &Address) -> AccountMeta {
	AccountMeta::new(*address, true, false)
}

/// Creates an account that is neither a signer nor writable.
#[inline]
pub const fn readonly(address: &Address) -> AccountMeta {
	AccountMeta::new(*address, false, false)
}

/// System program instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemInstruction {
	/// Move `lamports` from `from` to `to`.
	Transfer {
		from: Address,
		to: Address,
		lamports: u64,
	},
}

impl SystemInstruction {
	pub const TRANSFER: u32 = 0x02;

	fn accounts(&self) -> Vec<AccountMeta> {
		match self {
			Self::Transfer { from, to, .. } => vec![writable_signer(from), writable(to)],
		}
	}

	fn encode(&self) -> Vec<u8> {
		match self {
			Self::Transfer { lamports, .. } => {
				let mut data = Vec::with_capacity(12);
				data.extend_from_slice(&Self::TRANSFER.to_le_bytes());
				data.extend_from_slice(&lamports.to_le_bytes());
				data
			}
		}
	}

	const fn header_contribution(&self) -> MessageHeader {
		match self {
			Self::Transfer { .. } => MessageHeader::new(2, 0, 1),
		}
	}
}

/// Compute Budget program instructions.
///
/// Each encodes as a one byte discriminant followed by its little-endian
/// parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComputeBudgetInstruction {
	RequestUnits { units: u32, additional_fee: u32 },
	RequestHeapFrame { bytes: u32 },
	SetComputeUnitLimit { units: u32 },
	SetComputeUnitPrice { micro_lamports: u32 },
}

impl ComputeBudgetInstruction {
	pub const REQUEST_HEAP_FRAME: u8 = 0x01;
	pub const REQUEST_UNITS: u8 = 0x00;
	pub const SET_COMPUTE_UNIT_LIMIT: u8 = 0x02;
	pub const SET_COMPUTE_UNIT_PRICE: u8 = 0x03;

	pub const fn discriminant(&self) -> u8 {
		match self {
			Self::RequestUnits { .. } => Self::REQUEST_UNITS,
			Self::RequestHeapFrame { .. } => Self::REQUEST_HEAP_FRAME,
			Self::SetComputeUnitLimit { .. } => Self::SET_COMPUTE_UNIT_LIMIT,
			Self::SetComputeUnitPrice { .. } => Self::SET_COMPUTE_UNIT_PRICE,
		}
	}

	/// Parses instruction data produced by [`Instruction::encode`].
	///
	/// Parameters are read in encoding order. Bytes after the last parameter
	/// are ignored.
	pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
		let mut reader = WireReader::new(data);
		let too_short = || MessageError::ComputeBudgetDataTooShort { len: data.len() };
		let discriminant = reader.read_u8().ok_or_else(too_short)?;

		let instruction = match discriminant {
			Self::REQUEST_UNITS => {
				Self::RequestUnits {
					units: reader.read_u32().ok_or_else(too_short)?,
					additional_fee: reader.read_u32().ok_or_else(too_short)?,
				}
			}
			Self::REQUEST_HEAP_FRAME => {
				Self::RequestHeapFrame {
					bytes: reader.read_u32().ok_or_else(too_short)?,
				}
			}
			Self::SET_COMPUTE_UNIT_LIMIT => {
				Self::SetComputeUnitLimit {
					units: reader.read_u32().ok_or_else(too_short)?,
				}
			}
			Self::SET_COMPUTE_UNIT_PRICE => {
				Self::SetComputeUnitPrice {
					micro_lamports: reader.read_u32().ok_or_else(too_short)?,
				}
			}
			discriminant => {
				return Err(MessageError::UnknownComputeBudgetInstruction { discriminant });
			}
		};

		if reader.remaining() > 0 {
			log!(
				trace,
				"ignoring {} trailing compute budget data bytes",
				reader.remaining()
			);
		}

		Ok(instruction)
	}

	fn encode(&self) -> Vec<u8> {
		let mut data = vec![self.discriminant()];
		match self {
			Self::RequestUnits {
				units,
				additional_fee,
			} => {
				data.extend_from_slice(&units.to_le_bytes());
				data.extend_from_slice(&additional_fee.to_le_bytes());
			}
			Self::RequestHeapFrame { bytes } => data.extend_from_slice(&bytes.to_le_bytes()),
			Self::SetComputeUnitLimit { units } => data.extend_from_slice(&units.to_le_bytes()),
			Self::SetComputeUnitPrice { micro_lamports } => {
				data.extend_from_slice(&micro_lamports.to_le_bytes());
			}
		}
		data
	}

	const fn header_contribution(&self) -> MessageHeader {
		match self {
			Self::RequestUnits { .. } | Self::RequestHeapFrame { .. } => MessageHeader::new(0, 0, 0),
			Self::SetComputeUnitLimit { .. } | Self::SetComputeUnitPrice { .. } => {
				MessageHeader::new(0, 0, 1)
			}
		}
	}
}

/// An instruction for a program without a dedicated variant.
///
/// The caller declares the header counts it contributes; they are summed
/// as-is and never derived from `accounts`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomInstruction {
	pub program_id: Address,
	pub accounts: Vec<AccountMeta>,
	pub data: Vec<u8>,
	pub header: MessageHeader,
}

/// A logical instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
	System(SystemInstruction),
	ComputeBudget(ComputeBudgetInstruction),
	Custom(CustomInstruction),
}

impl Instruction {
	pub const fn transfer(from: Address, to: Address, lamports: u64) -> Self {
		Self::System(SystemInstruction::Transfer { from, to, lamports })
	}

	pub const fn set_compute_unit_limit(units: u32) -> Self {
		Self::ComputeBudget(ComputeBudgetInstruction::SetComputeUnitLimit { units })
	}

	pub const fn set_compute_unit_price(micro_lamports: u32) -> Self {
		Self::ComputeBudget(ComputeBudgetInstruction::SetComputeUnitPrice { micro_lamports })
	}

	pub const fn request_heap_frame(bytes: u32) -> Self {
		Self::ComputeBudget(ComputeBudgetInstruction::RequestHeapFrame { bytes })
	}

	pub const fn request_units(units: u32, additional_fee: u32) -> Self {
		Self::ComputeBudget(ComputeBudgetInstruction::RequestUnits {
			units,
			additional_fee,
		})
	}

	pub const fn program_id(&self) -> Address {
		match self {
			Self::System(_) => system_program::ID,
			Self::ComputeBudget(_) => compute_budget::ID,
			Self::Custom(custom) => custom.program_id,
		}
	}

	pub fn accounts(&self) -> Vec<AccountMeta> {
		match self {
			Self::System(ix) => ix.accounts(),
			Self::ComputeBudget(_) => Vec::new(),
			Self::Custom(custom) => custom.accounts.clone(),
		}
	}

	/// Encodes the instruction data, discriminant first.
	pub fn encode(&self) -> Vec<u8> {
		match self {
			Self::System(ix) => ix.encode(),
			Self::ComputeBudget(ix) => ix.encode(),
			Self::Custom(custom) => custom.data.clone(),
		}
	}

	/// The counts this instruction adds to the message header.
	pub const fn header_contribution(&self) -> MessageHeader {
		match self {
			Self::System(ix) => ix.header_contribution(),
			Self::ComputeBudget(ix) => ix.header_contribution(),
			Self::Custom(custom) => custom.header,
		}
	}
}

impl From<SystemInstruction> for Instruction {
	fn from(ix: SystemInstruction) -> Self {
		Self::System(ix)
	}
}

impl From<ComputeBudgetInstruction> for Instruction {
	fn from(ix: ComputeBudgetInstruction) -> Self {
		Self::ComputeBudget(ix)
	}
}

impl From<CustomInstruction> for Instruction {
	fn from(ix: CustomInstruction) -> Self {
		Self::Custom(ix)
	}
}
