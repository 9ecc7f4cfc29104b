//! Message compilation and the legacy wire layout.
//!
//! ```text
//! header (3) | key count (1) | keys (32 each) | blockhash (32)
//! | instruction count (1) | instructions
//! instruction = program index (1) | account count (1) | indices (1 each)
//!             | data length (1) | data
//! ```
//!
//! Every count is a single byte. All limits are checked before the first byte
//! is written, so a failed call never yields a partial message.

use solana_address::Address;

use crate::AccountKeys;
use crate::Instruction;
use crate::MessageError;
use crate::MessageHeader;
use crate::wire::WireReader;
use crate::wire::u8_len;

/// A recent blockhash, as raw bytes.
pub type Blockhash = [u8; 32];

/// Blockhash used when building a message offline. It encodes as
/// `11111111111111111111111111111111` in base58; a live value must replace it
/// before the message is submitted anywhere.
pub const PLACEHOLDER_BLOCKHASH: Blockhash = [0u8; 32];

/// An instruction rewritten against the key table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledInstruction {
	/// Index of the program id in the key table.
	pub program_id_index: u8,
	/// Indices of the instruction's writable accounts, in their original order.
	pub accounts: Vec<u8>,
	pub data: Vec<u8>,
}

impl CompiledInstruction {
	fn serialized_len(&self) -> usize {
		3 + self.accounts.len() + self.data.len()
	}

	pub fn program_id<'a>(&self, keys: &'a AccountKeys) -> Option<&'a Address> {
		keys.get(self.program_id_index)
	}
}

/// A compiled message, ready to be serialized and handed to a signer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
	header: MessageHeader,
	account_keys: AccountKeys,
	recent_blockhash: Blockhash,
	instructions: Vec<CompiledInstruction>,
}

impl Message {
	/// Compiles `instructions` with [`PLACEHOLDER_BLOCKHASH`].
	pub fn new(instructions: &[Instruction]) -> Result<Self, MessageError> {
		Self::compile(instructions, PLACEHOLDER_BLOCKHASH)
	}

	/// Compiles `instructions` in order against a freshly built key table.
	pub fn compile(
		instructions: &[Instruction],
		recent_blockhash: Blockhash,
	) -> Result<Self, MessageError> {
		if instructions.len() > usize::from(u8::MAX) {
			return Err(MessageError::TooManyInstructions {
				count: instructions.len(),
			});
		}

		let (account_keys, header) = AccountKeys::compile(instructions)?;
		let compiled = instructions
			.iter()
			.enumerate()
			.map(|(index, instruction)| compile_instruction(&account_keys, index, instruction))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Self {
			header,
			account_keys,
			recent_blockhash,
			instructions: compiled,
		})
	}

	pub fn header(&self) -> &MessageHeader {
		&self.header
	}

	pub fn account_keys(&self) -> &AccountKeys {
		&self.account_keys
	}

	pub fn recent_blockhash(&self) -> &Blockhash {
		&self.recent_blockhash
	}

	pub fn instructions(&self) -> &[CompiledInstruction] {
		&self.instructions
	}

	/// Size of [`Message::serialize`]'s output.
	pub fn serialized_len(&self) -> usize {
		MessageHeader::LEN
			+ 1 + 32 * self.account_keys.len()
			+ 32 + 1
			+ self
				.instructions
				.iter()
				.map(CompiledInstruction::serialized_len)
				.sum::<usize>()
	}

	/// Encodes the message in the legacy wire layout.
	pub fn serialize(&self) -> Result<Vec<u8>, MessageError> {
		let key_count = u8_len(self.account_keys.len()).ok_or(MessageError::TooManyAccountKeys {
			count: self.account_keys.len(),
		})?;
		let instruction_count =
			u8_len(self.instructions.len()).ok_or(MessageError::TooManyInstructions {
				count: self.instructions.len(),
			})?;
		let prefixes = self
			.instructions
			.iter()
			.enumerate()
			.map(|(index, ix)| {
				let accounts = u8_len(ix.accounts.len()).ok_or(
					MessageError::TooManyInstructionAccounts {
						index,
						count: ix.accounts.len(),
					},
				)?;
				let data = u8_len(ix.data.len()).ok_or(MessageError::InstructionDataTooLong {
					index,
					len: ix.data.len(),
				})?;
				Ok((accounts, data))
			})
			.collect::<Result<Vec<_>, MessageError>>()?;

		let mut out = Vec::with_capacity(self.serialized_len());
		out.extend_from_slice(self.header.as_bytes());
		out.push(key_count);
		for key in &self.account_keys {
			out.extend_from_slice(key.as_ref());
		}
		out.extend_from_slice(&self.recent_blockhash);
		out.push(instruction_count);
		for (ix, (account_count, data_len)) in self.instructions.iter().zip(prefixes) {
			out.push(ix.program_id_index);
			out.push(account_count);
			out.extend_from_slice(&ix.accounts);
			out.push(data_len);
			out.extend_from_slice(&ix.data);
		}

		Ok(out)
	}

	/// Parses the legacy wire layout produced by [`Message::serialize`].
	///
	/// Every index must fall inside the key table and no bytes may follow the
	/// last instruction.
	pub fn deserialize(bytes: &[u8]) -> Result<Self, MessageError> {
		let mut reader = WireReader::new(bytes);
		let truncated = |reader: &WireReader<'_>, context| {
			MessageError::Truncated {
				offset: reader.offset(),
				context,
			}
		};

		let header = reader
			.read_array::<{ MessageHeader::LEN }>()
			.map(MessageHeader::from_bytes)
			.ok_or_else(|| truncated(&reader, "header"))?;

		let key_count = reader
			.read_u8()
			.ok_or_else(|| truncated(&reader, "account key count"))?;
		let mut keys = Vec::with_capacity(usize::from(key_count));
		for _ in 0..key_count {
			let key = reader
				.read_array::<32>()
				.ok_or_else(|| truncated(&reader, "account key"))?;
			keys.push(Address::from(key));
		}

		let recent_blockhash = reader
			.read_array::<32>()
			.ok_or_else(|| truncated(&reader, "recent blockhash"))?;

		let instruction_count = reader
			.read_u8()
			.ok_or_else(|| truncated(&reader, "instruction count"))?;
		let mut instructions = Vec::with_capacity(usize::from(instruction_count));
		for index in 0..usize::from(instruction_count) {
			let program_id_index = reader
				.read_u8()
				.ok_or_else(|| truncated(&reader, "program id index"))?;
			let account_count = reader
				.read_u8()
				.ok_or_else(|| truncated(&reader, "account index count"))?;
			let accounts = reader
				.take(usize::from(account_count))
				.ok_or_else(|| truncated(&reader, "account indices"))?
				.to_vec();
			let data_len = reader
				.read_u8()
				.ok_or_else(|| truncated(&reader, "data length"))?;
			let data = reader
				.take(usize::from(data_len))
				.ok_or_else(|| truncated(&reader, "instruction data"))?
				.to_vec();

			if let Some(&bad) = core::iter::once(&program_id_index)
				.chain(&accounts)
				.find(|&&i| usize::from(i) >= keys.len())
			{
				return Err(MessageError::IndexOutOfRange {
					instruction: index,
					index: bad,
					len: keys.len(),
				});
			}

			instructions.push(CompiledInstruction {
				program_id_index,
				accounts,
				data,
			});
		}

		if reader.remaining() > 0 {
			return Err(MessageError::TrailingBytes {
				count: reader.remaining(),
			});
		}

		// Writable keys are exactly the ones referenced as instruction accounts,
		// and they form the prefix of the table.
		let num_writable = instructions
			.iter()
			.flat_map(|ix| ix.accounts.iter())
			.max()
			.map_or(0, |&max| usize::from(max) + 1);

		Ok(Self {
			header,
			account_keys: AccountKeys::from_parts(keys, num_writable),
			recent_blockhash,
			instructions,
		})
	}
}

fn compile_instruction(
	keys: &AccountKeys,
	index: usize,
	instruction: &Instruction,
) -> Result<CompiledInstruction, MessageError> {
	let program_id = instruction.program_id();
	let program_id_index = keys
		.position(&program_id)
		.ok_or(MessageError::InvalidProgramReference { program_id })?;

	let accounts = instruction
		.accounts()
		.into_iter()
		.filter(|meta| meta.is_writable)
		.map(|meta| {
			keys.position(&meta.address)
				.ok_or(MessageError::InvalidAccountReference {
					address: meta.address,
				})
		})
		.collect::<Result<Vec<_>, _>>()?;
	if accounts.len() > usize::from(u8::MAX) {
		return Err(MessageError::TooManyInstructionAccounts {
			index,
			count: accounts.len(),
		});
	}

	let data = instruction.encode();
	if data.len() > usize::from(u8::MAX) {
		return Err(MessageError::InstructionDataTooLong {
			index,
			len: data.len(),
		});
	}

	Ok(CompiledInstruction {
		program_id_index,
		accounts,
		data,
	})
}
