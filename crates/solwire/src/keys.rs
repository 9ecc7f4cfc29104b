//! Account key table construction.
//!
//! The table has two partitions: every writable account in first-seen order,
//! then every program id in first-seen order. Both are deduplicated. A key that
//! is a program id for one instruction and a writable account for another is
//! kept once, in the writable partition.
//!
//! Accounts that are neither writable nor a program id do not enter the
//! table, and are not compiled into instruction account indices.

use solana_address::Address;

use crate::Instruction;
use crate::MessageError;
use crate::MessageHeader;

/// Largest table addressable by a single-byte index.
pub const MAX_ACCOUNT_KEYS: usize = u8::MAX as usize;

/// The deduplicated, ordered key table of a message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountKeys {
	keys: Vec<Address>,
	num_writable: usize,
}

impl AccountKeys {
	/// Builds the key table and the summed header for `instructions`.
	///
	/// The header is the sum of each instruction's declared contribution. It is
	/// not derived from the table contents.
	pub fn compile(instructions: &[Instruction]) -> Result<(Self, MessageHeader), MessageError> {
		let mut writable: Vec<Address> = Vec::new();
		let mut readonly: Vec<Address> = Vec::new();
		let mut header = MessageHeader::default();

		for instruction in instructions {
			push_unique(&mut readonly, instruction.program_id());
			header = header.checked_add(instruction.header_contribution())?;

			for meta in instruction.accounts() {
				if meta.is_writable {
					push_unique(&mut writable, meta.address);
				} else {
					log!(
						trace,
						"readonly account {:?} left out of the key table",
						meta.address
					);
				}
			}
		}

		let before = readonly.len();
		readonly.retain(|key| !writable.contains(key));
		if readonly.len() != before {
			log!(
				debug,
				"{} program id(s) also writable, kept in the writable partition",
				before - readonly.len()
			);
		}

		let num_writable = writable.len();
		let mut keys = writable;
		keys.extend(readonly);

		if keys.len() > MAX_ACCOUNT_KEYS {
			return Err(MessageError::TooManyAccountKeys { count: keys.len() });
		}

		log!(
			debug,
			"compiled {} account keys ({} writable) from {} instructions",
			keys.len(),
			num_writable,
			instructions.len()
		);

		Ok((Self { keys, num_writable }, header))
	}

	/// Position of `address` in the table.
	pub fn position(&self, address: &Address) -> Option<u8> {
		self.keys
			.iter()
			.position(|key| key == address)
			.and_then(|index| u8::try_from(index).ok())
	}

	pub fn get(&self, index: u8) -> Option<&Address> {
		self.keys.get(usize::from(index))
	}

	pub fn len(&self) -> usize {
		self.keys.len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	/// Number of keys in the writable partition.
	pub fn num_writable(&self) -> usize {
		self.num_writable
	}

	pub fn writable(&self) -> &[Address] {
		&self.keys[..self.num_writable]
	}

	pub fn readonly(&self) -> &[Address] {
		&self.keys[self.num_writable..]
	}

	pub fn as_slice(&self) -> &[Address] {
		&self.keys
	}

	pub fn iter(&self) -> core::slice::Iter<'_, Address> {
		self.keys.iter()
	}

	pub(crate) fn from_parts(keys: Vec<Address>, num_writable: usize) -> Self {
		Self { keys, num_writable }
	}
}

impl<'a> IntoIterator for &'a AccountKeys {
	type IntoIter = core::slice::Iter<'a, Address>;
	type Item = &'a Address;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

fn push_unique(set: &mut Vec<Address>, address: Address) {
	if !set.contains(&address) {
		set.push(address);
	}
}

#[cfg(test)]
mod tests {
	use solwire_sdk_ids::compute_budget;
	use solwire_sdk_ids::system_program;

	use super::*;
	use crate::CustomInstruction;
	use crate::readonly;
	use crate::writable;

	fn key(byte: u8) -> Address {
		Address::from([byte; 32])
	}

	#[test]
	fn writable_before_program_ids() {
		let instructions = [
			Instruction::set_compute_unit_limit(1),
			Instruction::transfer(key(1), key(2), 10),
		];
		let (keys, header) = AccountKeys::compile(&instructions)
			.unwrap_or_else(|e| panic!("compile failed: {e}"));

		assert_eq!(
			keys.as_slice(),
			&[key(1), key(2), compute_budget::ID, system_program::ID]
		);
		assert_eq!(keys.num_writable(), 2);
		assert_eq!(header, MessageHeader::new(2, 0, 2));
	}

	#[test]
	fn duplicates_collapse_to_first_occurrence() {
		let instructions = [
			Instruction::transfer(key(1), key(2), 10),
			Instruction::transfer(key(2), key(1), 10),
			Instruction::transfer(key(3), key(1), 10),
		];
		let (keys, header) = AccountKeys::compile(&instructions)
			.unwrap_or_else(|e| panic!("compile failed: {e}"));

		assert_eq!(keys.writable(), &[key(1), key(2), key(3)]);
		assert_eq!(keys.readonly(), &[system_program::ID]);
		assert_eq!(header, MessageHeader::new(6, 0, 3));
	}

	#[test]
	fn writable_wins_over_program_id() {
		let program = key(9);
		let instructions = [
			Instruction::Custom(CustomInstruction {
				program_id: program,
				accounts: vec![],
				data: vec![],
				header: MessageHeader::default(),
			}),
			Instruction::Custom(CustomInstruction {
				program_id: key(8),
				accounts: vec![writable(&program)],
				data: vec![],
				header: MessageHeader::default(),
			}),
		];
		let (keys, _) = AccountKeys::compile(&instructions)
			.unwrap_or_else(|e| panic!("compile failed: {e}"));

		assert_eq!(keys.writable(), &[program]);
		assert_eq!(keys.readonly(), &[key(8)]);
		assert_eq!(keys.position(&program), Some(0));
	}

	#[test]
	fn readonly_accounts_are_left_out() {
		let instructions = [Instruction::Custom(CustomInstruction {
			program_id: key(7),
			accounts: vec![readonly(&key(5)), writable(&key(6))],
			data: vec![1],
			header: MessageHeader::default(),
		})];
		let (keys, _) = AccountKeys::compile(&instructions)
			.unwrap_or_else(|e| panic!("compile failed: {e}"));

		assert_eq!(keys.as_slice(), &[key(6), key(7)]);
		assert_eq!(keys.position(&key(5)), None);
	}

	#[test]
	fn empty_instruction_list() {
		let (keys, header) =
			AccountKeys::compile(&[]).unwrap_or_else(|e| panic!("compile failed: {e}"));
		assert!(keys.is_empty());
		assert_eq!(header, MessageHeader::default());
	}

	#[test]
	fn rejects_more_than_255_keys() {
		let accounts = (0..=255u8).map(|b| writable(&key(b))).collect();
		let instructions = [Instruction::Custom(CustomInstruction {
			program_id: system_program::ID,
			accounts,
			data: vec![],
			header: MessageHeader::default(),
		})];
		let err = AccountKeys::compile(&instructions).unwrap_err();
		assert_eq!(err, MessageError::TooManyAccountKeys { count: 256 });
	}
}
