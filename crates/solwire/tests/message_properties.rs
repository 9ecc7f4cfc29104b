//! Property-based checks for key ordering, header additivity, determinism and
//! index validity of compiled messages.

use proptest::prelude::*;
use solwire::AccountMeta;
use solwire::Address;
use solwire::CustomInstruction;
use solwire::Instruction;
use solwire::Message;
use solwire::MessageHeader;
use solwire::readonly;
use solwire::writable;

fn key(byte: u8) -> Address {
	Address::from([byte; 32])
}

fn meta_strategy() -> impl Strategy<Value = AccountMeta> {
	(1u8..=12, any::<bool>(), any::<bool>())
		.prop_map(|(byte, is_signer, is_writable)| AccountMeta::new(key(byte), is_signer, is_writable))
}

/// Program ids and accounts share one small key pool, so program ids that are
/// also writable, readonly accounts and repeated writable accounts all occur.
fn custom_strategy() -> impl Strategy<Value = Instruction> {
	(
		1u8..=12,
		prop::collection::vec(meta_strategy(), 0..6),
		prop::collection::vec(any::<u8>(), 0..16),
		(0u8..=2, 0u8..=1, 0u8..=2),
	)
		.prop_map(|(program, accounts, data, (required, signed, unsigned))| {
			Instruction::Custom(CustomInstruction {
				program_id: key(program),
				accounts,
				data,
				header: MessageHeader::new(required, signed, unsigned),
			})
		})
}

fn instruction_strategy() -> impl Strategy<Value = Instruction> {
	prop_oneof![
		custom_strategy(),
		(1u8..=8, 1u8..=8, any::<u64>())
			.prop_map(|(from, to, lamports)| Instruction::transfer(key(from), key(to), lamports)),
		any::<u32>().prop_map(Instruction::set_compute_unit_limit),
		any::<u32>().prop_map(Instruction::set_compute_unit_price),
		any::<u32>().prop_map(Instruction::request_heap_frame),
		(any::<u32>(), any::<u32>())
			.prop_map(|(units, fee)| Instruction::request_units(units, fee)),
	]
}

fn instructions_strategy() -> impl Strategy<Value = Vec<Instruction>> {
	prop::collection::vec(instruction_strategy(), 0..40)
}

fn compile(instructions: &[Instruction]) -> Message {
	Message::new(instructions).unwrap_or_else(|e| panic!("compile failed: {e}"))
}

/// Writable keys in first-seen order, without duplicates.
fn expected_writable(instructions: &[Instruction]) -> Vec<Address> {
	let mut seen = Vec::new();
	for meta in instructions.iter().flat_map(Instruction::accounts) {
		if meta.is_writable && !seen.contains(&meta.address) {
			seen.push(meta.address);
		}
	}
	seen
}

// ---------------------------------------------------------------------------
// Key table ordering
// ---------------------------------------------------------------------------

proptest! {
	#[test]
	fn writable_keys_keep_first_seen_order(instructions in instructions_strategy()) {
		let message = compile(&instructions);
		let keys = message.account_keys();

		let expected = expected_writable(&instructions);
		prop_assert_eq!(keys.writable(), expected.as_slice());

		let mut program_ids = Vec::new();
		for ix in &instructions {
			let program_id = ix.program_id();
			if !program_ids.contains(&program_id) && !expected.contains(&program_id) {
				program_ids.push(program_id);
			}
		}
		prop_assert_eq!(keys.readonly(), program_ids.as_slice());
	}

	#[test]
	fn account_keys_are_unique(instructions in instructions_strategy()) {
		let message = compile(&instructions);
		let keys = message.account_keys().as_slice();
		for (i, a) in keys.iter().enumerate() {
			prop_assert!(!keys[i + 1..].contains(a), "duplicate key at {}", i);
		}
	}
}

// ---------------------------------------------------------------------------
// Header additivity
// ---------------------------------------------------------------------------

proptest! {
	#[test]
	fn header_is_sum_of_declared_counts(instructions in instructions_strategy()) {
		let message = compile(&instructions);
		let (required, signed, unsigned) = instructions.iter().fold((0u32, 0u32, 0u32), |acc, ix| {
			let h = ix.header_contribution();
			(
				acc.0 + u32::from(h.num_required_signatures),
				acc.1 + u32::from(h.num_readonly_signed_accounts),
				acc.2 + u32::from(h.num_readonly_unsigned_accounts),
			)
		});
		let header = message.header();
		prop_assert_eq!(u32::from(header.num_required_signatures), required);
		prop_assert_eq!(u32::from(header.num_readonly_signed_accounts), signed);
		prop_assert_eq!(u32::from(header.num_readonly_unsigned_accounts), unsigned);

		let bytes = message.serialize().unwrap_or_else(|e| panic!("serialize failed: {e}"));
		prop_assert_eq!(&bytes[..3], header.as_bytes());
	}
}

// ---------------------------------------------------------------------------
// Determinism and index validity
// ---------------------------------------------------------------------------

proptest! {
	#[test]
	fn encoding_is_deterministic(instructions in instructions_strategy()) {
		let first = compile(&instructions).serialize();
		let second = compile(&instructions).serialize();
		prop_assert_eq!(first, second);
	}

	#[test]
	fn compiled_indices_point_at_expected_keys(instructions in instructions_strategy()) {
		let message = compile(&instructions);
		let keys = message.account_keys();
		prop_assert_eq!(message.instructions().len(), instructions.len());

		for (ix, compiled) in instructions.iter().zip(message.instructions()) {
			prop_assert!(usize::from(compiled.program_id_index) < keys.len());
			prop_assert_eq!(keys.get(compiled.program_id_index), Some(&ix.program_id()));

			let writable: Vec<Address> = ix
				.accounts()
				.into_iter()
				.filter(|meta| meta.is_writable)
				.map(|meta| meta.address)
				.collect();
			prop_assert_eq!(compiled.accounts.len(), writable.len());
			for (&index, address) in compiled.accounts.iter().zip(&writable) {
				prop_assert!(usize::from(index) < keys.len());
				prop_assert_eq!(keys.get(index), Some(address));
			}
			prop_assert_eq!(&compiled.data, &ix.encode());
		}
	}

	#[test]
	fn serialized_bytes_parse_back(instructions in instructions_strategy()) {
		let message = compile(&instructions);
		let bytes = message.serialize().unwrap_or_else(|e| panic!("serialize failed: {e}"));
		prop_assert_eq!(bytes.len(), message.serialized_len());
		let decoded = Message::deserialize(&bytes)
			.unwrap_or_else(|e| panic!("deserialize failed: {e}"));
		prop_assert_eq!(decoded, message);
	}

	#[test]
	fn arbitrary_bytes_never_panic(ref bytes in prop::collection::vec(any::<u8>(), 0..512)) {
		// Must not panic, either Ok or Err.
		let _ = Message::deserialize(bytes);
	}
}

// ---------------------------------------------------------------------------
// Compute budget ordering
// ---------------------------------------------------------------------------

proptest! {
	#[test]
	fn budget_order_only_moves_compiled_instructions(
		limit in any::<u32>(),
		price in any::<u32>(),
		lamports in any::<u64>(),
	) {
		let transfer = Instruction::transfer(key(1), key(2), lamports);
		let limit_ix = Instruction::set_compute_unit_limit(limit);
		let price_ix = Instruction::set_compute_unit_price(price);

		let a = compile(&[limit_ix.clone(), price_ix.clone(), transfer.clone()]);
		let b = compile(&[price_ix, limit_ix, transfer]);

		prop_assert_eq!(a.header(), b.header());
		prop_assert_eq!(a.account_keys(), b.account_keys());
		prop_assert_eq!(a.recent_blockhash(), b.recent_blockhash());
		prop_assert_eq!(&a.instructions()[0], &b.instructions()[1]);
		prop_assert_eq!(&a.instructions()[1], &b.instructions()[0]);
		prop_assert_eq!(&a.instructions()[2], &b.instructions()[2]);
	}
}

#[test]
fn transfer_with_budget_header() {
	let message = compile(&[
		Instruction::set_compute_unit_price(12_546),
		Instruction::set_compute_unit_limit(230_000),
		Instruction::transfer(key(1), key(2), 1),
	]);
	assert_eq!(*message.header(), MessageHeader::new(2, 0, 3));
	assert_eq!(message.account_keys().len(), 4);
}

#[test]
fn shared_keys_survive_compile_and_parse() {
	let instructions = [
		Instruction::Custom(CustomInstruction {
			program_id: key(9),
			accounts: vec![readonly(&key(5)), writable(&key(6)), writable(&key(6))],
			data: vec![1],
			header: MessageHeader::new(1, 0, 1),
		}),
		Instruction::transfer(key(9), key(1), 10),
	];
	let message = compile(&instructions);
	let keys = message.account_keys();

	assert_eq!(keys.as_slice(), &[key(6), key(9), key(1), solwire::ids::system_program::ID]);
	assert_eq!(keys.position(&key(5)), None);
	assert_eq!(message.instructions()[0].program_id_index, 1);
	assert_eq!(message.instructions()[0].accounts, vec![0, 0]);
	assert_eq!(message.instructions()[1].program_id_index, 3);
	assert_eq!(message.instructions()[1].accounts, vec![1, 2]);
	assert_eq!(*message.header(), MessageHeader::new(3, 0, 2));

	let bytes = message
		.serialize()
		.unwrap_or_else(|e| panic!("serialize failed: {e}"));
	let decoded = Message::deserialize(&bytes).unwrap_or_else(|e| panic!("deserialize failed: {e}"));
	assert_eq!(decoded, message);
}
