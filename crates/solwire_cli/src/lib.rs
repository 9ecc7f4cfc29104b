//! Building blocks of the `solwire` command.
//!
//! Commands return plain values or serializable reports; the binary only
//! parses arguments, prints, and maps errors to exit codes.

pub mod error;

use std::str::FromStr;

use serde::Serialize;
use solwire::AccountKeys;
use solwire::Address;
use solwire::Blockhash;
use solwire::CompiledInstruction;
use solwire::ComputeBudgetInstruction;
use solwire::Instruction;
use solwire::Message;
use solwire::MessageFormat;
use solwire::OffchainMessage;
use solwire::SigningPolicy;

use crate::error::CliError;

/// Default `env_logger` filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "solwire=info,solwire_cli=info";

/// Configures `env_logger`, letting `RUST_LOG` override `filter`.
pub fn setup_logging(filter: &str) {
	let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
		.format_timestamp_millis()
		.try_init();
}

pub fn parse_address(value: &str) -> Result<Address, CliError> {
	Address::from_str(value).map_err(|_| {
		CliError::InvalidAddress {
			value: value.to_owned(),
		}
	})
}

pub fn decode_base58(value: &str) -> Result<Vec<u8>, CliError> {
	bs58::decode(value.trim()).into_vec().map_err(|source| {
		CliError::InvalidBase58 {
			value: value.to_owned(),
			source,
		}
	})
}

pub fn encode_base58(bytes: impl AsRef<[u8]>) -> String {
	bs58::encode(bytes).into_string()
}

/// Decodes a base58 value that must hold exactly 32 bytes. `field` names the
/// argument in the error.
fn parse_array32(field: &'static str, value: &str) -> Result<[u8; 32], CliError> {
	let bytes = decode_base58(value)?;
	<[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
		CliError::InvalidLength {
			field,
			len: bytes.len(),
		}
	})
}

/// Inputs of `solwire message transfer`.
#[derive(Debug, Clone)]
pub struct TransferOptions {
	pub from: String,
	pub to: String,
	pub lamports: u64,
	pub unit_limit: Option<u32>,
	pub unit_price: Option<u32>,
	/// Place the unit-price instruction before the unit-limit one.
	pub price_first: bool,
	pub blockhash: Option<String>,
}

/// Builds the instruction list for a transfer with optional budget directives.
pub fn transfer_instructions(options: &TransferOptions) -> Result<Vec<Instruction>, CliError> {
	let from = parse_address(&options.from)?;
	let to = parse_address(&options.to)?;

	let limit = options.unit_limit.map(Instruction::set_compute_unit_limit);
	let price = options.unit_price.map(Instruction::set_compute_unit_price);
	let budget = if options.price_first {
		[price, limit]
	} else {
		[limit, price]
	};

	let mut instructions: Vec<Instruction> = budget.into_iter().flatten().collect();
	instructions.push(Instruction::transfer(from, to, options.lamports));
	Ok(instructions)
}

/// Compiles a transfer message, using the placeholder blockhash unless one is
/// given.
pub fn build_transfer(options: &TransferOptions) -> Result<Message, CliError> {
	let instructions = transfer_instructions(options)?;
	let blockhash: Blockhash = match &options.blockhash {
		Some(value) => parse_array32("blockhash", value)?,
		None => solwire::PLACEHOLDER_BLOCKHASH,
	};
	let message = Message::compile(&instructions, blockhash)?;
	log::debug!(
		"compiled transfer message with {} keys and {} instructions",
		message.account_keys().len(),
		message.instructions().len()
	);
	Ok(message)
}

#[derive(Debug, Serialize)]
pub struct HeaderReport {
	pub num_required_signatures: u8,
	pub num_readonly_signed_accounts: u8,
	pub num_readonly_unsigned_accounts: u8,
}

/// Decoded compute budget directive.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComputeBudgetReport {
	RequestUnits { units: u32, additional_fee: u32 },
	RequestHeapFrame { bytes: u32 },
	SetComputeUnitLimit { units: u32 },
	SetComputeUnitPrice { micro_lamports: u32 },
}

impl From<ComputeBudgetInstruction> for ComputeBudgetReport {
	fn from(instruction: ComputeBudgetInstruction) -> Self {
		match instruction {
			ComputeBudgetInstruction::RequestUnits {
				units,
				additional_fee,
			} => {
				Self::RequestUnits {
					units,
					additional_fee,
				}
			}
			ComputeBudgetInstruction::RequestHeapFrame { bytes } => Self::RequestHeapFrame { bytes },
			ComputeBudgetInstruction::SetComputeUnitLimit { units } => {
				Self::SetComputeUnitLimit { units }
			}
			ComputeBudgetInstruction::SetComputeUnitPrice { micro_lamports } => {
				Self::SetComputeUnitPrice { micro_lamports }
			}
		}
	}
}

#[derive(Debug, Serialize)]
pub struct InstructionReport {
	pub program_id_index: u8,
	pub program_id: Option<String>,
	pub accounts: Vec<u8>,
	pub data: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub compute_budget: Option<ComputeBudgetReport>,
}

impl InstructionReport {
	/// Builds the report, decoding the data of compute budget instructions.
	pub fn new(instruction: &CompiledInstruction, keys: &AccountKeys) -> Result<Self, CliError> {
		let program_id = instruction.program_id(keys);
		let compute_budget = match program_id {
			Some(id) if solwire::ids::compute_budget::check_id(id) => {
				Some(ComputeBudgetInstruction::decode(&instruction.data)?.into())
			}
			_ => None,
		};

		Ok(Self {
			program_id_index: instruction.program_id_index,
			program_id: program_id.map(encode_base58),
			accounts: instruction.accounts.clone(),
			data: encode_base58(&instruction.data),
			compute_budget,
		})
	}
}

/// JSON view of a compiled message.
#[derive(Debug, Serialize)]
pub struct MessageReport {
	pub header: HeaderReport,
	pub account_keys: Vec<String>,
	pub recent_blockhash: String,
	pub instructions: Vec<InstructionReport>,
	pub serialized: String,
}

impl MessageReport {
	pub fn new(message: &Message) -> Result<Self, CliError> {
		let header = message.header();
		let keys = message.account_keys();
		Ok(Self {
			header: HeaderReport {
				num_required_signatures: header.num_required_signatures,
				num_readonly_signed_accounts: header.num_readonly_signed_accounts,
				num_readonly_unsigned_accounts: header.num_readonly_unsigned_accounts,
			},
			account_keys: keys.iter().map(encode_base58).collect(),
			recent_blockhash: encode_base58(message.recent_blockhash()),
			instructions: message
				.instructions()
				.iter()
				.map(|ix| InstructionReport::new(ix, keys))
				.collect::<Result<Vec<_>, _>>()?,
			serialized: encode_base58(message.serialize()?),
		})
	}
}

/// Parses base58 message bytes into a report.
pub fn inspect_message(encoded: &str) -> Result<MessageReport, CliError> {
	let bytes = decode_base58(encoded)?;
	let message = Message::deserialize(&bytes)?;
	MessageReport::new(&message)
}

/// Inputs of `solwire offchain encode`.
#[derive(Debug, Clone)]
pub struct OffchainOptions {
	pub text: String,
	pub signers: Vec<String>,
	pub format: MessageFormat,
	pub application_domain: Option<String>,
}

pub fn encode_offchain(options: &OffchainOptions) -> Result<String, CliError> {
	let signers = options
		.signers
		.iter()
		.map(|signer| parse_address(signer))
		.collect::<Result<Vec<_>, _>>()?;
	let application_domain = match &options.application_domain {
		Some(domain) => parse_array32("application domain", domain)?,
		None => solwire::EMPTY_APPLICATION_DOMAIN,
	};

	let message = OffchainMessage::builder()
		.application_domain(application_domain)
		.message_format(options.format)
		.signers(signers)
		.message(options.text.as_bytes().to_vec())
		.build();
	Ok(encode_base58(message.serialize()?))
}

/// JSON view of an accepted offchain envelope.
#[derive(Debug, Serialize)]
pub struct OffchainReport {
	pub version: u8,
	pub application_domain: Option<String>,
	pub format: u8,
	pub signers: Vec<String>,
	pub message: String,
}

/// Decodes and validates a base58 envelope under `policy`.
pub fn check_offchain(
	encoded: &str,
	policy: &SigningPolicy,
	signer: Option<&str>,
) -> Result<OffchainReport, CliError> {
	let bytes = decode_base58(encoded)?;
	let signer = signer.map(parse_address).transpose()?;
	let message = solwire::verify_and_decode(&bytes, policy, signer.as_ref())?;

	Ok(OffchainReport {
		version: message.version,
		application_domain: message
			.has_application_domain()
			.then(|| encode_base58(message.application_domain)),
		format: message.message_format.into(),
		signers: message.signers.iter().map(encode_base58).collect(),
		message: String::from_utf8_lossy(&message.message).into_owned(),
	})
}

/// Checks a base58 signature over base58 payload bytes.
pub fn verify_signature(pubkey: &str, payload: &str, signature: &str) -> Result<(), CliError> {
	let pubkey = parse_address(pubkey)?;
	let payload = decode_base58(payload)?;
	let signature = decode_base58(signature)?;
	solwire::verify(&pubkey, &payload, &signature)?;
	Ok(())
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
	Ok(serde_json::to_string_pretty(value)?)
}
