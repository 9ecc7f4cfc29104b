use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use solwire::MessageFormat;
use solwire::SigningPolicy;
use solwire_cli::OffchainOptions;
use solwire_cli::TransferOptions;
use solwire_cli::error::CliError;

#[derive(Parser, Debug)]
#[command(
	name = "solwire",
	version,
	about = "Build, inspect and verify canonical Solana message bytes"
)]
struct Cli {
	/// Log at debug level unless `RUST_LOG` says otherwise.
	#[arg(short, long, global = true, default_value_t = false)]
	verbose: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Compile and decode transaction messages.
	Message {
		#[command(subcommand)]
		command: MessageCommands,
	},
	/// Encode and check offchain message envelopes.
	Offchain {
		#[command(subcommand)]
		command: OffchainCommands,
	},
	/// Verify an ed25519 signature over base58 payload bytes.
	Verify {
		/// Signer public key (base58).
		#[arg(long)]
		pubkey: String,

		/// Signature (base58, 64 bytes).
		#[arg(long)]
		signature: String,

		/// Signed payload (base58).
		payload: String,
	},
}

#[derive(Subcommand, Debug)]
enum MessageCommands {
	/// Compile a transfer, optionally preceded by compute budget directives.
	Transfer {
		/// Funding account (base58).
		#[arg(long)]
		from: String,

		/// Recipient account (base58).
		#[arg(long)]
		to: String,

		#[arg(long)]
		lamports: u64,

		/// Add a SetComputeUnitLimit instruction.
		#[arg(long)]
		unit_limit: Option<u32>,

		/// Add a SetComputeUnitPrice instruction.
		#[arg(long)]
		unit_price: Option<u32>,

		/// Put the unit price instruction before the unit limit one.
		#[arg(long, default_value_t = false)]
		price_first: bool,

		/// Recent blockhash (base58). Defaults to the offline placeholder.
		#[arg(long)]
		blockhash: Option<String>,

		/// Print a JSON report instead of base58 bytes.
		#[arg(long, default_value_t = false)]
		json: bool,
	},
	/// Decode base58 message bytes and print them as JSON.
	Inspect {
		/// Serialized message (base58).
		message: String,
	},
}

#[derive(Subcommand, Debug)]
enum OffchainCommands {
	/// Encode an offchain envelope and print it as base58.
	Encode {
		/// Signer public key (base58). Repeat for several signers.
		#[arg(long = "signer")]
		signers: Vec<String>,

		#[arg(long, value_enum, default_value_t = FormatArg::Ascii)]
		format: FormatArg,

		/// Application domain (base58, 32 bytes).
		#[arg(long)]
		domain: Option<String>,

		/// Message body.
		text: String,
	},
	/// Decode and validate a base58 envelope like a signer would.
	Check {
		/// Accept non-ascii utf-8 bodies.
		#[arg(long, default_value_t = false)]
		blind_signing: bool,

		/// Require this key to be in the signer list.
		#[arg(long)]
		signer: Option<String>,

		/// Serialized envelope (base58).
		envelope: String,
	},
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
	Ascii,
	Utf8,
	ExtendedUtf8,
}

impl From<FormatArg> for MessageFormat {
	fn from(format: FormatArg) -> Self {
		match format {
			FormatArg::Ascii => Self::RestrictedAscii,
			FormatArg::Utf8 => Self::LimitedUtf8,
			FormatArg::ExtendedUtf8 => Self::ExtendedUtf8,
		}
	}
}

fn main() {
	let cli = Cli::parse();
	solwire_cli::setup_logging(if cli.verbose {
		"solwire=debug,solwire_cli=debug"
	} else {
		solwire_cli::DEFAULT_LOG_FILTER
	});

	match run(cli.command) {
		Ok(output) => println!("{output}"),
		Err(err) => {
			eprintln!("Error: {err}");
			std::process::exit(err.exit_code());
		}
	}
}

fn run(command: Commands) -> Result<String, CliError> {
	match command {
		Commands::Message { command } => {
			match command {
				MessageCommands::Transfer {
					from,
					to,
					lamports,
					unit_limit,
					unit_price,
					price_first,
					blockhash,
					json,
				} => {
					let options = TransferOptions {
						from,
						to,
						lamports,
						unit_limit,
						unit_price,
						price_first,
						blockhash,
					};
					let message = solwire_cli::build_transfer(&options)?;
					if json {
						solwire_cli::to_json(&solwire_cli::MessageReport::new(&message)?)
					} else {
						Ok(solwire_cli::encode_base58(message.serialize()?))
					}
				}
				MessageCommands::Inspect { message } => {
					solwire_cli::to_json(&solwire_cli::inspect_message(&message)?)
				}
			}
		}
		Commands::Offchain { command } => {
			match command {
				OffchainCommands::Encode {
					signers,
					format,
					domain,
					text,
				} => {
					solwire_cli::encode_offchain(&OffchainOptions {
						text,
						signers,
						format: format.into(),
						application_domain: domain,
					})
				}
				OffchainCommands::Check {
					blind_signing,
					signer,
					envelope,
				} => {
					let policy = SigningPolicy::builder().blind_signing(blind_signing).build();
					let report = solwire_cli::check_offchain(&envelope, &policy, signer.as_deref())?;
					log::debug!("offchain envelope accepted");
					solwire_cli::to_json(&report)
				}
			}
		}
		Commands::Verify {
			pubkey,
			signature,
			payload,
		} => {
			solwire_cli::verify_signature(&pubkey, &payload, &signature)?;
			Ok("signature ok".to_owned())
		}
	}
}
