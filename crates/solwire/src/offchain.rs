//! Offchain message envelope.
//!
//! ```text
//! signing domain (16) | version (1) | application domain (32) | format (1)
//! | signer count (1) | signers (32 each) | message length (2, LE) | message
//! ```
//!
//! [`OffchainMessage::serialize`] encodes whatever it is given, including
//! envelopes a signer will refuse, so rejection paths can be exercised.
//! [`OffchainMessage::validate`] and [`verify_and_decode`] apply the rules a
//! consuming signer enforces.

use solana_address::Address;
use typed_builder::TypedBuilder;

use crate::ContentFault;
use crate::HeaderFault;
use crate::OffchainError;
use crate::wire::WireReader;
use crate::wire::u8_len;

/// Prefix that marks a payload as an offchain message rather than a
/// transaction message.
pub const SIGNING_DOMAIN: [u8; 16] = *b"\xffsolana offchain";

/// Signing domain plus the version byte.
pub const BASE_HEADER_LEN: usize = SIGNING_DOMAIN.len() + 1;

/// Application domain, format, and signer count.
pub const FIXED_HEADER_LEN: usize = 32 + 1 + 1;

/// Largest payload a signer accepts: 1280 (IPv6 MTU) minus the 40-byte IPv6
/// header and 8-byte fragment header.
pub const PACKET_DATA_SIZE: usize = 1280 - 40 - 8;

/// Default cap on the full serialized envelope.
pub const MAX_OFFCHAIN_MESSAGE_LEN: usize = PACKET_DATA_SIZE;

/// An application domain of all zeroes means "not provided".
pub const EMPTY_APPLICATION_DOMAIN: [u8; 32] = [0u8; 32];

/// The only version a signer accepts.
pub const SUPPORTED_VERSION: u8 = 0;

/// How the message body should be interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageFormat {
	#[default]
	RestrictedAscii = 0,
	LimitedUtf8 = 1,
	/// Encodable, but refused by signers.
	ExtendedUtf8 = 2,
}

impl MessageFormat {
	/// Whether a consuming signer accepts this format.
	pub const fn is_supported(self) -> bool {
		matches!(self, Self::RestrictedAscii | Self::LimitedUtf8)
	}
}

impl From<MessageFormat> for u8 {
	fn from(format: MessageFormat) -> Self {
		format as u8
	}
}

impl TryFrom<u8> for MessageFormat {
	type Error = HeaderFault;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(Self::RestrictedAscii),
			1 => Ok(Self::LimitedUtf8),
			2 => Ok(Self::ExtendedUtf8),
			other => Err(HeaderFault::UnsupportedFormat(other)),
		}
	}
}

/// What a consuming signer is willing to accept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TypedBuilder)]
pub struct SigningPolicy {
	/// Allows bodies that cannot be shown as plain ascii.
	#[builder(default = false)]
	pub blind_signing: bool,
	/// Cap on the full serialized envelope.
	#[builder(default = MAX_OFFCHAIN_MESSAGE_LEN)]
	pub max_message_len: usize,
}

impl Default for SigningPolicy {
	fn default() -> Self {
		Self::builder().build()
	}
}

/// An offchain message envelope.
///
/// ```
/// use solwire::Address;
/// use solwire::MessageFormat;
/// use solwire::OffchainMessage;
///
/// let message = OffchainMessage::builder()
/// 	.message(b"Test message".to_vec())
/// 	.signers(vec![Address::from([1u8; 32])])
/// 	.build();
/// let bytes = message.serialize().unwrap();
/// assert_eq!(bytes.len(), 17 + 32 + 1 + 1 + 32 + 2 + 12);
/// assert_eq!(message.message_format, MessageFormat::RestrictedAscii);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct OffchainMessage {
	#[builder(default = SUPPORTED_VERSION)]
	pub version: u8,
	#[builder(default = EMPTY_APPLICATION_DOMAIN)]
	pub application_domain: [u8; 32],
	#[builder(default)]
	pub message_format: MessageFormat,
	pub signers: Vec<Address>,
	pub message: Vec<u8>,
}

impl OffchainMessage {
	/// Size of [`OffchainMessage::serialize`]'s output.
	pub fn serialized_len(&self) -> usize {
		BASE_HEADER_LEN + FIXED_HEADER_LEN + 32 * self.signers.len() + 2 + self.message.len()
	}

	/// Encodes the full envelope, signing domain first.
	///
	/// Only limits the layout cannot represent are checked here: at most 255
	/// signers and a body of at most `u16::MAX` bytes.
	pub fn serialize(&self) -> Result<Vec<u8>, OffchainError> {
		let signer_count = u8_len(self.signers.len()).ok_or(OffchainError::TooManySigners {
			count: self.signers.len(),
		})?;
		let message_len =
			u16::try_from(self.message.len()).map_err(|_| OffchainError::MessageTooLong {
				len: self.message.len(),
				max: usize::from(u16::MAX),
			})?;

		let mut out = Vec::with_capacity(self.serialized_len());
		out.extend_from_slice(&SIGNING_DOMAIN);
		out.push(self.version);
		out.extend_from_slice(&self.application_domain);
		out.push(self.message_format.into());
		out.push(signer_count);
		for signer in &self.signers {
			out.extend_from_slice(signer.as_ref());
		}
		out.extend_from_slice(&message_len.to_le_bytes());
		out.extend_from_slice(&self.message);

		Ok(out)
	}

	/// Parses an envelope. Structural problems are all reported as
	/// [`OffchainError::InvalidHeader`].
	pub fn deserialize(bytes: &[u8]) -> Result<Self, OffchainError> {
		let mut reader = WireReader::new(bytes);

		let domain = reader
			.read_array::<16>()
			.ok_or(HeaderFault::Truncated)?;
		if domain != SIGNING_DOMAIN {
			return Err(HeaderFault::SigningDomain.into());
		}
		let version = reader.read_u8().ok_or(HeaderFault::Truncated)?;
		let application_domain = reader
			.read_array::<32>()
			.ok_or(HeaderFault::Truncated)?;
		let message_format =
			MessageFormat::try_from(reader.read_u8().ok_or(HeaderFault::Truncated)?)?;
		let signer_count = reader.read_u8().ok_or(HeaderFault::Truncated)?;
		let signers = (0..signer_count)
			.map(|_| reader.read_array::<32>().map(Address::from))
			.collect::<Option<Vec<_>>>()
			.ok_or(HeaderFault::Truncated)?;
		let declared = reader.read_u16().ok_or(HeaderFault::Truncated)?;
		if usize::from(declared) != reader.remaining() {
			log!(
				debug,
				"offchain length field says {declared} but {} bytes follow",
				reader.remaining()
			);
			return Err(HeaderFault::LengthMismatch { declared }.into());
		}
		let message = reader
			.take(usize::from(declared))
			.ok_or(HeaderFault::Truncated)?
			.to_vec();

		Ok(Self {
			version,
			application_domain,
			message_format,
			signers,
			message,
		})
	}

	/// Whether a non-zero application domain was provided.
	pub fn has_application_domain(&self) -> bool {
		self.application_domain != EMPTY_APPLICATION_DOMAIN
	}

	/// Checks the envelope the way a consuming signer does.
	///
	/// Size is checked first, then the header, then the body content, and
	/// finally the policy gate for non-ascii bodies. When `signer` is given it
	/// must appear in the signer list.
	pub fn validate(
		&self,
		policy: &SigningPolicy,
		signer: Option<&Address>,
	) -> Result<(), OffchainError> {
		let len = self.serialized_len();
		if len > policy.max_message_len {
			return Err(OffchainError::MessageTooLong {
				len,
				max: policy.max_message_len,
			});
		}

		self.validate_header(signer)?;
		self.validate_content(policy)
	}

	fn validate_header(&self, signer: Option<&Address>) -> Result<(), HeaderFault> {
		if self.version != SUPPORTED_VERSION {
			return Err(HeaderFault::UnsupportedVersion(self.version));
		}
		if !self.message_format.is_supported() {
			return Err(HeaderFault::UnsupportedFormat(self.message_format.into()));
		}
		if self.signers.is_empty() {
			return Err(HeaderFault::NoSigners);
		}
		if self.message.is_empty() {
			return Err(HeaderFault::EmptyMessage);
		}
		if signer.is_some_and(|signer| !self.signers.contains(signer)) {
			return Err(HeaderFault::SignerNotListed);
		}
		Ok(())
	}

	fn validate_content(&self, policy: &SigningPolicy) -> Result<(), OffchainError> {
		if self.message.is_ascii() {
			return Ok(());
		}
		if self.message_format != MessageFormat::LimitedUtf8 {
			return Err(OffchainError::InvalidContent(ContentFault::NotAscii));
		}
		if core::str::from_utf8(&self.message).is_err() {
			return Err(OffchainError::InvalidContent(ContentFault::NotUtf8));
		}
		if !policy.blind_signing {
			log!(debug, "utf-8 offchain message refused without blind signing");
			return Err(OffchainError::BlindSigningRequired);
		}
		Ok(())
	}
}

/// Decodes and validates raw envelope bytes as a consuming signer would.
///
/// The size limit is applied to the raw payload before anything is parsed.
pub fn verify_and_decode(
	bytes: &[u8],
	policy: &SigningPolicy,
	signer: Option<&Address>,
) -> Result<OffchainMessage, OffchainError> {
	if bytes.len() > policy.max_message_len {
		return Err(OffchainError::MessageTooLong {
			len: bytes.len(),
			max: policy.max_message_len,
		});
	}

	let message = OffchainMessage::deserialize(bytes)?;
	message.validate(policy, signer)?;
	log!(
		debug,
		"accepted offchain message: {} bytes, {} signer(s)",
		message.message.len(),
		message.signers.len()
	);
	Ok(message)
}
