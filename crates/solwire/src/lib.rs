//! Canonical Solana message compilation and offchain message envelopes.
//!
//! Build a list of [`Instruction`]s, compile them into a [`Message`] and call
//! [`Message::serialize`] to get the exact bytes an external signer signs.
//!
//! ```
//! use solwire::Address;
//! use solwire::Instruction;
//! use solwire::Message;
//!
//! let from = Address::from([1u8; 32]);
//! let to = Address::from([2u8; 32]);
//! let message = Message::new(&[
//! 	Instruction::set_compute_unit_limit(230_000),
//! 	Instruction::transfer(from, to, 1_000),
//! ])?;
//! let bytes = message.serialize()?;
//! assert_eq!(&bytes[..3], &[2, 0, 2]);
//! # Ok::<(), solwire::MessageError>(())
//! ```
//!
//! [`OffchainMessage`] covers the separate offchain signing envelope, and
//! [`verify`] checks a returned signature against the serialized bytes.

#[cfg(feature = "logs")]
macro_rules! log {
	($level:ident, $($arg:tt)*) => {
		::log::$level!($($arg)*)
	};
}

#[cfg(not(feature = "logs"))]
macro_rules! log {
	($level:ident, $($arg:tt)*) => {};
}

mod error;
mod header;
mod instruction;
mod keys;
mod message;
mod offchain;
mod rejection;
mod verify;
mod wire;

pub use solana_address::Address;
pub use solwire_sdk_ids as ids;

pub use crate::error::*;
pub use crate::header::*;
pub use crate::instruction::*;
pub use crate::keys::*;
pub use crate::message::*;
pub use crate::offchain::*;
pub use crate::rejection::*;
pub use crate::verify::*;
