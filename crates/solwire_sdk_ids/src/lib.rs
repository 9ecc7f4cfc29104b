//! Well-known Solana program IDs used when compiling messages.
//!
//! Each sub-module declares a single `ID` constant via
//! [`solana_address::declare_id!`]. Import the module and use `module::ID` to
//! reference the address.

#![no_std]

/// Compute Budget program ID.
///
/// Instructions for this program carry no accounts; the id itself is the only
/// key they add to a message.
pub mod compute_budget {
	solana_address::declare_id!("ComputeBudget111111111111111111111111111111");
}

/// System program ID. Its 32 bytes are all zero.
pub mod system_program {
	solana_address::declare_id!("11111111111111111111111111111111");
}
