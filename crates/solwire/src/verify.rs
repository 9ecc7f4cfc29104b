//! Signature checks over serialized message bytes.

use ed25519_dalek::Signature;
use ed25519_dalek::VerifyingKey;
use solana_address::Address;

use crate::VerifyError;

/// Length of an ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// Verifies that `signature` was produced over exactly `message` by the key
/// behind `public_key`.
///
/// The signature length is checked before any curve arithmetic happens.
pub fn verify(public_key: &Address, message: &[u8], signature: &[u8]) -> Result<(), VerifyError> {
	let signature: &[u8; SIGNATURE_LEN] =
		signature
			.try_into()
			.map_err(|_| VerifyError::InvalidSignatureLength {
				len: signature.len(),
			})?;

	let key = VerifyingKey::from_bytes(&public_key.to_bytes())
		.map_err(|_| VerifyError::InvalidPublicKey)?;
	let signature = Signature::from_bytes(signature);

	key.verify_strict(message, &signature)
		.map_err(|_| VerifyError::InvalidSignature)
}
