//! Byte cursor shared by the message and offchain decoders.

/// Reads fixed-width little-endian fields from a byte slice.
pub(crate) struct WireReader<'a> {
	bytes: &'a [u8],
	offset: usize,
}

impl<'a> WireReader<'a> {
	pub(crate) const fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, offset: 0 }
	}

	pub(crate) const fn offset(&self) -> usize {
		self.offset
	}

	pub(crate) const fn remaining(&self) -> usize {
		self.bytes.len() - self.offset
	}

	/// Takes the next `len` bytes, or `None` when fewer are left.
	pub(crate) fn take(&mut self, len: usize) -> Option<&'a [u8]> {
		let end = self.offset.checked_add(len)?;
		let slice = self.bytes.get(self.offset..end)?;
		self.offset = end;
		Some(slice)
	}

	pub(crate) fn read_u8(&mut self) -> Option<u8> {
		self.take(1).map(|bytes| bytes[0])
	}

	pub(crate) fn read_u16(&mut self) -> Option<u16> {
		self.read_array().map(u16::from_le_bytes)
	}

	pub(crate) fn read_u32(&mut self) -> Option<u32> {
		self.read_array().map(u32::from_le_bytes)
	}

	pub(crate) fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
		self.take(N).and_then(|bytes| bytes.try_into().ok())
	}
}

/// Converts a length to its single-byte prefix.
pub(crate) fn u8_len(len: usize) -> Option<u8> {
	u8::try_from(len).ok()
}
