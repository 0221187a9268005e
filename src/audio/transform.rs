/// Convert little-endian unsigned 16-bit samples to signed, in place.
///
/// The wire range [0, 65535] maps onto [-32768, 32767] by shifting the
/// midpoint (equivalent to subtracting 32768, or flipping each sample's high
/// bit). Only whole 2-byte groups are converted; a trailing odd byte is
/// passed through untouched.
pub fn unsigned16_to_signed(bytes: &mut [u8]) {
    for pair in bytes.chunks_exact_mut(2) {
        let unsigned = u16::from_le_bytes([pair[0], pair[1]]);
        let signed = (unsigned ^ 0x8000) as i16;
        pair.copy_from_slice(&signed.to_le_bytes());
    }
}
