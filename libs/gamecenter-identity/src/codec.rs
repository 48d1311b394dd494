/// Encode a millisecond timestamp the way the signer fed it to its hash:
/// an unsigned 64-bit big-endian integer (high word first).
pub fn encode_timestamp_be(timestamp: u64) -> [u8; 8] {
    let high = (timestamp >> 32) as u32;
    let low = timestamp as u32;

    let mut out = [0u8; 8];
    out[..4].copy_from_slice(&high.to_be_bytes());
    out[4..].copy_from_slice(&low.to_be_bytes());
    out
}
