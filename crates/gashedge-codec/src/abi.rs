use gashedge_types::{Address, TransactionRequest};

const WORD: usize = 32;

/// Encode a request as ABI `(uint256 nonce, address to, uint256 value, bytes callData)`.
///
/// Four head words followed by the dynamic `bytes` tail. The layout is
/// byte-identical to `abi.encode` over the same tuple, so a digest of
/// this buffer can be checked against signatures produced off-chain.
pub fn encode_request(request: &TransactionRequest) -> Vec<u8> {
    // Head: nonce, to, value, offset of the bytes tail (always 0x80
    // since the head is exactly four words).
    let mut out = Vec::with_capacity(5 * WORD + pad_len(request.call_data.len()));
    push_u64_word(&mut out, request.nonce);
    push_address_word(&mut out, &request.to);
    push_u128_word(&mut out, request.value.raw());
    push_u64_word(&mut out, (4 * WORD) as u64);

    // Tail: length word, then the payload right-padded to a word multiple.
    push_u64_word(&mut out, request.call_data.len() as u64);
    out.extend_from_slice(&request.call_data);
    let padding = pad_len(request.call_data.len()) - request.call_data.len();
    out.extend(std::iter::repeat(0u8).take(padding));

    out
}

fn pad_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

fn push_u64_word(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&[0u8; 24]);
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u128_word(out: &mut Vec<u8>, value: u128) {
    out.extend_from_slice(&[0u8; 16]);
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_address_word(out: &mut Vec<u8>, address: &Address) {
    out.extend_from_slice(&[0u8; 12]);
    out.extend_from_slice(address.as_bytes());
}
