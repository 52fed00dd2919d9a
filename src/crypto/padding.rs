//! PKCS#7-style padding to the AES block size.

use zeroize::Zeroizing;

use crate::consts::BLOCK_SIZE;

/// Copy `plaintext` into a fresh buffer padded to a multiple of 16 bytes.
///
/// Always appends between 1 and 16 bytes, each holding the pad length.
pub fn pad(plaintext: &[u8]) -> Zeroizing<Vec<u8>> {
    let pad_len = BLOCK_SIZE - plaintext.len() % BLOCK_SIZE;
    let mut padded = Zeroizing::new(Vec::with_capacity(plaintext.len() + pad_len));
    padded.extend_from_slice(plaintext);
    padded.resize(plaintext.len() + pad_len, pad_len as u8);
    padded
}

/// Strip a trailing run of `N` bytes each equal to `N`, where `N` is the
/// value of the last byte.
///
/// When the tail does not have that shape the buffer is left untouched.
pub fn unpad(buf: &mut Vec<u8>) {
    let Some(&last) = buf.last() else {
        return;
    };
    let n = usize::from(last);
    if n == 0 || n > buf.len() {
        return;
    }
    if buf[buf.len() - n..].iter().all(|&b| b == last) {
        // Wipe the padding before shortening so no tail bytes linger.
        let len = buf.len();
        buf[len - n..].fill(0);
        buf.truncate(len - n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_block_multiple() {
        for len in 0..40 {
            let padded = pad(&vec![b'a'; len]);
            assert_eq!(padded.len() % BLOCK_SIZE, 0, "len {len}");
            assert!(padded.len() > len);
        }
    }

    #[test]
    fn full_block_gets_a_whole_block_of_padding() {
        let padded = pad(&[7u8; 16]);
        assert_eq!(padded.len(), 32);
        assert!(padded[16..].iter().all(|&b| b == 16));
    }

    #[test]
    fn unpad_reverses_pad() {
        let original = b"---\n".to_vec();
        let mut buf = pad(&original).to_vec();
        unpad(&mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn unpad_leaves_irregular_tail_alone() {
        let mut buf = vec![b'x', 1, 3];
        unpad(&mut buf);
        assert_eq!(buf, vec![b'x', 1, 3]);

        let mut zero_tail = vec![b'x', 0];
        unpad(&mut zero_tail);
        assert_eq!(zero_tail, vec![b'x', 0]);
    }

    #[test]
    fn unpad_on_empty_buffer_is_noop() {
        let mut buf = Vec::new();
        unpad(&mut buf);
        assert!(buf.is_empty());
    }
}
