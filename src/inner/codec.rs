//! Payload encoding for the Crafty wire formats: little-endian fixed-point
//! `u16` values (tenths of a unit), NUL-terminated text and one-byte flags.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub(crate) enum CodecError {
    #[error("Malformed payload: expected {expected} byte(s), got {actual}")]
    MalformedPayload { expected: usize, actual: usize },
}

pub(crate) fn decode_fixed_u16(payload: &[u8]) -> Result<u16, CodecError> {
    match payload {
        [lo, hi] => Ok(u16::from_le_bytes([*lo, *hi])),
        _ => Err(CodecError::MalformedPayload {
            expected: 2,
            actual: payload.len(),
        }),
    }
}

pub(crate) fn encode_fixed_u16(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// Takes everything before the first NUL byte; the whole payload when there
/// is none. Invalid UTF-8 is replaced rather than rejected.
pub(crate) fn decode_text(payload: &[u8]) -> String {
    let end = payload
        .iter()
        .position(|&byte| byte == 0)
        .unwrap_or(payload.len());
    String::from_utf8_lossy(&payload[..end]).into_owned()
}

pub(crate) fn decode_flag(payload: &[u8]) -> Result<bool, CodecError> {
    match payload {
        [byte] => Ok(*byte != 0),
        _ => Err(CodecError::MalformedPayload {
            expected: 1,
            actual: payload.len(),
        }),
    }
}

pub(crate) fn encode_flag(on: bool) -> [u8; 1] {
    [u8::from(on)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_u16_round_trips() {
        for value in [0u16, 1, 175, 1750, 0x0102, u16::MAX] {
            assert_eq!(decode_fixed_u16(&encode_fixed_u16(value)), Ok(value));
        }
    }

    #[test]
    fn fixed_u16_is_little_endian() {
        assert_eq!(encode_fixed_u16(0x0102), [0x02, 0x01]);
        assert_eq!(encode_fixed_u16(1750), [0xD6, 0x06]);
        assert_eq!(decode_fixed_u16(&[0xD6, 0x06]), Ok(1750));
    }

    #[test]
    fn fixed_u16_rejects_wrong_lengths() {
        for payload in [&[][..], &[1][..], &[1, 2, 3][..]] {
            assert_eq!(
                decode_fixed_u16(payload),
                Err(CodecError::MalformedPayload {
                    expected: 2,
                    actual: payload.len(),
                })
            );
        }
    }

    #[test]
    fn text_stops_at_the_first_nul() {
        assert_eq!(decode_text(&[0x41, 0x42, 0x00, 0x43]), "AB");
    }

    #[test]
    fn text_without_terminator_is_taken_whole() {
        assert_eq!(decode_text(b"CY123456"), "CY123456");
    }

    #[test]
    fn text_of_an_empty_payload_is_empty() {
        assert_eq!(decode_text(&[]), "");
    }

    #[test]
    fn flag_decodes_any_nonzero_byte_as_on() {
        assert_eq!(decode_flag(&[0]), Ok(false));
        assert_eq!(decode_flag(&[1]), Ok(true));
        assert_eq!(decode_flag(&[0xFF]), Ok(true));
    }

    #[test]
    fn flag_rejects_wrong_lengths() {
        for payload in [&[][..], &[1, 0][..]] {
            assert_eq!(
                decode_flag(payload),
                Err(CodecError::MalformedPayload {
                    expected: 1,
                    actual: payload.len(),
                })
            );
        }
    }

    #[test]
    fn flag_encodes_as_a_single_byte() {
        assert_eq!(encode_flag(true), [1]);
        assert_eq!(encode_flag(false), [0]);
    }
}
