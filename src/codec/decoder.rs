use super::block::{Block, BlockReader};
use crate::config::DecodeMode;
use crate::error::RleError;
use log::warn;

/// Decode a stream, rejecting anything after the terminator.
pub fn decode(stream: &[u8]) -> Result<Vec<u8>, RleError> {
    decode_with(stream, DecodeMode::Strict)
}

pub fn decode_with(stream: &[u8], mode: DecodeMode) -> Result<Vec<u8>, RleError> {
    let mut decoded = Vec::with_capacity(stream.len() * 2);
    let mut reader = BlockReader::new(stream);

    for block in &mut reader {
        match block? {
            Block::Copy(bytes) => decoded.extend_from_slice(bytes),
            Block::Repeat { count, value } => decoded.resize(decoded.len() + count, value),
            Block::Terminator => break,
        }
    }

    let trailing = reader.remaining();
    if !trailing.is_empty() {
        match mode {
            DecodeMode::Strict => {
                return Err(RleError::TrailingDataAfterTerminator {
                    offset: reader.offset(),
                    trailing: trailing.len(),
                });
            }
            DecodeMode::Lenient => {
                warn!("Ignoring {} bytes after terminator at offset {}", trailing.len(), reader.offset());
            }
        }
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encoder::encode;

    #[test]
    fn test_decode_terminator_only() {
        assert_eq!(decode(&[0]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_blocks() {
        // [2, 7, 7] [-3, 9] [0]
        let stream = [2, 7, 7, 0xFD, 9, 0];
        assert_eq!(decode(&stream).unwrap(), vec![7, 7, 9, 9, 9]);
    }

    #[test]
    fn test_decode_short_repeat_markers() {
        // -1 and -2 never come out of the encoder but are unambiguous
        let stream = [0xFF, 4, 0xFE, 5, 0];
        assert_eq!(decode(&stream).unwrap(), vec![4, 5, 5]);
    }

    #[test]
    fn test_decode_full_repeat() {
        let stream = [0x80, 1, 0];
        assert_eq!(decode(&stream).unwrap(), vec![1; 128]);
    }

    #[test]
    fn test_empty_stream_is_truncated() {
        let err = decode(&[]).unwrap_err();
        assert!(matches!(err, RleError::TruncatedStream { offset: 0, .. }));
    }

    #[test]
    fn test_missing_terminator() {
        let err = decode(&[2, 1, 2]).unwrap_err();
        assert!(matches!(err, RleError::TruncatedStream { offset: 3, needed: 1, available: 0 }));
    }

    #[test]
    fn test_copy_runs_past_end() {
        let err = decode(&[5, 1, 2, 0]).unwrap_err();
        assert!(matches!(err, RleError::TruncatedStream { offset: 0, needed: 5, available: 3 }));
    }

    #[test]
    fn test_repeat_missing_value() {
        let err = decode(&[1, 9, 0xFC]).unwrap_err();
        assert!(matches!(err, RleError::TruncatedStream { offset: 2, needed: 1, available: 0 }));
    }

    #[test]
    fn test_trailing_data_strict() {
        let err = decode(&[1, 9, 0, 3]).unwrap_err();
        assert!(matches!(err, RleError::TrailingDataAfterTerminator { offset: 3, trailing: 1 }));
    }

    #[test]
    fn test_trailing_data_lenient() {
        let decoded = decode_with(&[1, 9, 0, 3, 3], DecodeMode::Lenient).unwrap();
        assert_eq!(decoded, vec![9]);
    }

    #[test]
    fn test_roundtrip_boundaries() {
        for len in [0usize, 1, 2, 3, 126, 127, 128, 129, 255, 256, 1000] {
            let runs = vec![42u8; len];
            assert_eq!(decode(&encode(&runs)).unwrap(), runs, "run of {}", len);

            let literals: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            assert_eq!(decode(&encode(&literals)).unwrap(), literals, "literals of {}", len);
        }
    }

    #[test]
    fn test_roundtrip_tilemap_like() {
        let mut data = vec![0u8; 64];
        data.extend_from_slice(&[1, 2, 3, 3, 4, 4, 4, 4, 5]);
        data.extend(vec![17u8; 300]);
        data.extend((0..=255u8).rev());
        assert_eq!(decode(&encode(&data)).unwrap(), data);
    }
}
