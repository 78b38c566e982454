//! Run-length encoder producing copy/repeat blocks
//! Runs of 3..=128 identical bytes become a repeat block [-COUNT][BYTE],
//! everything else is gathered into copy blocks [LEN][BYTES...] of at most 127 bytes.
//! The stream always ends with a single terminator marker.

use super::block::{copy_marker, repeat_marker, MAX_COPY_LEN, MAX_REPEAT, MIN_REPEAT, TERMINATOR};
use crate::error::RleError;

pub fn encode(source: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(source.len() + source.len() / MAX_COPY_LEN + 2);
    let mut copy_buf: Vec<u8> = Vec::with_capacity(MAX_COPY_LEN);
    let mut i = 0;

    while i < source.len() {
        let current = source[i];
        let run_length = source[i..]
            .iter()
            .take(MAX_REPEAT)
            .take_while(|&&b| b == current)
            .count();

        if run_length < MIN_REPEAT {
            // Too short to pay for a repeat block, keep as literals
            if copy_buf.len() + run_length > MAX_COPY_LEN {
                flush_copy(&mut encoded, &mut copy_buf);
            }
            copy_buf.extend_from_slice(&source[i..i + run_length]);
        } else {
            flush_copy(&mut encoded, &mut copy_buf);
            encoded.push(repeat_marker(run_length) as u8);
            encoded.push(current);
        }

        i += run_length;
    }

    flush_copy(&mut encoded, &mut copy_buf);
    encoded.push(TERMINATOR);
    encoded
}

/// Encodes wider integers, rejecting the first value outside `0..=255`.
pub fn encode_values<T: Copy + Into<i64>>(values: &[T]) -> Result<Vec<u8>, RleError> {
    let bytes = values
        .iter()
        .enumerate()
        .map(|(index, &v)| {
            let value: i64 = v.into();
            u8::try_from(value).map_err(|_| RleError::ValueOutOfRange { index, value })
        })
        .collect::<Result<Vec<u8>, RleError>>()?;
    Ok(encode(&bytes))
}

fn flush_copy(encoded: &mut Vec<u8>, copy_buf: &mut Vec<u8>) {
    if copy_buf.is_empty() {
        return;
    }
    encoded.push(copy_marker(copy_buf.len()));
    encoded.append(copy_buf);
}
