pub mod block;
pub mod decoder;
pub mod encoder;

pub use block::{signed_values, Block, BlockReader, StreamStats, MAX_COPY_LEN, MAX_REPEAT, MIN_REPEAT, TERMINATOR};
pub use decoder::{decode, decode_with};
pub use encoder::{encode, encode_values};
