//! Little-endian fixed-width record access over byte buffers.
//!
//! Both the mesh and map formats are flat sequences of little-endian records
//! addressed by byte offset. This crate provides the shared primitives: a
//! bounds-checked reader, a sequential cursor for variable-length blocks, an
//! in-place writer, an appending sink for building buffers, and the two-byte
//! variable-length integer used for string lengths.

mod error;
mod reader;
mod var_len;
mod writer;

pub use error::RecordError;
pub use reader::{RecordCursor, RecordReader};
pub use var_len::{MAX_VAR_LEN, decode_var_len, encode_var_len, var_len_size};
pub use writer::{RecordSink, RecordWriter};
