//! Save/load boundary: models and histories to and from bytes.
//!
//! Every payload is wrapped in an envelope carrying a format tag, the
//! writer's version and the oldest reader version able to read it.

mod envelope;
mod extras;

pub use envelope::{decode, decode_history, encode, encode_history, FORMAT, MIN_READER_VERSION, VERSION};
pub use extras::Extras;
