//! Text formats: the `(re,im)(re,im)...` tuple stream and the Blitz ASCII
//! array layout built on top of it.

mod blitz;
mod tokenizer;

pub use blitz::BlitzArray;
pub use tokenizer::{decode_tuples, TextTokenizer};
