// Rise of Elites Schema - Shared type definitions
// This crate contains the catalog data types shared between the
// rise-of-elites crate and its build script. Both sides go through the
// codec helpers below so compiled data and runtime decoding always agree.

pub use elite_data::*;
pub use elite_types::*;
pub use item_data::*;
pub use quest_data::*;
pub use zone::*;

pub mod elite_data;
pub mod elite_types;
pub mod item_data;
pub mod quest_data;
pub mod zone;

/// Encode a catalog entry into the compact form embedded in the binary.
pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, postcard::Error> {
    postcard::to_allocvec(value)
}

/// Decode a catalog entry produced by [`encode`].
pub fn decode<'a, T: serde::Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, postcard::Error> {
    postcard::from_bytes(bytes)
}
