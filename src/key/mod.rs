//! Cache key derivation.
//!
//! A key is the `.`-joined sequence of parts contributed by the receiver
//! and arguments of a call. The rules:
//!
//! - `None` appends `null`, absent values ([`Undefined`], `()`) append `undefined`
//! - sequences and tuples flatten depth first, so `(1, [2, 3])` and `[1, 2, 3]` match
//! - dates append their millisecond timestamp
//! - primitives and opted-in types append their display string
//! - any other [`KeySource`] appends its short type name

mod builder;
mod part;

pub use builder::{CacheKeyBuilder, KEY_SEPARATOR};
pub use part::{short_type_name, KeyPart, KeySource, Undefined};
