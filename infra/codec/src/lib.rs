//! # Codec
//!
//! Stateless binary encoding for the records Verity exchanges with its collaborators:
//! [`PackageUserState`] snapshots, [`VerificationRequest`] envelopes and
//! [`GeolocationSuggestion`]s.
//!
//! ## Layout
//!
//! Every record starts with a one-byte flag field, followed by fixed-format fields:
//! UUIDs as two 64-bit words, strings as length-prefixed UTF-8, maps and sets as
//! count-prefixed sequences. See [`wire`] for the primitives.
//!
//! Decoding is strict. An unknown state code, an impossible count, a stray flag bit or
//! leftover bytes fail the record with a [`CodecError`]; nothing is silently defaulted.
//! Isolating one bad record from a batch is left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use verity_codec::{decode, encode};
//! use verity_domain::VerificationRequest;
//!
//! let request: VerificationRequest = ["com.example.mail"].into_iter().collect();
//! let bytes = encode(&request);
//! let back: VerificationRequest = decode(&bytes).unwrap();
//! assert_eq!(back, request);
//! ```

mod error;
mod flags;
mod records;
pub mod wire;

pub use crate::error::{CodecError, CodecErrorExt};
pub use crate::flags::{PackageFlags, SuggestionFlags};
pub use verity_domain::{GeolocationSuggestion, PackageUserState, VerificationRequest};

use crate::wire::{WireReader, WireWriter};

/// A record that can be written to the wire format.
pub trait Encode {
    fn encode_to(&self, writer: &mut WireWriter);
}

/// A record that can be read back from the wire format.
pub trait Decode: Sized {
    /// # Errors
    /// Returns a [`CodecError`] describing the first malformed field.
    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self, CodecError>;
}

/// Encodes one record into a fresh buffer.
#[must_use]
pub fn encode<T: Encode>(value: &T) -> Vec<u8> {
    let mut writer = WireWriter::new();
    value.encode_to(&mut writer);
    writer.into_bytes()
}

/// Decodes exactly one record; trailing bytes are an error.
///
/// # Errors
/// Returns a [`CodecError`] if the input is malformed.
pub fn decode<T: Decode>(bytes: &[u8]) -> Result<T, CodecError> {
    let mut reader = WireReader::new(bytes);
    let value = T::decode_from(&mut reader)?;
    reader.finish()?;
    Ok(value)
}
