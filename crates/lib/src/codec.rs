//! Value serialization.
//!
//! The store never looks inside an entry file. It hands a reader or writer to a
//! [`Codec`] and keeps whatever value comes back. [`JsonCodec`] is the default
//! and works for any serde type.

use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CodecError;

/// Converts values of type `V` to and from a byte stream.
pub trait Codec<V> {
  fn encode(&self, value: &V, writer: &mut dyn Write) -> Result<(), CodecError>;

  fn decode(&self, reader: &mut dyn Read) -> Result<V, CodecError>;
}

/// JSON encoding via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
  pretty: bool,
}

impl JsonCodec {
  pub fn new() -> Self {
    Self::default()
  }

  /// Indent output. Decoding is unaffected.
  pub fn pretty() -> Self {
    Self { pretty: true }
  }
}

impl<V> Codec<V> for JsonCodec
where
  V: Serialize + DeserializeOwned,
{
  fn encode(&self, value: &V, writer: &mut dyn Write) -> Result<(), CodecError> {
    if self.pretty {
      serde_json::to_writer_pretty(&mut *writer, value)?;
    } else {
      serde_json::to_writer(&mut *writer, value)?;
    }
    writer.flush()?;
    Ok(())
  }

  fn decode(&self, reader: &mut dyn Read) -> Result<V, CodecError> {
    Ok(serde_json::from_reader(reader)?)
  }
}
