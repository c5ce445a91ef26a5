//! XML response decoding into caller-chosen payload types.

use std::io::Read;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Error;

/// Decodes XML bodies with `quick-xml`'s serde support.
///
/// With `debug` set, the raw payload is emitted at debug level before
/// parsing. The parser always sees the same complete bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    debug: bool,
}

impl Decoder {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, Error> {
        let text = std::str::from_utf8(body)
            .map_err(|e| Error::Decode(format!("response is not valid UTF-8: {e}")))?;

        if self.debug {
            debug!(payload = %text, "raw response payload");
        }

        quick_xml::de::from_str(text.trim_start()).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Reads `reader` to the end, then decodes.
    pub fn decode_from<T, R>(&self, mut reader: R) -> Result<T, Error>
    where
        T: DeserializeOwned,
        R: Read,
    {
        let mut body = Vec::new();
        reader
            .read_to_end(&mut body)
            .map_err(|e| Error::Decode(format!("failed to read response body: {e}")))?;
        self.decode(&body)
    }
}
