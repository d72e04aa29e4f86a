//! Binary/text conversion.
//!
//! The adapters move bytes across the driver boundary as base64 text. This
//! module turns caller payloads into that text and back, chunked by a buffer
//! size hint so large payloads yield to the scheduler between chunks.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::StreamExt;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use strum::{Display, EnumString};
use thiserror::Error;

/// Default chunk size for conversions. A multiple of both 3 and 4, so
/// base64 chunks concatenate without re-padding.
pub const DEFAULT_BUFFER_SIZE: usize = 96 * 1024;

/// Conversion error.
#[derive(Debug, Error)]
pub enum ConvError {
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("character {0:?} is outside the binary string range")]
    InvalidBinaryChar(char),

    #[error("stream error: {0}")]
    Stream(#[from] io::Error),
}

/// Conversion result type.
pub type ConvResult<T> = Result<T, ConvError>;

/// How a text payload represents its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StringType {
    /// UTF-8 text.
    #[default]
    Text,
    /// Standard base64 with padding.
    Base64,
    /// One char per byte, code points 0-255.
    Binary,
}

/// Caller-supplied payload.
pub enum Data {
    Bytes(Vec<u8>),
    /// Text, interpreted according to the `src_string_type` option.
    Text(String),
    Stream(BoxStream<'static, io::Result<Vec<u8>>>),
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Data::Text(t) => f.debug_tuple("Text").field(&t.len()).finish(),
            Data::Stream(_) => f.debug_tuple("Stream").field(&"<stream>").finish(),
        }
    }
}

impl From<Vec<u8>> for Data {
    fn from(b: Vec<u8>) -> Self {
        Data::Bytes(b)
    }
}

impl From<&[u8]> for Data {
    fn from(b: &[u8]) -> Self {
        Data::Bytes(b.to_vec())
    }
}

impl From<String> for Data {
    fn from(t: String) -> Self {
        Data::Text(t)
    }
}

impl From<&str> for Data {
    fn from(t: &str) -> Self {
        Data::Text(t.to_string())
    }
}

/// Per-call conversion hints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Representation of text input. Defaults to [`StringType::Text`].
    pub src_string_type: Option<StringType>,
    /// Chunk size hint. Defaults to [`DEFAULT_BUFFER_SIZE`].
    pub buffer_size: Option<usize>,
}

impl ConvertOptions {
    fn string_type(&self) -> StringType {
        self.src_string_type.unwrap_or_default()
    }

    /// Buffer size rounded down to a multiple of `unit` (at least `unit`).
    fn chunk(&self, unit: usize) -> usize {
        let size = self.buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        (size / unit).max(1) * unit
    }
}

/// Converts payloads to and from base64 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Converter;

impl Converter {
    /// Encode a payload as base64.
    pub async fn to_base64(&self, data: Data, options: &ConvertOptions) -> ConvResult<String> {
        let chunk = options.chunk(3);
        match data {
            Data::Bytes(bytes) => Ok(encode_chunked(&bytes, chunk).await),
            Data::Text(text) => match options.string_type() {
                StringType::Text => Ok(encode_chunked(text.as_bytes(), chunk).await),
                StringType::Base64 => {
                    // Validate without re-encoding
                    STANDARD.decode(&text)?;
                    Ok(text)
                }
                StringType::Binary => {
                    let bytes = binary_to_bytes(&text)?;
                    Ok(encode_chunked(&bytes, chunk).await)
                }
            },
            Data::Stream(mut stream) => {
                let mut out = String::new();
                let mut pending: Vec<u8> = Vec::new();
                while let Some(piece) = stream.next().await {
                    pending.extend_from_slice(&piece?);
                    let ready = pending.len() / 3 * 3;
                    if ready >= chunk {
                        STANDARD.encode_string(&pending[..ready], &mut out);
                        pending.drain(..ready);
                    }
                }
                STANDARD.encode_string(&pending, &mut out);
                Ok(out)
            }
        }
    }

    /// Decode text into bytes according to `src_string_type`.
    pub async fn to_bytes(&self, encoded: &str, options: &ConvertOptions) -> ConvResult<Vec<u8>> {
        match options.string_type() {
            StringType::Text => Ok(encoded.as_bytes().to_vec()),
            StringType::Binary => binary_to_bytes(encoded),
            StringType::Base64 => {
                let chunk = options.chunk(4);
                let mut out = Vec::with_capacity(encoded.len() / 4 * 3);
                let mut pieces = encoded.as_bytes().chunks(chunk).peekable();
                while let Some(piece) = pieces.next() {
                    STANDARD.decode_vec(piece, &mut out)?;
                    if pieces.peek().is_some() {
                        tokio::task::yield_now().await;
                    }
                }
                Ok(out)
            }
        }
    }
}

async fn encode_chunked(bytes: &[u8], chunk: usize) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    let mut pieces = bytes.chunks(chunk).peekable();
    while let Some(piece) = pieces.next() {
        STANDARD.encode_string(piece, &mut out);
        if pieces.peek().is_some() {
            tokio::task::yield_now().await;
        }
    }
    out
}

fn binary_to_bytes(text: &str) -> ConvResult<Vec<u8>> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).map_err(|_| ConvError::InvalidBinaryChar(c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn opts(src: Option<StringType>, buffer_size: Option<usize>) -> ConvertOptions {
        ConvertOptions {
            src_string_type: src,
            buffer_size,
        }
    }

    #[tokio::test]
    async fn test_bytes_to_base64() {
        let conv = Converter;
        let encoded = conv
            .to_base64(Data::from(&b"hello world"[..]), &ConvertOptions::default())
            .await
            .unwrap();
        assert_eq!(encoded, "aGVsbG8gd29ybGQ=");
    }

    #[tokio::test]
    async fn test_small_buffer_still_valid_base64() {
        let conv = Converter;
        let data: Vec<u8> = (0..=255).collect();
        // 5 rounds down to 3, so every chunk encodes without padding
        let encoded = conv
            .to_base64(Data::from(data.clone()), &opts(None, Some(5)))
            .await
            .unwrap();
        assert_eq!(encoded, STANDARD.encode(&data));

        let decoded = conv
            .to_bytes(&encoded, &opts(Some(StringType::Base64), Some(7)))
            .await
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[tokio::test]
    async fn test_text_string_types() {
        let conv = Converter;

        let encoded = conv
            .to_base64(Data::from("héllo"), &ConvertOptions::default())
            .await
            .unwrap();
        assert_eq!(STANDARD.decode(&encoded).unwrap(), "héllo".as_bytes());

        let encoded = conv
            .to_base64(Data::from("aGk="), &opts(Some(StringType::Base64), None))
            .await
            .unwrap();
        assert_eq!(encoded, "aGk=");

        let encoded = conv
            .to_base64(Data::from("\u{00ff}\u{0000}A"), &opts(Some(StringType::Binary), None))
            .await
            .unwrap();
        assert_eq!(STANDARD.decode(&encoded).unwrap(), vec![0xff, 0x00, b'A']);
    }

    #[tokio::test]
    async fn test_invalid_inputs() {
        let conv = Converter;

        let err = conv
            .to_base64(Data::from("not base64!"), &opts(Some(StringType::Base64), None))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvError::InvalidBase64(_)));

        let err = conv
            .to_base64(Data::from("\u{0100}"), &opts(Some(StringType::Binary), None))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvError::InvalidBinaryChar('\u{0100}')));

        let err = conv
            .to_bytes("@@@@", &opts(Some(StringType::Base64), None))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvError::InvalidBase64(_)));
    }

    #[tokio::test]
    async fn test_stream_to_base64() {
        let conv = Converter;
        let pieces: Vec<io::Result<Vec<u8>>> =
            vec![Ok(b"hel".to_vec()), Ok(b"lo w".to_vec()), Ok(b"orld".to_vec())];
        let data = Data::Stream(stream::iter(pieces).boxed());

        let encoded = conv.to_base64(data, &opts(None, Some(3))).await.unwrap();
        assert_eq!(encoded, "aGVsbG8gd29ybGQ=");
    }

    #[tokio::test]
    async fn test_stream_error_propagates() {
        let conv = Converter;
        let pieces: Vec<io::Result<Vec<u8>>> =
            vec![Ok(b"abc".to_vec()), Err(io::Error::other("pipe closed"))];
        let data = Data::Stream(stream::iter(pieces).boxed());

        let err = conv
            .to_base64(data, &ConvertOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConvError::Stream(_)));
    }

    #[tokio::test]
    async fn test_empty_roundtrip() {
        let conv = Converter;
        let encoded = conv
            .to_base64(Data::Bytes(Vec::new()), &ConvertOptions::default())
            .await
            .unwrap();
        assert_eq!(encoded, "");
        let decoded = conv
            .to_bytes(&encoded, &opts(Some(StringType::Base64), None))
            .await
            .unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_string_type_names() {
        assert_eq!(StringType::Base64.to_string(), "base64");
        assert_eq!("binary".parse::<StringType>().unwrap(), StringType::Binary);
    }
}
