//! Length-prefixed postcard framing over a byte stream.
//!
//! Every frame is a 4-byte big-endian length prefix followed by that many
//! bytes of postcard-encoded payload. There is no magic number or version
//! byte: both ends of a connection are always the same build of this crate,
//! since the cluster has no rolling-upgrade story (see Non-goals).

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::WireError;

/// Frames larger than this are refused rather than read into memory. Chat
/// messages and user lists are small; a value this far above any realistic
/// payload exists only to bound a malformed or hostile length prefix.
pub const MAX_FRAME_BYTES: u32 = 16 * 1024 * 1024;

pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<(), WireError> {
    let len = u32::try_from(payload.len()).map_err(|_| WireError::FrameTooLarge(u32::MAX, MAX_FRAME_BYTES))?;
    if len > MAX_FRAME_BYTES {
        return Err(WireError::FrameTooLarge(len, MAX_FRAME_BYTES));
    }
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;
    Ok(())
}

pub fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>, WireError> {
    let mut len_bytes = [0u8; 4];
    if let Err(err) = reader.read_exact(&mut len_bytes) {
        return Err(if err.kind() == std::io::ErrorKind::UnexpectedEof {
            WireError::ConnectionClosed
        } else {
            WireError::Io(err)
        });
    }
    let len = u32::from_be_bytes(len_bytes);
    if len > MAX_FRAME_BYTES {
        return Err(WireError::FrameTooLarge(len, MAX_FRAME_BYTES));
    }
    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, WireError> {
    postcard::to_allocvec(value).map_err(WireError::Encode)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WireError> {
    postcard::from_bytes(bytes).map_err(WireError::Decode)
}

pub fn write_message<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<(), WireError> {
    write_frame(writer, &encode(value)?)
}

pub fn read_message<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<T, WireError> {
    decode(&read_frame(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_a_message() {
        let mut buf = Vec::new();
        write_message(&mut buf, &("hello".to_string(), 42u32)).unwrap();

        let mut cursor = Cursor::new(buf);
        let (s, n): (String, u32) = read_message(&mut cursor).unwrap();
        assert_eq!(s, "hello");
        assert_eq!(n, 42);
    }

    #[test]
    fn read_frame_reports_closed_connection() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let err = read_frame(&mut cursor).unwrap_err();
        assert!(matches!(err, WireError::ConnectionClosed));
    }

    #[test]
    fn oversized_length_prefix_is_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(MAX_FRAME_BYTES + 1).to_be_bytes());
        let mut cursor = Cursor::new(buf);
        let err = read_frame(&mut cursor).unwrap_err();
        assert!(matches!(err, WireError::FrameTooLarge(_, _)));
    }
}
