//! Frame encoding and decoding for the MAI-z protocol.
//!
//! Frame format:
//! - LENGTH (1 byte): number of params + 2
//! - COMMAND (1 byte): command identifier
//! - PARAMS (0-16 bytes): command-specific data
//! - CHECKSUM (1 byte): one's complement of the sum of all preceding bytes

use heapless::Vec;

use crate::commands::{CommandId, ErrorCode};

/// Maximum number of parameter bytes in one frame
pub const MAX_PARAMS: usize = 16;

/// Maximum complete frame size (LENGTH + COMMAND + MAX_PARAMS + CHECKSUM)
pub const MAX_FRAME_SIZE: usize = 1 + 1 + MAX_PARAMS + 1;

/// Smallest frame that can carry a payload byte
const MIN_INBOUND_SIZE: usize = 4;

/// Errors that can occur while building a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Params exceed the maximum frame size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// One's complement of the byte sum, modulo 256
pub fn checksum(bytes: &[u8]) -> u8 {
    !bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Minimal little-endian encoding of a distance value
///
/// Zero encodes to an empty sequence; there is never a trailing zero byte.
pub fn int_to_le_bytes(mut value: u32) -> Vec<u8, 4> {
    let mut bytes = Vec::new();
    while value > 0 {
        // At most four iterations for a u32
        let _ = bytes.push((value & 0xFF) as u8);
        value >>= 8;
    }
    bytes
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command identifier
    pub command: CommandId,
    /// Parameter (outbound) or payload (inbound) bytes
    pub params: Vec<u8, MAX_PARAMS>,
}

impl Frame {
    /// Create a new frame with the given command and params
    pub fn new(command: CommandId, params: &[u8]) -> Result<Self, FrameError> {
        let mut vec = Vec::new();
        vec.extend_from_slice(params)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self {
            command,
            params: vec,
        })
    }

    /// Create a frame with no params (the request half of an RX exchange)
    pub fn request(command: CommandId) -> Self {
        Self {
            command,
            params: Vec::new(),
        }
    }

    /// Value of the LENGTH byte
    pub fn length(&self) -> u8 {
        (self.params.len() + 2) as u8
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = 3 + self.params.len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = self.length();
        buffer[1] = self.command.to_byte();
        buffer[2..2 + self.params.len()].copy_from_slice(&self.params);
        buffer[frame_len - 1] = checksum(&buffer[..frame_len - 1]);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }

    /// Validate and split a received frame
    ///
    /// Fails with `ReadError` if the buffer is shorter than a minimal frame,
    /// `RxChecksumError` if the trailing byte does not match, and
    /// `RxCommandError` if the command byte is not a known command.
    pub fn parse(raw: &[u8]) -> Result<Self, ErrorCode> {
        if raw.len() < MIN_INBOUND_SIZE {
            return Err(ErrorCode::ReadError);
        }

        let (body, tail) = raw.split_at(raw.len() - 1);
        if checksum(body) != tail[0] {
            return Err(ErrorCode::RxChecksumError);
        }

        let command = CommandId::from_byte(body[1]).ok_or(ErrorCode::RxCommandError)?;
        let mut params = Vec::new();
        params
            .extend_from_slice(&body[2..])
            .map_err(|_| ErrorCode::InvalidData)?;

        Ok(Self { command, params })
    }
}

/// Build the outbound bytes for a command
pub fn encode(command: CommandId, params: &[u8]) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
    Frame::new(command, params)?.encode_to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_checksum_arithmetic() {
        // 5 + 1 + 1 + 50 + 0 = 57, !57 = 198
        let encoded = encode(CommandId::Move, &[1, 50, 0]).unwrap();
        assert_eq!(&encoded[..], &[5, 1, 1, 50, 0, 198]);
    }

    #[test]
    fn test_encode_empty_request() {
        let encoded = Frame::request(CommandId::Error).encode_to_vec().unwrap();
        assert_eq!(encoded.len(), 3);
        assert_eq!(encoded[0], 2);
        assert_eq!(encoded[1], 0x40);
        assert_eq!(encoded[2], !(2u8 + 0x40));
    }

    #[test]
    fn test_checksum_wraps() {
        assert_eq!(checksum(&[0xFF, 0x02]), !0x01);
        assert_eq!(checksum(&[]), 0xFF);
    }

    #[test]
    fn test_int_to_le_bytes() {
        assert!(int_to_le_bytes(0).is_empty());
        assert_eq!(&int_to_le_bytes(0x7F)[..], &[0x7F]);
        assert_eq!(&int_to_le_bytes(1270)[..], &[0xF6, 0x04]);
        assert_eq!(&int_to_le_bytes(0x0001_0000)[..], &[0x00, 0x00, 0x01]);
        assert_eq!(&int_to_le_bytes(u32::MAX)[..], &[0xFF; 4]);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame = Frame::new(CommandId::Move, &[1, 2, 3]).unwrap();
        let mut buffer = [0u8; 5];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_payload_too_large() {
        let params = [0u8; MAX_PARAMS + 1];
        assert_eq!(
            Frame::new(CommandId::Move, &params),
            Err(FrameError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_parse_short_frame() {
        assert_eq!(Frame::parse(&[3, 0x40, 0xBC]), Err(ErrorCode::ReadError));
        assert_eq!(Frame::parse(&[]), Err(ErrorCode::ReadError));
    }

    #[test]
    fn test_parse_invalid_checksum() {
        let mut encoded = encode(CommandId::Error, &[0]).unwrap();
        let last_idx = encoded.len() - 1;
        encoded[last_idx] ^= 0xFF;
        assert_eq!(Frame::parse(&encoded), Err(ErrorCode::RxChecksumError));
    }

    #[test]
    fn test_parse_unknown_command() {
        let mut raw = [3u8, 0x7E, 0x00, 0x00];
        raw[3] = checksum(&raw[..3]);
        assert_eq!(Frame::parse(&raw), Err(ErrorCode::RxCommandError));
    }

    proptest! {
        #[test]
        fn prop_encode_parse_roundtrip(
            command in proptest::sample::select(CommandId::ALL.to_vec()),
            params in proptest::collection::vec(any::<u8>(), 1..=MAX_PARAMS),
        ) {
            let encoded = encode(command, &params).unwrap();
            prop_assert_eq!(encoded[0] as usize, params.len() + 2);

            let parsed = Frame::parse(&encoded).unwrap();
            prop_assert_eq!(parsed.command, command);
            prop_assert_eq!(&parsed.params[..], &params[..]);
        }

        #[test]
        fn prop_le_bytes_minimal(value in any::<u32>()) {
            let bytes = int_to_le_bytes(value);
            prop_assert!(bytes.last() != Some(&0));
            let rebuilt = bytes
                .iter()
                .rev()
                .fold(0u32, |acc, &b| (acc << 8) | b as u32);
            prop_assert_eq!(rebuilt, value);
        }
    }
}
