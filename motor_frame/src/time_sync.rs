/*!
Time synchronisation messages.

The access point periodically broadcasts its clock so end devices can keep
their sinusoids in phase. The message shares the channel with motor frames
and is told apart by its discriminator.
*/

use crate::error::DecodeError;
use crate::protocol::{HEADER_LEN, TIME_MSG, TIME_MSG_LEN};

/// Encode a time message: discriminator followed by the time as little-endian f32
pub fn encode_time(seconds: f32) -> [u8; TIME_MSG_LEN] {
    let mut bytes = [0u8; TIME_MSG_LEN];
    bytes[..HEADER_LEN].copy_from_slice(&TIME_MSG);
    bytes[HEADER_LEN..].copy_from_slice(&seconds.to_le_bytes());
    bytes
}

/// Decode a time message
pub fn decode_time(bytes: &[u8]) -> Result<f32, DecodeError> {
    let bytes: [u8; TIME_MSG_LEN] = bytes
        .try_into()
        .map_err(|_| DecodeError::InvalidTimeLength(bytes.len()))?;

    let found = [bytes[0], bytes[1]];
    if found != TIME_MSG {
        return Err(DecodeError::UnexpectedMessageType {
            found,
            expected: TIME_MSG,
        });
    }

    let mut time = [0u8; 4];
    time.copy_from_slice(&bytes[HEADER_LEN..]);
    Ok(f32::from_le_bytes(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::MOTOR_MSG;

    #[test]
    fn test_time_message_layout() {
        let bytes = encode_time(1.0);
        assert_eq!(bytes, [0xFE, 0xFF, 0x00, 0x00, 0x80, 0x3F]);
        assert_eq!(decode_time(&bytes), Ok(1.0));
    }

    #[test]
    fn test_decode_time_rejects_motor_frames() {
        let mut bytes = encode_time(12.5);
        bytes[..2].copy_from_slice(&MOTOR_MSG);
        assert_eq!(
            decode_time(&bytes),
            Err(DecodeError::UnexpectedMessageType {
                found: MOTOR_MSG,
                expected: TIME_MSG
            })
        );
        assert_eq!(decode_time(&bytes[..5]), Err(DecodeError::InvalidTimeLength(5)));
    }
}
