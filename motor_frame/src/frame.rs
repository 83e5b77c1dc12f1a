/*!
Broadcast frame encoding and scanning.

A frame is the message type followed by one fixed-size block per motor:

```text
[type 0][type 1] { [addr 0][addr 1][amp lo][amp hi][freq lo][freq hi][phase lo][phase hi] } * N
```

with `N <= 6`, so a frame is always `2 + 8 * N` bytes. There is no length
field and no per-block framing; end devices walk the blocks and keep the one
carrying their own address.
*/

use serde::Serialize;
use tracing::debug;

use crate::error::{DecodeError, EncodingError};
use crate::motor::{DeviceAddress, MessageType, MotorRecord, ParameterSet};
use crate::protocol::{ADDRESS_LEN, BLOCK_LEN, HEADER_LEN, MAX_FRAME_LEN, MAX_MOTORS, PARAMS_LEN};
use crate::quantize;

/// Encode a broadcast frame.
///
/// The caller guarantees that every address is unique and matches the
/// address its end device was provisioned with. Every record is validated
/// before the frame is returned, so an error never leaves a partial frame.
pub fn encode(message_type: MessageType, motors: &[MotorRecord]) -> Result<Frame, EncodingError> {
    if motors.len() > MAX_MOTORS {
        return Err(EncodingError::TooManyMotors {
            count: motors.len(),
            max: MAX_MOTORS,
        });
    }

    let mut bytes = Vec::with_capacity(HEADER_LEN + motors.len() * BLOCK_LEN);
    bytes.extend_from_slice(message_type.as_bytes());

    for motor in motors {
        let params = quantize::encode_params(&motor.params)?;
        bytes.extend_from_slice(motor.address.as_bytes());
        bytes.extend_from_slice(&params);
    }

    debug!(
        "Encoded frame {} with {} motor(s), {} bytes",
        message_type,
        motors.len(),
        bytes.len()
    );

    Ok(Frame { bytes })
}

/// One motor block as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorBlock {
    pub address: DeviceAddress,
    /// Quantized amplitude, frequency and phase shift
    pub raw: [u16; 3],
}

impl MotorBlock {
    fn from_bytes(block: &[u8]) -> Self {
        let mut address = [0u8; ADDRESS_LEN];
        address.copy_from_slice(&block[..ADDRESS_LEN]);
        let mut params = [0u8; PARAMS_LEN];
        params.copy_from_slice(&block[ADDRESS_LEN..BLOCK_LEN]);

        Self {
            address: DeviceAddress(address),
            raw: quantize::raw_params(&params),
        }
    }

    /// Parameters as the end device reconstructs them
    pub fn params(&self) -> ParameterSet {
        quantize::dequantize_set(self.raw)
    }
}

/// An encoded broadcast frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    /// Validate the shape of bytes received from elsewhere
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let len = bytes.len();
        if len < HEADER_LEN || len > MAX_FRAME_LEN || (len - HEADER_LEN) % BLOCK_LEN != 0 {
            return Err(DecodeError::InvalidFrameLength(len));
        }

        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// A frame always holds at least the message type
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn message_type(&self) -> MessageType {
        MessageType([self.bytes[0], self.bytes[1]])
    }

    pub fn motor_count(&self) -> usize {
        (self.bytes.len() - HEADER_LEN) / BLOCK_LEN
    }

    /// Motor blocks in frame order
    pub fn blocks(&self) -> impl Iterator<Item = MotorBlock> + '_ {
        self.bytes[HEADER_LEN..]
            .chunks_exact(BLOCK_LEN)
            .map(MotorBlock::from_bytes)
    }

    /// Parameters for one end device, found the way the device itself does:
    /// the first block whose address matches. Non-motor frames carry none.
    pub fn find(&self, address: DeviceAddress) -> Option<ParameterSet> {
        if self.message_type() != MessageType::MOTOR {
            return None;
        }

        self.blocks()
            .find(|block| block.address == address)
            .map(|block| block.params())
    }
}

/// Serializable view of one motor block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockSummary {
    pub address: String,
    pub raw: [u16; 3],
    pub params: ParameterSet,
}

/// Serializable view of a whole frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSummary {
    pub message_type: String,
    pub length: usize,
    pub motors: Vec<BlockSummary>,
}

impl Frame {
    pub fn summary(&self) -> FrameSummary {
        FrameSummary {
            message_type: self.message_type().to_string(),
            length: self.len(),
            motors: self
                .blocks()
                .map(|block| BlockSummary {
                    address: block.address.to_string(),
                    raw: block.raw,
                    params: block.params(),
                })
                .collect(),
        }
    }

    /// Pretty-printed JSON of [`Frame::summary`]
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(&self.summary())?)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
