/*!
# Motor Frame

Encoding of the broadcast motor message sent from the access point (AP) to
every end device (ED) on the radio link.

The AP cannot hold the addresses of all end devices, so it broadcasts one
frame carrying parameters for up to six motors. Each ED stores only its own
address and scans the frame for the block that carries it.

```text
+------+------+--------+--------+--------+------+--------+-----
| type (2)    | addr (2)| amp (2)| freq (2)| phase (2)| addr (2)| ...
+------+------+--------+--------+--------+------+--------+-----
```

## Core Types

- [`Frame`] - Encoded broadcast frame
- [`MotorRecord`] - One motor's address and parameters
- [`MessageType`] - Two-byte discriminator at the head of every message

## Modules

- [`motor`] - Motor identifiers, addresses and parameter sets
- [`quantize`] - Fixed-point conversion of parameters
- [`frame`] - Frame encoding and end-device style scanning
- [`time_sync`] - Time messages sharing the channel
- [`hex_render`] - Terminal-friendly hex token streams
- [`transport`] - Serial link to the access point
- [`error`] - Common error types
*/

pub mod error;
pub mod frame;
pub mod hex_render;
pub mod motor;
pub mod quantize;
pub mod time_sync;
pub mod transport;

// Re-export commonly used types
pub use error::{DecodeError, EncodingError, FrameError, Result, TransportError};
pub use frame::{encode, BlockSummary, Frame, FrameSummary, MotorBlock};
pub use hex_render::HexStyle;
pub use motor::{DeviceAddress, MessageType, MotorId, MotorRecord, Parameter, ParameterSet};
pub use transport::{SerialSettings, SerialTransport, Transport};

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol constants
pub mod protocol {
    /// Discriminator of a motor message. Configured on the end devices as well.
    pub const MOTOR_MSG: [u8; 2] = [0xFF, 0xFF];

    /// Discriminator of a time synchronisation message
    pub const TIME_MSG: [u8; 2] = [0xFE, 0xFF];

    /// Fixed-point scaling applied to every motor parameter
    pub const SCALE_FACTOR: f64 = 500.0;

    /// Maximum number of motors in one broadcast
    pub const MAX_MOTORS: usize = 6;

    /// Size of the message type header in bytes
    pub const HEADER_LEN: usize = 2;

    /// Size of a device address in bytes
    pub const ADDRESS_LEN: usize = 2;

    /// Size of the encoded parameters of one motor in bytes
    pub const PARAMS_LEN: usize = 6;

    /// Size of one motor block (address + parameters)
    pub const BLOCK_LEN: usize = ADDRESS_LEN + PARAMS_LEN;

    /// Largest frame the access point will broadcast
    pub const MAX_FRAME_LEN: usize = HEADER_LEN + MAX_MOTORS * BLOCK_LEN;

    /// Size of a time message (header + f32)
    pub const TIME_MSG_LEN: usize = HEADER_LEN + 4;
}
