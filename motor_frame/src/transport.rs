/*!
Link to the access point.

The access point hangs off a serial port. Frames are written as raw bytes and
the access point echoes what it broadcast, so a reply of the frame's length
can optionally be awaited. Every blocking call is bounded by a timeout and
nothing is retried.
*/

use std::io::{Read, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serialport::SerialPort;
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::frame::Frame;

/// Byte sink (and source) for encoded frames
pub trait Transport {
    /// Write the whole buffer or fail
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Read exactly `len` bytes within `timeout`
    fn receive(&mut self, len: usize, timeout: Duration) -> Result<Vec<u8>, TransportError>;
}

/// Serial port settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialSettings {
    /// Port name, e.g. `COM10` or `/dev/ttyACM0`
    pub port: String,

    pub baud_rate: u32,

    /// Read timeout in seconds
    pub timeout_secs: f64,

    /// Write timeout in seconds
    pub write_timeout_secs: f64,
}

impl SerialSettings {
    pub fn timeout(&self) -> Result<Duration, TransportError> {
        seconds("timeout_secs", self.timeout_secs)
    }

    pub fn write_timeout(&self) -> Result<Duration, TransportError> {
        seconds("write_timeout_secs", self.write_timeout_secs)
    }
}

// Negative, NaN and out-of-range values come straight from user config
fn seconds(setting: &'static str, value: f64) -> Result<Duration, TransportError> {
    Duration::try_from_secs_f64(value).map_err(|_| TransportError::InvalidTimeout { setting, value })
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: "COM10".to_string(),
            baud_rate: 57_600,
            timeout_secs: 5.0,
            write_timeout_secs: 5.0,
        }
    }
}

/// [`Transport`] over a serial port
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    name: String,
    write_timeout: Duration,
}

impl SerialTransport {
    /// Open the port. Anything else holding it (a terminal emulator, say) must let go first.
    pub fn open(settings: &SerialSettings) -> Result<Self, TransportError> {
        let timeout = settings.timeout()?;
        let write_timeout = settings.write_timeout()?;

        let port = serialport::new(&settings.port, settings.baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: settings.port.clone(),
                source,
            })?;

        info!("Opened {} at {} baud", settings.port, settings.baud_rate);

        Ok(Self {
            port,
            name: settings.port.clone(),
            write_timeout,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.port.set_timeout(self.write_timeout)?;

        let timeout = self.write_timeout;
        self.port
            .write_all(bytes)
            .and_then(|_| self.port.flush())
            .map_err(|e| TransportError::from_io(e, timeout))?;

        debug!("Wrote {} bytes to {}", bytes.len(), self.name);
        Ok(())
    }

    fn receive(&mut self, len: usize, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        self.port.set_timeout(timeout)?;

        let mut buf = vec![0u8; len];
        self.port
            .read_exact(&mut buf)
            .map_err(|e| TransportError::from_io(e, timeout))?;

        debug!("Read {} bytes from {}", len, self.name);
        Ok(buf)
    }
}

/// Send a frame and, when `reply_timeout` is given, wait for a reply of the same length
pub fn exchange<T: Transport + ?Sized>(
    transport: &mut T,
    frame: &Frame,
    reply_timeout: Option<Duration>,
) -> Result<Option<Vec<u8>>, TransportError> {
    transport.send(frame.as_bytes())?;
    info!("Sent {} byte frame", frame.len());

    let Some(timeout) = reply_timeout else {
        return Ok(None);
    };

    let reply = transport.receive(frame.len(), timeout)?;
    if reply != frame.as_bytes() {
        warn!("Reply differs from the frame that was sent");
    }
    Ok(Some(reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::encode;
    use crate::motor::{DeviceAddress, MessageType, MotorRecord, ParameterSet};
    use std::collections::VecDeque;

    /// Echoes everything written, like the access point does
    #[derive(Default)]
    struct Loopback {
        written: Vec<u8>,
        pending: VecDeque<u8>,
        silent: bool,
    }

    impl Transport for Loopback {
        fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
            self.written.extend_from_slice(bytes);
            if !self.silent {
                self.pending.extend(bytes.iter().copied());
            }
            Ok(())
        }

        fn receive(&mut self, len: usize, timeout: Duration) -> Result<Vec<u8>, TransportError> {
            if self.pending.len() < len {
                return Err(TransportError::Timeout(timeout));
            }
            Ok(self.pending.drain(..len).collect())
        }
    }

    fn sample_frame() -> Frame {
        let motor = MotorRecord::new("a", DeviceAddress::new(0, 1), ParameterSet::new(1.0, 0.5, 0.0));
        encode(MessageType::MOTOR, &[motor]).unwrap()
    }

    #[test]
    fn test_exchange_reads_echo() {
        let frame = sample_frame();
        let mut link = Loopback::default();

        let reply = exchange(&mut link, &frame, Some(Duration::from_secs(1))).unwrap();
        assert_eq!(reply.as_deref(), Some(frame.as_bytes()));
        assert_eq!(link.written, frame.as_bytes());
    }

    #[test]
    fn test_exchange_without_reply() {
        let frame = sample_frame();
        let mut link = Loopback::default();

        assert_eq!(exchange(&mut link, &frame, None).unwrap(), None);
        assert_eq!(link.pending.len(), frame.len());
    }

    #[test]
    fn test_exchange_times_out() {
        let frame = sample_frame();
        let mut link = Loopback {
            silent: true,
            ..Default::default()
        };

        let err = exchange(&mut link, &frame, Some(Duration::from_millis(10))).unwrap_err();
        assert!(matches!(err, TransportError::Timeout(_)));
    }

    #[test]
    fn test_default_settings() {
        let settings = SerialSettings::default();
        assert_eq!(settings.baud_rate, 57_600);
        assert_eq!(settings.timeout().unwrap(), Duration::from_secs(5));
        assert_eq!(settings.write_timeout().unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeouts_are_errors() {
        for value in [-1.0, f64::NAN, f64::INFINITY, 1e300] {
            let settings = SerialSettings {
                timeout_secs: value,
                ..Default::default()
            };
            assert!(matches!(
                settings.timeout(),
                Err(TransportError::InvalidTimeout { setting: "timeout_secs", .. })
            ));
        }

        let settings = SerialSettings {
            write_timeout_secs: -0.5,
            ..Default::default()
        };
        assert!(matches!(
            settings.write_timeout(),
            Err(TransportError::InvalidTimeout { setting: "write_timeout_secs", .. })
        ));
    }

    #[test]
    fn test_open_rejects_negative_timeout_before_touching_port() {
        let settings = SerialSettings {
            port: "/nonexistent/motormsg-test-port".to_string(),
            timeout_secs: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            SerialTransport::open(&settings),
            Err(TransportError::InvalidTimeout { .. })
        ));
    }

    #[test]
    fn test_open_missing_port_fails() {
        let settings = SerialSettings {
            port: "/nonexistent/motormsg-test-port".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            SerialTransport::open(&settings),
            Err(TransportError::Open { .. })
        ));
    }
}
