/*!
Fixed-point conversion of motor parameters.

A parameter `v` travels as the unsigned 16-bit value `round(v * 500)`, low
byte first. End devices divide by 500 on receipt. Values that do not fit are
rejected rather than wrapped, since a wrapped value is indistinguishable from
a valid one at the receiver.
*/

use num_traits::ToPrimitive;

use crate::error::EncodingError;
use crate::motor::{Parameter, ParameterSet};
use crate::protocol::{PARAMS_LEN, SCALE_FACTOR};

/// Scale and round a parameter into its wire value
pub fn quantize(parameter: Parameter, value: f64) -> Result<u16, EncodingError> {
    // to_u16 yields None for NaN, infinities and anything outside 0..=65535
    (value * SCALE_FACTOR)
        .round()
        .to_u16()
        .ok_or(EncodingError::QuantizationOverflow { parameter, value })
}

/// Recover the parameter value an end device sees for a wire value
pub fn dequantize(raw: u16) -> f64 {
    f64::from(raw) / SCALE_FACTOR
}

/// Split a wire value into `[low, high]`
pub fn to_wire(raw: u16) -> [u8; 2] {
    [(raw & 0xFF) as u8, ((raw >> 8) & 0xFF) as u8]
}

/// Join `[low, high]` back into a wire value
pub fn from_wire(bytes: [u8; 2]) -> u16 {
    u16::from(bytes[0]) | (u16::from(bytes[1]) << 8)
}

/// Quantize all three parameters in wire order
pub fn quantize_set(params: &ParameterSet) -> Result<[u16; 3], EncodingError> {
    let mut raw = [0u16; 3];
    for (slot, parameter) in raw.iter_mut().zip(Parameter::ALL) {
        *slot = quantize(parameter, params.get(parameter))?;
    }
    Ok(raw)
}

/// Encoded parameter bytes of one motor block
pub fn encode_params(params: &ParameterSet) -> Result<[u8; PARAMS_LEN], EncodingError> {
    let raw = quantize_set(params)?;
    let mut bytes = [0u8; PARAMS_LEN];
    for (chunk, value) in bytes.chunks_exact_mut(2).zip(raw) {
        chunk.copy_from_slice(&to_wire(value));
    }
    Ok(bytes)
}

/// Parameters an end device reconstructs from amplitude, frequency and phase wire values
pub fn dequantize_set(raw: [u16; 3]) -> ParameterSet {
    ParameterSet::new(dequantize(raw[0]), dequantize(raw[1]), dequantize(raw[2]))
}

pub(crate) fn raw_params(bytes: &[u8; PARAMS_LEN]) -> [u16; 3] {
    let mut raw = [0u16; 3];
    for (value, chunk) in raw.iter_mut().zip(bytes.chunks_exact(2)) {
        *value = from_wire([chunk[0], chunk[1]]);
    }
    raw
}
