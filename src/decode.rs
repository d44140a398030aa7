//! Raw spectral data decoding and calibration.
//!
//! Turns the byte stream read from the data endpoints into calibrated
//! intensities, and maps pixel indices to wavelengths.
//!
//! ## Processing Steps
//!
//! 1. **Sample extraction**: little-endian 16-bit words, with the
//!    model-specific framing (sync bytes, invalid leading pixels, inverted
//!    sign bit) removed
//! 2. **Saturation normalization**: `x = v * (65535 / saturation)`
//! 3. **Non-linearity correction**: `x / (c[0] + p(x))`, with `p`
//!    evaluated by Horner's method from the highest order down to 1
//!
//! The evaluation order is fixed; reformulating the polynomial changes
//! the rounding of the result.

use crate::error::{Error, Result};

/// Full scale of a corrected sample.
pub const FULL_SCALE: f64 = 65535.0;

/// Highest supported non-linearity polynomial order.
pub const MAX_NONLINEARITY_ORDER: usize = 7;

/// Usable pixels of the USB4000 detector (it reports 3840).
pub const USB4000_USABLE_PIXELS: usize = 3648;

/// Leading raw bytes of a USB4000 frame that carry optically dead pixels.
pub const USB4000_SKIP_BYTES: usize = 36;

/// Raw bytes a USB4000 frame must hold to be decoded.
pub const USB4000_MIN_RAW_LEN: usize = USB4000_SKIP_BYTES + USB4000_USABLE_PIXELS * 2;

/// The NIRQuest firmware inserts one sync byte per packet of this many
/// sample bytes.
pub const NIRQUEST_SYNC_INTERVAL: usize = 512;

/// Calibration coefficients read from the device EEPROM.
///
/// Fields that could not be queried stay at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Calibration {
    /// Wavelength calibration polynomial, lowest order first.
    pub wavelength: [f64; 4],
    /// Non-linearity correction polynomial, lowest order first.
    pub nonlinearity: [f64; 8],
    /// Highest non-linearity order in use (0..=7).
    pub nonlinearity_order: usize,
    /// Maximum raw count of the detector.
    pub saturation: u16,
}

impl Calibration {
    /// Calibration that leaves samples unchanged and maps pixel `i` to `i`.
    pub fn identity() -> Self {
        let mut nonlinearity = [0.0; 8];
        nonlinearity[0] = 1.0;
        Calibration {
            wavelength: [0.0, 1.0, 0.0, 0.0],
            nonlinearity,
            nonlinearity_order: 0,
            saturation: u16::MAX,
        }
    }

    /// Reject coefficient sets that would corrupt decoded data.
    pub fn validate(&self) -> Result<()> {
        if self.saturation == 0 {
            return Err(Error::configuration(
                "saturation level is zero, intensities would be undefined",
            ));
        }
        if self.nonlinearity_order > MAX_NONLINEARITY_ORDER {
            return Err(Error::configuration(format!(
                "non-linearity order {} exceeds {}",
                self.nonlinearity_order, MAX_NONLINEARITY_ORDER
            )));
        }
        Ok(())
    }

    /// Factor that scales raw counts to full scale.
    pub fn saturation_scale(&self) -> f64 {
        FULL_SCALE / f64::from(self.saturation)
    }

    /// Apply the non-linearity correction to a normalized sample.
    pub fn correct(&self, x: f64) -> f64 {
        let order = self.nonlinearity_order.min(MAX_NONLINEARITY_ORDER);
        let mut value = 0.0;
        for c in self.nonlinearity[1..=order].iter().rev() {
            value = x * (c + value);
        }
        x / (self.nonlinearity[0] + value)
    }

    /// Corrected intensity of a raw 16-bit sample.
    pub fn intensity(&self, sample: u16) -> f64 {
        self.correct(f64::from(sample) * self.saturation_scale())
    }

    /// Wavelength in nm of a pixel index.
    ///
    /// Defined for any index; indices outside the detector extrapolate.
    pub fn wavelength(&self, pixel: i32) -> f64 {
        let p = f64::from(pixel);
        let mut value = 0.0;
        for c in self.wavelength[1..].iter().rev() {
            value = p * (c + value);
        }
        self.wavelength[0] + value
    }
}

/// Assemble a NIRQuest sample: the firmware reports bit 15 inverted.
#[inline]
pub fn nirquest_sample(lsb: u8, msb: u8) -> u16 {
    u16::from_le_bytes([lsb, msb]) ^ 0x8000
}

/// Decode a NIRQuest frame into `out`.
///
/// One sync byte follows every [`NIRQUEST_SYNC_INTERVAL`] bytes of
/// samples and is skipped. Decoding stops when `out` is full or the raw
/// data runs out; returns the number of decoded samples.
pub fn decode_nirquest(raw: &[u8], calibration: &Calibration, out: &mut [f64]) -> usize {
    let scale = calibration.saturation_scale();
    let mut i = 0;
    let mut j = 0;

    while j < out.len() && i + 1 < raw.len() {
        let value = nirquest_sample(raw[i], raw[i + 1]);
        out[j] = calibration.correct(f64::from(value) * scale);
        j += 1;
        i += 2;

        if (j * 2) % NIRQUEST_SYNC_INTERVAL == 0 {
            tracing::trace!(
                "skipping sync byte {}/{} = {:#04x}",
                i,
                raw.len(),
                raw.get(i).copied().unwrap_or_default()
            );
            i += 1;
        }
    }

    j
}

/// Decode a USB4000 frame into `out`.
///
/// The first [`USB4000_SKIP_BYTES`] are dropped and exactly
/// [`USB4000_USABLE_PIXELS`] samples are decoded; trailing bytes are
/// ignored.
pub fn decode_usb4000(raw: &[u8], calibration: &Calibration, out: &mut [f64]) -> Result<()> {
    if raw.len() < USB4000_MIN_RAW_LEN {
        return Err(Error::invalid(format!(
            "USB4000 frame holds {} bytes, need {}",
            raw.len(),
            USB4000_MIN_RAW_LEN
        )));
    }
    if out.len() != USB4000_USABLE_PIXELS {
        return Err(Error::invalid(format!(
            "USB4000 output holds {} samples, need {}",
            out.len(),
            USB4000_USABLE_PIXELS
        )));
    }

    let scale = calibration.saturation_scale();
    let samples = raw[USB4000_SKIP_BYTES..USB4000_MIN_RAW_LEN].chunks_exact(2);
    for (dst, pair) in out.iter_mut().zip(samples) {
        let value = u16::from_le_bytes([pair[0], pair[1]]);
        *dst = calibration.correct(f64::from(value) * scale);
    }

    Ok(())
}
