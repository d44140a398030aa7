//! Decoding of fixed-layout device responses.
//!
//! Covers the status record, the 18-byte device-info response and the
//! temperature readout.

use std::fmt;
use std::io::Write;

use crate::error::{Error, Result};

/// Size of the status record, in bytes.
pub const STATUS_LEN: usize = 16;

/// Size of a device-info response, in bytes.
pub const INFO_LEN: usize = 18;

/// Offset of the ASCII payload inside a device-info response.
const INFO_PAYLOAD_OFFSET: usize = 2;

/// Size of the temperature response, in bytes.
pub const TEMPERATURE_LEN: usize = 6;

/// Degrees Celsius per ADC count.
const TEMPERATURE_SCALE: f32 = 0.003906;

/// Status record layout, which differs between device families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLayout {
    /// 16-bit integration time (NIRQuest family, milliseconds).
    Narrow,
    /// 32-bit integration time (USB4000 family, microseconds).
    Wide,
}

/// Decoded status record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    /// Number of pixels reported by the detector.
    pub pixel_count: u16,
    /// Current integration time, in the unit of the model's firmware.
    pub integration_time: u32,
    /// Lamp/strobe output enabled.
    pub lamp_enabled: bool,
    /// Trigger mode (0 = free running, 3 = external).
    pub trigger_mode: u8,
    /// Spectrum request in progress.
    pub request_spectrum: u8,
    /// Spectral data ready to be read.
    pub data_ready: bool,
    /// Power state.
    pub power_state: u8,
    /// Number of spectra acquired (wraps).
    pub data_counter: u8,
    /// Detector gain selection.
    pub detector_gain: u8,
    /// Fan and TEC state bits.
    pub fan_and_tec_state: u8,
    /// USB packets per spectrum (wide layout only).
    pub packets_per_spectrum: u8,
    /// USB speed, 0x00 = full speed, 0x80 = high speed (wide layout only).
    pub usb_speed: u8,
}

impl Status {
    /// Decode a status record.
    pub fn decode(buf: &[u8], layout: StatusLayout) -> Result<Self> {
        if buf.len() < STATUS_LEN {
            return Err(Error::InvalidResponse(format!(
                "Status record too short: {} bytes, expected {}",
                buf.len(),
                STATUS_LEN
            )));
        }

        let pixel_count = u16::from_le_bytes([buf[0], buf[1]]);
        let status = match layout {
            StatusLayout::Narrow => Status {
                pixel_count,
                integration_time: u32::from(u16::from_le_bytes([buf[2], buf[3]])),
                lamp_enabled: buf[4] != 0,
                trigger_mode: buf[5],
                request_spectrum: buf[6],
                data_ready: buf[8] != 0,
                power_state: buf[10],
                data_counter: buf[11],
                detector_gain: buf[12],
                fan_and_tec_state: buf[13],
                packets_per_spectrum: 0,
                usb_speed: 0,
            },
            StatusLayout::Wide => Status {
                pixel_count,
                integration_time: u32::from_le_bytes([buf[2], buf[3], buf[4], buf[5]]),
                lamp_enabled: buf[6] != 0,
                trigger_mode: buf[7],
                request_spectrum: buf[8],
                // No data-ready flag in this layout
                data_ready: false,
                power_state: buf[10],
                data_counter: buf[11],
                detector_gain: 0,
                fan_and_tec_state: 0,
                packets_per_spectrum: buf[9],
                usb_speed: buf[14],
            },
        };

        Ok(status)
    }

    /// Write a human readable dump of the record.
    pub fn dump<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "query status:")?;
        writeln!(out, "  +- num_of_pixels:........... {}", self.pixel_count)?;
        writeln!(out, "  +- integration_time:........ {}", self.integration_time)?;
        writeln!(out, "  +- lamp_enable:............. {}", self.lamp_enabled)?;
        writeln!(out, "  +- trigger_mode:............ 0x{:x}", self.trigger_mode)?;
        writeln!(out, "  +- request_spectrum:........ 0x{:x}", self.request_spectrum)?;
        writeln!(out, "  +- spectral_data_ready:..... {}", self.data_ready)?;
        writeln!(out, "  +- power_state:............. 0x{:x}", self.power_state)?;
        writeln!(out, "  +- spectral_data_counter:... 0x{:x}", self.data_counter)?;
        writeln!(out, "  +- detector_gain_select:.... 0x{:x}", self.detector_gain)?;
        writeln!(out, "  +- fan_and_tec_state:....... 0x{:x}", self.fan_and_tec_state)?;
        writeln!(out, "  +- packets_per_spectrum:.... {}", self.packets_per_spectrum)?;
        writeln!(out, "  `- usb_speed:............... 0x{:x}", self.usb_speed)
    }
}

/// PCB and heatsink temperatures in degrees Celsius.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Temperature {
    /// Board temperature.
    pub pcb: f32,
    /// Heatsink temperature.
    pub heatsink: f32,
}

impl Temperature {
    /// Decode the 6-byte temperature response.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < TEMPERATURE_LEN {
            return Err(Error::InvalidResponse(format!(
                "Temperature response too short: {} bytes",
                buf.len()
            )));
        }

        let pcb = u16::from_le_bytes([buf[1], buf[2]]);
        let heatsink = u16::from_le_bytes([buf[4], buf[5]]);

        Ok(Temperature {
            pcb: TEMPERATURE_SCALE * f32::from(pcb),
            heatsink: TEMPERATURE_SCALE * f32::from(heatsink),
        })
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PCB={:.2}°C HeatSink={:.2}°C", self.pcb, self.heatsink)
    }
}

/// ASCII text of a device-info response, up to the first NUL.
pub fn info_text(buf: &[u8]) -> &str {
    let payload = buf.get(INFO_PAYLOAD_OFFSET..).unwrap_or_default();
    let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    std::str::from_utf8(&payload[..end])
        .unwrap_or_default()
        .trim()
}

/// Parse the numeric payload of a device-info response.
///
/// Returns `None` if the payload is empty or not a number.
pub fn parse_info_number(buf: &[u8]) -> Option<f64> {
    let text = info_text(buf);
    // Firmware pads with spaces or garbage after the number
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

/// Extract the saturation level from a configuration-parameter response.
///
/// Unlike the other slots the value is stored in binary, little-endian
/// at bytes 6..8.
pub fn parse_saturation(buf: &[u8]) -> Option<u16> {
    match buf.get(6..8) {
        Some(&[lo, hi]) => Some(u16::from_le_bytes([lo, hi])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(payload: &str) -> [u8; INFO_LEN] {
        let mut buf = [0u8; INFO_LEN];
        buf[0] = 0x05;
        buf[1] = 0x01;
        buf[2..2 + payload.len()].copy_from_slice(payload.as_bytes());
        buf
    }

    #[test]
    fn test_narrow_status() {
        let raw = [
            0x00, 0x02, 0x64, 0x00, 0x01, 0x03, 0x00, 0x00, 0x01, 0x00, 0x00, 0x07, 0x01, 0x18,
            0x00, 0x00,
        ];
        let status = Status::decode(&raw, StatusLayout::Narrow).unwrap();
        assert_eq!(status.pixel_count, 512);
        assert_eq!(status.integration_time, 100);
        assert!(status.lamp_enabled);
        assert_eq!(status.trigger_mode, 3);
        assert!(status.data_ready);
        assert_eq!(status.data_counter, 7);
        assert_eq!(status.detector_gain, 1);
        assert_eq!(status.fan_and_tec_state, 0x18);
    }

    #[test]
    fn test_wide_status() {
        let mut raw = [0u8; STATUS_LEN];
        raw[0..2].copy_from_slice(&3840u16.to_le_bytes());
        raw[2..6].copy_from_slice(&1_000_000u32.to_le_bytes());
        raw[6] = 1;
        raw[8] = 1;
        raw[9] = 15;
        raw[11] = 42;
        raw[14] = 0x80;
        let status = Status::decode(&raw, StatusLayout::Wide).unwrap();
        assert_eq!(status.pixel_count, 3840);
        assert_eq!(status.integration_time, 1_000_000);
        assert!(status.lamp_enabled);
        assert_eq!(status.request_spectrum, 1);
        // A pending request does not mean data is ready
        assert!(!status.data_ready);
        assert_eq!(status.packets_per_spectrum, 15);
        assert_eq!(status.data_counter, 42);
        assert_eq!(status.usb_speed, 0x80);
    }

    #[test]
    fn test_short_status_rejected() {
        assert!(Status::decode(&[0u8; 4], StatusLayout::Narrow).is_err());
    }

    #[test]
    fn test_parse_info_number() {
        assert_eq!(parse_info_number(&info("8.994393E+02")), Some(899.4393));
        assert_eq!(parse_info_number(&info(" 3 ")), Some(3.0));
        assert_eq!(parse_info_number(&info("-9.09767E-05  x")), Some(-9.09767e-5));
        assert_eq!(parse_info_number(&info("")), None);
        assert_eq!(parse_info_number(&info("abc")), None);
    }

    #[test]
    fn test_parse_saturation() {
        let mut buf = [0u8; INFO_LEN];
        buf[6] = 0xFF;
        buf[7] = 0xEF;
        assert_eq!(parse_saturation(&buf), Some(0xEFFF));
        assert_eq!(parse_saturation(&buf[..4]), None);
    }

    #[test]
    fn test_temperature() {
        let buf = [0x08, 0x00, 0x19, 0x00, 0x00, 0x0A];
        let temp = Temperature::decode(&buf).unwrap();
        assert!((temp.pcb - 0.003906 * 6400.0).abs() < 1e-3);
        assert!((temp.heatsink - 0.003906 * 2560.0).abs() < 1e-3);
    }

    #[test]
    fn test_status_dump() {
        let status = Status {
            pixel_count: 512,
            integration_time: 100,
            ..Default::default()
        };
        let mut out = Vec::new();
        status.dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("query status:"));
        assert!(text.contains("num_of_pixels:........... 512"));
        assert!(text.contains("integration_time:........ 100"));
        assert!(text.contains("packets_per_spectrum:.... 0"));
        assert!(text.trim_end().ends_with("usb_speed:............... 0x0"));
    }
}
