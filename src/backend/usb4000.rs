//! USB4000 backend.
//!
//! The firmware keeps the integration time in microseconds and splits a
//! spectrum transfer across two data endpoints: the first 4 packets of
//! 512 bytes arrive on the primary endpoint, the rest (led by one sync
//! byte) on the secondary one.

use std::time::Duration;

use rs_ocean::device::require;
use rs_ocean::{Command, DataEndpoint, Endpoints, OceanDevice, Status, StatusLayout};

use super::Backend;
use crate::decode::{decode_usb4000, USB4000_MIN_RAW_LEN, USB4000_USABLE_PIXELS};
use crate::error::{Error, Result};
use crate::registry::Model;
use crate::spectrum::{Spectrum, SpectrumLayout};

/// Bytes read from the primary data endpoint.
const FIRST_BLOCK_LEN: usize = 4 * 512;

/// Microseconds per millisecond.
const US_PER_MS: u32 = 1000;

pub struct Usb4000 {
    device: OceanDevice,
}

impl Usb4000 {
    pub fn new(device: OceanDevice) -> Self {
        Usb4000 { device }
    }

    pub(crate) fn boxed(device: OceanDevice) -> Box<dyn Backend> {
        Box::new(Self::new(device))
    }
}

impl Backend for Usb4000 {
    fn model(&self) -> Model {
        Model::Usb4000
    }

    fn device(&mut self) -> Result<&mut OceanDevice> {
        Ok(&mut self.device)
    }

    fn endpoints(&self) -> Option<Endpoints> {
        Some(self.device.endpoints())
    }

    fn status_layout(&self) -> StatusLayout {
        StatusLayout::Wide
    }

    fn get_integration_time(&self, status: &Status) -> u32 {
        status.integration_time / US_PER_MS
    }

    fn set_integration_time(&mut self, ms: u32) -> Result<u32> {
        let us = ms.checked_mul(US_PER_MS).ok_or_else(|| {
            Error::invalid(format!("integration time {} ms overflows the firmware field", ms))
        })?;
        self.device.send(Command::SetIntegrationTime(us))?;
        Ok(us)
    }

    fn spectrum_layout(&self, pixel_count: usize) -> Result<SpectrumLayout> {
        let raw_len = SpectrumLayout::generic(pixel_count).raw_len;
        if raw_len < USB4000_MIN_RAW_LEN {
            return Err(Error::configuration(format!(
                "detector reports {} pixels, a USB4000 frame needs {} bytes",
                pixel_count, USB4000_MIN_RAW_LEN
            )));
        }
        Ok(SpectrumLayout {
            raw_len,
            data_len: USB4000_USABLE_PIXELS,
        })
    }

    fn receive_spectrum(&mut self, spectrum: &mut Spectrum, timeout: Duration) -> Result<()> {
        let endpoints = self.device.endpoints();
        let (raw, data, calibration) = spectrum.buffers_mut();
        if raw.len() <= FIRST_BLOCK_LEN {
            return Err(Error::invalid(format!(
                "raw buffer of {} bytes cannot hold a USB4000 transfer",
                raw.len()
            )));
        }

        let (first, second) = raw.split_at_mut(FIRST_BLOCK_LEN);
        let done = self
            .device
            .read_data(DataEndpoint::Primary, first, timeout)?;
        require(endpoints.data_in, FIRST_BLOCK_LEN, done)?;

        let rest = self
            .device
            .read_data(DataEndpoint::Secondary, second, timeout)?;
        let total = done + rest;
        require(
            endpoints.data_in_secondary.unwrap_or(endpoints.data_in),
            USB4000_MIN_RAW_LEN,
            total,
        )?;

        tracing::debug!("received {} bytes", total);
        decode_usb4000(raw, calibration, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rs_ocean::{DEFAULT_TIMEOUT, USB4000_ENDPOINTS};

    struct Sink;

    impl rs_ocean::UsbTransport for Sink {
        fn bulk_write(
            &mut self,
            _endpoint: u8,
            data: &[u8],
            _timeout: Duration,
        ) -> rs_ocean::Result<usize> {
            Ok(data.len())
        }

        fn bulk_read(
            &mut self,
            endpoint: u8,
            _buf: &mut [u8],
            _timeout: Duration,
        ) -> rs_ocean::Result<usize> {
            Err(rs_ocean::Error::Timeout(endpoint))
        }

        fn clear_halt(&mut self, _endpoint: u8) -> rs_ocean::Result<()> {
            Ok(())
        }

        fn string_descriptor(&mut self, _index: u8) -> rs_ocean::Result<String> {
            Ok(String::new())
        }

        fn reset(&mut self) -> rs_ocean::Result<()> {
            Ok(())
        }
    }

    fn backend() -> Usb4000 {
        Usb4000::new(OceanDevice::new(
            Box::new(Sink),
            USB4000_ENDPOINTS,
            DEFAULT_TIMEOUT,
        ))
    }

    #[test]
    fn test_integration_time_in_microseconds() {
        let mut usb4000 = backend();
        assert_eq!(usb4000.set_integration_time(1000).unwrap(), 1_000_000);
        assert_eq!(
            Command::SetIntegrationTime(1_000_000).encode()[1..],
            [0x40, 0x42, 0x0F, 0x00]
        );

        let status = Status {
            integration_time: 1_000_000,
            ..Default::default()
        };
        assert_eq!(usb4000.get_integration_time(&status), 1000);
    }

    #[test]
    fn test_integration_time_overflow() {
        let mut usb4000 = backend();
        assert!(matches!(
            usb4000.set_integration_time(u32::MAX / 10),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_layout() {
        let usb4000 = backend();
        let layout = usb4000.spectrum_layout(3840).unwrap();
        assert_eq!(layout.raw_len, 7682);
        assert_eq!(layout.data_len, 3648);
        assert!(matches!(
            usb4000.spectrum_layout(512),
            Err(Error::Configuration(_))
        ));
    }
}
