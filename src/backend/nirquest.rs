//! NIRQuest512/256 backend.
//!
//! A spectrum arrives in one transfer on the data endpoint, with one
//! sync byte after each 512-byte packet of samples.

use std::time::Duration;

use rs_ocean::device::require;
use rs_ocean::{Command, DataEndpoint, Endpoints, OceanDevice, Status, StatusLayout};

use super::Backend;
use crate::decode::{decode_nirquest, NIRQUEST_SYNC_INTERVAL};
use crate::error::Result;
use crate::registry::Model;
use crate::spectrum::{Spectrum, SpectrumLayout};

/// Bytes a transfer must hold to decode `pixels` samples, counting the
/// sync bytes that precede the last sample.
fn frame_len(pixels: usize) -> usize {
    let sample_bytes = pixels * 2;
    sample_bytes + sample_bytes.saturating_sub(1) / NIRQUEST_SYNC_INTERVAL
}

pub struct NirQuest {
    device: OceanDevice,
}

impl NirQuest {
    pub fn new(device: OceanDevice) -> Self {
        NirQuest { device }
    }

    pub(crate) fn boxed(device: OceanDevice) -> Box<dyn Backend> {
        Box::new(Self::new(device))
    }
}

impl Backend for NirQuest {
    fn model(&self) -> Model {
        Model::NirQuest512
    }

    fn device(&mut self) -> Result<&mut OceanDevice> {
        Ok(&mut self.device)
    }

    fn endpoints(&self) -> Option<Endpoints> {
        Some(self.device.endpoints())
    }

    fn status_layout(&self) -> StatusLayout {
        StatusLayout::Narrow
    }

    fn get_integration_time(&self, status: &Status) -> u32 {
        status.integration_time
    }

    fn set_integration_time(&mut self, ms: u32) -> Result<u32> {
        self.device.send(Command::SetIntegrationTime(ms))?;
        Ok(ms)
    }

    fn spectrum_layout(&self, pixel_count: usize) -> Result<SpectrumLayout> {
        Ok(SpectrumLayout {
            raw_len: pixel_count * 2 + 2,
            data_len: pixel_count,
        })
    }

    fn receive_spectrum(&mut self, spectrum: &mut Spectrum, timeout: Duration) -> Result<()> {
        let endpoint = self.device.endpoints().data_in;
        let (raw, data, calibration) = spectrum.buffers_mut();

        let done = self.device.read_data(DataEndpoint::Primary, raw, timeout)?;
        require(endpoint, frame_len(data.len()), done)?;

        let decoded = decode_nirquest(&raw[..done], calibration, data);
        tracing::debug!("received {} bytes, {} samples", done, decoded);
        Ok(())
    }
}
