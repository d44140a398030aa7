//! Per-model spectrometer backends.
//!
//! A [`Backend`] is selected once when a session opens and is held for
//! the session's lifetime. USB-backed models share the command protocol
//! through [`Backend::device`], so they only implement what differs
//! between families: status layout, integration-time units, buffer
//! sizing and the receive routine.

mod nirquest;
mod reference;
mod simulated;
mod usb4000;

pub use nirquest::NirQuest;
pub use reference::{OFFICE_LAMP, REFERENCE_PIXELS, SUNLIGHT};
pub use simulated::Simulated;
pub use usb4000::Usb4000;

use std::time::Duration;

use rs_ocean::status::{parse_info_number, parse_saturation, INFO_LEN};
use rs_ocean::{Command, Endpoints, InfoSlot, OceanDevice, Status, StatusLayout, Temperature};

use crate::decode::{Calibration, MAX_NONLINEARITY_ORDER};
use crate::error::{Error, Result};
use crate::registry::Model;
use crate::spectrum::{Spectrum, SpectrumLayout};

/// String descriptor holding the product name.
const PRODUCT_STRING_INDEX: u8 = 1;

/// Operations a spectrometer model provides.
pub trait Backend: Send {
    /// Model served by this backend.
    fn model(&self) -> Model;

    /// Backend name used in diagnostics.
    fn name(&self) -> &'static str {
        self.model().name()
    }

    /// The underlying command handle, for USB-backed models.
    fn device(&mut self) -> Result<&mut OceanDevice> {
        Err(self.unsupported("usb"))
    }

    /// Endpoint roles, for USB-backed models.
    fn endpoints(&self) -> Option<Endpoints> {
        None
    }

    /// Layout of the status record.
    fn status_layout(&self) -> StatusLayout {
        StatusLayout::Narrow
    }

    /// Clear endpoint halts if requested and send the initialize command.
    fn initialize(&mut self, clear_halts: bool) -> Result<()> {
        self.device()?.initialize(clear_halts)?;
        Ok(())
    }

    /// Query the status record.
    fn query_status(&mut self) -> Result<Status> {
        let layout = self.status_layout();
        Ok(self.device()?.query_status(layout)?)
    }

    /// Integration time of `status`, in milliseconds.
    fn get_integration_time(&self, status: &Status) -> u32;

    /// Set the integration time in milliseconds.
    ///
    /// Returns the value now reported by the status record, in the
    /// firmware's unit.
    fn set_integration_time(&mut self, ms: u32) -> Result<u32>;

    /// Pixel count of `status`.
    fn get_pixel_count(&self, status: &Status) -> usize {
        usize::from(status.pixel_count)
    }

    /// Buffer sizes of a spectrum for a detector with `pixel_count` pixels.
    fn spectrum_layout(&self, pixel_count: usize) -> Result<SpectrumLayout>;

    /// Read the calibration coefficients.
    fn load_calibration(&mut self) -> Result<Calibration> {
        Ok(query_calibration(self.device()?))
    }

    /// Raw response of one device-info slot.
    fn query_info(&mut self, slot: InfoSlot) -> Result<[u8; INFO_LEN]> {
        Ok(self.device()?.query_info(slot)?)
    }

    /// Send a command that carries no response.
    fn send(&mut self, command: Command) -> Result<()> {
        self.device()?.send(command)?;
        Ok(())
    }

    /// Blocking receive of one spectrum, decoded into `spectrum`.
    ///
    /// The spectrum-request command must already have been sent. On
    /// failure the content of the spectrum buffers is undefined.
    fn receive_spectrum(&mut self, spectrum: &mut Spectrum, timeout: Duration) -> Result<()>;

    /// Serial number.
    fn serial(&mut self) -> Result<String> {
        Ok(self.device()?.serial()?)
    }

    /// PCB and heatsink temperatures.
    fn temperature(&mut self) -> Result<Temperature> {
        Ok(self.device()?.temperature()?)
    }

    /// Product name from the USB descriptors.
    fn product_name(&mut self) -> Result<String> {
        Ok(self.device()?.string_descriptor(PRODUCT_STRING_INDEX)?)
    }

    /// Reset the device.
    fn reset(&mut self) -> Result<()> {
        self.device()?.reset()?;
        Ok(())
    }

    /// Error for operations this backend does not provide.
    fn unsupported(&self, operation: &'static str) -> Error {
        Error::Unsupported {
            backend: self.name(),
            operation,
        }
    }
}

/// Query one numeric device-info slot, logging failures.
fn query_number(device: &mut OceanDevice, slot: InfoSlot) -> Option<f64> {
    match device.query_info(slot) {
        Ok(buf) => {
            let value = parse_info_number(&buf);
            if value.is_none() {
                tracing::warn!("{:?}: unparsable payload {:02X?}", slot, &buf[2..]);
            }
            value
        }
        Err(e) => {
            tracing::warn!("unable to query {:?}: {}", slot, e);
            None
        }
    }
}

/// Read every calibration field from the device EEPROM.
///
/// Fields whose query fails are left at zero; validation is up to the
/// caller.
pub fn query_calibration(device: &mut OceanDevice) -> Calibration {
    let mut cal = Calibration::default();

    for (i, coef) in cal.wavelength.iter_mut().enumerate() {
        if let Some(v) = query_number(device, InfoSlot::WavelengthCoefficient(i as u8)) {
            *coef = v;
        }
    }

    if let Some(order) = query_number(device, InfoSlot::NonLinearityOrder) {
        let clamped = order.clamp(0.0, MAX_NONLINEARITY_ORDER as f64) as usize;
        if clamped as f64 != order {
            tracing::warn!("non-linearity order {} clamped to {}", order, clamped);
        }
        cal.nonlinearity_order = clamped;
    }

    for (i, coef) in cal.nonlinearity.iter_mut().enumerate() {
        if let Some(v) = query_number(device, InfoSlot::NonLinearityCoefficient(i as u8)) {
            *coef = v;
        }
    }

    match device.query_info(InfoSlot::ConfigParameters) {
        Ok(buf) => {
            if let Some(saturation) = parse_saturation(&buf) {
                cal.saturation = saturation;
            }
        }
        Err(e) => tracing::warn!("unable to query saturation level: {}", e),
    }

    tracing::debug!(
        "wavelength coefficients {:?}, non-linearity order {} coefficients {:?}, saturation {}",
        cal.wavelength,
        cal.nonlinearity_order,
        cal.nonlinearity,
        cal.saturation
    );

    cal
}
