//! Simulated NIRQuest512 for development without hardware.
//!
//! Requests alternate between two recorded spectra. No transport is
//! involved, so every operation succeeds except the device-info queries,
//! which a simulated device has no EEPROM for.

use std::time::Duration;

use rs_ocean::command::EXTERNAL_TRIGGER_MODE;
use rs_ocean::{Command, Status, Temperature};

use super::reference::{OFFICE_LAMP, REFERENCE_PIXELS, SUNLIGHT};
use super::Backend;
use crate::decode::Calibration;
use crate::error::{Error, Result};
use crate::registry::Model;
use crate::spectrum::{Spectrum, SpectrumLayout};

const SERIAL: &str = "NQ51DUMMY";
const PRODUCT_NAME: &str = "NIRQuest512 (simulated)";
const INITIAL_INTEGRATION_TIME_MS: u32 = 100;
const INITIAL_FAN_AND_TEC_STATE: u8 = 0x18;
const FAN_BIT: u8 = 0x01;
const WAVELENGTH_COEFFICIENTS: [f64; 4] = [8.994393E+02, 1.624139E+00, -9.097670E-05, 3.679440E-08];

pub struct Simulated {
    status: Status,
    requests: u64,
}

impl Default for Simulated {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulated {
    pub fn new() -> Self {
        Simulated {
            status: Status {
                pixel_count: REFERENCE_PIXELS as u16,
                integration_time: INITIAL_INTEGRATION_TIME_MS,
                fan_and_tec_state: INITIAL_FAN_AND_TEC_STATE,
                ..Default::default()
            },
            requests: 0,
        }
    }

    /// Reference spectrum the next request returns.
    fn next_reference(&self) -> &'static [f64; REFERENCE_PIXELS] {
        if self.requests % 2 == 1 {
            &SUNLIGHT
        } else {
            &OFFICE_LAMP
        }
    }
}

impl Backend for Simulated {
    fn model(&self) -> Model {
        Model::Simulated
    }

    fn initialize(&mut self, _clear_halts: bool) -> Result<()> {
        tracing::debug!("simulated spectrometer ready");
        Ok(())
    }

    fn query_status(&mut self) -> Result<Status> {
        Ok(Status {
            data_counter: self.requests as u8,
            ..self.status
        })
    }

    fn get_integration_time(&self, status: &Status) -> u32 {
        status.integration_time
    }

    fn set_integration_time(&mut self, ms: u32) -> Result<u32> {
        // Same 16-bit status field as the hardware it stands in for
        if ms > u32::from(u16::MAX) {
            return Err(Error::invalid(format!(
                "integration time {} ms exceeds {} ms",
                ms,
                u16::MAX
            )));
        }
        self.status.integration_time = ms;
        Ok(ms)
    }

    fn spectrum_layout(&self, pixel_count: usize) -> Result<SpectrumLayout> {
        Ok(SpectrumLayout {
            raw_len: pixel_count * 2,
            data_len: pixel_count,
        })
    }

    fn load_calibration(&mut self) -> Result<Calibration> {
        Ok(Calibration {
            wavelength: WAVELENGTH_COEFFICIENTS,
            ..Calibration::identity()
        })
    }

    fn send(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Initialize => {}
            Command::SetIntegrationTime(value) => {
                self.set_integration_time(value)?;
            }
            Command::SetStrobe(enable) => self.status.lamp_enabled = enable,
            Command::SetFan(true) => self.status.fan_and_tec_state |= FAN_BIT,
            Command::SetFan(false) => self.status.fan_and_tec_state &= !FAN_BIT,
            Command::SetExternalTrigger(enable) => {
                self.status.trigger_mode = if enable { EXTERNAL_TRIGGER_MODE } else { 0 };
            }
            Command::RequestSpectrum => {
                self.status.request_spectrum = 1;
                self.status.data_ready = true;
            }
            Command::StopAcquisition => {
                self.requests = 0;
                self.status.request_spectrum = 0;
                self.status.data_ready = false;
            }
            Command::QueryInfo(_)
            | Command::GetSerial
            | Command::ReadTemperature
            | Command::QueryStatus => return Err(self.unsupported("raw query")),
        }
        tracing::trace!("simulated {:?}", command);
        Ok(())
    }

    fn receive_spectrum(&mut self, spectrum: &mut Spectrum, _timeout: Duration) -> Result<()> {
        let reference = self.next_reference();
        let (raw, data, _) = spectrum.buffers_mut();

        for (dst, &value) in data.iter_mut().zip(reference.iter()) {
            *dst = value;
        }
        for (dst, &value) in raw.chunks_exact_mut(2).zip(reference.iter()) {
            dst.copy_from_slice(&(value.round() as u16).to_le_bytes());
        }

        self.requests += 1;
        self.status.request_spectrum = 0;
        self.status.data_ready = false;
        Ok(())
    }

    fn serial(&mut self) -> Result<String> {
        Ok(SERIAL.to_string())
    }

    fn temperature(&mut self) -> Result<Temperature> {
        let step = (self.requests % 8) as f32;
        Ok(Temperature {
            pcb: 25.0 + step * 0.25,
            heatsink: 21.5 + step * 0.125,
        })
    }

    fn product_name(&mut self) -> Result<String> {
        Ok(PRODUCT_NAME.to_string())
    }

    fn reset(&mut self) -> Result<()> {
        *self = Simulated::new();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(backend: &mut Simulated) -> Spectrum {
        let status = backend.query_status().unwrap();
        let pixels = backend.get_pixel_count(&status);
        let layout = backend.spectrum_layout(pixels).unwrap();
        let calibration = backend.load_calibration().unwrap();
        Spectrum::allocate(Model::Simulated, pixels, layout, calibration).unwrap()
    }

    #[test]
    fn test_initial_status() {
        let mut sim = Simulated::new();
        let status = sim.query_status().unwrap();
        assert_eq!(status.pixel_count, 512);
        assert_eq!(sim.get_integration_time(&status), 100);
        assert_eq!(status.fan_and_tec_state, 0x18);
    }

    #[test]
    fn test_alternates_and_stop_resets() {
        let mut sim = Simulated::new();
        let mut spec = spectrum(&mut sim);
        let timeout = Duration::from_millis(1);

        sim.receive_spectrum(&mut spec, timeout).unwrap();
        assert_eq!(spec.data(), &OFFICE_LAMP[..]);
        sim.receive_spectrum(&mut spec, timeout).unwrap();
        assert_eq!(spec.data(), &SUNLIGHT[..]);
        sim.receive_spectrum(&mut spec, timeout).unwrap();
        assert_eq!(spec.data(), &OFFICE_LAMP[..]);

        sim.send(Command::StopAcquisition).unwrap();
        sim.receive_spectrum(&mut spec, timeout).unwrap();
        assert_eq!(spec.data(), &OFFICE_LAMP[..]);
    }

    #[test]
    fn test_feature_flags() {
        let mut sim = Simulated::new();
        sim.send(Command::SetStrobe(true)).unwrap();
        sim.send(Command::SetFan(true)).unwrap();
        sim.send(Command::SetExternalTrigger(true)).unwrap();
        let status = sim.query_status().unwrap();
        assert!(status.lamp_enabled);
        assert_eq!(status.fan_and_tec_state, 0x19);
        assert_eq!(status.trigger_mode, 0x03);

        sim.send(Command::SetFan(false)).unwrap();
        sim.send(Command::SetExternalTrigger(false)).unwrap();
        let status = sim.query_status().unwrap();
        assert_eq!(status.fan_and_tec_state, 0x18);
        assert_eq!(status.trigger_mode, 0x00);
    }

    #[test]
    fn test_no_usb_device() {
        let mut sim = Simulated::new();
        assert!(matches!(sim.device(), Err(Error::Unsupported { .. })));
        assert!(sim.endpoints().is_none());
        assert_eq!(sim.serial().unwrap(), "NQ51DUMMY");
    }

    #[test]
    fn test_temperature_is_deterministic() {
        let mut a = Simulated::new();
        let mut b = Simulated::new();
        assert_eq!(a.temperature().unwrap(), b.temperature().unwrap());
    }
}
