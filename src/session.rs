//! Spectrometer session.
//!
//! A [`Session`] binds to one device at open time, selecting its
//! [`Backend`] from the registry, and keeps the last status record it
//! read. All operations are synchronous: each one sends a command and, if
//! the firmware answers, blocks for the response within the configured
//! timeout.

use std::io::Write;
use std::time::Duration;

use rs_ocean::transport::DEFAULT_INTERFACE;
use rs_ocean::{
    Command, Endpoints, InfoSlot, RusbConnector, Status, Temperature, UsbConnector,
    DEFAULT_TIMEOUT, NIRQUEST512_PID, OCEAN_VID,
};

use crate::backend::{Backend, Simulated};
use crate::error::{Error, Result};
use crate::registry::{self, DeviceId, Model};
use crate::spectrum::Spectrum;

/// Session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Per-transfer timeout. Acquisition reads add the integration time.
    pub timeout: Duration,
    /// USB interface to claim.
    pub interface: u8,
    /// Clear endpoint halts before sending the initialize command.
    pub clear_halts: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            timeout: DEFAULT_TIMEOUT,
            interface: DEFAULT_INTERFACE,
            clear_halts: true,
        }
    }
}

impl SessionConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interface(mut self, interface: u8) -> Self {
        self.interface = interface;
        self
    }

    pub fn with_clear_halts(mut self, clear_halts: bool) -> Self {
        self.clear_halts = clear_halts;
        self
    }
}

/// Device to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceSelector {
    /// A USB device from the registry.
    Usb { vendor: u16, product: u16 },
    /// The simulated NIRQuest512.
    Simulated,
}

impl Default for DeviceSelector {
    fn default() -> Self {
        DeviceSelector::Usb {
            vendor: OCEAN_VID,
            product: NIRQUEST512_PID,
        }
    }
}

/// Progress of a spectrum request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquisitionState {
    /// No acquisition in progress.
    #[default]
    Idle,
    /// Spectrum requested, data not read yet.
    Armed,
    /// Blocking on the data transfer.
    Draining,
    /// The last acquisition failed and the device was told to stop.
    Failed,
}

/// An open (or openable) connection to one spectrometer.
pub struct Session {
    config: SessionConfig,
    connector: Option<Box<dyn UsbConnector>>,
    backend: Option<Box<dyn Backend>>,
    status: Option<Status>,
    state: AcquisitionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    /// Create a session. The USB context is set up on the first [`open`](Self::open).
    pub fn new(config: SessionConfig) -> Self {
        Session {
            config,
            connector: None,
            backend: None,
            status: None,
            state: AcquisitionState::Idle,
        }
    }

    /// Create a session that opens devices through `connector`.
    pub fn with_connector(config: SessionConfig, connector: Box<dyn UsbConnector>) -> Self {
        let mut session = Self::new(config);
        session.connector = Some(connector);
        session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Open the device `vendor:product` and bind its backend.
    ///
    /// A previously open device is closed first.
    pub fn open(&mut self, vendor: u16, product: u16) -> Result<()> {
        let id = DeviceId::new(vendor, product);
        if !registry::supports(id) {
            return Err(Error::invalid(format!("device {} is not supported", id)));
        }

        self.close();

        let connector: Box<dyn UsbConnector> = match self.connector.take() {
            Some(connector) => connector,
            None => Box::new(RusbConnector::new()?.with_interface(self.config.interface)),
        };
        let opened = connector.open(vendor, product);
        self.connector = Some(connector);

        let backend = registry::probe(opened?, id, self.config.timeout, self.config.clear_halts)?;
        self.attach(backend);
        Ok(())
    }

    /// Bind the simulated backend.
    pub fn open_simulated(&mut self) -> Result<()> {
        self.close();

        let mut backend: Box<dyn Backend> = Box::new(Simulated::new());
        backend.initialize(self.config.clear_halts)?;
        self.attach(backend);
        Ok(())
    }

    /// Open whatever `selector` names.
    pub fn open_selector(&mut self, selector: DeviceSelector) -> Result<()> {
        match selector {
            DeviceSelector::Usb { vendor, product } => self.open(vendor, product),
            DeviceSelector::Simulated => self.open_simulated(),
        }
    }

    fn attach(&mut self, mut backend: Box<dyn Backend>) {
        match backend.product_name() {
            Ok(name) => tracing::info!("device is: {} ({} backend)", name, backend.name()),
            Err(e) => tracing::warn!("unable to read product name: {}", e),
        }
        self.backend = Some(backend);
        self.status = None;
        self.state = AcquisitionState::Idle;
    }

    /// Release the device. Does nothing if no device is open.
    pub fn close(&mut self) {
        if let Some(backend) = self.backend.take() {
            tracing::debug!("closing {} backend", backend.name());
        }
        self.status = None;
        self.state = AcquisitionState::Idle;
    }

    pub fn is_open(&self) -> bool {
        self.backend.is_some()
    }

    /// Model bound at open time.
    pub fn model(&self) -> Option<Model> {
        self.backend.as_ref().map(|b| b.model())
    }

    /// Endpoint roles of the open device, if it is a USB device.
    pub fn endpoints(&self) -> Option<Endpoints> {
        self.backend.as_ref().and_then(|b| b.endpoints())
    }

    /// Status record cached by the last query.
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn acquisition_state(&self) -> AcquisitionState {
        self.state
    }

    fn backend_mut(&mut self) -> Result<&mut Box<dyn Backend>> {
        self.backend
            .as_mut()
            .ok_or_else(|| Error::invalid("no device open"))
    }

    /// Query the status record and cache it.
    pub fn refresh_status(&mut self) -> Result<Status> {
        let status = self.backend_mut()?.query_status()?;
        self.status = Some(status);
        Ok(status)
    }

    /// Write a fresh status record to `out`.
    pub fn dump_status<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let status = self.refresh_status()?;
        status.dump(out)?;
        Ok(())
    }

    /// Hex dump every device-info slot to `out`, one line per slot.
    ///
    /// Slots that cannot be read are logged and skipped. Returns the
    /// number of slots written.
    pub fn dump_device_info<W: Write>(&mut self, out: &mut W) -> Result<usize> {
        let backend = self.backend_mut()?;

        writeln!(out, "device info:")?;
        let mut dumped = 0;
        for slot in InfoSlot::all() {
            let buf = match backend.query_info(slot) {
                Ok(buf) => buf,
                Err(e) => {
                    tracing::warn!("failed to query slot 0x{:02x}: {}", slot.id(), e);
                    continue;
                }
            };
            write!(out, "  +- 0x{:02x} {:<27}", slot.id(), format!("{:?}:", slot))?;
            for b in buf {
                write!(out, " {:02x}", b)?;
            }
            writeln!(out)?;
            dumped += 1;
        }
        Ok(dumped)
    }

    pub fn get_serial(&mut self) -> Result<String> {
        self.backend_mut()?.serial()
    }

    pub fn get_temperature(&mut self) -> Result<Temperature> {
        self.backend_mut()?.temperature()
    }

    /// Product name from the USB string descriptors.
    pub fn product_name(&mut self) -> Result<String> {
        self.backend_mut()?.product_name()
    }

    /// Reset the USB device. The session stays bound to it.
    pub fn reset(&mut self) -> Result<()> {
        self.backend_mut()?.reset()?;
        self.status = None;
        self.state = AcquisitionState::Idle;
        Ok(())
    }

    /// Number of pixels reported by the detector.
    pub fn get_pixel_count(&mut self) -> Result<usize> {
        let status = self.refresh_status()?;
        Ok(self.backend_mut()?.get_pixel_count(&status))
    }

    /// Integration time in milliseconds.
    pub fn get_integration_time(&mut self) -> Result<u32> {
        let status = self.refresh_status()?;
        Ok(self.backend_mut()?.get_integration_time(&status))
    }

    /// Set the integration time in milliseconds.
    pub fn set_integration_time(&mut self, ms: u32) -> Result<()> {
        let value = self.backend_mut()?.set_integration_time(ms)?;
        if let Some(status) = self.status.as_mut() {
            status.integration_time = value;
        }
        tracing::debug!("integration time set to {} ms", ms);
        Ok(())
    }

    pub fn enable_strobe(&mut self, enable: bool) -> Result<()> {
        self.backend_mut()?.send(Command::SetStrobe(enable))
    }

    pub fn enable_fan(&mut self, enable: bool) -> Result<()> {
        self.backend_mut()?.send(Command::SetFan(enable))
    }

    pub fn enable_external_trigger(&mut self, enable: bool) -> Result<()> {
        self.backend_mut()?.send(Command::SetExternalTrigger(enable))
    }

    /// Send the stop-acquisition command.
    pub fn stop_acquisition(&mut self) -> Result<()> {
        self.backend_mut()?.send(Command::StopAcquisition)?;
        self.state = AcquisitionState::Idle;
        Ok(())
    }

    /// Create a spectrum sized and calibrated for the open device.
    ///
    /// Fails if the pixel count cannot be read, since buffer sizes depend
    /// on it. Calibration fields that cannot be read are left at zero,
    /// except the saturation level, which must be non-zero.
    pub fn create_spectrum(&mut self) -> Result<Spectrum> {
        let status = self.refresh_status()?;
        let backend = self.backend_mut()?;

        let pixel_count = backend.get_pixel_count(&status);
        if pixel_count == 0 {
            return Err(Error::configuration("detector reports zero pixels"));
        }

        let layout = backend.spectrum_layout(pixel_count)?;
        let calibration = backend.load_calibration()?;
        calibration.validate()?;

        tracing::debug!(
            "spectrum for {} pixels: {} raw bytes, {} samples",
            pixel_count,
            layout.raw_len,
            layout.data_len
        );
        Spectrum::allocate(backend.model(), pixel_count, layout, calibration)
    }

    /// Timeout of acquisition reads: the transfer timeout plus the last
    /// known integration time.
    fn read_timeout(&self) -> Duration {
        let integration_ms = match (&self.backend, &self.status) {
            (Some(backend), Some(status)) => backend.get_integration_time(status),
            _ => 0,
        };
        self.config.timeout + Duration::from_millis(u64::from(integration_ms))
    }

    /// Acquire one spectrum into `spectrum`.
    ///
    /// If the data cannot be received, the device is sent the stop
    /// command and [`Error::NoData`] is returned with the receive failure
    /// as its source. If the stop command fails too, that error is
    /// returned instead.
    pub fn request_spectrum(&mut self, spectrum: &mut Spectrum) -> Result<()> {
        let read_timeout = self.read_timeout();
        let backend = self
            .backend
            .as_mut()
            .ok_or_else(|| Error::invalid("no device open"))?;

        if spectrum.model() != backend.model() {
            return Err(Error::invalid(format!(
                "spectrum was created for a {}, session is bound to a {}",
                spectrum.model(),
                backend.model()
            )));
        }
        let layout = backend.spectrum_layout(spectrum.pixel_count())?;
        if spectrum.raw_len() < layout.raw_len || spectrum.len() != layout.data_len {
            return Err(Error::invalid(format!(
                "spectrum buffers ({} bytes, {} samples) do not fit {} bytes, {} samples",
                spectrum.raw_len(),
                spectrum.len(),
                layout.raw_len,
                layout.data_len
            )));
        }

        spectrum.clear();
        backend.send(Command::RequestSpectrum)?;
        self.state = AcquisitionState::Armed;
        tracing::trace!("spectrum requested, reading with {:?} timeout", read_timeout);

        self.state = AcquisitionState::Draining;
        match backend.receive_spectrum(spectrum, read_timeout) {
            Ok(()) => {
                self.state = AcquisitionState::Idle;
                Ok(())
            }
            Err(cause) => {
                self.state = AcquisitionState::Failed;
                tracing::warn!("acquisition failed, stopping: {}", cause);
                backend.send(Command::StopAcquisition)?;
                Err(Error::NoData {
                    source: Box::new(cause),
                })
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.timeout, Duration::from_millis(1000));
        assert_eq!(config.interface, 0);
        assert!(config.clear_halts);

        let config = config.with_timeout(Duration::from_millis(50)).with_clear_halts(false);
        assert_eq!(config.timeout, Duration::from_millis(50));
        assert!(!config.clear_halts);
    }

    #[test]
    fn test_default_selector_is_nirquest512() {
        assert_eq!(
            DeviceSelector::default(),
            DeviceSelector::Usb {
                vendor: 0x2457,
                product: 0x1026
            }
        );
    }

    #[test]
    fn test_operations_need_open_device() {
        let mut session = Session::default();
        assert!(!session.is_open());
        assert!(matches!(
            session.get_pixel_count(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            session.enable_fan(true),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            session.create_spectrum(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unsupported_id_rejected_before_usb() {
        let mut session = Session::default();
        assert!(matches!(
            session.open(0x1d50, 0x60a1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_simulated_session() {
        let mut session = Session::default();
        session.open_simulated().unwrap();
        assert_eq!(session.model(), Some(Model::Simulated));
        assert_eq!(session.get_pixel_count().unwrap(), 512);
        assert_eq!(session.get_integration_time().unwrap(), 100);

        session.set_integration_time(250).unwrap();
        assert_eq!(session.get_integration_time().unwrap(), 250);
        assert_eq!(session.read_timeout(), Duration::from_millis(1250));

        let mut spectrum = session.create_spectrum().unwrap();
        assert_eq!(spectrum.len(), 512);
        session.request_spectrum(&mut spectrum).unwrap();
        assert_eq!(session.acquisition_state(), AcquisitionState::Idle);

        session.close();
        assert!(!session.is_open());
        assert!(session.status().is_none());
    }
}
