//! Static table of supported spectrometers.
//!
//! Each entry binds a USB (vendor, product) pair to the endpoint roles of
//! the model and to the constructor of its [`Backend`]. Opening a device
//! runs the entries as an ordered probe chain: the first entry that does
//! not answer [`Probe::NotThisDevice`] decides the outcome.

use std::fmt;
use std::time::Duration;

use rs_ocean::{
    Endpoints, OceanDevice, UsbTransport, NIRQUEST256_PID, NIRQUEST512_ENDPOINTS, NIRQUEST512_PID,
    OCEAN_VID, USB4000_ENDPOINTS, USB4000_PID,
};

use crate::backend::{Backend, NirQuest, Usb4000};
use crate::error::{Error, Result};

/// USB identifier of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId {
    pub vendor: u16,
    pub product: u16,
}

impl DeviceId {
    pub const fn new(vendor: u16, product: u16) -> Self {
        DeviceId { vendor, product }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor, self.product)
    }
}

/// Backend family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    Usb4000,
    NirQuest512,
    Simulated,
}

impl Model {
    /// Human readable model name.
    pub fn name(self) -> &'static str {
        match self {
            Model::Usb4000 => "USB4000",
            Model::NirQuest512 => "NIRQuest512",
            Model::Simulated => "Simulated",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of probing one registry entry.
pub enum Probe {
    /// The entry claimed the device and its backend is initialized.
    Matched(Box<dyn Backend>),
    /// The entry does not handle this device; the transport is handed on.
    NotThisDevice(Box<dyn UsbTransport>),
    /// The entry claimed the device but could not initialize it.
    Failed(Error),
}

type Constructor = fn(OceanDevice) -> Box<dyn Backend>;

/// One supported device.
pub struct DeviceEntry {
    /// USB identifier.
    pub id: DeviceId,
    /// Marketing name, for listings.
    pub name: &'static str,
    /// Backend family serving the device.
    pub model: Model,
    /// Endpoint roles.
    pub endpoints: Endpoints,
    construct: Constructor,
}

impl DeviceEntry {
    /// Try to bind `transport`, opened for `id`, to this entry.
    pub fn probe(
        &self,
        transport: Box<dyn UsbTransport>,
        id: DeviceId,
        timeout: Duration,
        clear_halts: bool,
    ) -> Probe {
        if self.id != id {
            return Probe::NotThisDevice(transport);
        }

        tracing::debug!("{} matches {}, initializing", self.name, id);
        let device = OceanDevice::new(transport, self.endpoints, timeout);
        let mut backend = (self.construct)(device);
        match backend.initialize(clear_halts) {
            Ok(()) => Probe::Matched(backend),
            Err(e) => Probe::Failed(e),
        }
    }
}

impl fmt::Debug for DeviceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("model", &self.model)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

/// Supported devices, in probe order.
pub static SUPPORTED: &[DeviceEntry] = &[
    DeviceEntry {
        id: DeviceId::new(OCEAN_VID, USB4000_PID),
        name: "Ocean Optics USB4000",
        model: Model::Usb4000,
        endpoints: USB4000_ENDPOINTS,
        construct: Usb4000::boxed,
    },
    DeviceEntry {
        id: DeviceId::new(OCEAN_VID, NIRQUEST512_PID),
        name: "Ocean Optics NIRQuest512",
        model: Model::NirQuest512,
        endpoints: NIRQUEST512_ENDPOINTS,
        construct: NirQuest::boxed,
    },
    DeviceEntry {
        id: DeviceId::new(OCEAN_VID, NIRQUEST256_PID),
        name: "Ocean Optics NIRQuest256",
        model: Model::NirQuest512,
        endpoints: NIRQUEST512_ENDPOINTS,
        construct: NirQuest::boxed,
    },
];

/// Registry entry for `id`, if supported.
pub fn lookup(id: DeviceId) -> Option<&'static DeviceEntry> {
    SUPPORTED.iter().find(|entry| entry.id == id)
}

/// Whether `id` appears in the registry.
pub fn supports(id: DeviceId) -> bool {
    let found = lookup(id).is_some();
    if !found {
        tracing::warn!("{} is not a supported device", id);
    }
    found
}

/// Run the probe chain over every registry entry.
///
/// Fails with [`Error::DeviceNotFound`] when no entry claims the device.
pub fn probe(
    transport: Box<dyn UsbTransport>,
    id: DeviceId,
    timeout: Duration,
    clear_halts: bool,
) -> Result<Box<dyn Backend>> {
    let mut transport = transport;
    for entry in SUPPORTED {
        match entry.probe(transport, id, timeout, clear_halts) {
            Probe::Matched(backend) => return Ok(backend),
            Probe::Failed(e) => {
                tracing::debug!("{} failed to initialize: {}", entry.name, e);
                return Err(e);
            }
            Probe::NotThisDevice(t) => transport = t,
        }
    }

    Err(Error::DeviceNotFound {
        vendor: id.vendor,
        product: id.product,
    })
}
