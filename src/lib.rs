#![doc = include_str!("../readme.md")]

pub mod backend;
pub mod decode;
pub mod error;
pub mod reader;
pub mod registry;
pub mod session;
pub mod spectrum;

pub use backend::Backend;
pub use decode::Calibration;
pub use error::{Error, Result, StatusCode};
pub use reader::{Acquisition, AsyncSpectrumReader, ReaderConfig, SpectrumReader};
pub use registry::{DeviceId, Model};
pub use session::{AcquisitionState, DeviceSelector, Session, SessionConfig};
pub use spectrum::Spectrum;

pub use rs_ocean::{
    Status, Temperature, UsbConnector, UsbTransport, NIRQUEST256_PID, NIRQUEST512_PID, OCEAN_VID,
    USB4000_PID,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library version as `(major, minor, patch)`.
pub fn library_version() -> (u32, u32, u32) {
    let part = |s: &str| s.parse().unwrap_or(0);
    (
        part(env!("CARGO_PKG_VERSION_MAJOR")),
        part(env!("CARGO_PKG_VERSION_MINOR")),
        part(env!("CARGO_PKG_VERSION_PATCH")),
    )
}

/// Attached devices found in the registry.
pub fn list_devices() -> Result<Vec<rs_ocean::UsbDeviceInfo>> {
    let connector = rs_ocean::RusbConnector::new()?;
    let devices = connector.list_devices(|vendor, product| {
        registry::lookup(DeviceId::new(vendor, product)).is_some()
    })?;
    Ok(devices)
}
