//! Pure-Rust USB command layer for Ocean Optics spectrometers.
//!
//! # Overview
//!
//! `rs-ocean` speaks the bulk-endpoint command protocol shared by the
//! USB4000 and NIRQuest families: command encoding, status and
//! device-info decoding, and a synchronous [`OceanDevice`] handle on top
//! of any [`UsbTransport`]. Spectrum decoding and model dispatch live in
//! the `oceanspec` crate.
//!
//! # Example
//!
//! ```no_run
//! use rs_ocean::{OceanDevice, RusbConnector, UsbConnector, StatusLayout, NIRQUEST512_ENDPOINTS};
//! use rs_ocean::{OCEAN_VID, NIRQUEST512_PID, DEFAULT_TIMEOUT};
//!
//! let connector = RusbConnector::new()?;
//! let transport = connector.open(OCEAN_VID, NIRQUEST512_PID)?;
//! let mut device = OceanDevice::new(transport, NIRQUEST512_ENDPOINTS, DEFAULT_TIMEOUT);
//! device.initialize(true)?;
//! let status = device.query_status(StatusLayout::Narrow)?;
//! println!("{} pixels", status.pixel_count);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod command;
pub mod device;
pub mod error;
pub mod status;
pub mod transport;

pub use command::{Command, InfoSlot};
pub use device::{DataEndpoint, Endpoints, OceanDevice, DEFAULT_TIMEOUT};
pub use error::{Error, Result};
pub use status::{Status, StatusLayout, Temperature};
pub use transport::{RusbConnector, RusbTransport, UsbConnector, UsbDeviceInfo, UsbTransport};

// Ocean Optics device identifiers (USB VID/PID)
pub const OCEAN_VID: u16 = 0x2457;
pub const USB4000_PID: u16 = 0x1022;
pub const NIRQUEST512_PID: u16 = 0x1026;
pub const NIRQUEST256_PID: u16 = 0x1028;

/// Endpoint roles of the USB4000.
pub const USB4000_ENDPOINTS: Endpoints = Endpoints {
    command_out: 0x01,
    command_in: 0x81,
    data_in: 0x86,
    data_in_secondary: Some(0x82),
};

/// Endpoint roles of the NIRQuest family.
pub const NIRQUEST512_ENDPOINTS: Endpoints = Endpoints {
    command_out: 0x01,
    command_in: 0x81,
    data_in: 0x82,
    data_in_secondary: None,
};
