//! USB transport layer for Ocean Optics spectrometers.
//!
//! The command layer only needs a handful of capabilities from the host
//! USB stack. They are captured by [`UsbTransport`] (one opened device)
//! and [`UsbConnector`] (the bus the device is opened from), with a
//! `rusb` implementation of both.

use crate::error::{Error, Result};
use rusb::{Context, DeviceHandle, UsbContext};
use std::time::Duration;

/// Interface claimed on every supported spectrometer.
pub const DEFAULT_INTERFACE: u8 = 0;

/// An opened USB device with a claimed interface.
///
/// Dropping the transport releases the interface and closes the device.
pub trait UsbTransport: Send {
    /// Write `data` to a bulk OUT endpoint. Returns bytes written.
    fn bulk_write(&mut self, endpoint: u8, data: &[u8], timeout: Duration) -> Result<usize>;

    /// Read from a bulk IN endpoint into `buf`. Returns bytes read.
    fn bulk_read(&mut self, endpoint: u8, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Clear a halt/stall condition on an endpoint.
    fn clear_halt(&mut self, endpoint: u8) -> Result<()>;

    /// Read an ASCII string descriptor.
    fn string_descriptor(&mut self, index: u8) -> Result<String>;

    /// Reset the device.
    fn reset(&mut self) -> Result<()>;
}

/// Opens transports by vendor/product id.
pub trait UsbConnector: Send {
    /// Open the first device matching `vendor:product` and claim its interface.
    fn open(&self, vendor: u16, product: u16) -> Result<Box<dyn UsbTransport>>;
}

/// Attached device, as returned by [`RusbConnector::list_devices`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbDeviceInfo {
    /// USB vendor id.
    pub vendor: u16,
    /// USB product id.
    pub product: u16,
    /// Bus number.
    pub bus: u8,
    /// Device address on the bus.
    pub address: u8,
}

/// [`UsbConnector`] backed by a libusb context.
pub struct RusbConnector {
    context: Context,
    interface: u8,
}

impl RusbConnector {
    /// Create a new libusb context.
    pub fn new() -> Result<Self> {
        Ok(RusbConnector {
            context: Context::new()?,
            interface: DEFAULT_INTERFACE,
        })
    }

    /// Use a different interface number when claiming devices.
    pub fn with_interface(mut self, interface: u8) -> Self {
        self.interface = interface;
        self
    }

    /// List attached devices accepted by `filter(vendor, product)`.
    pub fn list_devices<F>(&self, filter: F) -> Result<Vec<UsbDeviceInfo>>
    where
        F: Fn(u16, u16) -> bool,
    {
        let devices = self.context.devices()?;
        let mut result = Vec::new();

        for device in devices.iter() {
            let desc = match device.device_descriptor() {
                Ok(d) => d,
                Err(_) => continue,
            };

            if filter(desc.vendor_id(), desc.product_id()) {
                result.push(UsbDeviceInfo {
                    vendor: desc.vendor_id(),
                    product: desc.product_id(),
                    bus: device.bus_number(),
                    address: device.address(),
                });
            }
        }

        Ok(result)
    }
}

impl UsbConnector for RusbConnector {
    fn open(&self, vendor: u16, product: u16) -> Result<Box<dyn UsbTransport>> {
        let handle = self
            .context
            .open_device_with_vid_pid(vendor, product)
            .ok_or(Error::DeviceNotFound { vendor, product })?;

        Ok(Box::new(RusbTransport::claim(handle, self.interface)?))
    }
}

/// [`UsbTransport`] over a `rusb` device handle.
pub struct RusbTransport {
    handle: DeviceHandle<Context>,
    interface: u8,
}

impl RusbTransport {
    /// Claim `interface` on an opened handle.
    ///
    /// The active configuration is left untouched: selecting configuration 1
    /// explicitly stops these spectrometers from answering.
    pub fn claim(handle: DeviceHandle<Context>, interface: u8) -> Result<Self> {
        #[cfg(target_os = "linux")]
        {
            if handle.kernel_driver_active(interface).unwrap_or(false) {
                tracing::debug!("Detaching kernel driver from interface {}", interface);
                if let Err(e) = handle.detach_kernel_driver(interface) {
                    tracing::warn!("Failed to detach kernel driver: {}", e);
                }
            }
        }

        handle
            .claim_interface(interface)
            .map_err(|e| Error::OpenFailed(format!("claim interface {}: {}", interface, e)))?;

        Ok(RusbTransport { handle, interface })
    }
}

impl UsbTransport for RusbTransport {
    fn bulk_write(&mut self, endpoint: u8, data: &[u8], timeout: Duration) -> Result<usize> {
        self.handle
            .write_bulk(endpoint, data, timeout)
            .map_err(|e| Error::transfer(endpoint, e))
    }

    fn bulk_read(&mut self, endpoint: u8, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        self.handle
            .read_bulk(endpoint, buf, timeout)
            .map_err(|e| Error::transfer(endpoint, e))
    }

    fn clear_halt(&mut self, endpoint: u8) -> Result<()> {
        Ok(self.handle.clear_halt(endpoint)?)
    }

    fn string_descriptor(&mut self, index: u8) -> Result<String> {
        Ok(self.handle.read_string_descriptor_ascii(index)?)
    }

    fn reset(&mut self) -> Result<()> {
        Ok(self.handle.reset()?)
    }
}

impl Drop for RusbTransport {
    fn drop(&mut self) {
        if let Err(e) = self.handle.release_interface(self.interface) {
            tracing::debug!("Failed to release USB interface: {}", e);
        }
        // DeviceHandle closes the device when dropped
        tracing::debug!("USB transport closed");
    }
}
