//! Error types for rs-ocean operations.

use thiserror::Error;

/// Result type for rs-ocean operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the USB command layer.
#[derive(Debug, Error)]
pub enum Error {
    /// USB operation failed.
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),

    /// No device with the requested vendor/product id is attached.
    #[error("No device found for {vendor:04x}:{product:04x}")]
    DeviceNotFound {
        /// USB vendor id.
        vendor: u16,
        /// USB product id.
        product: u16,
    },

    /// Failed to open or claim the device.
    #[error("Failed to open device: {0}")]
    OpenFailed(String),

    /// Bulk transfer on an endpoint failed.
    #[error("Bulk transfer on endpoint 0x{endpoint:02x} failed: {source}")]
    TransferFailed {
        /// Endpoint address.
        endpoint: u8,
        /// Underlying USB error.
        source: rusb::Error,
    },

    /// Bulk transfer completed with fewer bytes than required.
    #[error("Short transfer on endpoint 0x{endpoint:02x}: got {actual} of {expected} bytes")]
    ShortTransfer {
        /// Endpoint address.
        endpoint: u8,
        /// Number of bytes required.
        expected: usize,
        /// Number of bytes actually transferred.
        actual: usize,
    },

    /// Invalid response from device.
    #[error("Invalid device response: {0}")]
    InvalidResponse(String),

    /// Timeout waiting for device response.
    #[error("Device timeout on endpoint 0x{0:02x}")]
    Timeout(u8),
}

impl Error {
    /// Map a raw `rusb` error from a transfer on `endpoint`.
    pub fn transfer(endpoint: u8, source: rusb::Error) -> Self {
        match source {
            rusb::Error::Timeout => Error::Timeout(endpoint),
            source => Error::TransferFailed { endpoint, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_maps_timeout() {
        let err = Error::transfer(0x82, rusb::Error::Timeout);
        assert!(matches!(err, Error::Timeout(0x82)));
    }

    #[test]
    fn test_transfer_keeps_endpoint() {
        let err = Error::transfer(0x81, rusb::Error::Pipe);
        assert!(matches!(err, Error::TransferFailed { endpoint: 0x81, .. }));
        assert!(err.to_string().contains("0x81"));
    }

    #[test]
    fn test_short_transfer_display() {
        let err = Error::ShortTransfer {
            endpoint: 0x86,
            expected: 2048,
            actual: 512,
        };
        assert_eq!(
            err.to_string(),
            "Short transfer on endpoint 0x86: got 512 of 2048 bytes"
        );
    }
}
