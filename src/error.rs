//! Error handling for the oceanspec library
//!
//! Every failure of the driver maps to one [`Error`] variant, and every
//! variant maps to a negative [`StatusCode`] for callers that report
//! numeric codes.

use thiserror::Error;

/// A specialized Result type for oceanspec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric status codes (errno values, negated).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum StatusCode {
    /// Operation successful.
    Success = 0,
    /// Transport failure.
    Io = -5,
    /// Out of memory.
    NoMem = -12,
    /// No matching device or backend.
    NoDevice = -19,
    /// Invalid argument.
    InvalidArgument = -22,
    /// Acquisition produced no data.
    NoData = -61,
    /// Operation not supported by the active backend.
    Unsupported = -95,
    /// Device configuration is unusable.
    BadConfiguration = -126,
}

impl StatusCode {
    /// Get a human-readable name for the status code.
    pub fn name(self) -> &'static str {
        match self {
            StatusCode::Success => "OCEAN_SUCCESS",
            StatusCode::Io => "OCEAN_ERROR_IO",
            StatusCode::NoMem => "OCEAN_ERROR_NO_MEM",
            StatusCode::NoDevice => "OCEAN_ERROR_NO_DEVICE",
            StatusCode::InvalidArgument => "OCEAN_ERROR_INVALID_ARGUMENT",
            StatusCode::NoData => "OCEAN_ERROR_NO_DATA",
            StatusCode::Unsupported => "OCEAN_ERROR_UNSUPPORTED",
            StatusCode::BadConfiguration => "OCEAN_ERROR_CONFIGURATION",
        }
    }

    /// The numeric value.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Error type for oceanspec operations
#[derive(Debug, Error)]
pub enum Error {
    /// Undersized buffer, unsupported id, unopened session, mismatched spectrum
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No attached device or no backend for the device
    #[error("No device found for {vendor:04x}:{product:04x}")]
    DeviceNotFound {
        /// USB vendor id
        vendor: u16,
        /// USB product id
        product: u16,
    },

    /// Bulk transfer, read/write error or partial transfer
    #[error("Transport failure: {0}")]
    Transport(#[source] rs_ocean::Error),

    /// Buffer allocation failed
    #[error("Out of memory allocating {0} bytes")]
    OutOfMemory(usize),

    /// Acquisition failed; the device was sent a stop command
    #[error("No data: {source}")]
    NoData {
        /// The failure that aborted the acquisition
        #[source]
        source: Box<Error>,
    },

    /// Operation invalid for the active backend
    #[error("Unsupported operation for {backend}: {operation}")]
    Unsupported {
        /// Backend name
        backend: &'static str,
        /// Operation name
        operation: &'static str,
    },

    /// Calibration data unusable (e.g. zero saturation level)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Writing to a caller-supplied sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rs_ocean::Error> for Error {
    fn from(err: rs_ocean::Error) -> Self {
        match err {
            rs_ocean::Error::DeviceNotFound { vendor, product } => {
                Error::DeviceNotFound { vendor, product }
            }
            other => Error::Transport(other),
        }
    }
}

impl Error {
    /// Create an invalid-argument error with a custom message
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create a configuration error with a custom message
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Status code reported for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidArgument(_) => StatusCode::InvalidArgument,
            Error::DeviceNotFound { .. } => StatusCode::NoDevice,
            Error::Transport(_) | Error::Io(_) => StatusCode::Io,
            Error::OutOfMemory(_) => StatusCode::NoMem,
            Error::NoData { .. } => StatusCode::NoData,
            Error::Unsupported { .. } => StatusCode::Unsupported,
            Error::Configuration(_) => StatusCode::BadConfiguration,
        }
    }

    /// Numeric status code (always negative)
    pub fn code(&self) -> i32 {
        self.status_code().code()
    }
}
