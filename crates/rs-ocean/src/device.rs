//! Command/response handle for one opened spectrometer.

use crate::command::{Command, InfoSlot};
use crate::error::{Error, Result};
use crate::status::{Status, StatusLayout, Temperature, INFO_LEN, STATUS_LEN, TEMPERATURE_LEN};
use crate::transport::UsbTransport;
use std::time::Duration;

/// Default timeout for a single bulk transfer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Serial number responses fit in this many bytes.
const SERIAL_LEN: usize = 32;

/// Endpoint roles of a device family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    /// Commands are written here.
    pub command_out: u8,
    /// Command responses are read here.
    pub command_in: u8,
    /// Spectral data (first or only block).
    pub data_in: u8,
    /// Spectral data continuation, if the family splits transfers.
    pub data_in_secondary: Option<u8>,
}

impl Endpoints {
    /// All endpoints in use, in role order.
    pub fn all(&self) -> Vec<u8> {
        let mut eps = vec![self.command_out, self.command_in, self.data_in];
        eps.extend(self.data_in_secondary);
        eps
    }

    /// Whether every role uses its own endpoint address.
    pub fn are_distinct(&self) -> bool {
        let eps = self.all();
        eps.iter()
            .enumerate()
            .all(|(i, ep)| !eps[i + 1..].contains(ep))
    }
}

/// Which data endpoint to read spectral data from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataEndpoint {
    /// The first (or only) data endpoint.
    Primary,
    /// The continuation endpoint of split transfers.
    Secondary,
}

/// An opened spectrometer speaking the command protocol.
///
/// Every operation is synchronous: the command is written, and if the
/// firmware answers, the response is read from the command-in endpoint
/// within the configured timeout. Nothing is retried.
pub struct OceanDevice {
    transport: Box<dyn UsbTransport>,
    endpoints: Endpoints,
    timeout: Duration,
}

impl OceanDevice {
    /// Wrap an opened transport.
    pub fn new(transport: Box<dyn UsbTransport>, endpoints: Endpoints, timeout: Duration) -> Self {
        OceanDevice {
            transport,
            endpoints,
            timeout,
        }
    }

    /// Endpoint roles in use.
    pub fn endpoints(&self) -> Endpoints {
        self.endpoints
    }

    /// Clear halts on every endpoint and send the initialize command.
    ///
    /// A failed clear-halt is logged only; the device frequently reports
    /// errors for endpoints that were never stalled.
    pub fn initialize(&mut self, clear_halts: bool) -> Result<()> {
        if clear_halts {
            for ep in self.endpoints.all() {
                if let Err(e) = self.transport.clear_halt(ep) {
                    tracing::warn!("clear_halt(ep: 0x{:02x}) failed: {}", ep, e);
                }
            }
        }

        self.send(Command::Initialize)
    }

    /// Write a command to the command-out endpoint.
    pub fn send(&mut self, command: Command) -> Result<()> {
        let bytes = command.encode();
        let ep = self.endpoints.command_out;

        let done = self.transport.bulk_write(ep, &bytes, self.timeout)?;
        if done != bytes.len() {
            tracing::debug!(
                "command {:?} short write: {}/{} bytes",
                command,
                done,
                bytes.len()
            );
            return Err(Error::ShortTransfer {
                endpoint: ep,
                expected: bytes.len(),
                actual: done,
            });
        }

        tracing::trace!("sent {:?} ({:02X?})", command, bytes);
        Ok(())
    }

    /// Send a command and read its response into `buf`.
    ///
    /// Returns the number of bytes received.
    pub fn query(&mut self, command: Command, buf: &mut [u8]) -> Result<usize> {
        self.send(command)?;

        let ep = self.endpoints.command_in;
        let done = self.transport.bulk_read(ep, buf, self.timeout)?;
        tracing::trace!("{:?} response: {:02X?}", command, &buf[..done.min(buf.len())]);
        Ok(done)
    }

    /// Read the status record.
    pub fn query_status(&mut self, layout: StatusLayout) -> Result<Status> {
        let mut buf = [0u8; STATUS_LEN];
        let done = self.query(Command::QueryStatus, &mut buf)?;
        require(self.endpoints.command_in, STATUS_LEN, done)?;
        Status::decode(&buf, layout)
    }

    /// Read one device-info slot.
    pub fn query_info(&mut self, slot: InfoSlot) -> Result<[u8; INFO_LEN]> {
        let mut buf = [0u8; INFO_LEN];
        let done = self.query(Command::QueryInfo(slot), &mut buf)?;
        // Two header bytes and at least one payload byte
        require(self.endpoints.command_in, 3, done)?;
        Ok(buf)
    }

    /// Read the serial number.
    pub fn serial(&mut self) -> Result<String> {
        let mut buf = [0u8; SERIAL_LEN];
        let done = self.query(Command::GetSerial, &mut buf)?;

        let bytes = &buf[..done.min(SERIAL_LEN)];
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let serial = String::from_utf8_lossy(&bytes[..end])
            .trim_matches(|c: char| c.is_whitespace() || c.is_control())
            .to_string();

        if serial.is_empty() {
            return Err(Error::InvalidResponse("Serial number empty".to_string()));
        }
        Ok(serial)
    }

    /// Read the PCB and heatsink temperatures.
    pub fn temperature(&mut self) -> Result<Temperature> {
        let mut buf = [0u8; TEMPERATURE_LEN];
        let done = self.query(Command::ReadTemperature, &mut buf)?;
        require(self.endpoints.command_in, TEMPERATURE_LEN, done)?;
        Temperature::decode(&buf)
    }

    /// Blocking read of spectral data.
    ///
    /// On error the content of `buf` is undefined.
    pub fn read_data(
        &mut self,
        which: DataEndpoint,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize> {
        let ep = match which {
            DataEndpoint::Primary => self.endpoints.data_in,
            DataEndpoint::Secondary => self.endpoints.data_in_secondary.ok_or_else(|| {
                Error::InvalidResponse("device has no secondary data endpoint".to_string())
            })?,
        };

        let done = self.transport.bulk_read(ep, buf, timeout)?.min(buf.len());
        tracing::debug!("read {}/{} bytes from ep 0x{:02x}", done, buf.len(), ep);
        Ok(done)
    }

    /// Read an ASCII string descriptor.
    pub fn string_descriptor(&mut self, index: u8) -> Result<String> {
        self.transport.string_descriptor(index)
    }

    /// Reset the USB device.
    pub fn reset(&mut self) -> Result<()> {
        self.transport.reset()
    }
}

/// Fail with [`Error::ShortTransfer`] if fewer than `expected` bytes arrived.
pub fn require(endpoint: u8, expected: usize, actual: usize) -> Result<()> {
    if actual < expected {
        return Err(Error::ShortTransfer {
            endpoint,
            expected,
            actual,
        });
    }
    Ok(())
}
