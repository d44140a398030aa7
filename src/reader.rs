//! Continuous acquisition on top of a [`Session`].
//!
//! [`SpectrumReader`] is a blocking iterator over acquisitions;
//! [`AsyncSpectrumReader`] runs the same loop on a dedicated thread and
//! exposes it as a [`Stream`].

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;

use crate::error::{Error, Result};
use crate::session::{DeviceSelector, Session, SessionConfig};
use crate::spectrum::Spectrum;

/// Acquisitions buffered between the worker thread and the stream.
const CHANNEL_CAPACITY: usize = 4;

/// Settings of a spectrum reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Device to open.
    pub device: DeviceSelector,
    /// Session settings.
    pub session: SessionConfig,
    /// Integration time in milliseconds; the device setting is kept if unset.
    pub integration_time_ms: Option<u32>,
}

/// Snapshot of one acquired spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct Acquisition {
    /// Position in the reader's sequence, from 0.
    pub index: u64,
    /// Wavelength of each sample, in nm.
    pub wavelengths: Vec<f64>,
    /// Corrected intensities.
    pub intensities: Vec<f64>,
    /// Raw bytes of the transfer.
    pub raw: Vec<u8>,
}

impl Acquisition {
    pub fn from_spectrum(index: u64, spectrum: &Spectrum) -> Self {
        let (wavelengths, intensities): (Vec<f64>, Vec<f64>) = spectrum.points().unzip();
        Acquisition {
            index,
            wavelengths,
            intensities,
            raw: spectrum.raw().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.intensities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intensities.is_empty()
    }
}

/**
 * Synchronous spectrum reader
 */
pub struct SpectrumReader {
    session: Session,
    spectrum: Spectrum,
    index: u64,
    failed: bool,
}

impl SpectrumReader {
    /// Open the configured device and prepare a spectrum for it.
    pub fn new(config: &ReaderConfig) -> Result<Self> {
        let mut session = Session::new(config.session.clone());
        session.open_selector(config.device)?;
        Self::from_session(session, config.integration_time_ms)
    }

    /// Read from an already open session.
    pub fn from_session(mut session: Session, integration_time_ms: Option<u32>) -> Result<Self> {
        if let Some(ms) = integration_time_ms {
            session.set_integration_time(ms)?;
        }
        let spectrum = session.create_spectrum()?;
        Ok(SpectrumReader {
            session,
            spectrum,
            index: 0,
            failed: false,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Spectrum holding the latest acquisition.
    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    /// Hand back the session, consuming the reader.
    pub fn into_session(self) -> Session {
        self.session
    }
}

impl Iterator for SpectrumReader {
    type Item = Result<Acquisition>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.session.request_spectrum(&mut self.spectrum) {
            Ok(()) => {
                let acquisition = Acquisition::from_spectrum(self.index, &self.spectrum);
                self.index += 1;
                Some(Ok(acquisition))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/**
 * Asynchronous spectrum reader
 */
pub struct AsyncSpectrumReader {
    rx: tokio::sync::mpsc::Receiver<Result<Acquisition>>,
    _handle: std::thread::JoinHandle<()>,
}

impl AsyncSpectrumReader {
    /// Open the configured device on a worker thread.
    ///
    /// Errors while opening are returned here, not through the stream.
    pub fn new(config: &ReaderConfig) -> Result<Self> {
        let cfg = config.clone();
        Self::spawn(move || SpectrumReader::new(&cfg))
    }

    /// Move an already open session to a worker thread.
    pub fn from_session(session: Session, integration_time_ms: Option<u32>) -> Result<Self> {
        Self::spawn(move || SpectrumReader::from_session(session, integration_time_ms))
    }

    fn spawn<F>(open: F) -> Result<Self>
    where
        F: FnOnce() -> Result<SpectrumReader> + Send + 'static,
    {
        let (tx, rx) = tokio::sync::mpsc::channel::<Result<Acquisition>>(CHANNEL_CAPACITY);
        let (tx_init, rx_init) = std::sync::mpsc::channel::<Result<()>>();

        let handle = std::thread::spawn(move || {
            let mut reader = match open() {
                Ok(reader) => {
                    let _ = tx_init.send(Ok(()));
                    reader
                }
                Err(e) => {
                    let _ = tx_init.send(Err(e));
                    return;
                }
            };

            let mut last_ok = true;
            for item in reader.by_ref() {
                last_ok = item.is_ok();
                if tx.blocking_send(item).is_err() {
                    tracing::debug!("spectrum stream dropped");
                    break;
                }
            }

            // A failed request has already sent the stop command
            if last_ok {
                if let Err(e) = reader.session_mut().stop_acquisition() {
                    tracing::warn!("failed to stop acquisition: {}", e);
                }
            }
        });

        match rx_init.recv() {
            Ok(Ok(())) => Ok(Self {
                rx,
                _handle: handle,
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(Error::invalid("spectrum reader thread exited during open")),
        }
    }
}

impl Stream for AsyncSpectrumReader {
    type Item = Result<Acquisition>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        this.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{OFFICE_LAMP, SUNLIGHT};

    fn simulated() -> ReaderConfig {
        ReaderConfig {
            device: DeviceSelector::Simulated,
            ..Default::default()
        }
    }

    #[test]
    fn test_reader_alternates() {
        let reader = SpectrumReader::new(&simulated()).unwrap();
        let acquisitions: Vec<_> = reader.take(3).map(|a| a.unwrap()).collect();
        assert_eq!(acquisitions[0].intensities, OFFICE_LAMP.to_vec());
        assert_eq!(acquisitions[1].intensities, SUNLIGHT.to_vec());
        assert_eq!(acquisitions[2].index, 2);
        assert_eq!(acquisitions[0].wavelengths[0], 8.994393E+02);
    }

    #[test]
    fn test_reader_sets_integration_time() {
        let config = ReaderConfig {
            integration_time_ms: Some(20),
            ..simulated()
        };
        let mut reader = SpectrumReader::new(&config).unwrap();
        assert_eq!(reader.session_mut().get_integration_time().unwrap(), 20);
    }
}
