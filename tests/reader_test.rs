//! Synchronous and asynchronous spectrum readers

mod helpers;

use futures::StreamExt;
use helpers::{nirquest_frame, status_narrow, CalibrationScript, MockDevice, COMMAND_IN};
use oceanspec::backend::{OFFICE_LAMP, SUNLIGHT};
use oceanspec::{
    AsyncSpectrumReader, DeviceSelector, Error, ReaderConfig, Session, SessionConfig,
    SpectrumReader, NIRQUEST512_PID, OCEAN_VID,
};

fn simulated() -> ReaderConfig {
    ReaderConfig {
        device: DeviceSelector::Simulated,
        ..Default::default()
    }
}

fn nirquest_session(device: &MockDevice) -> Session {
    let connector = device.connector(OCEAN_VID, NIRQUEST512_PID);
    let mut session = Session::with_connector(SessionConfig::default(), connector);
    session.open(OCEAN_VID, NIRQUEST512_PID).unwrap();
    device.reply(COMMAND_IN, status_narrow(512, 100));
    CalibrationScript::default().queue(device);
    session
}

#[test]
fn test_reader_stops_after_error() {
    let device = MockDevice::new();
    let session = nirquest_session(&device);
    let samples = vec![1000u16; 512];
    device.reply(0x82, nirquest_frame(&samples));

    let mut reader = SpectrumReader::from_session(session, None).unwrap();

    let first = reader.next().unwrap().unwrap();
    assert_eq!(first.index, 0);
    assert_eq!(first.len(), 512);
    assert!(first.intensities.iter().all(|&v| v == 1000.0));
    assert_eq!(first.wavelengths[100], 930.0);

    assert!(matches!(reader.next(), Some(Err(Error::NoData { .. }))));
    assert!(reader.next().is_none());
}

#[tokio::test]
async fn test_async_reader_streams_simulated_spectra() {
    let mut stream = AsyncSpectrumReader::new(&simulated()).unwrap();

    let first = stream.next().await.unwrap().unwrap();
    let second = stream.next().await.unwrap().unwrap();

    assert_eq!(first.index, 0);
    assert_eq!(first.intensities, OFFICE_LAMP.to_vec());
    assert_eq!(second.index, 1);
    assert_eq!(second.intensities, SUNLIGHT.to_vec());
}

#[tokio::test]
async fn test_async_reader_ends_after_failure() {
    let device = MockDevice::new();
    let session = nirquest_session(&device);

    let mut stream = AsyncSpectrumReader::from_session(session, None).unwrap();

    assert!(matches!(
        stream.next().await,
        Some(Err(Error::NoData { .. }))
    ));
    assert!(stream.next().await.is_none());
    // Request, then the stop sent by the failed acquisition
    assert_eq!(device.opcodes().last(), Some(&0x1E));
}

#[test]
fn test_async_reader_reports_open_errors() {
    let device = MockDevice::new();
    let connector = device.connector(OCEAN_VID, NIRQUEST512_PID);
    let mut session = Session::with_connector(SessionConfig::default(), connector);
    session.open(OCEAN_VID, NIRQUEST512_PID).unwrap();

    // No status reply: the spectrum cannot be sized
    let err = AsyncSpectrumReader::from_session(session, None).err().unwrap();
    assert!(matches!(err, Error::Transport(_)));
}
