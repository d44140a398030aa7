//! Scripted in-memory USB device for driving sessions without hardware

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rs_ocean::{UsbConnector, UsbTransport};

pub const COMMAND_IN: u8 = 0x81;

/// One scripted reply on an IN endpoint
#[derive(Debug, Clone)]
pub enum Reply {
    Data(Vec<u8>),
    Timeout,
}

#[derive(Default)]
struct State {
    writes: Vec<Vec<u8>>,
    replies: HashMap<u8, VecDeque<Reply>>,
    failing_opcodes: Vec<u8>,
    cleared: Vec<u8>,
    resets: usize,
    product: String,
}

/// Shared handle on the scripted device
///
/// Clones observe the same state, so a test keeps one while the session
/// owns the transport.
#[derive(Clone)]
pub struct MockDevice {
    state: Arc<Mutex<State>>,
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDevice {
    pub fn new() -> Self {
        let state = State {
            product: "MOCK SPECTROMETER".to_string(),
            ..Default::default()
        };
        MockDevice {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Queue `data` as the next reply on `endpoint`
    pub fn reply(&self, endpoint: u8, data: impl Into<Vec<u8>>) {
        self.push(endpoint, Reply::Data(data.into()));
    }

    /// Queue a timed-out read on `endpoint`
    pub fn reply_timeout(&self, endpoint: u8) {
        self.push(endpoint, Reply::Timeout);
    }

    fn push(&self, endpoint: u8, reply: Reply) {
        let mut state = self.state.lock().unwrap();
        state.replies.entry(endpoint).or_default().push_back(reply);
    }

    /// Make writes of commands starting with `opcode` fail
    pub fn fail_command(&self, opcode: u8) {
        self.state.lock().unwrap().failing_opcodes.push(opcode);
    }

    /// Every command written so far, in order
    pub fn commands(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().writes.clone()
    }

    /// First byte of every command written so far
    pub fn opcodes(&self) -> Vec<u8> {
        self.commands().iter().map(|c| c[0]).collect()
    }

    pub fn last_command(&self) -> Option<Vec<u8>> {
        self.state.lock().unwrap().writes.last().cloned()
    }

    pub fn clear_commands(&self) {
        self.state.lock().unwrap().writes.clear();
    }

    /// Endpoints whose halt was cleared
    pub fn cleared_halts(&self) -> Vec<u8> {
        self.state.lock().unwrap().cleared.clone()
    }

    pub fn resets(&self) -> usize {
        self.state.lock().unwrap().resets
    }

    /// Replies still queued on `endpoint`
    pub fn pending(&self, endpoint: u8) -> usize {
        let state = self.state.lock().unwrap();
        state.replies.get(&endpoint).map_or(0, |q| q.len())
    }

    pub fn transport(&self) -> Box<dyn UsbTransport> {
        Box::new(MockTransport {
            state: Arc::clone(&self.state),
        })
    }

    /// Connector that finds this device under `vendor:product` only
    pub fn connector(&self, vendor: u16, product: u16) -> Box<dyn UsbConnector> {
        Box::new(MockConnector {
            device: self.clone(),
            vendor,
            product,
        })
    }
}

struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl UsbTransport for MockTransport {
    fn bulk_write(
        &mut self,
        endpoint: u8,
        data: &[u8],
        _timeout: Duration,
    ) -> rs_ocean::Result<usize> {
        let mut state = self.state.lock().unwrap();
        if state.failing_opcodes.contains(&data[0]) {
            return Err(rs_ocean::Error::Timeout(endpoint));
        }
        state.writes.push(data.to_vec());
        Ok(data.len())
    }

    fn bulk_read(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        _timeout: Duration,
    ) -> rs_ocean::Result<usize> {
        let mut state = self.state.lock().unwrap();
        let reply = state
            .replies
            .get_mut(&endpoint)
            .and_then(|q| q.pop_front());
        match reply {
            Some(Reply::Data(data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                Ok(n)
            }
            Some(Reply::Timeout) | None => Err(rs_ocean::Error::Timeout(endpoint)),
        }
    }

    fn clear_halt(&mut self, endpoint: u8) -> rs_ocean::Result<()> {
        self.state.lock().unwrap().cleared.push(endpoint);
        Ok(())
    }

    fn string_descriptor(&mut self, _index: u8) -> rs_ocean::Result<String> {
        Ok(self.state.lock().unwrap().product.clone())
    }

    fn reset(&mut self) -> rs_ocean::Result<()> {
        self.state.lock().unwrap().resets += 1;
        Ok(())
    }
}

struct MockConnector {
    device: MockDevice,
    vendor: u16,
    product: u16,
}

impl UsbConnector for MockConnector {
    fn open(&self, vendor: u16, product: u16) -> rs_ocean::Result<Box<dyn UsbTransport>> {
        if (vendor, product) != (self.vendor, self.product) {
            return Err(rs_ocean::Error::DeviceNotFound { vendor, product });
        }
        Ok(self.device.transport())
    }
}

/// NIRQuest status record
pub fn status_narrow(pixels: u16, integration_ms: u16) -> Vec<u8> {
    let mut buf = vec![0u8; 16];
    buf[0..2].copy_from_slice(&pixels.to_le_bytes());
    buf[2..4].copy_from_slice(&integration_ms.to_le_bytes());
    buf[13] = 0x18;
    buf
}

/// USB4000 status record
pub fn status_wide(pixels: u16, integration_us: u32) -> Vec<u8> {
    let mut buf = vec![0u8; 16];
    buf[0..2].copy_from_slice(&pixels.to_le_bytes());
    buf[2..6].copy_from_slice(&integration_us.to_le_bytes());
    buf
}

/// 18-byte device-info reply carrying an ASCII payload
pub fn info(slot: u8, payload: &str) -> Vec<u8> {
    let mut buf = vec![0u8; 18];
    buf[0] = 0x05;
    buf[1] = slot;
    buf[2..2 + payload.len()].copy_from_slice(payload.as_bytes());
    buf
}

/// Configuration-parameter reply carrying the saturation level
pub fn saturation(level: u16) -> Vec<u8> {
    let mut buf = vec![0u8; 18];
    buf[0] = 0x05;
    buf[1] = 0x11;
    buf[6..8].copy_from_slice(&level.to_le_bytes());
    buf
}

/// Calibration replies in query order
pub struct CalibrationScript {
    pub wavelength: [Option<&'static str>; 4],
    pub order: Option<&'static str>,
    pub nonlinearity: [Option<&'static str>; 8],
    pub saturation: Option<u16>,
}

impl Default for CalibrationScript {
    /// Wavelength `900 + 0.3 * pixel`, identity correction, full-scale saturation
    fn default() -> Self {
        CalibrationScript {
            wavelength: [Some("9.000000E+02"), Some("3.000000E-01"), Some("0"), Some("0")],
            order: Some("0"),
            nonlinearity: [
                Some("1.0"),
                Some("0"),
                Some("0"),
                Some("0"),
                Some("0"),
                Some("0"),
                Some("0"),
                Some("0"),
            ],
            saturation: Some(u16::MAX),
        }
    }
}

impl CalibrationScript {
    /// Queue the replies on the command-in endpoint
    pub fn queue(&self, device: &MockDevice) {
        for (i, coef) in self.wavelength.iter().enumerate() {
            queue_field(device, 1 + i as u8, *coef);
        }
        queue_field(device, 0x0E, self.order);
        for (i, coef) in self.nonlinearity.iter().enumerate() {
            queue_field(device, 6 + i as u8, *coef);
        }
        match self.saturation {
            Some(level) => device.reply(COMMAND_IN, saturation(level)),
            None => device.reply_timeout(COMMAND_IN),
        }
    }
}

fn queue_field(device: &MockDevice, slot: u8, payload: Option<&str>) {
    match payload {
        Some(text) => device.reply(COMMAND_IN, info(slot, text)),
        None => device.reply_timeout(COMMAND_IN),
    }
}

/// NIRQuest frame for `samples`: bit 15 inverted, one sync byte after
/// every 512 sample bytes
pub fn nirquest_frame(samples: &[u16]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(samples.len() * 2 + samples.len() / 256);
    for (j, &sample) in samples.iter().enumerate() {
        frame.extend_from_slice(&(sample ^ 0x8000).to_le_bytes());
        if ((j + 1) * 2) % 512 == 0 {
            frame.push(0xA5);
        }
    }
    frame
}

/// USB4000 frame: 36 dead bytes, then `samples`, zero padded to `len`
pub fn usb4000_frame(samples: &[u16], len: usize) -> Vec<u8> {
    let mut frame = vec![0xFF; 36];
    for &sample in samples {
        frame.extend_from_slice(&sample.to_le_bytes());
    }
    frame.resize(len, 0);
    frame
}
