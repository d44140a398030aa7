//! Wire encoding of the spectrometer command set.
//!
//! Every command is a short byte sequence written to the command-out
//! endpoint. Multi-byte arguments are little-endian.

// Opcodes shared by the USB4000 and NIRQuest firmware
const OP_INITIALIZE: u8 = 0x01;
const OP_SET_INTEGRATION_TIME: u8 = 0x02;
const OP_SET_STROBE: u8 = 0x03;
const OP_QUERY_INFO: u8 = 0x05;
const OP_GET_SERIAL: u8 = 0x08;
const OP_REQUEST_SPECTRUM: u8 = 0x09;
const OP_SET_TRIGGER_MODE: u8 = 0x0A;
const OP_STOP_ACQUISITION: u8 = 0x1E;
const OP_READ_TEMPERATURE: u8 = 0x6C;
const OP_SET_FAN: u8 = 0x70;
const OP_QUERY_STATUS: u8 = 0xFE;

/// Trigger mode value that selects the external hardware trigger.
pub const EXTERNAL_TRIGGER_MODE: u8 = 0x03;

/// Device-info slots readable with [`Command::QueryInfo`].
///
/// The numbering is fixed by the firmware's EEPROM layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoSlot {
    /// Device serial number.
    Serial,
    /// Wavelength calibration coefficient (order 0..=3).
    WavelengthCoefficient(u8),
    /// Stray light constant.
    StrayLight,
    /// Non-linearity correction coefficient (order 0..=7).
    NonLinearityCoefficient(u8),
    /// Polynomial order of the non-linearity correction.
    NonLinearityOrder,
    /// Optical bench configuration.
    BenchConfig,
    /// Detector serial number.
    DetectorSerial,
    /// Configuration parameters (carries the saturation level).
    ConfigParameters,
}

impl InfoSlot {
    /// Every slot, in id order.
    pub fn all() -> impl Iterator<Item = InfoSlot> {
        std::iter::once(InfoSlot::Serial)
            .chain((0..4).map(InfoSlot::WavelengthCoefficient))
            .chain(std::iter::once(InfoSlot::StrayLight))
            .chain((0..8).map(InfoSlot::NonLinearityCoefficient))
            .chain([
                InfoSlot::NonLinearityOrder,
                InfoSlot::BenchConfig,
                InfoSlot::DetectorSerial,
                InfoSlot::ConfigParameters,
            ])
    }

    /// Slot id sent as the argument of the device-info query.
    pub fn id(self) -> u8 {
        match self {
            InfoSlot::Serial => 0x00,
            InfoSlot::WavelengthCoefficient(order) => 0x01 + order.min(3),
            InfoSlot::StrayLight => 0x05,
            InfoSlot::NonLinearityCoefficient(order) => 0x06 + order.min(7),
            InfoSlot::NonLinearityOrder => 0x0E,
            InfoSlot::BenchConfig => 0x0F,
            InfoSlot::DetectorSerial => 0x10,
            InfoSlot::ConfigParameters => 0x11,
        }
    }
}

/// A command understood by the spectrometer firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Reset the firmware state machine.
    Initialize,
    /// Set the integration time, in the unit the model's firmware expects.
    SetIntegrationTime(u32),
    /// Enable or disable the lamp/strobe output.
    SetStrobe(bool),
    /// Read one device-info slot.
    QueryInfo(InfoSlot),
    /// Read the serial number.
    GetSerial,
    /// Start a spectral acquisition.
    RequestSpectrum,
    /// Select free-running or external trigger mode.
    SetExternalTrigger(bool),
    /// Abort the current spectral acquisition.
    StopAcquisition,
    /// Read PCB and heatsink temperature ADCs.
    ReadTemperature,
    /// Enable or disable the fan.
    SetFan(bool),
    /// Read the status record.
    QueryStatus,
}

impl Command {
    /// Encode the command into its wire bytes.
    pub fn encode(&self) -> Vec<u8> {
        match *self {
            Command::Initialize => vec![OP_INITIALIZE],
            Command::SetIntegrationTime(value) => {
                let mut cmd = Vec::with_capacity(5);
                cmd.push(OP_SET_INTEGRATION_TIME);
                cmd.extend_from_slice(&value.to_le_bytes());
                cmd
            }
            Command::SetStrobe(enable) => flag_command(OP_SET_STROBE, u8::from(enable)),
            Command::QueryInfo(slot) => vec![OP_QUERY_INFO, slot.id()],
            Command::GetSerial => vec![OP_GET_SERIAL],
            Command::RequestSpectrum => vec![OP_REQUEST_SPECTRUM],
            Command::SetExternalTrigger(enable) => {
                let mode = if enable { EXTERNAL_TRIGGER_MODE } else { 0x00 };
                flag_command(OP_SET_TRIGGER_MODE, mode)
            }
            Command::StopAcquisition => vec![OP_STOP_ACQUISITION],
            Command::ReadTemperature => vec![OP_READ_TEMPERATURE],
            Command::SetFan(enable) => flag_command(OP_SET_FAN, u8::from(enable)),
            Command::QueryStatus => vec![OP_QUERY_STATUS],
        }
    }
}

/// Flag arguments travel as a 16-bit little-endian word.
fn flag_command(opcode: u8, flag: u8) -> Vec<u8> {
    vec![opcode, flag, 0x00]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_byte_commands() {
        assert_eq!(Command::Initialize.encode(), vec![0x01]);
        assert_eq!(Command::RequestSpectrum.encode(), vec![0x09]);
        assert_eq!(Command::StopAcquisition.encode(), vec![0x1E]);
        assert_eq!(Command::QueryStatus.encode(), vec![0xFE]);
        assert_eq!(Command::GetSerial.encode(), vec![0x08]);
    }

    #[test]
    fn test_integration_time_little_endian() {
        let cmd = Command::SetIntegrationTime(1_000_000).encode();
        assert_eq!(cmd, vec![0x02, 0x40, 0x42, 0x0F, 0x00]);
    }

    #[test]
    fn test_flag_commands() {
        assert_eq!(Command::SetStrobe(true).encode(), vec![0x03, 0x01, 0x00]);
        assert_eq!(Command::SetStrobe(false).encode(), vec![0x03, 0x00, 0x00]);
        assert_eq!(Command::SetFan(true).encode(), vec![0x70, 0x01, 0x00]);
        assert_eq!(
            Command::SetExternalTrigger(true).encode(),
            vec![0x0A, 0x03, 0x00]
        );
        assert_eq!(
            Command::SetExternalTrigger(false).encode(),
            vec![0x0A, 0x00, 0x00]
        );
    }

    #[test]
    fn test_info_slot_ids() {
        assert_eq!(InfoSlot::Serial.id(), 0x00);
        assert_eq!(InfoSlot::WavelengthCoefficient(0).id(), 0x01);
        assert_eq!(InfoSlot::WavelengthCoefficient(3).id(), 0x04);
        assert_eq!(InfoSlot::NonLinearityCoefficient(0).id(), 0x06);
        assert_eq!(InfoSlot::NonLinearityCoefficient(7).id(), 0x0D);
        assert_eq!(InfoSlot::NonLinearityOrder.id(), 0x0E);
        assert_eq!(InfoSlot::ConfigParameters.id(), 0x11);
        let ids: Vec<u8> = InfoSlot::all().map(InfoSlot::id).collect();
        assert_eq!(ids, (0x00..=0x11).collect::<Vec<u8>>());
        assert_eq!(
            Command::QueryInfo(InfoSlot::NonLinearityOrder).encode(),
            vec![0x05, 0x0E]
        );
    }
}
