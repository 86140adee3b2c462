//! Radio transceiver capability consumed by the link layer.

use thiserror::Error;

/// Error reported by a [`Radio`] implementation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// Received frame failed the hardware checksum.
    #[error("CRC mismatch")]
    CrcMismatch,
    /// Operation did not complete in time.
    #[error("radio timeout")]
    Timeout,
    /// Driver-specific failure code.
    #[error("radio error code {code}")]
    Hardware {
        /// Code returned by the driver.
        code: i32,
    },
}

/// Physical-layer parameters applied once at start-up.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RadioSettings {
    /// Carrier frequency in MHz.
    pub frequency_mhz: f32,
    /// Channel bandwidth in kHz.
    pub bandwidth_khz: f32,
    /// LoRa spreading factor.
    pub spreading_factor: u8,
    /// Coding rate denominator (4/x).
    pub coding_rate: u8,
    /// Private network sync word.
    pub sync_word: u8,
    /// Output power in dBm.
    pub tx_power_dbm: i8,
    /// Preamble length in symbols.
    pub preamble_len: u16,
}

impl Default for RadioSettings {
    fn default() -> Self {
        Self {
            frequency_mhz: 915.0,
            bandwidth_khz: 125.0,
            spreading_factor: 7,
            coding_rate: 5,
            sync_word: 0x34,
            tx_power_dbm: 17,
            preamble_len: 8,
        }
    }
}

/// Link quality of the most recent reception.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalQuality {
    /// Received signal strength in dBm.
    pub rssi_dbm: f32,
    /// Signal-to-noise ratio in dB.
    pub snr_db: f32,
}

/// Half-duplex radio transceiver.
///
/// All methods are called from the polling loop only. `transmit` and `read`
/// may block for the on-air time of one frame.
pub trait Radio {
    /// Apply physical-layer settings. Failure here leaves the node unusable.
    fn configure(&mut self, settings: &RadioSettings) -> Result<(), RadioError>;

    /// Send one frame, blocking until it has left the antenna.
    fn transmit(&mut self, frame: &[u8]) -> Result<(), RadioError>;

    /// Fetch the frame that raised the receive interrupt.
    fn read(&mut self) -> Result<Vec<u8>, RadioError>;

    /// Enter continuous receive mode.
    fn start_receive(&mut self) -> Result<(), RadioError>;

    /// Quality of the last received frame, if the hardware reports it.
    fn signal_quality(&self) -> Option<SignalQuality> {
        None
    }
}

impl<R: Radio + ?Sized> Radio for &mut R {
    fn configure(&mut self, settings: &RadioSettings) -> Result<(), RadioError> {
        (**self).configure(settings)
    }

    fn transmit(&mut self, frame: &[u8]) -> Result<(), RadioError> {
        (**self).transmit(frame)
    }

    fn read(&mut self) -> Result<Vec<u8>, RadioError> {
        (**self).read()
    }

    fn start_receive(&mut self) -> Result<(), RadioError> {
        (**self).start_receive()
    }

    fn signal_quality(&self) -> Option<SignalQuality> {
        (**self).signal_quality()
    }
}
