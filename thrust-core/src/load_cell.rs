//! HX711 load cell amplifier and thrust averaging.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use heapless::HistoryBuffer;

/// Samples in the moving average.
pub const SMOOTHING_SAMPLES: usize = 16;

/// Error type for load cell operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadCellError<E> {
    /// GPIO error.
    Pin(E),
    /// No conversion available yet.
    NotReady,
}

/// Channel and gain applied to the conversion after the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// Channel A, gain 128.
    #[default]
    ChannelA128,
    /// Channel B, gain 32.
    ChannelB32,
    /// Channel A, gain 64.
    ChannelA64,
}

impl Gain {
    /// Clock pulses after the 24 data bits that select this gain.
    pub const fn extra_pulses(self) -> u8 {
        match self {
            Gain::ChannelA128 => 1,
            Gain::ChannelB32 => 2,
            Gain::ChannelA64 => 3,
        }
    }
}

/// Source of raw signed ADC conversions.
pub trait RawSensor {
    type Error;

    /// Whether a conversion can be read without waiting.
    fn is_ready(&mut self) -> Result<bool, LoadCellError<Self::Error>>;

    /// Read one conversion. Fails with [`LoadCellError::NotReady`] if none
    /// is pending.
    fn read_raw(&mut self) -> Result<i32, LoadCellError<Self::Error>>;
}

/// Bit-banged HX711 driver.
///
/// DOUT low means a conversion is ready. Each SCK pulse shifts out one bit,
/// MSB first; 1 to 3 extra pulses select the gain of the next conversion.
/// SCK must stay low between reads or the chip powers down.
pub struct Hx711<DOUT, SCK, D> {
    dout: DOUT,
    sck: SCK,
    delay: D,
    gain: Gain,
}

impl<DOUT, SCK, D> Hx711<DOUT, SCK, D>
where
    DOUT: InputPin,
    SCK: OutputPin<Error = DOUT::Error>,
    D: DelayNs,
{
    /// Wrap the pins. SCK must already be low.
    pub fn new(dout: DOUT, sck: SCK, delay: D, gain: Gain) -> Self {
        Self {
            dout,
            sck,
            delay,
            gain,
        }
    }

    fn pulse(&mut self) -> Result<bool, LoadCellError<DOUT::Error>> {
        self.sck.set_high().map_err(LoadCellError::Pin)?;
        self.delay.delay_us(1);
        let bit = self.dout.is_high().map_err(LoadCellError::Pin)?;
        self.sck.set_low().map_err(LoadCellError::Pin)?;
        self.delay.delay_us(1);
        Ok(bit)
    }
}

impl<DOUT, SCK, D> RawSensor for Hx711<DOUT, SCK, D>
where
    DOUT: InputPin,
    SCK: OutputPin<Error = DOUT::Error>,
    D: DelayNs,
{
    type Error = DOUT::Error;

    fn is_ready(&mut self) -> Result<bool, LoadCellError<Self::Error>> {
        self.dout.is_low().map_err(LoadCellError::Pin)
    }

    fn read_raw(&mut self) -> Result<i32, LoadCellError<Self::Error>> {
        if !self.is_ready()? {
            return Err(LoadCellError::NotReady);
        }

        let mut raw: u32 = 0;
        for _ in 0..24 {
            raw = (raw << 1) | self.pulse()? as u32;
        }
        for _ in 0..self.gain.extra_pulses() {
            self.pulse()?;
        }

        // 24-bit two's complement
        Ok(((raw << 8) as i32) >> 8)
    }
}

/// Moving-average thrust reading with tare and calibration.
pub struct LoadCell<S> {
    sensor: S,
    samples: HistoryBuffer<i32, SMOOTHING_SAMPLES>,
    tare_offset: i32,
    calibration: f32,
}

impl<S: RawSensor> LoadCell<S> {
    /// `calibration` is raw counts per output unit; must be non-zero.
    pub fn new(sensor: S, calibration: f32) -> Self {
        Self {
            sensor,
            samples: HistoryBuffer::new(),
            tare_offset: 0,
            calibration,
        }
    }

    /// Take a conversion if one is ready. Returns whether a sample was added.
    pub fn update(&mut self) -> Result<bool, LoadCellError<S::Error>> {
        if !self.sensor.is_ready()? {
            return Ok(false);
        }
        let raw = self.sensor.read_raw()?;
        self.samples.write(raw);
        Ok(true)
    }

    /// Zero the reading at the current average. Returns the new offset.
    pub fn tare(&mut self) -> Result<i32, LoadCellError<S::Error>> {
        let average = self.average().ok_or(LoadCellError::NotReady)?;
        self.tare_offset = average;
        debug!("load cell tare offset {}", average);
        Ok(average)
    }

    /// Calibrated reading.
    pub fn data(&self) -> f32 {
        match self.average() {
            Some(average) => (average - self.tare_offset) as f32 / self.calibration,
            None => 0.0,
        }
    }

    /// Mean of the buffered samples.
    pub fn average(&self) -> Option<i32> {
        let samples = self.samples.as_slice();
        if samples.is_empty() {
            return None;
        }
        let sum: i64 = samples.iter().map(|&s| s as i64).sum();
        Some((sum / samples.len() as i64) as i32)
    }

    pub fn tare_offset(&self) -> i32 {
        self.tare_offset
    }

    pub fn set_calibration(&mut self, calibration: f32) {
        self.calibration = calibration;
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}
