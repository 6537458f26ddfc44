//! The global drive: amplitude and detuning waveforms played together.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::waveform::Waveform;

/// Amplitude and detuning waveforms sharing one duration.
///
/// A missing waveform is replaced by a delay, and the shorter of the two is
/// padded with a trailing delay, so both always cover the same time span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DriveSpec", into = "DriveSpec")]
pub struct Drive {
    amplitude: Waveform,
    detuning: Waveform,
    phase: f64,
}

/// Serialized form of a [`Drive`]; either waveform may be omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveSpec {
    /// Amplitude waveform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<Waveform>,
    /// Detuning waveform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detuning: Option<Waveform>,
    /// Constant phase of the drive.
    #[serde(default)]
    pub phase: f64,
}

impl Drive {
    /// Build a drive from optional amplitude and detuning waveforms.
    pub fn new(
        amplitude: Option<Waveform>,
        detuning: Option<Waveform>,
        phase: f64,
    ) -> IrResult<Self> {
        if !phase.is_finite() {
            return Err(IrError::InvalidPhase(phase));
        }

        let (amplitude, detuning) = match (amplitude, detuning) {
            (None, None) => return Err(IrError::EmptyDrive),
            (Some(amp), None) => {
                amp.validate()?;
                let pad = Waveform::delay(amp.duration())?;
                (amp, pad)
            }
            (None, Some(det)) => {
                det.validate()?;
                let pad = Waveform::delay(det.duration())?;
                (pad, det)
            }
            (Some(amp), Some(det)) => {
                amp.validate()?;
                det.validate()?;
                pad_to_match(amp, det)?
            }
        };

        let min_amp = amplitude.min_value();
        if min_amp < 0.0 {
            return Err(IrError::NegativeAmplitude(min_amp));
        }

        Ok(Self {
            amplitude,
            detuning,
            phase,
        })
    }

    /// Drive with only an amplitude waveform.
    pub fn from_amplitude(amplitude: Waveform) -> IrResult<Self> {
        Self::new(Some(amplitude), None, 0.0)
    }

    /// Drive with both waveforms and zero phase.
    pub fn with_waveforms(amplitude: Waveform, detuning: Waveform) -> IrResult<Self> {
        Self::new(Some(amplitude), Some(detuning), 0.0)
    }

    /// Amplitude waveform (after padding).
    pub fn amplitude(&self) -> &Waveform {
        &self.amplitude
    }

    /// Detuning waveform (after padding).
    pub fn detuning(&self) -> &Waveform {
        &self.detuning
    }

    /// Constant drive phase.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Dimensionless duration shared by both waveforms.
    pub fn duration(&self) -> f64 {
        self.amplitude.duration()
    }

    /// Peak amplitude, never negative.
    pub fn max_amplitude(&self) -> f64 {
        self.amplitude.max_value().max(0.0)
    }

    /// Peak detuning magnitude.
    pub fn max_abs_detuning(&self) -> f64 {
        self.detuning.max_abs_value()
    }
}

fn pad_to_match(amp: Waveform, det: Waveform) -> IrResult<(Waveform, Waveform)> {
    let (da, dd) = (amp.duration(), det.duration());
    if da > dd {
        let pad = Waveform::delay(da - dd)?;
        Ok((amp, det.then(pad)))
    } else if dd > da {
        let pad = Waveform::delay(dd - da)?;
        Ok((amp.then(pad), det))
    } else {
        Ok((amp, det))
    }
}

impl TryFrom<DriveSpec> for Drive {
    type Error = IrError;

    fn try_from(spec: DriveSpec) -> IrResult<Self> {
        Self::new(spec.amplitude, spec.detuning, spec.phase)
    }
}

impl From<Drive> for DriveSpec {
    fn from(drive: Drive) -> Self {
        Self {
            amplitude: Some(drive.amplitude),
            detuning: Some(drive.detuning),
            phase: drive.phase,
        }
    }
}
