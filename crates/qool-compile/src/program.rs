//! Quantum programs and their compiled form.

use qool_hal::{Device, UnitConverter};
use qool_ir::{Drive, Register};
use serde::Serialize;
use tracing::{info, instrument};

use crate::engine::select_scale_detailed;
use crate::error::{CompileError, CompileResult};
use crate::metrics::{PhysicalSummary, ProgramMetrics};
use crate::profile::{CompilerProfile, ProfileKind};
use crate::sequence::PhysicalSequence;

/// A dimensionless program: a register driven by a global drive.
///
/// Compiling attaches a [`CompiledProgram`] for one device. A failed
/// compilation leaves any earlier result in place.
#[derive(Debug, Clone)]
pub struct QuantumProgram {
    register: Register,
    drive: Drive,
    compiled: Option<CompiledProgram>,
}

/// The result of compiling a program to a device.
#[derive(Debug, Clone, Serialize)]
pub struct CompiledProgram {
    /// Snapshot of the target device.
    pub device: Device,
    /// Profile used.
    pub profile: ProfileKind,
    /// Selected converter.
    pub converter: UnitConverter,
    /// Physical extrema under `converter`.
    pub summary: PhysicalSummary,
    /// Sampled sequence.
    pub sequence: PhysicalSequence,
}

impl QuantumProgram {
    pub fn new(register: Register, drive: Drive) -> Self {
        Self {
            register,
            drive,
            compiled: None,
        }
    }

    pub fn register(&self) -> &Register {
        &self.register
    }

    pub fn drive(&self) -> &Drive {
        &self.drive
    }

    /// Quantities the scale search depends on.
    pub fn metrics(&self) -> ProgramMetrics {
        ProgramMetrics::from_parts(&self.register, &self.drive)
    }

    /// Compile with the device's current converter.
    ///
    /// This is [`CompilerProfile::Default`]: the device's energy is checked
    /// against the program's bounds but never searched. Use
    /// `compile_to(device, CompilerProfile::Auto)` for the largest feasible
    /// amplitude.
    pub fn compile(&mut self, device: &Device) -> CompileResult<&CompiledProgram> {
        self.compile_to(device, CompilerProfile::Default)
    }

    /// Compile to `device` under `profile`.
    ///
    /// The device is only read; its converter is never replaced.
    #[instrument(skip_all, fields(device = device.name(), profile = %profile.kind()))]
    pub fn compile_to(
        &mut self,
        device: &Device,
        profile: CompilerProfile,
    ) -> CompileResult<&CompiledProgram> {
        let metrics = self.metrics();
        let selection = select_scale_detailed(&profile, &metrics, device)?;
        let sequence =
            PhysicalSequence::build(&self.register, &self.drive, &selection.converter, device)?;

        info!(
            "Compiled {} atoms to '{}': {} ns",
            self.register.n_atoms(),
            device.name(),
            sequence.duration_ns
        );

        let compiled = &*self.compiled.insert(CompiledProgram {
            device: device.clone(),
            profile: profile.kind(),
            converter: selection.converter,
            summary: metrics.physical(&selection.converter),
            sequence,
        });
        Ok(compiled)
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// The last successful compilation.
    pub fn compiled(&self) -> Option<&CompiledProgram> {
        self.compiled.as_ref()
    }

    /// Sequence of the last successful compilation.
    pub fn compiled_sequence(&self) -> CompileResult<&PhysicalSequence> {
        self.compiled
            .as_ref()
            .map(|c| &c.sequence)
            .ok_or(CompileError::NotCompiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qool_hal::is_close;
    use qool_ir::Waveform;

    fn program(amplitude: f64) -> QuantumProgram {
        let register = Register::from_coordinates([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
        let drive = Drive::from_amplitude(Waveform::constant(2.0, amplitude).unwrap()).unwrap();
        QuantumProgram::new(register, drive)
    }

    #[test]
    fn test_not_compiled() {
        let program = program(1.0);
        assert!(!program.is_compiled());
        assert!(program.compiled().is_none());
        assert!(matches!(
            program.compiled_sequence(),
            Err(CompileError::NotCompiled)
        ));
    }

    #[test]
    fn test_compile_default() {
        let device = Device::mock();
        let mut program = program(1.0);
        let compiled = program.compile(&device).unwrap();
        assert_eq!(compiled.profile, ProfileKind::Default);
        assert_eq!(&compiled.converter, device.converter());
        assert!(program.is_compiled());
        assert!(program.compiled_sequence().is_ok());
    }

    #[test]
    fn test_device_converter_untouched() {
        let device = Device::mock();
        let before = *device.converter();
        let mut program = program(0.5);
        program.compile_to(&device, CompilerProfile::MaxAmplitude).unwrap();
        assert_eq!(device.converter(), &before);
        let converter = program.compiled().unwrap().converter;
        assert!(is_close(converter.energy_scale(), 2.0 * device.max_amplitude()));
    }

    #[test]
    fn test_failure_keeps_previous_result() {
        let device = Device::mock();
        let mut program = program(0.5);
        program.compile_to(&device, CompilerProfile::Auto).unwrap();
        let before = program.compiled().unwrap().converter;

        let err = program
            .compile_to(&device, CompilerProfile::fixed_energy(1e6))
            .unwrap_err();
        assert!(matches!(err, CompileError::Infeasible(_)));
        assert_eq!(program.compiled().unwrap().converter, before);
        assert_eq!(program.compiled().unwrap().profile, ProfileKind::Auto);
    }

    #[test]
    fn test_recompile_replaces_result() {
        let device = Device::mock();
        let mut program = program(0.5);
        program.compile_to(&device, CompilerProfile::Auto).unwrap();
        program.compile_to(&device, CompilerProfile::MaxDuration).unwrap();
        let compiled = program.compiled().unwrap();
        assert_eq!(compiled.profile, ProfileKind::MaxDuration);
        assert!(is_close(compiled.summary.duration, 6000.0));
    }

    #[test]
    fn test_compiled_program_serializes() {
        let device = Device::mock();
        let mut program = program(1.0);
        let compiled = program.compile_to(&device, CompilerProfile::Auto).unwrap();
        let json = serde_json::to_value(compiled).unwrap();
        assert_eq!(json["profile"], "auto");
        assert_eq!(json["device"]["name"], "mock");
        assert!(json["sequence"]["amplitude"].is_array());
    }
}
