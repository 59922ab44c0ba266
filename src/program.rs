//! Program compilation and entry point extraction.

use std::fmt;

use log::{debug, error};

use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::source::KernelSource;

/// A built program and the kernel extracted from it.
pub struct CompiledProgram<D: Driver> {
    // Declaration order is drop order: the kernel is released before its program.
    kernel: D::Kernel,
    program: D::Program,
    entry_point: String,
}

impl<D: Driver> fmt::Debug for CompiledProgram<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledProgram")
            .field("entry_point", &self.entry_point)
            .finish_non_exhaustive()
    }
}

impl<D: Driver> CompiledProgram<D> {
    pub fn kernel(&self) -> &D::Kernel {
        &self.kernel
    }

    pub fn program(&self) -> &D::Program {
        &self.program
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }
}

/// Compiles `source` for `device` and extracts its entry point.
///
/// The build is synchronous and uses no compiler options. On build failure
/// the driver's build log is logged and returned in the error.
pub fn compile<D: Driver>(
    driver: &D,
    context: &D::Context,
    device: D::Device,
    source: &KernelSource,
) -> Result<CompiledProgram<D>> {
    debug!("Creating program from {} bytes of source", source.len());
    let mut program = driver
        .create_program(context, source.text())
        .map_err(|status| Error::ProgramCreation { status })?;

    if let Err(failure) = driver.build_program(&mut program, device) {
        error!("Build log:\n{}", failure.log.trim_end());
        return Err(Error::ProgramBuild {
            status: failure.status,
            log: failure.log,
        });
    }
    debug!("Built program for device {:?}", device);

    let name = source.entry_point();
    let kernel = driver
        .create_kernel(&program, name)
        .map_err(|status| Error::KernelExtraction {
            name: name.to_string(),
            status,
        })?;
    debug!("Extracted kernel `{}`", name);

    Ok(CompiledProgram {
        kernel,
        program,
        entry_point: name.to_string(),
    })
}
