//! OpenCL program build and kernel extraction.

use opencl3::context::Context;
use opencl3::error_codes::ClError;
use opencl3::kernel::Kernel;
use opencl3::program::Program;
use opencl3::types::cl_device_id;

use crate::driver::{BuildFailure, Status};

/// Creates a program from one source string.
pub fn create_program(context: &Context, source: &str) -> Result<Program, Status> {
    Program::create_from_source(context, source).map_err(|ClError(status)| status)
}

/// Builds `program` for `device` with no options, capturing the build log on failure.
pub fn build_program(program: &mut Program, device: cl_device_id) -> Result<(), BuildFailure> {
    program.build(&[device], "").map_err(|ClError(status)| {
        let log = program
            .get_build_log(device)
            .unwrap_or_else(|e| format!("<build log unavailable: {:?}>", e));
        BuildFailure { status, log }
    })
}

/// Extracts the kernel `name` from a built program.
pub fn create_kernel(program: &Program, name: &str) -> Result<Kernel, Status> {
    Kernel::create(program, name).map_err(|ClError(status)| status)
}
