//! Execution context creation.

use log::debug;

use crate::driver::Driver;
use crate::error::{Error, Result};

/// Creates a context bound to exactly `device`.
pub fn build_context<D: Driver>(driver: &D, device: D::Device) -> Result<D::Context> {
    let context = driver
        .create_context(device)
        .map_err(|status| Error::ContextCreation { status })?;
    debug!("Created context for device {:?}", device);
    Ok(context)
}
