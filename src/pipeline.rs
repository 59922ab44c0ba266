//! The discovery and dispatch pipeline.
//!
//! Stages run in a fixed order and the first failure aborts the run:
//!
//! 1. enumerate platforms
//! 2. select the platform by vendor
//! 3. select the first device of the requested class
//! 4. create a context for that device
//! 5. compile the source and extract the entry point
//! 6. submit one dispatch and wait for it
//!
//! Resources acquired before a failure are released on the way out, in
//! reverse order of acquisition.

use log::info;

use crate::config::DispatchConfig;
use crate::context::build_context;
use crate::device::select_device;
use crate::dispatch::dispatch;
use crate::driver::{Driver, Status, WorkSize};
use crate::error::Result;
use crate::platform::{enumerate_platforms, select_vendor};
use crate::program::compile;

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub vendor: String,
    pub device: Option<String>,
    pub entry_point: String,
    pub work_size: WorkSize,
}

/// Runs the full pipeline against `driver`.
pub fn run<D: Driver>(driver: &D, config: &DispatchConfig) -> Result<PipelineReport> {
    let platforms = enumerate_platforms(driver)?;
    let platform = select_vendor(driver, &platforms, &config.vendor)?;
    info!("Selected platform from vendor \"{}\"", config.vendor);

    let device = select_device(driver, platform, config.device_class)?;
    let device_name = driver.device_name(device);
    info!(
        "Selected {} device {}",
        config.device_class,
        device_name.as_deref().unwrap_or("<unnamed>")
    );

    let context = build_context(driver, device)?;
    let compiled = compile(driver, &context, device, &config.source)?;
    dispatch(driver, &context, device, compiled.kernel(), &config.work_size)?;

    Ok(PipelineReport {
        vendor: config.vendor.clone(),
        device: device_name,
        entry_point: compiled.entry_point().to_string(),
        work_size: config.work_size,
    })
}

/// Process exit status for a pipeline outcome: `0` on success, the
/// failing stage's status otherwise.
pub fn exit_code<T>(result: &Result<T>) -> Status {
    match result {
        Ok(_) => 0,
        Err(e) => e.status(),
    }
}
