//! Device enumeration.

use log::debug;

use crate::driver::{DeviceClass, Driver};
use crate::error::{Error, Result};
use crate::query::negotiate;

/// Lists the devices of `class` on `platform`. May be empty.
pub fn enumerate_devices<D: Driver>(
    driver: &D,
    platform: D::Platform,
    class: DeviceClass,
) -> Result<Vec<D::Device>> {
    let devices = negotiate(
        || driver.device_count(platform, class),
        |count| driver.device_list(platform, class, count),
    )
    .map_err(|e| e.into_error("device list", |status| Error::DeviceQuery { status }))?;

    debug!(
        "Found {} {} device(s) on platform {:?}",
        devices.len(),
        class,
        platform
    );
    Ok(devices)
}

/// Picks the first device of `class` on `platform`.
pub fn select_device<D: Driver>(
    driver: &D,
    platform: D::Platform,
    class: DeviceClass,
) -> Result<D::Device> {
    enumerate_devices(driver, platform, class)?
        .into_iter()
        .next()
        .ok_or(Error::NoDeviceFound { class })
}
