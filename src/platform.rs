//! Platform enumeration and vendor selection.

use log::{debug, trace};

use crate::device::enumerate_devices;
use crate::driver::{DeviceClass, Driver};
use crate::error::{Error, Result};
use crate::query::{negotiate, trim_padding};

/// Lists every installed platform in driver enumeration order.
pub fn enumerate_platforms<D: Driver>(driver: &D) -> Result<Vec<D::Platform>> {
    let platforms = negotiate(
        || driver.platform_count(),
        |count| driver.platform_list(count),
    )
    .map_err(|e| e.into_error("platform list", |status| Error::PlatformQuery { status }))?;

    debug!("Found {} platform(s)", platforms.len());
    Ok(platforms)
}

/// Returns the platform's vendor name with trailing padding removed.
pub fn platform_vendor<D: Driver>(driver: &D, platform: D::Platform) -> Result<String> {
    let raw = vendor_bytes(driver, platform)?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

/// Raw vendor attribute with trailing padding removed.
fn vendor_bytes<D: Driver>(driver: &D, platform: D::Platform) -> Result<Vec<u8>> {
    let mut raw = negotiate(
        || driver.platform_vendor_size(platform),
        |size| driver.platform_vendor(platform, size),
    )
    .map_err(|e| {
        e.into_error("platform vendor", |status| Error::PlatformInfoQuery {
            status,
        })
    })?;

    let len = trim_padding(&raw).len();
    raw.truncate(len);
    Ok(raw)
}

/// Picks the first platform whose vendor name equals `vendor` exactly.
///
/// The comparison is byte for byte after trailing padding is removed.
/// Platforms after the first match are never queried.
pub fn select_vendor<D: Driver>(
    driver: &D,
    platforms: &[D::Platform],
    vendor: &str,
) -> Result<D::Platform> {
    for &platform in platforms {
        let name = vendor_bytes(driver, platform)?;
        trace!(
            "Platform {:?} vendor: {:?}",
            platform,
            String::from_utf8_lossy(&name)
        );
        if name == vendor.as_bytes() {
            return Ok(platform);
        }
    }

    Err(Error::VendorNotFound {
        vendor: vendor.to_string(),
    })
}

/// Summary of one platform, as printed by the listing command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSummary {
    pub vendor: String,
    pub devices: Vec<String>,
}

/// Lists every platform with the names of its devices of `class`.
pub fn survey<D: Driver>(driver: &D, class: DeviceClass) -> Result<Vec<PlatformSummary>> {
    enumerate_platforms(driver)?
        .into_iter()
        .map(|platform| {
            let vendor = platform_vendor(driver, platform)?;
            let devices = enumerate_devices(driver, platform, class)?
                .into_iter()
                .map(|device| {
                    driver
                        .device_name(device)
                        .unwrap_or_else(|| format!("{:?}", device))
                })
                .collect();
            Ok(PlatformSummary { vendor, devices })
        })
        .collect()
}
