//! OpenCL platform and device queries.

use opencl3::device::{
    CL_DEVICE_TYPE_ACCELERATOR, CL_DEVICE_TYPE_ALL, CL_DEVICE_TYPE_CPU, CL_DEVICE_TYPE_GPU,
    Device as ClDevice,
};
use opencl3::error_codes::{CL_DEVICE_NOT_FOUND, ClError};
use opencl3::platform::{Platform, get_platforms};
use opencl3::types::{cl_device_id, cl_device_type, cl_platform_id};

use crate::driver::{DeviceClass, Status};

/// Maps a device class to the OpenCL device type bitfield.
pub fn device_type(class: DeviceClass) -> cl_device_type {
    match class {
        DeviceClass::Gpu => CL_DEVICE_TYPE_GPU,
        DeviceClass::Cpu => CL_DEVICE_TYPE_CPU,
        DeviceClass::Accelerator => CL_DEVICE_TYPE_ACCELERATOR,
        DeviceClass::All => CL_DEVICE_TYPE_ALL,
    }
}

/// Installed platform ids in driver order.
pub fn platform_ids() -> Result<Vec<cl_platform_id>, Status> {
    let platforms = get_platforms().map_err(|ClError(status)| status)?;
    Ok(platforms.iter().map(Platform::id).collect())
}

/// Raw vendor attribute of a platform.
pub fn vendor_bytes(platform: cl_platform_id) -> Result<Vec<u8>, Status> {
    Platform::new(platform)
        .vendor()
        .map(String::into_bytes)
        .map_err(|ClError(status)| status)
}

/// Device ids of `class` on `platform`.
///
/// The driver reports an empty match as `CL_DEVICE_NOT_FOUND`; that is
/// returned here as an empty list so the caller decides how to treat it.
pub fn device_ids(
    platform: cl_platform_id,
    class: DeviceClass,
) -> Result<Vec<cl_device_id>, Status> {
    match Platform::new(platform).get_devices(device_type(class)) {
        Ok(devices) => Ok(devices),
        Err(ClError(CL_DEVICE_NOT_FOUND)) => Ok(Vec::new()),
        Err(ClError(status)) => Err(status),
    }
}

/// Device name, if the driver reports one.
pub fn device_name(device: cl_device_id) -> Option<String> {
    ClDevice::new(device).name().ok()
}

/// Returns true if any platform exposes a device of `class`.
pub fn is_available(class: DeviceClass) -> bool {
    platform_ids()
        .map(|platforms| {
            platforms
                .into_iter()
                .any(|p| device_ids(p, class).is_ok_and(|d| !d.is_empty()))
        })
        .unwrap_or(false)
}
