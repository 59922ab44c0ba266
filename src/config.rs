//! Pipeline configuration.

use crate::driver::{DeviceClass, WorkSize};
use crate::source::KernelSource;

/// Vendor string of AMD's OpenCL platform.
pub const AMD_VENDOR: &str = "Advanced Micro Devices, Inc.";

/// What to look for and what to run.
///
/// The default targets the first GPU of the AMD platform and runs the
/// embedded `hello_world` kernel on a single work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Exact platform vendor name to select.
    pub vendor: String,
    /// Device class to enumerate on the selected platform.
    pub device_class: DeviceClass,
    /// Source and entry point to compile.
    pub source: KernelSource,
    /// Dispatch geometry.
    pub work_size: WorkSize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            vendor: AMD_VENDOR.to_string(),
            device_class: DeviceClass::Gpu,
            source: KernelSource::embedded(),
            work_size: WorkSize::UNIT,
        }
    }
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn with_device_class(mut self, class: DeviceClass) -> Self {
        self.device_class = class;
        self
    }

    pub fn with_source(mut self, source: KernelSource) -> Self {
        self.source = source;
        self
    }
}
