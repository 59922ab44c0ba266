//! Accelerator driver boundary.
//!
//! The pipeline is a client of a native compute driver. [`Driver`] models the
//! subset of that interface the pipeline touches: platform and device
//! enumeration through the driver's two-phase "query count, then query data"
//! calls, and the context/program/kernel/queue lifecycle.
//!
//! Platform and device handles are plain ids owned by the driver. Contexts,
//! programs, kernels and queues are owning values that release the underlying
//! driver object when dropped.

use std::fmt;

/// Raw driver status code (`cl_int` for OpenCL).
pub type Status = i32;

/// Class of device requested from a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceClass {
    #[default]
    Gpu,
    Cpu,
    Accelerator,
    All,
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceClass::Gpu => "GPU",
            DeviceClass::Cpu => "CPU",
            DeviceClass::Accelerator => "accelerator",
            DeviceClass::All => "any",
        };
        f.write_str(name)
    }
}

/// Dispatch geometry of a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkSize {
    pub global: [usize; 3],
    pub local: [usize; 3],
}

impl WorkSize {
    /// One work item in one work group.
    pub const UNIT: WorkSize = WorkSize {
        global: [1, 1, 1],
        local: [1, 1, 1],
    };

    /// Work dimension passed to the driver.
    pub const fn dimensions(&self) -> u32 {
        3
    }
}

impl Default for WorkSize {
    fn default() -> Self {
        Self::UNIT
    }
}

/// A failed synchronous program build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFailure {
    pub status: Status,
    /// Compiler diagnostics reported by the driver for the target device.
    pub log: String,
}

/// Native accelerator driver.
pub trait Driver {
    type Platform: Copy + fmt::Debug;
    type Device: Copy + fmt::Debug;
    type Context;
    type Program;
    type Kernel;
    type Queue;

    /// Number of installed platforms.
    fn platform_count(&self) -> Result<usize, Status>;

    /// Platform ids, queried with storage for `count` entries.
    fn platform_list(&self, count: usize) -> Result<Vec<Self::Platform>, Status>;

    /// Size in bytes of the platform's vendor attribute.
    fn platform_vendor_size(&self, platform: Self::Platform) -> Result<usize, Status>;

    /// Raw vendor attribute bytes, queried with a buffer of `size` bytes.
    /// May include trailing NUL padding.
    fn platform_vendor(&self, platform: Self::Platform, size: usize) -> Result<Vec<u8>, Status>;

    /// Number of devices of `class` on `platform`.
    fn device_count(&self, platform: Self::Platform, class: DeviceClass) -> Result<usize, Status>;

    /// Device ids of `class` on `platform`, queried with storage for `count` entries.
    fn device_list(
        &self,
        platform: Self::Platform,
        class: DeviceClass,
        count: usize,
    ) -> Result<Vec<Self::Device>, Status>;

    /// Human readable device name, when the driver reports one.
    fn device_name(&self, _device: Self::Device) -> Option<String> {
        None
    }

    /// Creates a context scoped to exactly `device`.
    fn create_context(&self, device: Self::Device) -> Result<Self::Context, Status>;

    /// Creates a program from a single source fragment.
    fn create_program(
        &self,
        context: &Self::Context,
        source: &str,
    ) -> Result<Self::Program, Status>;

    /// Builds `program` for `device` with no options, blocking until done.
    fn build_program(
        &self,
        program: &mut Self::Program,
        device: Self::Device,
    ) -> Result<(), BuildFailure>;

    /// Extracts the entry point `name` from a built program.
    fn create_kernel(&self, program: &Self::Program, name: &str) -> Result<Self::Kernel, Status>;

    /// Creates a command queue with default properties.
    fn create_queue(
        &self,
        context: &Self::Context,
        device: Self::Device,
    ) -> Result<Self::Queue, Status>;

    /// Enqueues `kernel` with no arguments, no wait list and no output event.
    fn enqueue_kernel(
        &self,
        queue: &Self::Queue,
        kernel: &Self::Kernel,
        work: &WorkSize,
    ) -> Result<(), Status>;

    /// Blocks until all work enqueued on `queue` has completed.
    fn finish(&self, queue: &Self::Queue) -> Result<(), Status>;
}
