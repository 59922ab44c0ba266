//! OpenCL driver backed by `opencl3`.
//!
//! Contexts, programs, kernels and queues are the `opencl3` RAII wrappers, so
//! each is released when it goes out of scope.

pub mod device;
pub mod kernel;

use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::device::Device as ClDevice;
use opencl3::error_codes::ClError;
use opencl3::kernel::{ExecuteKernel, Kernel};
use opencl3::program::Program;
use opencl3::types::{cl_device_id, cl_platform_id};

use crate::driver::{BuildFailure, DeviceClass, Driver, Status, WorkSize};

/// The system OpenCL driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenClDriver;

impl OpenClDriver {
    pub fn new() -> Self {
        Self
    }

    /// Returns true if any platform exposes a device of `class`.
    pub fn is_available(class: DeviceClass) -> bool {
        device::is_available(class)
    }
}

/// `opencl3` performs each native count/data call pair internally and strips
/// the NUL terminator from text attributes. The count and list methods here
/// therefore each run a full query; the list is cut to the negotiated count
/// and the vendor to the negotiated size, as storage sized by the first call
/// would hold. A list that shrinks between the two calls is reported by the
/// caller's length check. Vendor bytes never carry driver padding here.
impl Driver for OpenClDriver {
    type Platform = cl_platform_id;
    type Device = cl_device_id;
    type Context = Context;
    type Program = Program;
    type Kernel = Kernel;
    type Queue = CommandQueue;

    fn platform_count(&self) -> Result<usize, Status> {
        device::platform_ids().map(|ids| ids.len())
    }

    fn platform_list(&self, count: usize) -> Result<Vec<cl_platform_id>, Status> {
        device::platform_ids().map(|ids| truncated(ids, count))
    }

    fn platform_vendor_size(&self, platform: cl_platform_id) -> Result<usize, Status> {
        device::vendor_bytes(platform).map(|bytes| bytes.len())
    }

    fn platform_vendor(&self, platform: cl_platform_id, size: usize) -> Result<Vec<u8>, Status> {
        device::vendor_bytes(platform).map(|bytes| truncated(bytes, size))
    }

    fn device_count(&self, platform: cl_platform_id, class: DeviceClass) -> Result<usize, Status> {
        device::device_ids(platform, class).map(|ids| ids.len())
    }

    fn device_list(
        &self,
        platform: cl_platform_id,
        class: DeviceClass,
        count: usize,
    ) -> Result<Vec<cl_device_id>, Status> {
        device::device_ids(platform, class).map(|ids| truncated(ids, count))
    }

    fn device_name(&self, device: cl_device_id) -> Option<String> {
        device::device_name(device)
    }

    fn create_context(&self, device: cl_device_id) -> Result<Context, Status> {
        Context::from_device(&ClDevice::new(device)).map_err(|ClError(status)| status)
    }

    fn create_program(&self, context: &Context, source: &str) -> Result<Program, Status> {
        kernel::create_program(context, source)
    }

    fn build_program(
        &self,
        program: &mut Program,
        device: cl_device_id,
    ) -> Result<(), BuildFailure> {
        kernel::build_program(program, device)
    }

    fn create_kernel(&self, program: &Program, name: &str) -> Result<Kernel, Status> {
        kernel::create_kernel(program, name)
    }

    #[allow(deprecated)]
    fn create_queue(
        &self,
        context: &Context,
        _device: cl_device_id,
    ) -> Result<CommandQueue, Status> {
        // The context holds exactly one device, which is its default device
        CommandQueue::create_default(context, 0).map_err(|ClError(status)| status)
    }

    fn enqueue_kernel(
        &self,
        queue: &CommandQueue,
        kernel: &Kernel,
        work: &WorkSize,
    ) -> Result<(), Status> {
        // The completion event is released immediately; finish() is the only wait
        let _event = unsafe {
            ExecuteKernel::new(kernel)
                .set_global_work_sizes(&work.global)
                .set_local_work_sizes(&work.local)
                .enqueue_nd_range(queue)
                .map_err(|ClError(status)| status)?
        };
        Ok(())
    }

    fn finish(&self, queue: &CommandQueue) -> Result<(), Status> {
        queue.finish().map_err(|ClError(status)| status)
    }
}

/// Keeps at most `len` entries, as a query with storage for `len` would.
fn truncated<T>(mut values: Vec<T>, len: usize) -> Vec<T> {
    values.truncate(len);
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DispatchConfig;
    use crate::error::Error;
    use crate::pipeline;
    use crate::source::KernelSource;

    fn gpu_driver() -> Option<OpenClDriver> {
        OpenClDriver::is_available(DeviceClass::Gpu).then(OpenClDriver::new)
    }

    /// Config targeting the vendor of the first platform with a GPU.
    fn local_config(driver: &OpenClDriver) -> Option<DispatchConfig> {
        crate::platform::survey(driver, DeviceClass::Gpu)
            .ok()?
            .into_iter()
            .find(|p| !p.devices.is_empty())
            .map(|p| DispatchConfig::default().with_vendor(p.vendor))
    }

    #[test]
    fn test_truncated_to_negotiated_length() {
        assert_eq!(truncated(vec![1, 2, 3], 2), vec![1, 2]);
        assert_eq!(truncated(vec![1, 2], 5), vec![1, 2]);
        assert!(truncated(b"AMD".to_vec(), 0).is_empty());
    }

    #[test]
    fn test_list_honours_count() {
        let driver = OpenClDriver::new();
        let count = driver.platform_count().unwrap_or(0);
        if count == 0 {
            println!("No OpenCL platform available, skipping test");
            return;
        }
        assert!(driver.platform_list(0).unwrap().is_empty());
        assert_eq!(driver.platform_list(count).unwrap().len(), count);

        let platform = driver.platform_list(count).unwrap()[0];
        let size = driver.platform_vendor_size(platform).unwrap();
        assert_eq!(driver.platform_vendor(platform, size).unwrap().len(), size);
        assert_eq!(driver.platform_vendor(platform, 1).unwrap().len(), size.min(1));
    }

    #[test]
    fn test_opencl_hello_world() {
        let Some(driver) = gpu_driver() else {
            println!("No OpenCL GPU device available, skipping test");
            return;
        };
        let config = local_config(&driver).unwrap();

        let report = pipeline::run(&driver, &config).unwrap();
        assert_eq!(report.entry_point, "hello_world");
    }

    #[test]
    fn test_opencl_build_failure_has_log() {
        let Some(driver) = gpu_driver() else {
            println!("No OpenCL GPU device available, skipping test");
            return;
        };
        let config = local_config(&driver)
            .unwrap()
            .with_source(KernelSource::new("__kernel void hello_world( {", "hello_world"));

        let err = pipeline::run(&driver, &config).unwrap_err();
        assert!(matches!(err, Error::ProgramBuild { .. }), "got {err}");
        println!("Build log: {}", err.build_log().unwrap_or_default());
    }
}
