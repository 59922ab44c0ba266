use harp_dispatch::runtime::mock::{MockDriver, MockPlatform};
use harp_dispatch::{AMD_VENDOR, DeviceClass};

pub fn setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An Intel CPU platform followed by an AMD platform with one GPU.
#[allow(dead_code)]
pub fn amd_gpu_machine() -> MockDriver {
    MockDriver::new()
        .with_platform(
            MockPlatform::new("Intel(R) Corporation").with_device(DeviceClass::Cpu, "Core i7"),
        )
        .with_platform(
            MockPlatform::new(AMD_VENDOR)
                .with_device(DeviceClass::Cpu, "Ryzen 9 5950X")
                .with_device(DeviceClass::Gpu, "gfx1030"),
        )
}
