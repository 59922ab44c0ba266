//! Kernel submission and synchronization.

use log::{debug, info};

use crate::driver::{Driver, WorkSize};
use crate::error::{Error, Result};

/// Submits `kernel` once on a fresh queue and blocks until it completes.
///
/// The queue is released when this returns, on success or failure. There is
/// no timeout: the finish call waits for as long as the driver does.
pub fn dispatch<D: Driver>(
    driver: &D,
    context: &D::Context,
    device: D::Device,
    kernel: &D::Kernel,
    work: &WorkSize,
) -> Result<()> {
    let queue = driver
        .create_queue(context, device)
        .map_err(|status| Error::QueueCreation { status })?;

    debug!(
        "Enqueueing kernel: dim={}, global={:?}, local={:?}",
        work.dimensions(),
        work.global,
        work.local
    );
    driver
        .enqueue_kernel(&queue, kernel, work)
        .map_err(|status| Error::Submission { status })?;

    debug!("Waiting for queue to drain");
    driver
        .finish(&queue)
        .map_err(|status| Error::Synchronization { status })?;

    info!("Kernel completed");
    Ok(())
}
