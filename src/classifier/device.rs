use candle_core::Device;
use tracing::{debug, info, warn};

use super::error::InferenceError;

/// Picks the device for the local classifier: Metal, then CUDA, then CPU.
///
/// Never fails; an unusable accelerator is logged and CPU is used instead.
pub fn select_device() -> Device {
    #[cfg(feature = "metal")]
    match open_accelerator("Metal", || Device::new_metal(0)) {
        Ok(device) => return device,
        Err(e) => warn!(error = %e, "Skipping accelerator"),
    }

    #[cfg(feature = "cuda")]
    match open_accelerator("CUDA", || Device::new_cuda(0)) {
        Ok(device) => return device,
        Err(e) => warn!(error = %e, "Skipping accelerator"),
    }

    if cfg!(any(feature = "metal", feature = "cuda")) {
        warn!("Falling back to CPU for the local classifier");
    } else {
        debug!("No GPU backend compiled, local classifier on CPU");
    }

    Device::Cpu
}

pub(crate) fn open_accelerator(
    name: &str,
    open: impl FnOnce() -> candle_core::Result<Device>,
) -> Result<Device, InferenceError> {
    let device = open().map_err(|e| InferenceError::DeviceUnavailable {
        device: name.to_string(),
        reason: e.to_string(),
    })?;
    info!(device = name, "Local classifier using accelerator");
    Ok(device)
}
