use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait};
use log::warn;

pub struct CpalDeviceInfo {
    pub name: String,
    pub device: cpal::Device,
}

/// Enumerate the input devices of the default host.
///
/// Devices whose names cannot be read are skipped rather than failing the
/// whole listing.
pub fn list_input_devices() -> Result<Vec<CpalDeviceInfo>> {
    let host = cpal::default_host();
    let mut infos = Vec::new();

    for device in host.input_devices()? {
        match device.name() {
            Ok(name) => infos.push(CpalDeviceInfo { name, device }),
            Err(e) => warn!("Skipping input device with unreadable name: {}", e),
        }
    }

    Ok(infos)
}

pub fn default_input_device() -> Option<cpal::Device> {
    cpal::default_host().default_input_device()
}
