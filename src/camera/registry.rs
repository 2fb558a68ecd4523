use super::device::CameraDevice;
use super::types::MAX_DEVICES;

/// Fixed set of camera devices addressed by device index
#[derive(Debug)]
pub struct DeviceRegistry {
    devices: [CameraDevice; MAX_DEVICES],
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self {
            devices: [CameraDevice::new(0), CameraDevice::new(1)],
        }
    }

    /// `None` for any index outside the known devices
    pub fn get(&self, devnum: i32) -> Option<&CameraDevice> {
        usize::try_from(devnum)
            .ok()
            .and_then(|index| self.devices.get(index))
    }

    pub fn get_mut(&mut self, devnum: i32) -> Option<&mut CameraDevice> {
        usize::try_from(devnum)
            .ok()
            .and_then(|index| self.devices.get_mut(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CameraDevice> {
        self.devices.iter()
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
