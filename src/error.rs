use ash::vk;
use std::ffi::CString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Instance error: {0}")]
    Instance(#[from] InstanceError),
    #[error("Debug messenger error: {0}")]
    DebugMessenger(#[from] DebugMessengerError),
    #[error("Physical device error: {0}")]
    PhysicalDevice(#[from] PhysicalDeviceError),
    #[error("Ash loading error: {0}")]
    Loading(#[from] ash::LoadingError),
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] vk::Result),
    #[error("Window handle error: {0}")]
    WindowHandle(#[from] raw_window_handle::HandleError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// True for the conditions that abort bootstrap: missing layers, a missing
    /// messenger entry point, or a failed messenger/instance creation call.
    pub fn is_fatal_bootstrap(&self) -> bool {
        matches!(self, Error::Instance(_) | Error::DebugMessenger(_))
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum InstanceError {
    #[error("Validation layer {0:?} requested, but not available")]
    ValidationLayersUnavailable(CString),
    #[error("Failed to create instance: {0}")]
    InstanceCreationFailed(vk::Result),
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum DebugMessengerError {
    #[error("vkCreateDebugUtilsMessengerEXT could not be resolved")]
    ExtensionNotPresent,
    #[error("Failed to set up debug messenger: {0}")]
    DiagnosticSetupFailed(vk::Result),
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum PhysicalDeviceError {
    #[error("Failed to enumerate physical devices: {0}")]
    FailedToEnumeratePhysicalDevices(vk::Result),
    #[error("No physical devices found")]
    NoPhysicalDevicesFound,
    #[error("No suitable device")]
    NoSuitableDevice,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_kinds_are_fatal() {
        let missing = Error::from(InstanceError::ValidationLayersUnavailable(
            c"VK_LAYER_KHRONOS_validation".to_owned(),
        ));
        assert!(missing.is_fatal_bootstrap());
        assert!(Error::from(DebugMessengerError::ExtensionNotPresent).is_fatal_bootstrap());
        assert!(!Error::from(PhysicalDeviceError::NoSuitableDevice).is_fatal_bootstrap());
        assert!(!Error::from(vk::Result::ERROR_DEVICE_LOST).is_fatal_bootstrap());
    }

    #[test]
    fn messages_carry_cause() {
        let err = Error::from(InstanceError::InstanceCreationFailed(
            vk::Result::ERROR_INCOMPATIBLE_DRIVER,
        ));
        let text = err.to_string();
        assert!(text.starts_with("Instance error: Failed to create instance"));

        let err = Error::from(InstanceError::ValidationLayersUnavailable(
            c"VK_LAYER_KHRONOS_validation".to_owned(),
        ));
        assert!(err.to_string().contains("VK_LAYER_KHRONOS_validation"));
    }
}
