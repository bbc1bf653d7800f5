//! Seams between the bootstrap logic and the Vulkan loader.
//!
//! Everything the bootstrap needs from the driver goes through [`Driver`] and
//! [`InstanceFns`]. Extension-provided entry points are looked up by name on a
//! live instance and handed out as trait objects, so a missing entry point is an
//! `Option::None` instead of a null function pointer.

use ash::prelude::VkResult;
use ash::vk;
use std::ffi::{CStr, CString};
use std::fmt::{Debug, Formatter};

/// `vkCreateDebugUtilsMessengerEXT`, once resolved.
pub trait CreateMessenger {
    /// # Safety
    /// `create_info` must describe a valid messenger and the owning instance must be alive.
    unsafe fn create_messenger(
        &self,
        create_info: &vk::DebugUtilsMessengerCreateInfoEXT<'_>,
    ) -> VkResult<vk::DebugUtilsMessengerEXT>;
}

/// `vkDestroyDebugUtilsMessengerEXT`, once resolved.
pub trait DestroyMessenger {
    /// # Safety
    /// `messenger` must have been created from the same instance and not destroyed yet.
    unsafe fn destroy_messenger(&self, messenger: vk::DebugUtilsMessengerEXT);
}

/// Name and type of a physical device, as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
}

/// Instance-level calls used after `vkCreateInstance` succeeded.
pub trait InstanceFns {
    fn handle(&self) -> vk::Instance;

    fn resolve_create_messenger(&self) -> Option<&dyn CreateMessenger>;

    fn resolve_destroy_messenger(&self) -> Option<&dyn DestroyMessenger>;

    fn enumerate_physical_devices(&self) -> VkResult<Vec<vk::PhysicalDevice>>;

    fn queue_family_properties(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties>;

    fn device_summary(&self, physical_device: vk::PhysicalDevice) -> DeviceSummary;

    /// # Safety
    /// Must be called exactly once, after every child object has been destroyed.
    unsafe fn destroy(&self);
}

/// Global (pre-instance) calls.
pub trait Driver {
    type Instance: InstanceFns;

    fn available_layers(&self) -> VkResult<Vec<CString>>;

    /// # Safety
    /// Every pointer reachable from `create_info` must be valid for the duration of the call.
    unsafe fn create_instance(
        &self,
        create_info: &vk::InstanceCreateInfo<'_>,
    ) -> VkResult<Self::Instance>;
}

const CREATE_MESSENGER_NAME: &CStr = c"vkCreateDebugUtilsMessengerEXT";
const DESTROY_MESSENGER_NAME: &CStr = c"vkDestroyDebugUtilsMessengerEXT";

/// Driver backed by the system Vulkan loader.
pub struct AshDriver {
    entry: ash::Entry,
}

impl Debug for AshDriver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AshDriver").finish_non_exhaustive()
    }
}

impl AshDriver {
    #[cfg_attr(feature = "enable_tracing", tracing::instrument)]
    pub fn load() -> crate::Result<Self> {
        #[cfg(feature = "enable_tracing")]
        tracing::trace!("Loading entry...");
        let entry = unsafe { ash::Entry::load() }?;
        #[cfg(feature = "enable_tracing")]
        tracing::trace!("Entry loaded.");

        Ok(Self { entry })
    }

    pub fn entry(&self) -> &ash::Entry {
        &self.entry
    }
}

impl Driver for AshDriver {
    type Instance = AshInstance;

    fn available_layers(&self) -> VkResult<Vec<CString>> {
        let layers = unsafe { self.entry.enumerate_instance_layer_properties() }?;

        Ok(layers
            .iter()
            .map(|layer| unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) }.to_owned())
            .collect())
    }

    unsafe fn create_instance(
        &self,
        create_info: &vk::InstanceCreateInfo<'_>,
    ) -> VkResult<AshInstance> {
        let instance = unsafe { self.entry.create_instance(create_info, None) }?;
        let handle = instance.handle();

        let resolve = |name: &CStr| unsafe {
            self.entry
                .get_instance_proc_addr(handle, name.as_ptr())
                .is_some()
        };
        let create_messenger_resolved = resolve(CREATE_MESSENGER_NAME);
        let destroy_messenger_resolved = resolve(DESTROY_MESSENGER_NAME);

        #[cfg(feature = "enable_tracing")]
        tracing::trace!(create_messenger_resolved, destroy_messenger_resolved);

        let debug_utils = ash::ext::debug_utils::Instance::new(&self.entry, &instance);

        Ok(AshInstance {
            instance,
            debug_utils,
            create_messenger_resolved,
            destroy_messenger_resolved,
            entry: self.entry.clone(),
        })
    }
}

/// A live `VkInstance` with its debug-utils entry points.
///
/// Holds its own handle on the loader so the function tables stay valid even
/// if the [`AshDriver`] that created it is dropped first.
pub struct AshInstance {
    instance: ash::Instance,
    debug_utils: ash::ext::debug_utils::Instance,
    create_messenger_resolved: bool,
    destroy_messenger_resolved: bool,
    // Declared last: unloads the library after everything above.
    entry: ash::Entry,
}

impl AshInstance {
    pub fn entry(&self) -> &ash::Entry {
        &self.entry
    }
}

impl Debug for AshInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AshInstance")
            .field("handle", &self.instance.handle())
            .field("create_messenger_resolved", &self.create_messenger_resolved)
            .field("destroy_messenger_resolved", &self.destroy_messenger_resolved)
            .finish()
    }
}

impl AsRef<ash::Instance> for AshInstance {
    fn as_ref(&self) -> &ash::Instance {
        &self.instance
    }
}

impl CreateMessenger for ash::ext::debug_utils::Instance {
    unsafe fn create_messenger(
        &self,
        create_info: &vk::DebugUtilsMessengerCreateInfoEXT<'_>,
    ) -> VkResult<vk::DebugUtilsMessengerEXT> {
        unsafe { self.create_debug_utils_messenger(create_info, None) }
    }
}

impl DestroyMessenger for ash::ext::debug_utils::Instance {
    unsafe fn destroy_messenger(&self, messenger: vk::DebugUtilsMessengerEXT) {
        unsafe { self.destroy_debug_utils_messenger(messenger, None) }
    }
}

impl InstanceFns for AshInstance {
    fn handle(&self) -> vk::Instance {
        self.instance.handle()
    }

    fn resolve_create_messenger(&self) -> Option<&dyn CreateMessenger> {
        self.create_messenger_resolved
            .then_some(&self.debug_utils as &dyn CreateMessenger)
    }

    fn resolve_destroy_messenger(&self) -> Option<&dyn DestroyMessenger> {
        self.destroy_messenger_resolved
            .then_some(&self.debug_utils as &dyn DestroyMessenger)
    }

    fn enumerate_physical_devices(&self) -> VkResult<Vec<vk::PhysicalDevice>> {
        unsafe { self.instance.enumerate_physical_devices() }
    }

    fn queue_family_properties(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties> {
        unsafe {
            self.instance
                .get_physical_device_queue_family_properties(physical_device)
        }
    }

    fn device_summary(&self, physical_device: vk::PhysicalDevice) -> DeviceSummary {
        let properties = unsafe {
            self.instance
                .get_physical_device_properties(physical_device)
        };
        let name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }
            .to_string_lossy()
            .into_owned();

        DeviceSummary {
            name,
            device_type: properties.device_type,
        }
    }

    unsafe fn destroy(&self) {
        unsafe { self.instance.destroy_instance(None) }
    }
}
