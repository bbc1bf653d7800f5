use crate::driver::InstanceFns;
use crate::{Instance, PhysicalDeviceError};
use ash::vk;

/// Queue family indices found on one physical device.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics_family: Option<u32>,
}

impl QueueFamilyIndices {
    /// First graphics-capable family in driver order wins.
    pub fn from_properties(queue_families: &[vk::QueueFamilyProperties]) -> Self {
        let graphics_family = queue_families
            .iter()
            .position(|family| family.queue_flags.contains(vk::QueueFlags::GRAPHICS))
            .map(|index| index as u32);

        Self { graphics_family }
    }

    pub fn is_complete(&self) -> bool {
        self.graphics_family.is_some()
    }
}

/// Incomplete indices are a valid answer; rejecting the device is up to the caller.
pub fn select_graphics_queue_family<I: InstanceFns>(
    instance: &I,
    physical_device: vk::PhysicalDevice,
) -> QueueFamilyIndices {
    QueueFamilyIndices::from_properties(&instance.queue_family_properties(physical_device))
}

#[repr(u8)]
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub enum PreferredDeviceType {
    Other = 0,
    Integrated = 1,
    #[default]
    Discrete = 2,
    VirtualGpu = 3,
    Cpu = 4,
}

impl PreferredDeviceType {
    fn matches(self, device_type: vk::PhysicalDeviceType) -> bool {
        let wanted = match self {
            PreferredDeviceType::Other => vk::PhysicalDeviceType::OTHER,
            PreferredDeviceType::Integrated => vk::PhysicalDeviceType::INTEGRATED_GPU,
            PreferredDeviceType::Discrete => vk::PhysicalDeviceType::DISCRETE_GPU,
            PreferredDeviceType::VirtualGpu => vk::PhysicalDeviceType::VIRTUAL_GPU,
            PreferredDeviceType::Cpu => vk::PhysicalDeviceType::CPU,
        };
        wanted == device_type
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalDevice {
    pub name: String,
    pub physical_device: vk::PhysicalDevice,
    pub device_type: vk::PhysicalDeviceType,
    pub queue_families: QueueFamilyIndices,
}

impl AsRef<vk::PhysicalDevice> for PhysicalDevice {
    fn as_ref(&self) -> &vk::PhysicalDevice {
        &self.physical_device
    }
}

#[derive(Debug)]
struct SelectionCriteria {
    preferred_device_type: PreferredDeviceType,
    allow_any_type: bool,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            preferred_device_type: PreferredDeviceType::Discrete,
            allow_any_type: true,
        }
    }
}

pub struct PhysicalDeviceSelector<'a, I: InstanceFns> {
    instance: &'a Instance<I>,
    selection_criteria: SelectionCriteria,
}

impl<'a, I: InstanceFns> PhysicalDeviceSelector<'a, I> {
    pub fn new(instance: &'a Instance<I>) -> Self {
        Self {
            instance,
            selection_criteria: SelectionCriteria::default(),
        }
    }

    pub fn preferred_device_type(mut self, device_type: PreferredDeviceType) -> Self {
        self.selection_criteria.preferred_device_type = device_type;
        self
    }

    pub fn allow_any_gpu_device_type(mut self, allow: bool) -> Self {
        self.selection_criteria.allow_any_type = allow;
        self
    }

    /// Devices with a graphics queue, in enumeration order.
    fn suitable_devices(&self) -> crate::Result<Vec<PhysicalDevice>> {
        let instance: &I = self.instance.as_ref();
        let physical_devices = instance
            .enumerate_physical_devices()
            .map_err(PhysicalDeviceError::FailedToEnumeratePhysicalDevices)?;

        if physical_devices.is_empty() {
            return Err(PhysicalDeviceError::NoPhysicalDevicesFound.into());
        }

        let suitable = physical_devices
            .into_iter()
            .filter_map(|physical_device| {
                let summary = instance.device_summary(physical_device);
                let queue_families = select_graphics_queue_family(instance, physical_device);

                #[cfg(feature = "enable_tracing")]
                tracing::debug!(
                    name = %summary.name,
                    device_type = ?summary.device_type,
                    ?queue_families,
                    "Inspected physical device"
                );

                queue_families.is_complete().then(|| PhysicalDevice {
                    name: summary.name,
                    physical_device,
                    device_type: summary.device_type,
                    queue_families,
                })
            })
            .collect();

        Ok(suitable)
    }

    #[cfg_attr(feature = "enable_tracing", tracing::instrument(skip(self)))]
    pub fn select(self) -> crate::Result<PhysicalDevice> {
        let mut suitable = self.suitable_devices()?;

        let preferred = suitable.iter().position(|device| {
            self.selection_criteria
                .preferred_device_type
                .matches(device.device_type)
        });

        let index = match preferred {
            Some(index) => index,
            None if self.selection_criteria.allow_any_type && !suitable.is_empty() => 0,
            None => return Err(PhysicalDeviceError::NoSuitableDevice.into()),
        };
        let device = suitable.swap_remove(index);

        #[cfg(feature = "enable_tracing")]
        tracing::info!(name = %device.name, "Selected physical device");

        Ok(device)
    }
}
