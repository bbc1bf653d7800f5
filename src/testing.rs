//! Recording fake of the driver traits, for tests that must run without a GPU.

use crate::driver::{CreateMessenger, DestroyMessenger, DeviceSummary, Driver, InstanceFns};
use ash::prelude::VkResult;
use ash::vk::{self, Handle};
use std::cell::{Cell, RefCell};
use std::ffi::{CStr, CString};
use std::rc::Rc;

/// Every field of a `VkDebugUtilsMessengerCreateInfoEXT` except the chain pointer,
/// with the callback reduced to its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessengerRecord {
    pub flags: vk::DebugUtilsMessengerCreateFlagsEXT,
    pub severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    pub message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    pub callback: Option<usize>,
    pub user_data: usize,
}

impl From<&vk::DebugUtilsMessengerCreateInfoEXT<'_>> for MessengerRecord {
    fn from(info: &vk::DebugUtilsMessengerCreateInfoEXT<'_>) -> Self {
        Self {
            flags: info.flags,
            severity: info.message_severity,
            message_type: info.message_type,
            callback: info.pfn_user_callback.map(|callback| callback as usize),
            user_data: info.p_user_data as usize,
        }
    }
}

/// What the fake saw in the last `vkCreateInstance` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRecord {
    pub app_name: CString,
    pub engine_name: CString,
    pub api_version: u32,
    pub extensions: Vec<CString>,
    pub layers: Vec<CString>,
    pub chained_messenger: Option<MessengerRecord>,
}

#[derive(Debug, Default)]
pub struct CallLog {
    pub layer_queries: Cell<u32>,
    pub instances_created: Cell<u32>,
    pub last_create: RefCell<Option<CreateRecord>>,
    pub messenger_configs: RefCell<Vec<MessengerRecord>>,
    pub events: RefCell<Vec<&'static str>>,
}

impl CallLog {
    pub fn events(&self) -> Vec<&'static str> {
        self.events.borrow().clone()
    }

    fn record(&self, event: &'static str) {
        self.events.borrow_mut().push(event);
    }
}

#[derive(Debug, Clone)]
pub struct FakeDevice {
    pub name: &'static str,
    pub device_type: vk::PhysicalDeviceType,
    pub queue_families: Vec<vk::QueueFlags>,
}

impl FakeDevice {
    pub fn new(
        name: &'static str,
        device_type: vk::PhysicalDeviceType,
        queue_families: &[vk::QueueFlags],
    ) -> Self {
        Self {
            name,
            device_type,
            queue_families: queue_families.to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakeDriver {
    pub layers: Vec<CString>,
    pub create_result: vk::Result,
    pub messenger_result: vk::Result,
    pub resolve_create_messenger: bool,
    pub resolve_destroy_messenger: bool,
    pub enumerate_result: vk::Result,
    pub devices: Vec<FakeDevice>,
    pub log: Rc<CallLog>,
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self {
            layers: vec![c"VK_LAYER_KHRONOS_validation".to_owned()],
            create_result: vk::Result::SUCCESS,
            messenger_result: vk::Result::SUCCESS,
            resolve_create_messenger: true,
            resolve_destroy_messenger: true,
            enumerate_result: vk::Result::SUCCESS,
            devices: vec![],
            log: Rc::default(),
        }
    }
}

impl FakeDriver {
    pub fn with_layers(mut self, layers: &[&CStr]) -> Self {
        self.layers = layers.iter().map(|&l| l.to_owned()).collect();
        self
    }

    pub fn with_devices(mut self, devices: Vec<FakeDevice>) -> Self {
        self.devices = devices;
        self
    }

    /// Instance handed out without going through `create_instance`.
    pub fn instance(&self) -> FakeInstance {
        FakeInstance {
            driver: self.clone(),
        }
    }
}

unsafe fn read_names(count: u32, names: *const *const std::ffi::c_char) -> Vec<CString> {
    (0..count as usize)
        .map(|i| unsafe { CStr::from_ptr(*names.add(i)) }.to_owned())
        .collect()
}

impl Driver for FakeDriver {
    type Instance = FakeInstance;

    fn available_layers(&self) -> VkResult<Vec<CString>> {
        self.log.layer_queries.set(self.log.layer_queries.get() + 1);
        Ok(self.layers.clone())
    }

    unsafe fn create_instance(
        &self,
        create_info: &vk::InstanceCreateInfo<'_>,
    ) -> VkResult<FakeInstance> {
        let record = unsafe {
            let app_info = &*create_info.p_application_info;
            let next = create_info.p_next as *const vk::DebugUtilsMessengerCreateInfoEXT<'_>;
            let chained_messenger = (!next.is_null()
                && (*next).s_type == vk::StructureType::DEBUG_UTILS_MESSENGER_CREATE_INFO_EXT)
                .then(|| MessengerRecord::from(&*next));

            CreateRecord {
                app_name: CStr::from_ptr(app_info.p_application_name).to_owned(),
                engine_name: CStr::from_ptr(app_info.p_engine_name).to_owned(),
                api_version: app_info.api_version,
                extensions: read_names(
                    create_info.enabled_extension_count,
                    create_info.pp_enabled_extension_names,
                ),
                layers: read_names(
                    create_info.enabled_layer_count,
                    create_info.pp_enabled_layer_names,
                ),
                chained_messenger,
            }
        };
        self.log.last_create.replace(Some(record));

        if self.create_result != vk::Result::SUCCESS {
            return Err(self.create_result);
        }

        self.log
            .instances_created
            .set(self.log.instances_created.get() + 1);
        self.log.record("create_instance");

        Ok(self.instance())
    }
}

#[derive(Debug)]
pub struct FakeInstance {
    driver: FakeDriver,
}

impl FakeInstance {
    pub fn log(&self) -> &CallLog {
        &self.driver.log
    }
}

impl CreateMessenger for FakeInstance {
    unsafe fn create_messenger(
        &self,
        create_info: &vk::DebugUtilsMessengerCreateInfoEXT<'_>,
    ) -> VkResult<vk::DebugUtilsMessengerEXT> {
        self.log()
            .messenger_configs
            .borrow_mut()
            .push(MessengerRecord::from(create_info));

        if self.driver.messenger_result != vk::Result::SUCCESS {
            return Err(self.driver.messenger_result);
        }

        self.log().record("create_messenger");
        Ok(vk::DebugUtilsMessengerEXT::from_raw(0xdeb6))
    }
}

impl DestroyMessenger for FakeInstance {
    unsafe fn destroy_messenger(&self, _messenger: vk::DebugUtilsMessengerEXT) {
        self.log().record("destroy_messenger");
    }
}

impl InstanceFns for FakeInstance {
    fn handle(&self) -> vk::Instance {
        vk::Instance::from_raw(0x1)
    }

    fn resolve_create_messenger(&self) -> Option<&dyn CreateMessenger> {
        self.driver
            .resolve_create_messenger
            .then_some(self as &dyn CreateMessenger)
    }

    fn resolve_destroy_messenger(&self) -> Option<&dyn DestroyMessenger> {
        self.driver
            .resolve_destroy_messenger
            .then_some(self as &dyn DestroyMessenger)
    }

    fn enumerate_physical_devices(&self) -> VkResult<Vec<vk::PhysicalDevice>> {
        if self.driver.enumerate_result != vk::Result::SUCCESS {
            return Err(self.driver.enumerate_result);
        }

        Ok((0..self.driver.devices.len())
            .map(|i| vk::PhysicalDevice::from_raw(i as u64 + 1))
            .collect())
    }

    fn queue_family_properties(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties> {
        self.device(physical_device)
            .queue_families
            .iter()
            .map(|&queue_flags| vk::QueueFamilyProperties {
                queue_flags,
                queue_count: 1,
                ..Default::default()
            })
            .collect()
    }

    fn device_summary(&self, physical_device: vk::PhysicalDevice) -> DeviceSummary {
        let device = self.device(physical_device);
        DeviceSummary {
            name: device.name.to_string(),
            device_type: device.device_type,
        }
    }

    unsafe fn destroy(&self) {
        self.log().record("destroy_instance");
    }
}

impl FakeInstance {
    fn device(&self, physical_device: vk::PhysicalDevice) -> &FakeDevice {
        &self.driver.devices[physical_device.as_raw() as usize - 1]
    }
}
