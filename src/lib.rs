mod config;
mod device;
pub mod driver;
mod error;
mod instance;
pub mod messenger;
pub mod negotiation;
mod system_info;
#[cfg(test)]
mod testing;
mod version;
pub mod windowing;

pub use config::{ApplicationMetadata, BootstrapConfig, VALIDATION_LAYER_NAME};
pub use device::{
    PhysicalDevice, PhysicalDeviceSelector, PreferredDeviceType, QueueFamilyIndices,
    select_graphics_queue_family,
};
pub use driver::{AshDriver, AshInstance, Driver, InstanceFns};
pub use error::*;
pub use instance::{Instance, InstanceBuilder, create_instance};
pub use messenger::{DebugMessenger, DebugMessengerConfig};
pub use negotiation::{ExtensionSet, LayerSet, NameSet};
pub use system_info::SystemInfo;
pub use version::Version;
