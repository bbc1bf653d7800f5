use crate::DebugMessengerError;
use crate::driver::InstanceFns;
use ash::vk;
use ash::vk::DebugUtilsMessageSeverityFlagsEXT;
use std::borrow::Cow;
use std::ffi;

/// Severity/type filter plus callback for a debug-utils messenger.
///
/// The same value feeds both the messenger chained into `vkCreateInstance` and
/// the standalone one attached afterwards, so both see identical filters.
#[derive(Debug, Clone, Copy)]
pub struct DebugMessengerConfig {
    pub severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    pub message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    pub callback: vk::PFN_vkDebugUtilsMessengerCallbackEXT,
}

impl Default for DebugMessengerConfig {
    fn default() -> Self {
        Self {
            severity: DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | DebugUtilsMessageSeverityFlagsEXT::WARNING
                | DebugUtilsMessageSeverityFlagsEXT::ERROR,
            message_type: vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            callback: Some(vulkan_debug_callback),
        }
    }
}

impl DebugMessengerConfig {
    pub fn create_info(&self) -> vk::DebugUtilsMessengerCreateInfoEXT<'static> {
        vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(self.severity)
            .message_type(self.message_type)
            .pfn_user_callback(self.callback)
    }
}

pub fn build_config() -> DebugMessengerConfig {
    DebugMessengerConfig::default()
}

/// Opaque `VkDebugUtilsMessengerEXT`. Only valid while its instance is.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a messenger that is not detached leaks until its instance is destroyed"]
pub struct DebugMessenger {
    handle: vk::DebugUtilsMessengerEXT,
}

impl DebugMessenger {
    pub fn handle(&self) -> vk::DebugUtilsMessengerEXT {
        self.handle
    }
}

#[cfg_attr(feature = "enable_tracing", tracing::instrument(skip_all))]
#[must_use = "dropping the handle loses the only way to detach the messenger"]
pub fn attach<I: InstanceFns>(
    instance: &I,
    config: &DebugMessengerConfig,
) -> Result<DebugMessenger, DebugMessengerError> {
    let create = instance
        .resolve_create_messenger()
        .ok_or(DebugMessengerError::ExtensionNotPresent)?;

    let handle = unsafe { create.create_messenger(&config.create_info()) }
        .map_err(DebugMessengerError::DiagnosticSetupFailed)?;

    #[cfg(feature = "enable_tracing")]
    tracing::info!("Created debug messenger");

    Ok(DebugMessenger { handle })
}

/// Best effort: a missing destroy entry point is ignored.
pub fn detach<I: InstanceFns>(instance: &I, messenger: DebugMessenger) {
    let Some(destroy) = instance.resolve_destroy_messenger() else {
        #[cfg(feature = "enable_tracing")]
        tracing::debug!("vkDestroyDebugUtilsMessengerEXT unavailable, skipping");
        return;
    };

    unsafe { destroy.destroy_messenger(messenger.handle) };
}

/// Reports every message and never asks the driver to abort the triggering call.
pub unsafe extern "system" fn vulkan_debug_callback(
    message_severity: DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _user_data: *mut std::os::raw::c_void,
) -> vk::Bool32 {
    if p_callback_data.is_null() {
        return vk::FALSE;
    }

    unsafe {
        let callback_data = *p_callback_data;
        let message = if callback_data.p_message.is_null() {
            Cow::from("")
        } else {
            ffi::CStr::from_ptr(callback_data.p_message).to_string_lossy()
        };

        #[cfg(feature = "enable_tracing")]
        {
            let message_id_number = callback_data.message_id_number;
            let message_id_name = if callback_data.p_message_id_name.is_null() {
                Cow::from("")
            } else {
                ffi::CStr::from_ptr(callback_data.p_message_id_name).to_string_lossy()
            };

            match message_severity {
                DebugUtilsMessageSeverityFlagsEXT::VERBOSE => {
                    tracing::trace!(?message_type, "[{message_id_name} ({message_id_number})]: {message}");
                }
                DebugUtilsMessageSeverityFlagsEXT::INFO => {
                    tracing::info!(?message_type, "[{message_id_name} ({message_id_number})]: {message}");
                }
                DebugUtilsMessageSeverityFlagsEXT::WARNING => {
                    tracing::warn!(?message_type, "[{message_id_name} ({message_id_number})]: {message}");
                }
                DebugUtilsMessageSeverityFlagsEXT::ERROR => {
                    tracing::error!(?message_type, "[{message_id_name} ({message_id_number})]: {message}");
                }
                _ => tracing::debug!(?message_type, "[{message_id_name} ({message_id_number})]: {message}"),
            }
        }

        #[cfg(not(feature = "enable_tracing"))]
        {
            let _ = (message_severity, message_type);
            eprintln!("validation layer: {message}");
        }
    }

    vk::FALSE
}
