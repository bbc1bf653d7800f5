use crate::Version;
use std::ffi::{CStr, CString};

pub const VALIDATION_LAYER_NAME: &CStr = c"VK_LAYER_KHRONOS_validation";

/// Knobs for the whole bootstrap sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub requested_layers: Vec<CString>,
    pub diagnostics_enabled: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Vulkan".to_string(),
            requested_layers: vec![VALIDATION_LAYER_NAME.to_owned()],
            diagnostics_enabled: cfg!(debug_assertions),
        }
    }
}

impl BootstrapConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics_enabled = enabled;
        self
    }

    /// Replaces the requested layer list.
    pub fn with_layers<I, T>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CString>,
    {
        self.requested_layers = layers.into_iter().map(Into::into).collect();
        self
    }

    pub fn request_layer(mut self, layer: &CStr) -> Self {
        self.requested_layers.push(layer.to_owned());
        self
    }
}

/// Contents of `VkApplicationInfo`. Built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationMetadata {
    pub app_name: CString,
    pub app_version: Version,
    pub engine_name: CString,
    pub engine_version: Version,
    pub api_version: Version,
}

impl Default for ApplicationMetadata {
    fn default() -> Self {
        Self {
            app_name: c"Vulkan app".to_owned(),
            app_version: Version::V1_0_0,
            engine_name: c"No Engine".to_owned(),
            engine_version: Version::V1_0_0,
            api_version: Version::V1_0_0,
        }
    }
}
