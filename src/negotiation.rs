use crate::BootstrapConfig;
use std::ffi::{CStr, CString, c_char};

pub const DEBUG_UTILS_EXT_NAME: &CStr = ash::ext::debug_utils::NAME;

/// Ordered list of extension or layer names handed to `vkCreateInstance`.
///
/// Collecting keeps every name as given, duplicates included.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NameSet(Vec<CString>);

pub type ExtensionSet = NameSet;
pub type LayerSet = NameSet;

impl NameSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name` unless it is already present.
    pub fn push_unique(&mut self, name: impl Into<CString>) {
        let name = name.into();
        if !self.contains(&name) {
            self.0.push(name);
        }
    }

    pub fn contains(&self, name: &CStr) -> bool {
        self.0.iter().any(|n| n.as_c_str() == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CStr> {
        self.0.iter().map(CString::as_c_str)
    }

    /// Pointers borrowed from `self`, valid while the set is alive and unmodified.
    pub fn as_ptrs(&self) -> Vec<*const c_char> {
        self.0.iter().map(|n| n.as_ptr()).collect()
    }
}

impl<T: Into<CString>> FromIterator<T> for NameSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        NameSet(iter.into_iter().map(Into::into).collect())
    }
}

/// Instance extensions to enable: whatever the windowing system needs to
/// present, plus `VK_EXT_debug_utils` when diagnostics are on.
///
/// The windowing list passes through untouched. Only the debug-utils name is
/// skipped if the list already carries it.
pub fn required_extensions<I, T>(windowing_extensions: I, diagnostics_enabled: bool) -> ExtensionSet
where
    I: IntoIterator<Item = T>,
    T: Into<CString>,
{
    let mut extensions: ExtensionSet = windowing_extensions.into_iter().collect();

    if diagnostics_enabled {
        extensions.push_unique(DEBUG_UTILS_EXT_NAME);
    }

    #[cfg(feature = "enable_tracing")]
    tracing::trace!(?extensions, diagnostics_enabled, "negotiated instance extensions");

    extensions
}

/// Layers to enable. Empty unless diagnostics are on.
pub fn required_layers(config: &BootstrapConfig) -> LayerSet {
    if !config.diagnostics_enabled {
        return LayerSet::new();
    }

    config.requested_layers.iter().cloned().collect()
}
