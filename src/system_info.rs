use crate::driver::Driver;
use crate::negotiation::LayerSet;
use std::ffi::{CStr, CString};

/// Layers the loader reports before any instance exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub available_layers: Vec<CString>,
}

impl SystemInfo {
    #[cfg_attr(feature = "enable_tracing", tracing::instrument(skip(driver)))]
    pub fn query<D: Driver>(driver: &D) -> crate::Result<Self> {
        let available_layers = driver.available_layers()?;

        #[cfg(feature = "enable_tracing")]
        tracing::trace!(?available_layers);

        Ok(Self { available_layers })
    }

    /// Exact, case-sensitive match against every available layer.
    pub fn is_layer_available(&self, layer: &CStr) -> bool {
        self.available_layers
            .iter()
            .any(|available| available.as_c_str() == layer)
    }

    /// First requested layer the host does not provide, in request order.
    pub fn first_missing_layer<'a>(&self, layers: &'a LayerSet) -> Option<&'a CStr> {
        layers.iter().find(|layer| !self.is_layer_available(layer))
    }
}
