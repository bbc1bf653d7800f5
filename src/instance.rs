use crate::driver::{Driver, InstanceFns};
use crate::messenger::{self, DebugMessenger, DebugMessengerConfig};
use crate::negotiation::{self, ExtensionSet, LayerSet};
use crate::system_info::SystemInfo;
use crate::{ApplicationMetadata, BootstrapConfig, InstanceError, Version};
use ash::vk;
use std::ffi::CString;

/// Creates the instance, chaining the default messenger config into
/// `vkCreateInstance` when diagnostics are enabled.
pub fn create_instance<D: Driver>(
    driver: &D,
    metadata: &ApplicationMetadata,
    extensions: &ExtensionSet,
    layers: &LayerSet,
    diagnostics_enabled: bool,
) -> crate::Result<Instance<D::Instance>> {
    let messenger_config = diagnostics_enabled.then(messenger::build_config);
    create_instance_with(driver, metadata, extensions, layers, messenger_config.as_ref())
}

#[cfg_attr(
    feature = "enable_tracing",
    tracing::instrument(skip(driver, metadata, extensions, layers, messenger_config))
)]
fn create_instance_with<D: Driver>(
    driver: &D,
    metadata: &ApplicationMetadata,
    extensions: &ExtensionSet,
    layers: &LayerSet,
    messenger_config: Option<&DebugMessengerConfig>,
) -> crate::Result<Instance<D::Instance>> {
    let diagnostics_enabled = messenger_config.is_some();

    // Nothing is allocated before this check, so failing here needs no cleanup.
    if diagnostics_enabled {
        let system_info = SystemInfo::query(driver)?;
        if let Some(missing) = system_info.first_missing_layer(layers) {
            return Err(InstanceError::ValidationLayersUnavailable(missing.to_owned()).into());
        }
    }

    let app_info = vk::ApplicationInfo::default()
        .application_name(&metadata.app_name)
        .application_version(metadata.app_version.into())
        .engine_name(&metadata.engine_name)
        .engine_version(metadata.engine_version.into())
        .api_version(metadata.api_version.into());

    #[cfg(feature = "enable_tracing")]
    tracing::debug!(
        app_name = ?metadata.app_name,
        app_version = %metadata.app_version,
        engine_name = ?metadata.engine_name,
        engine_version = %metadata.engine_version,
        api_version = %metadata.api_version,
        "Creating vkInstance with application info..."
    );

    let extension_ptrs = extensions.as_ptrs();
    let layer_ptrs = layers.as_ptrs();

    let mut debug_create_info = messenger_config.map(DebugMessengerConfig::create_info);

    let mut create_info = vk::InstanceCreateInfo::default()
        .application_info(&app_info)
        .enabled_extension_names(&extension_ptrs);

    if let Some(debug_create_info) = debug_create_info.as_mut() {
        create_info = create_info
            .enabled_layer_names(&layer_ptrs)
            .push_next(debug_create_info);
    }

    #[cfg(feature = "enable_tracing")]
    tracing::trace!(?extensions, ?layers, diagnostics_enabled);

    let inner = unsafe { driver.create_instance(&create_info) }
        .map_err(InstanceError::InstanceCreationFailed)?;

    #[cfg(feature = "enable_tracing")]
    tracing::info!("Created vkInstance");

    Ok(Instance {
        inner,
        api_version: metadata.api_version,
        debug_messenger: None,
    })
}

/// Builder over [`create_instance`] that also negotiates extensions and layers
/// and attaches the standalone debug messenger.
#[derive(Debug)]
pub struct InstanceBuilder {
    metadata: ApplicationMetadata,
    config: BootstrapConfig,
    windowing_extensions: Vec<CString>,
    debug_messenger: DebugMessengerConfig,
}

impl InstanceBuilder {
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            metadata: ApplicationMetadata::default(),
            config,
            windowing_extensions: vec![],
            debug_messenger: messenger::build_config(),
        }
    }

    pub fn app_name(mut self, app_name: impl Into<CString>) -> Self {
        self.metadata.app_name = app_name.into();
        self
    }

    pub fn engine_name(mut self, engine_name: impl Into<CString>) -> Self {
        self.metadata.engine_name = engine_name.into();
        self
    }

    pub fn app_version(mut self, version: Version) -> Self {
        self.metadata.app_version = version;
        self
    }

    pub fn engine_version(mut self, version: Version) -> Self {
        self.metadata.engine_version = version;
        self
    }

    pub fn require_api_version(mut self, version: Version) -> Self {
        self.metadata.api_version = version;
        self
    }

    pub fn metadata(mut self, metadata: ApplicationMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Extensions the windowing system needs to present, see
    /// [`crate::windowing::required_presentation_extensions`].
    pub fn windowing_extensions<I, T>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CString>,
    {
        self.windowing_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn debug_messenger_config(mut self, config: DebugMessengerConfig) -> Self {
        self.debug_messenger = config;
        self
    }

    pub fn debug_messenger_severity(
        mut self,
        severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    ) -> Self {
        self.debug_messenger.severity = severity;
        self
    }

    pub fn add_debug_messenger_severity(
        mut self,
        severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    ) -> Self {
        self.debug_messenger.severity |= severity;
        self
    }

    pub fn debug_messenger_type(mut self, message_type: vk::DebugUtilsMessageTypeFlagsEXT) -> Self {
        self.debug_messenger.message_type = message_type;
        self
    }

    #[cfg_attr(feature = "enable_tracing", tracing::instrument(skip(self, driver)))]
    pub fn build<D: Driver>(self, driver: &D) -> crate::Result<Instance<D::Instance>> {
        let diagnostics_enabled = self.config.diagnostics_enabled;
        let extensions =
            negotiation::required_extensions(self.windowing_extensions, diagnostics_enabled);
        let layers = negotiation::required_layers(&self.config);

        let messenger_config = diagnostics_enabled.then_some(&self.debug_messenger);
        let mut instance =
            create_instance_with(driver, &self.metadata, &extensions, &layers, messenger_config)?;

        // The chained messenger only covers vkCreateInstance/vkDestroyInstance;
        // this one covers everything in between.
        if diagnostics_enabled {
            instance.attach_debug_messenger(&self.debug_messenger)?;
        }

        Ok(instance)
    }
}

/// Owns a live instance and, optionally, the debug messenger attached to it.
///
/// Dropping it detaches the messenger before destroying the instance.
#[derive(Debug)]
pub struct Instance<I: InstanceFns> {
    inner: I,
    pub api_version: Version,
    debug_messenger: Option<DebugMessenger>,
}

impl<I: InstanceFns> Instance<I> {
    pub fn handle(&self) -> vk::Instance {
        self.inner.handle()
    }

    pub fn debug_messenger(&self) -> Option<&DebugMessenger> {
        self.debug_messenger.as_ref()
    }

    /// Attaches a standalone messenger, replacing (and detaching) any previous one.
    pub fn attach_debug_messenger(&mut self, config: &DebugMessengerConfig) -> crate::Result<()> {
        let messenger = messenger::attach(&self.inner, config)?;
        if let Some(previous) = self.debug_messenger.replace(messenger) {
            messenger::detach(&self.inner, previous);
        }
        Ok(())
    }

    pub fn detach_debug_messenger(&mut self) {
        if let Some(messenger) = self.debug_messenger.take() {
            messenger::detach(&self.inner, messenger);
        }
    }
}

impl<I: InstanceFns> AsRef<I> for Instance<I> {
    fn as_ref(&self) -> &I {
        &self.inner
    }
}

impl<I: InstanceFns> Drop for Instance<I> {
    fn drop(&mut self) {
        self.detach_debug_messenger();
        unsafe { self.inner.destroy() };

        #[cfg(feature = "enable_tracing")]
        tracing::info!("Destroyed vkInstance");
    }
}
