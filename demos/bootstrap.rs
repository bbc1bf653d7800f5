use ash_kickstart::{
    AshDriver, AshInstance, BootstrapConfig, Instance, InstanceBuilder, PhysicalDeviceSelector,
    PreferredDeviceType, windowing,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

// Validation warnings and errors show up even with RUST_LOG unset.
const DEFAULT_LOG_DIRECTIVE: &str = "warn";

struct Graphics {
    _instance: Instance<AshInstance>,
}

// Graphics before window, matching the teardown in `exiting`.
struct App {
    config: BootstrapConfig,
    graphics: Option<Graphics>,
    window: Option<Window>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            graphics: None,
            window: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop.create_window(
            WindowAttributes::default()
                .with_title(self.config.title.clone())
                .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
                .with_resizable(false),
        )?;

        let driver = AshDriver::load()?;
        let instance = InstanceBuilder::new(self.config.clone())
            .app_name(c"Vulkan app")
            .engine_name(c"No Engine")
            .windowing_extensions(windowing::required_presentation_extensions(&window)?)
            .build(&driver)?;

        let physical_device = PhysicalDeviceSelector::new(&instance)
            .preferred_device_type(PreferredDeviceType::Discrete)
            .select()?;
        tracing::info!(
            name = %physical_device.name,
            graphics_family = ?physical_device.queue_families.graphics_family,
            "Bootstrap complete"
        );

        self.graphics = Some(Graphics {
            _instance: instance,
        });
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init(event_loop) {
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested = event {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.graphics.take();
        self.window.take();
    }
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter())
        .init();

    let event_loop = EventLoop::new()?;
    let mut app = App::new(BootstrapConfig::default());
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
