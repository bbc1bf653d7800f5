use raw_window_handle::HasDisplayHandle;
use std::ffi::{CStr, CString};

/// Instance extensions the display's window system needs for presentation,
/// e.g. `VK_KHR_surface` + `VK_KHR_xcb_surface` on X11.
pub fn required_presentation_extensions(
    display: &impl HasDisplayHandle,
) -> crate::Result<Vec<CString>> {
    let raw_display_handle = display.display_handle()?.as_raw();
    let extensions = ash_window::enumerate_required_extensions(raw_display_handle)?;

    let extensions = extensions
        .iter()
        .map(|&name| unsafe { CStr::from_ptr(name) }.to_owned())
        .collect::<Vec<_>>();

    #[cfg(feature = "enable_tracing")]
    tracing::debug!(?extensions, "Windowing extensions");

    Ok(extensions)
}
