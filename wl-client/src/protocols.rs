//! Generated wayland protocol bindings.
//!
//! One module per interface. Each module declares the interface metadata that
//! drives encoding and dispatch, the proxy type, its request methods, and one
//! event record plus listener registration pair per event.

pub mod wayland;

use crate::wire::Interface;

/// Resolves an interface name to its description.
///
/// The names are the ones that appear in wl_registry.global events.
pub fn lookup(name: &str) -> Option<&'static Interface> {
    static INTERFACES: phf::Map<&'static str, &'static Interface> = phf::phf_map! {
        "wl_display" => &wayland::wl_display::WL_DISPLAY,
        "wl_callback" => &wayland::wl_callback::WL_CALLBACK,
        "wl_registry" => &wayland::wl_registry::WL_REGISTRY,
        "wl_compositor" => &wayland::wl_compositor::WL_COMPOSITOR,
        "wl_surface" => &wayland::wl_surface::WL_SURFACE,
        "wl_region" => &wayland::wl_region::WL_REGION,
        "wl_shm" => &wayland::wl_shm::WL_SHM,
        "wl_shm_pool" => &wayland::wl_shm_pool::WL_SHM_POOL,
        "wl_buffer" => &wayland::wl_buffer::WL_BUFFER,
        "wl_seat" => &wayland::wl_seat::WL_SEAT,
        "wl_pointer" => &wayland::wl_pointer::WL_POINTER,
        "wl_keyboard" => &wayland::wl_keyboard::WL_KEYBOARD,
        "wl_touch" => &wayland::wl_touch::WL_TOUCH,
        "wl_output" => &wayland::wl_output::WL_OUTPUT,
        "wl_data_device_manager" => &wayland::wl_data_device_manager::WL_DATA_DEVICE_MANAGER,
        "wl_data_device" => &wayland::wl_data_device::WL_DATA_DEVICE,
        "wl_data_source" => &wayland::wl_data_source::WL_DATA_SOURCE,
        "wl_data_offer" => &wayland::wl_data_offer::WL_DATA_OFFER,
        "wl_subcompositor" => &wayland::wl_subcompositor::WL_SUBCOMPOSITOR,
        "wl_subsurface" => &wayland::wl_subsurface::WL_SUBSURFACE,
    };
    INTERFACES.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        let interface = lookup("wl_data_offer").unwrap();
        assert!(std::ptr::eq(
            interface,
            &wayland::wl_data_offer::WL_DATA_OFFER
        ));
        assert_eq!(interface.events.len(), 3);
        assert!(lookup("wl_nonsense").is_none());
    }
}
