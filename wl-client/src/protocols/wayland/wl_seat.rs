//! group of input devices
//!
//! A seat is a group of keyboards, pointer and touch devices. This object is
//! published as a global during start up, or when such a device is hot
//! plugged.

use {
    super::{wl_keyboard::WlKeyboard, wl_pointer::WlPointer, wl_touch::WlTouch},
    crate::protocol_helpers::prelude::*,
};

pub static WL_SEAT: Interface = Interface {
    name: "wl_seat",
    version: 5,
    requests: &[
        MessageDesc {
            name: "get_pointer",
            signature: &[ArgKind::NewId],
        },
        MessageDesc {
            name: "get_keyboard",
            signature: &[ArgKind::NewId],
        },
        MessageDesc {
            name: "get_touch",
            signature: &[ArgKind::NewId],
        },
        MessageDesc {
            name: "release",
            signature: &[],
        },
    ],
    events: &[
        MessageDesc {
            name: "capabilities",
            signature: &[ArgKind::Uint],
        },
        MessageDesc {
            name: "name",
            signature: &[ArgKind::Str],
        },
    ],
};

/// A wl_seat proxy.
pub struct WlSeat {
    core: ProxyCore,
    capabilities_listeners: ListenerSet<CapabilitiesEvent>,
    name_listeners: ListenerSet<NameEvent>,
}

/// The capabilities of this seat changed.
#[derive(Debug)]
pub struct CapabilitiesEvent {
    /// A bitmask of the `CAPABILITY_*` constants.
    pub capabilities: u32,
}

/// The seat received a name that identifies it across hotplugs.
#[derive(Debug)]
pub struct NameEvent {
    pub name: String,
}

pub const CAPABILITY_POINTER: u32 = 1;
pub const CAPABILITY_KEYBOARD: u32 = 2;
pub const CAPABILITY_TOUCH: u32 = 4;

impl ConcreteProxy for WlSeat {
    const INTERFACE: &'static Interface = &WL_SEAT;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
            capabilities_listeners: Default::default(),
            name_listeners: Default::default(),
        })
    }
}

impl Proxy for WlSeat {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_SEAT
    }

    fn dispatch(
        &self,
        _conn: &Arc<Connection>,
        opcode: u16,
        reader: &mut EventReader<'_>,
    ) -> Result<(), WireError> {
        match opcode {
            0 => {
                let ev = CapabilitiesEvent {
                    capabilities: reader.uint("capabilities")?,
                };
                reader.finish()?;
                self.capabilities_listeners.emit(&ev);
            }
            1 => {
                let ev = NameEvent {
                    name: reader.string("name")?,
                };
                reader.finish()?;
                self.name_listeners.emit(&ev);
            }
            _ => return Err(WireError::UnknownOpcode(opcode)),
        }
        Ok(())
    }
}

impl WlSeat {
    pub fn get_pointer(&self) -> Result<Arc<WlPointer>, ConnectionError> {
        let conn = self.core.conn()?;
        let id = WlPointer::new(&conn);
        conn.send_request(self, 0, &[Arg::NewId(id.clone())])?;
        Ok(id)
    }

    pub fn get_keyboard(&self) -> Result<Arc<WlKeyboard>, ConnectionError> {
        let conn = self.core.conn()?;
        let id = WlKeyboard::new(&conn);
        conn.send_request(self, 1, &[Arg::NewId(id.clone())])?;
        Ok(id)
    }

    pub fn get_touch(&self) -> Result<Arc<WlTouch>, ConnectionError> {
        let conn = self.core.conn()?;
        let id = WlTouch::new(&conn);
        conn.send_request(self, 2, &[Arg::NewId(id.clone())])?;
        Ok(id)
    }

    pub fn release(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 3, &[])
    }

    pub fn add_capabilities_listener(&self, listener: Arc<dyn Listener<CapabilitiesEvent>>) {
        self.capabilities_listeners.add(listener);
    }

    pub fn remove_capabilities_listener(&self, listener: &Arc<dyn Listener<CapabilitiesEvent>>) {
        self.capabilities_listeners.remove(listener);
    }

    pub fn add_name_listener(&self, listener: Arc<dyn Listener<NameEvent>>) {
        self.name_listeners.add(listener);
    }

    pub fn remove_name_listener(&self, listener: &Arc<dyn Listener<NameEvent>>) {
        self.name_listeners.remove(listener);
    }
}

impl Debug for WlSeat {
    fmt_proxy!("WlSeat");
}
