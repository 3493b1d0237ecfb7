//! keyboard input device
//!
//! The wl_keyboard interface represents one or more keyboards associated
//! with a seat.

use {super::wl_surface::WlSurface, crate::protocol_helpers::prelude::*};

pub static WL_KEYBOARD: Interface = Interface {
    name: "wl_keyboard",
    version: 5,
    requests: &[MessageDesc {
        name: "release",
        signature: &[],
    }],
    events: &[
        MessageDesc {
            name: "keymap",
            signature: &[ArgKind::Uint, ArgKind::Fd, ArgKind::Uint],
        },
        MessageDesc {
            name: "enter",
            signature: &[ArgKind::Uint, ArgKind::Object, ArgKind::Array],
        },
        MessageDesc {
            name: "leave",
            signature: &[ArgKind::Uint, ArgKind::Object],
        },
        MessageDesc {
            name: "key",
            signature: &[ArgKind::Uint, ArgKind::Uint, ArgKind::Uint, ArgKind::Uint],
        },
        MessageDesc {
            name: "modifiers",
            signature: &[
                ArgKind::Uint,
                ArgKind::Uint,
                ArgKind::Uint,
                ArgKind::Uint,
                ArgKind::Uint,
            ],
        },
        MessageDesc {
            name: "repeat_info",
            signature: &[ArgKind::Int, ArgKind::Int],
        },
    ],
};

/// A wl_keyboard proxy.
pub struct WlKeyboard {
    core: ProxyCore,
    keymap_listeners: ListenerSet<KeymapEvent>,
    enter_listeners: ListenerSet<EnterEvent>,
    leave_listeners: ListenerSet<LeaveEvent>,
    key_listeners: ListenerSet<KeyEvent>,
    modifiers_listeners: ListenerSet<ModifiersEvent>,
    repeat_info_listeners: ListenerSet<RepeatInfoEvent>,
}

/// The server provides a memory-mappable keymap description.
///
/// The first listener that takes the descriptor owns it; an unclaimed
/// descriptor is closed after dispatch.
#[derive(Debug)]
pub struct KeymapEvent {
    pub format: u32,
    pub fd: EventFd,
    pub size: u32,
}

/// The surface gained keyboard focus. `keys` holds the currently pressed
/// scancodes, 4 bytes little-endian each.
#[derive(Debug)]
pub struct EnterEvent {
    pub serial: u32,
    pub surface: Option<Arc<WlSurface>>,
    pub keys: Vec<u8>,
}

#[derive(Debug)]
pub struct LeaveEvent {
    pub serial: u32,
    pub surface: Option<Arc<WlSurface>>,
}

#[derive(Debug)]
pub struct KeyEvent {
    pub serial: u32,
    pub time: u32,
    pub key: u32,
    pub state: u32,
}

#[derive(Debug)]
pub struct ModifiersEvent {
    pub serial: u32,
    pub mods_depressed: u32,
    pub mods_latched: u32,
    pub mods_locked: u32,
    pub group: u32,
}

#[derive(Debug)]
pub struct RepeatInfoEvent {
    pub rate: i32,
    pub delay: i32,
}

pub const KEYMAP_FORMAT_NO_KEYMAP: u32 = 0;
pub const KEYMAP_FORMAT_XKB_V1: u32 = 1;

pub const KEY_STATE_RELEASED: u32 = 0;
pub const KEY_STATE_PRESSED: u32 = 1;

impl ConcreteProxy for WlKeyboard {
    const INTERFACE: &'static Interface = &WL_KEYBOARD;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
            keymap_listeners: Default::default(),
            enter_listeners: Default::default(),
            leave_listeners: Default::default(),
            key_listeners: Default::default(),
            modifiers_listeners: Default::default(),
            repeat_info_listeners: Default::default(),
        })
    }
}

impl Proxy for WlKeyboard {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_KEYBOARD
    }

    fn dispatch(
        &self,
        conn: &Arc<Connection>,
        opcode: u16,
        reader: &mut EventReader<'_>,
    ) -> Result<(), WireError> {
        match opcode {
            0 => {
                let ev = KeymapEvent {
                    format: reader.uint("format")?,
                    fd: EventFd::new(reader.fd("fd")?),
                    size: reader.uint("size")?,
                };
                reader.finish()?;
                self.keymap_listeners.emit(&ev);
            }
            1 => {
                let ev = EnterEvent {
                    serial: reader.uint("serial")?,
                    surface: reader
                        .object(conn, "surface")?
                        .and_then(|p| p.try_downcast()),
                    keys: reader.array("keys")?,
                };
                reader.finish()?;
                self.enter_listeners.emit(&ev);
            }
            2 => {
                let ev = LeaveEvent {
                    serial: reader.uint("serial")?,
                    surface: reader
                        .object(conn, "surface")?
                        .and_then(|p| p.try_downcast()),
                };
                reader.finish()?;
                self.leave_listeners.emit(&ev);
            }
            3 => {
                let ev = KeyEvent {
                    serial: reader.uint("serial")?,
                    time: reader.uint("time")?,
                    key: reader.uint("key")?,
                    state: reader.uint("state")?,
                };
                reader.finish()?;
                self.key_listeners.emit(&ev);
            }
            4 => {
                let ev = ModifiersEvent {
                    serial: reader.uint("serial")?,
                    mods_depressed: reader.uint("mods_depressed")?,
                    mods_latched: reader.uint("mods_latched")?,
                    mods_locked: reader.uint("mods_locked")?,
                    group: reader.uint("group")?,
                };
                reader.finish()?;
                self.modifiers_listeners.emit(&ev);
            }
            5 => {
                let ev = RepeatInfoEvent {
                    rate: reader.int("rate")?,
                    delay: reader.int("delay")?,
                };
                reader.finish()?;
                self.repeat_info_listeners.emit(&ev);
            }
            _ => return Err(WireError::UnknownOpcode(opcode)),
        }
        Ok(())
    }
}

impl WlKeyboard {
    pub fn release(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 0, &[])
    }

    pub fn add_keymap_listener(&self, listener: Arc<dyn Listener<KeymapEvent>>) {
        self.keymap_listeners.add(listener);
    }

    pub fn remove_keymap_listener(&self, listener: &Arc<dyn Listener<KeymapEvent>>) {
        self.keymap_listeners.remove(listener);
    }

    pub fn add_enter_listener(&self, listener: Arc<dyn Listener<EnterEvent>>) {
        self.enter_listeners.add(listener);
    }

    pub fn remove_enter_listener(&self, listener: &Arc<dyn Listener<EnterEvent>>) {
        self.enter_listeners.remove(listener);
    }

    pub fn add_leave_listener(&self, listener: Arc<dyn Listener<LeaveEvent>>) {
        self.leave_listeners.add(listener);
    }

    pub fn remove_leave_listener(&self, listener: &Arc<dyn Listener<LeaveEvent>>) {
        self.leave_listeners.remove(listener);
    }

    pub fn add_key_listener(&self, listener: Arc<dyn Listener<KeyEvent>>) {
        self.key_listeners.add(listener);
    }

    pub fn remove_key_listener(&self, listener: &Arc<dyn Listener<KeyEvent>>) {
        self.key_listeners.remove(listener);
    }

    pub fn add_modifiers_listener(&self, listener: Arc<dyn Listener<ModifiersEvent>>) {
        self.modifiers_listeners.add(listener);
    }

    pub fn remove_modifiers_listener(&self, listener: &Arc<dyn Listener<ModifiersEvent>>) {
        self.modifiers_listeners.remove(listener);
    }

    pub fn add_repeat_info_listener(&self, listener: Arc<dyn Listener<RepeatInfoEvent>>) {
        self.repeat_info_listeners.add(listener);
    }

    pub fn remove_repeat_info_listener(&self, listener: &Arc<dyn Listener<RepeatInfoEvent>>) {
        self.repeat_info_listeners.remove(listener);
    }
}

impl Debug for WlKeyboard {
    fmt_proxy!("WlKeyboard");
}
