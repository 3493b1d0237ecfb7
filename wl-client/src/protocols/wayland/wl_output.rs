//! compositor output region
//!
//! An output describes part of the compositor geometry, typically one
//! monitor. Outputs are published as globals.

use crate::protocol_helpers::prelude::*;

pub static WL_OUTPUT: Interface = Interface {
    name: "wl_output",
    version: 3,
    requests: &[MessageDesc {
        name: "release",
        signature: &[],
    }],
    events: &[
        MessageDesc {
            name: "geometry",
            signature: &[
                ArgKind::Int,
                ArgKind::Int,
                ArgKind::Int,
                ArgKind::Int,
                ArgKind::Int,
                ArgKind::Str,
                ArgKind::Str,
                ArgKind::Int,
            ],
        },
        MessageDesc {
            name: "mode",
            signature: &[ArgKind::Uint, ArgKind::Int, ArgKind::Int, ArgKind::Int],
        },
        MessageDesc {
            name: "done",
            signature: &[],
        },
        MessageDesc {
            name: "scale",
            signature: &[ArgKind::Int],
        },
    ],
};

/// A wl_output proxy.
pub struct WlOutput {
    core: ProxyCore,
    geometry_listeners: ListenerSet<GeometryEvent>,
    mode_listeners: ListenerSet<ModeEvent>,
    done_listeners: ListenerSet<DoneEvent>,
    scale_listeners: ListenerSet<ScaleEvent>,
}

#[derive(Debug)]
pub struct GeometryEvent {
    pub x: i32,
    pub y: i32,
    pub physical_width: i32,
    pub physical_height: i32,
    pub subpixel: i32,
    pub make: String,
    pub model: String,
    pub transform: i32,
}

#[derive(Debug)]
pub struct ModeEvent {
    /// A bitmask of the `MODE_*` constants.
    pub flags: u32,
    pub width: i32,
    pub height: i32,
    /// The refresh rate in mHz.
    pub refresh: i32,
}

/// All pending output property changes have been sent.
#[derive(Debug)]
pub struct DoneEvent;

#[derive(Debug)]
pub struct ScaleEvent {
    pub factor: i32,
}

pub const MODE_CURRENT: u32 = 1;
pub const MODE_PREFERRED: u32 = 2;

impl ConcreteProxy for WlOutput {
    const INTERFACE: &'static Interface = &WL_OUTPUT;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
            geometry_listeners: Default::default(),
            mode_listeners: Default::default(),
            done_listeners: Default::default(),
            scale_listeners: Default::default(),
        })
    }
}

impl Proxy for WlOutput {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_OUTPUT
    }

    fn dispatch(
        &self,
        _conn: &Arc<Connection>,
        opcode: u16,
        reader: &mut EventReader<'_>,
    ) -> Result<(), WireError> {
        match opcode {
            0 => {
                let ev = GeometryEvent {
                    x: reader.int("x")?,
                    y: reader.int("y")?,
                    physical_width: reader.int("physical_width")?,
                    physical_height: reader.int("physical_height")?,
                    subpixel: reader.int("subpixel")?,
                    make: reader.string("make")?,
                    model: reader.string("model")?,
                    transform: reader.int("transform")?,
                };
                reader.finish()?;
                self.geometry_listeners.emit(&ev);
            }
            1 => {
                let ev = ModeEvent {
                    flags: reader.uint("flags")?,
                    width: reader.int("width")?,
                    height: reader.int("height")?,
                    refresh: reader.int("refresh")?,
                };
                reader.finish()?;
                self.mode_listeners.emit(&ev);
            }
            2 => {
                reader.finish()?;
                self.done_listeners.emit(&DoneEvent);
            }
            3 => {
                let ev = ScaleEvent {
                    factor: reader.int("factor")?,
                };
                reader.finish()?;
                self.scale_listeners.emit(&ev);
            }
            _ => return Err(WireError::UnknownOpcode(opcode)),
        }
        Ok(())
    }
}

impl WlOutput {
    pub fn release(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 0, &[])
    }

    pub fn add_geometry_listener(&self, listener: Arc<dyn Listener<GeometryEvent>>) {
        self.geometry_listeners.add(listener);
    }

    pub fn remove_geometry_listener(&self, listener: &Arc<dyn Listener<GeometryEvent>>) {
        self.geometry_listeners.remove(listener);
    }

    pub fn add_mode_listener(&self, listener: Arc<dyn Listener<ModeEvent>>) {
        self.mode_listeners.add(listener);
    }

    pub fn remove_mode_listener(&self, listener: &Arc<dyn Listener<ModeEvent>>) {
        self.mode_listeners.remove(listener);
    }

    pub fn add_done_listener(&self, listener: Arc<dyn Listener<DoneEvent>>) {
        self.done_listeners.add(listener);
    }

    pub fn remove_done_listener(&self, listener: &Arc<dyn Listener<DoneEvent>>) {
        self.done_listeners.remove(listener);
    }

    pub fn add_scale_listener(&self, listener: Arc<dyn Listener<ScaleEvent>>) {
        self.scale_listeners.add(listener);
    }

    pub fn remove_scale_listener(&self, listener: &Arc<dyn Listener<ScaleEvent>>) {
        self.scale_listeners.remove(listener);
    }
}

impl Debug for WlOutput {
    fmt_proxy!("WlOutput");
}
