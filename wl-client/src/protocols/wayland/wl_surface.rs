//! an onscreen surface
//!
//! A surface is a rectangular area that may be displayed on zero or more
//! outputs, and shown any number of times at the compositor's discretion.

use {
    super::{
        wl_buffer::WlBuffer, wl_callback::WlCallback, wl_output::WlOutput, wl_region::WlRegion,
    },
    crate::protocol_helpers::prelude::*,
};

pub static WL_SURFACE: Interface = Interface {
    name: "wl_surface",
    version: 4,
    requests: &[
        MessageDesc {
            name: "destroy",
            signature: &[],
        },
        MessageDesc {
            name: "attach",
            signature: &[ArgKind::Object, ArgKind::Int, ArgKind::Int],
        },
        MessageDesc {
            name: "damage",
            signature: &[ArgKind::Int, ArgKind::Int, ArgKind::Int, ArgKind::Int],
        },
        MessageDesc {
            name: "frame",
            signature: &[ArgKind::NewId],
        },
        MessageDesc {
            name: "set_opaque_region",
            signature: &[ArgKind::Object],
        },
        MessageDesc {
            name: "set_input_region",
            signature: &[ArgKind::Object],
        },
        MessageDesc {
            name: "commit",
            signature: &[],
        },
        MessageDesc {
            name: "set_buffer_transform",
            signature: &[ArgKind::Int],
        },
        MessageDesc {
            name: "set_buffer_scale",
            signature: &[ArgKind::Int],
        },
        MessageDesc {
            name: "damage_buffer",
            signature: &[ArgKind::Int, ArgKind::Int, ArgKind::Int, ArgKind::Int],
        },
    ],
    events: &[
        MessageDesc {
            name: "enter",
            signature: &[ArgKind::Object],
        },
        MessageDesc {
            name: "leave",
            signature: &[ArgKind::Object],
        },
    ],
};

/// A wl_surface proxy.
pub struct WlSurface {
    core: ProxyCore,
    enter_listeners: ListenerSet<EnterEvent>,
    leave_listeners: ListenerSet<LeaveEvent>,
}

/// The surface is now displayed on the output.
#[derive(Debug)]
pub struct EnterEvent {
    pub output: Option<Arc<WlOutput>>,
}

/// The surface is no longer displayed on the output.
#[derive(Debug)]
pub struct LeaveEvent {
    pub output: Option<Arc<WlOutput>>,
}

pub const ERROR_INVALID_SCALE: u32 = 0;
pub const ERROR_INVALID_TRANSFORM: u32 = 1;

impl ConcreteProxy for WlSurface {
    const INTERFACE: &'static Interface = &WL_SURFACE;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
            enter_listeners: Default::default(),
            leave_listeners: Default::default(),
        })
    }
}

impl Proxy for WlSurface {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_SURFACE
    }

    fn dispatch(
        &self,
        conn: &Arc<Connection>,
        opcode: u16,
        reader: &mut EventReader<'_>,
    ) -> Result<(), WireError> {
        match opcode {
            0 => {
                let ev = EnterEvent {
                    output: reader
                        .object(conn, "output")?
                        .and_then(|p| p.try_downcast()),
                };
                reader.finish()?;
                self.enter_listeners.emit(&ev);
            }
            1 => {
                let ev = LeaveEvent {
                    output: reader
                        .object(conn, "output")?
                        .and_then(|p| p.try_downcast()),
                };
                reader.finish()?;
                self.leave_listeners.emit(&ev);
            }
            _ => return Err(WireError::UnknownOpcode(opcode)),
        }
        Ok(())
    }
}

impl WlSurface {
    /// Deletes the surface on the server.
    pub fn destroy(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 0, &[])
    }

    /// Sets the buffer that provides the content of this surface, taking
    /// effect on the next commit. A null buffer detaches the content.
    pub fn attach(
        &self,
        buffer: Option<&WlBuffer>,
        x: i32,
        y: i32,
    ) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(
            self,
            1,
            &[
                Arg::Object(buffer.map(|b| b.core().id())),
                Arg::Int(x),
                Arg::Int(y),
            ],
        )
    }

    pub fn damage(&self, x: i32, y: i32, width: i32, height: i32) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(
            self,
            2,
            &[Arg::Int(x), Arg::Int(y), Arg::Int(width), Arg::Int(height)],
        )
    }

    /// Requests a notification for a good time to draw the next frame.
    pub fn frame(&self) -> Result<Arc<WlCallback>, ConnectionError> {
        let conn = self.core.conn()?;
        let callback = WlCallback::new(&conn);
        conn.send_request(self, 3, &[Arg::NewId(callback.clone())])?;
        Ok(callback)
    }

    pub fn set_opaque_region(&self, region: Option<&WlRegion>) -> Result<(), ConnectionError> {
        self.core
            .conn()?
            .send_request(self, 4, &[Arg::Object(region.map(|r| r.core().id()))])
    }

    pub fn set_input_region(&self, region: Option<&WlRegion>) -> Result<(), ConnectionError> {
        self.core
            .conn()?
            .send_request(self, 5, &[Arg::Object(region.map(|r| r.core().id()))])
    }

    /// Atomically applies all state set since the last commit.
    pub fn commit(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 6, &[])
    }

    pub fn set_buffer_transform(&self, transform: i32) -> Result<(), ConnectionError> {
        self.core
            .conn()?
            .send_request(self, 7, &[Arg::Int(transform)])
    }

    pub fn set_buffer_scale(&self, scale: i32) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 8, &[Arg::Int(scale)])
    }

    pub fn damage_buffer(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(
            self,
            9,
            &[Arg::Int(x), Arg::Int(y), Arg::Int(width), Arg::Int(height)],
        )
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
}

impl Debug for WlSurface {
    fmt_proxy!("WlSurface");
}
