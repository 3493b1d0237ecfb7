//! touchscreen input device
//!
//! The wl_touch interface represents a touchscreen associated with a seat.

use {super::wl_surface::WlSurface, crate::protocol_helpers::prelude::*};

pub static WL_TOUCH: Interface = Interface {
    name: "wl_touch",
    version: 5,
    requests: &[MessageDesc {
        name: "release",
        signature: &[],
    }],
    events: &[
        MessageDesc {
            name: "down",
            signature: &[
                ArgKind::Uint,
                ArgKind::Uint,
                ArgKind::Object,
                ArgKind::Int,
                ArgKind::Fixed,
                ArgKind::Fixed,
            ],
        },
        MessageDesc {
            name: "up",
            signature: &[ArgKind::Uint, ArgKind::Uint, ArgKind::Int],
        },
        MessageDesc {
            name: "motion",
            signature: &[ArgKind::Uint, ArgKind::Int, ArgKind::Fixed, ArgKind::Fixed],
        },
        MessageDesc {
            name: "frame",
            signature: &[],
        },
        MessageDesc {
            name: "cancel",
            signature: &[],
        },
    ],
};

/// A wl_touch proxy.
pub struct WlTouch {
    core: ProxyCore,
    down_listeners: ListenerSet<DownEvent>,
    up_listeners: ListenerSet<UpEvent>,
    motion_listeners: ListenerSet<MotionEvent>,
    frame_listeners: ListenerSet<FrameEvent>,
    cancel_listeners: ListenerSet<CancelEvent>,
}

/// A new touch point appeared on a surface.
#[derive(Debug)]
pub struct DownEvent {
    pub serial: u32,
    pub time: u32,
    pub surface: Option<Arc<WlSurface>>,
    pub id: i32,
    pub x: Fixed,
    pub y: Fixed,
}

#[derive(Debug)]
pub struct UpEvent {
    pub serial: u32,
    pub time: u32,
    pub id: i32,
}

#[derive(Debug)]
pub struct MotionEvent {
    pub time: u32,
    pub id: i32,
    pub x: Fixed,
    pub y: Fixed,
}

/// Marks the end of a set of logically simultaneous touch events.
#[derive(Debug)]
pub struct FrameEvent;

/// The compositor took over the touch stream; all active points are
/// cancelled.
#[derive(Debug)]
pub struct CancelEvent;

impl ConcreteProxy for WlTouch {
    const INTERFACE: &'static Interface = &WL_TOUCH;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
            down_listeners: Default::default(),
            up_listeners: Default::default(),
            motion_listeners: Default::default(),
            frame_listeners: Default::default(),
            cancel_listeners: Default::default(),
        })
    }
}

impl Proxy for WlTouch {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_TOUCH
    }

    fn dispatch(
        &self,
        conn: &Arc<Connection>,
        opcode: u16,
        reader: &mut EventReader<'_>,
    ) -> Result<(), WireError> {
        match opcode {
            0 => {
                let ev = DownEvent {
                    serial: reader.uint("serial")?,
                    time: reader.uint("time")?,
                    surface: reader
                        .object(conn, "surface")?
                        .and_then(|p| p.try_downcast()),
                    id: reader.int("id")?,
                    x: reader.fixed("x")?,
                    y: reader.fixed("y")?,
                };
                reader.finish()?;
                self.down_listeners.emit(&ev);
            }
            1 => {
                let ev = UpEvent {
                    serial: reader.uint("serial")?,
                    time: reader.uint("time")?,
                    id: reader.int("id")?,
                };
                reader.finish()?;
                self.up_listeners.emit(&ev);
            }
            2 => {
                let ev = MotionEvent {
                    time: reader.uint("time")?,
                    id: reader.int("id")?,
                    x: reader.fixed("x")?,
                    y: reader.fixed("y")?,
                };
                reader.finish()?;
                self.motion_listeners.emit(&ev);
            }
            3 => {
                reader.finish()?;
                self.frame_listeners.emit(&FrameEvent);
            }
            4 => {
                reader.finish()?;
                self.cancel_listeners.emit(&CancelEvent);
            }
            _ => return Err(WireError::UnknownOpcode(opcode)),
        }
        Ok(())
    }
}

impl WlTouch {
    pub fn release(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 0, &[])
    }

    pub fn add_down_listener(&self, listener: Arc<dyn Listener<DownEvent>>) {
        self.down_listeners.add(listener);
    }

    pub fn remove_down_listener(&self, listener: &Arc<dyn Listener<DownEvent>>) {
        self.down_listeners.remove(listener);
    }

    pub fn add_up_listener(&self, listener: Arc<dyn Listener<UpEvent>>) {
        self.up_listeners.add(listener);
    }

    pub fn remove_up_listener(&self, listener: &Arc<dyn Listener<UpEvent>>) {
        self.up_listeners.remove(listener);
    }

    pub fn add_motion_listener(&self, listener: Arc<dyn Listener<MotionEvent>>) {
        self.motion_listeners.add(listener);
    }

    pub fn remove_motion_listener(&self, listener: &Arc<dyn Listener<MotionEvent>>) {
        self.motion_listeners.remove(listener);
    }

    pub fn add_frame_listener(&self, listener: Arc<dyn Listener<FrameEvent>>) {
        self.frame_listeners.add(listener);
    }

    pub fn remove_frame_listener(&self, listener: &Arc<dyn Listener<FrameEvent>>) {
        self.frame_listeners.remove(listener);
    }

    pub fn add_cancel_listener(&self, listener: Arc<dyn Listener<CancelEvent>>) {
        self.cancel_listeners.add(listener);
    }

    pub fn remove_cancel_listener(&self, listener: &Arc<dyn Listener<CancelEvent>>) {
        self.cancel_listeners.remove(listener);
    }
}

impl Debug for WlTouch {
    fmt_proxy!("WlTouch");
}
