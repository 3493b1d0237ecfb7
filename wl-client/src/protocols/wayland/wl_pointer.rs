//! pointer input device
//!
//! The wl_pointer interface represents one or more input devices, such as
//! mice, which control the pointer location and pointer_focus of a seat.

use {super::wl_surface::WlSurface, crate::protocol_helpers::prelude::*};

pub static WL_POINTER: Interface = Interface {
    name: "wl_pointer",
    version: 5,
    requests: &[
        MessageDesc {
            name: "set_cursor",
            signature: &[ArgKind::Uint, ArgKind::Object, ArgKind::Int, ArgKind::Int],
        },
        MessageDesc {
            name: "release",
            signature: &[],
        },
    ],
    events: &[
        MessageDesc {
            name: "enter",
            signature: &[
                ArgKind::Uint,
                ArgKind::Object,
                ArgKind::Fixed,
                ArgKind::Fixed,
            ],
        },
        MessageDesc {
            name: "leave",
            signature: &[ArgKind::Uint, ArgKind::Object],
        },
        MessageDesc {
            name: "motion",
            signature: &[ArgKind::Uint, ArgKind::Fixed, ArgKind::Fixed],
        },
        MessageDesc {
            name: "button",
            signature: &[ArgKind::Uint, ArgKind::Uint, ArgKind::Uint, ArgKind::Uint],
        },
        MessageDesc {
            name: "axis",
            signature: &[ArgKind::Uint, ArgKind::Uint, ArgKind::Fixed],
        },
        MessageDesc {
            name: "frame",
            signature: &[],
        },
        MessageDesc {
            name: "axis_source",
            signature: &[ArgKind::Uint],
        },
        MessageDesc {
            name: "axis_stop",
            signature: &[ArgKind::Uint, ArgKind::Uint],
        },
        MessageDesc {
            name: "axis_discrete",
            signature: &[ArgKind::Uint, ArgKind::Int],
        },
    ],
};

/// A wl_pointer proxy.
pub struct WlPointer {
    core: ProxyCore,
    enter_listeners: ListenerSet<EnterEvent>,
    leave_listeners: ListenerSet<LeaveEvent>,
    motion_listeners: ListenerSet<MotionEvent>,
    button_listeners: ListenerSet<ButtonEvent>,
    axis_listeners: ListenerSet<AxisEvent>,
    frame_listeners: ListenerSet<FrameEvent>,
    axis_source_listeners: ListenerSet<AxisSourceEvent>,
    axis_stop_listeners: ListenerSet<AxisStopEvent>,
    axis_discrete_listeners: ListenerSet<AxisDiscreteEvent>,
}

/// The pointer entered a surface.
#[derive(Debug)]
pub struct EnterEvent {
    pub serial: u32,
    pub surface: Option<Arc<WlSurface>>,
    pub surface_x: Fixed,
    pub surface_y: Fixed,
}

/// The pointer left a surface.
#[derive(Debug)]
pub struct LeaveEvent {
    pub serial: u32,
    pub surface: Option<Arc<WlSurface>>,
}

#[derive(Debug)]
pub struct MotionEvent {
    pub time: u32,
    pub surface_x: Fixed,
    pub surface_y: Fixed,
}

#[derive(Debug)]
pub struct ButtonEvent {
    pub serial: u32,
    pub time: u32,
    pub button: u32,
    pub state: u32,
}

#[derive(Debug)]
pub struct AxisEvent {
    pub time: u32,
    pub axis: u32,
    pub value: Fixed,
}

/// Groups the logically simultaneous pointer events that preceded it.
#[derive(Debug)]
pub struct FrameEvent;

#[derive(Debug)]
pub struct AxisSourceEvent {
    pub axis_source: u32,
}

#[derive(Debug)]
pub struct AxisStopEvent {
    pub time: u32,
    pub axis: u32,
}

#[derive(Debug)]
pub struct AxisDiscreteEvent {
    pub axis: u32,
    pub discrete: i32,
}

pub const BUTTON_STATE_RELEASED: u32 = 0;
pub const BUTTON_STATE_PRESSED: u32 = 1;

pub const AXIS_VERTICAL_SCROLL: u32 = 0;
pub const AXIS_HORIZONTAL_SCROLL: u32 = 1;

impl ConcreteProxy for WlPointer {
    const INTERFACE: &'static Interface = &WL_POINTER;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
            enter_listeners: Default::default(),
            leave_listeners: Default::default(),
            motion_listeners: Default::default(),
            button_listeners: Default::default(),
            axis_listeners: Default::default(),
            frame_listeners: Default::default(),
            axis_source_listeners: Default::default(),
            axis_stop_listeners: Default::default(),
            axis_discrete_listeners: Default::default(),
        })
    }
}

impl Proxy for WlPointer {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_POINTER
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
                    serial: reader.uint("serial")?,
                    surface: reader
                        .object(conn, "surface")?
                        .and_then(|p| p.try_downcast()),
                    surface_x: reader.fixed("surface_x")?,
                    surface_y: reader.fixed("surface_y")?,
                };
                reader.finish()?;
                self.enter_listeners.emit(&ev);
            }
            1 => {
                let ev = LeaveEvent {
                    serial: reader.uint("serial")?,
                    surface: reader
                        .object(conn, "surface")?
                        .and_then(|p| p.try_downcast()),
                };
                reader.finish()?;
                self.leave_listeners.emit(&ev);
            }
            2 => {
                let ev = MotionEvent {
                    time: reader.uint("time")?,
                    surface_x: reader.fixed("surface_x")?,
                    surface_y: reader.fixed("surface_y")?,
                };
                reader.finish()?;
                self.motion_listeners.emit(&ev);
            }
            3 => {
                let ev = ButtonEvent {
                    serial: reader.uint("serial")?,
                    time: reader.uint("time")?,
                    button: reader.uint("button")?,
                    state: reader.uint("state")?,
                };
                reader.finish()?;
                self.button_listeners.emit(&ev);
            }
            4 => {
                let ev = AxisEvent {
                    time: reader.uint("time")?,
                    axis: reader.uint("axis")?,
                    value: reader.fixed("value")?,
                };
                reader.finish()?;
                self.axis_listeners.emit(&ev);
            }
            5 => {
                reader.finish()?;
                self.frame_listeners.emit(&FrameEvent);
            }
            6 => {
                let ev = AxisSourceEvent {
                    axis_source: reader.uint("axis_source")?,
                };
                reader.finish()?;
                self.axis_source_listeners.emit(&ev);
            }
            7 => {
                let ev = AxisStopEvent {
                    time: reader.uint("time")?,
                    axis: reader.uint("axis")?,
                };
                reader.finish()?;
                self.axis_stop_listeners.emit(&ev);
            }
            8 => {
                let ev = AxisDiscreteEvent {
                    axis: reader.uint("axis")?,
                    discrete: reader.int("discrete")?,
                };
                reader.finish()?;
                self.axis_discrete_listeners.emit(&ev);
            }
            _ => return Err(WireError::UnknownOpcode(opcode)),
        }
        Ok(())
    }
}

impl WlPointer {
    /// Sets the pointer image. A null surface hides the cursor.
    pub fn set_cursor(
        &self,
        serial: u32,
        surface: Option<&WlSurface>,
        hotspot_x: i32,
        hotspot_y: i32,
    ) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(
            self,
            0,
            &[
                Arg::Uint(serial),
                Arg::Object(surface.map(|s| s.core().id())),
                Arg::Int(hotspot_x),
                Arg::Int(hotspot_y),
            ],
        )
    }

    pub fn release(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 1, &[])
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

    pub fn add_motion_listener(&self, listener: Arc<dyn Listener<MotionEvent>>) {
        self.motion_listeners.add(listener);
    }

    pub fn remove_motion_listener(&self, listener: &Arc<dyn Listener<MotionEvent>>) {
        self.motion_listeners.remove(listener);
    }

    pub fn add_button_listener(&self, listener: Arc<dyn Listener<ButtonEvent>>) {
        self.button_listeners.add(listener);
    }

    pub fn remove_button_listener(&self, listener: &Arc<dyn Listener<ButtonEvent>>) {
        self.button_listeners.remove(listener);
    }

    pub fn add_axis_listener(&self, listener: Arc<dyn Listener<AxisEvent>>) {
        self.axis_listeners.add(listener);
    }

    pub fn remove_axis_listener(&self, listener: &Arc<dyn Listener<AxisEvent>>) {
        self.axis_listeners.remove(listener);
    }

    pub fn add_frame_listener(&self, listener: Arc<dyn Listener<FrameEvent>>) {
        self.frame_listeners.add(listener);
    }

    pub fn remove_frame_listener(&self, listener: &Arc<dyn Listener<FrameEvent>>) {
        self.frame_listeners.remove(listener);
    }

    pub fn add_axis_source_listener(&self, listener: Arc<dyn Listener<AxisSourceEvent>>) {
        self.axis_source_listeners.add(listener);
    }

    pub fn remove_axis_source_listener(&self, listener: &Arc<dyn Listener<AxisSourceEvent>>) {
        self.axis_source_listeners.remove(listener);
    }

    pub fn add_axis_stop_listener(&self, listener: Arc<dyn Listener<AxisStopEvent>>) {
        self.axis_stop_listeners.add(listener);
    }

    pub fn remove_axis_stop_listener(&self, listener: &Arc<dyn Listener<AxisStopEvent>>) {
        self.axis_stop_listeners.remove(listener);
    }

    pub fn add_axis_discrete_listener(&self, listener: Arc<dyn Listener<AxisDiscreteEvent>>) {
        self.axis_discrete_listeners.add(listener);
    }

    pub fn remove_axis_discrete_listener(&self, listener: &Arc<dyn Listener<AxisDiscreteEvent>>) {
        self.axis_discrete_listeners.remove(listener);
    }
}

impl Debug for WlPointer {
    fmt_proxy!("WlPointer");
}
