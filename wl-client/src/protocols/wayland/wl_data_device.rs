//! data transfer device
//!
//! There is one wl_data_device per seat which can be obtained from the
//! global wl_data_device_manager singleton. A wl_data_device provides
//! access to inter-client data transfer mechanisms such as copy-and-paste
//! and drag-and-drop.

use {
    super::{wl_data_offer::WlDataOffer, wl_data_source::WlDataSource, wl_surface::WlSurface},
    crate::protocol_helpers::prelude::*,
};

pub static WL_DATA_DEVICE: Interface = Interface {
    name: "wl_data_device",
    version: 3,
    requests: &[
        MessageDesc {
            name: "start_drag",
            signature: &[
                ArgKind::Object,
                ArgKind::Object,
                ArgKind::Object,
                ArgKind::Uint,
            ],
        },
        MessageDesc {
            name: "set_selection",
            signature: &[ArgKind::Object, ArgKind::Uint],
        },
        MessageDesc {
            name: "release",
            signature: &[],
        },
    ],
    events: &[
        MessageDesc {
            name: "data_offer",
            signature: &[ArgKind::NewId],
        },
        MessageDesc {
            name: "enter",
            signature: &[
                ArgKind::Uint,
                ArgKind::Object,
                ArgKind::Fixed,
                ArgKind::Fixed,
                ArgKind::Object,
            ],
        },
        MessageDesc {
            name: "leave",
            signature: &[],
        },
        MessageDesc {
            name: "motion",
            signature: &[ArgKind::Uint, ArgKind::Fixed, ArgKind::Fixed],
        },
        MessageDesc {
            name: "drop",
            signature: &[],
        },
        MessageDesc {
            name: "selection",
            signature: &[ArgKind::Object],
        },
    ],
};

/// A wl_data_device proxy.
pub struct WlDataDevice {
    core: ProxyCore,
    data_offer_listeners: ListenerSet<DataOfferEvent>,
    enter_listeners: ListenerSet<EnterEvent>,
    leave_listeners: ListenerSet<LeaveEvent>,
    motion_listeners: ListenerSet<MotionEvent>,
    drop_listeners: ListenerSet<DropEvent>,
    selection_listeners: ListenerSet<SelectionEvent>,
}

/// The server introduced a new data offer.
///
/// The offer proxy is registered with the server-assigned id before the
/// listeners run. Subsequent offer events on it describe the available mime
/// types.
#[derive(Debug)]
pub struct DataOfferEvent {
    pub id: Arc<WlDataOffer>,
}

/// A drag-and-drop session entered a surface.
#[derive(Debug)]
pub struct EnterEvent {
    pub serial: u32,
    pub surface: Option<Arc<WlSurface>>,
    pub x: Fixed,
    pub y: Fixed,
    pub id: Option<Arc<WlDataOffer>>,
}

#[derive(Debug)]
pub struct LeaveEvent;

#[derive(Debug)]
pub struct MotionEvent {
    pub time: u32,
    pub x: Fixed,
    pub y: Fixed,
}

#[derive(Debug)]
pub struct DropEvent;

/// The selection changed. A null id means the selection is empty.
#[derive(Debug)]
pub struct SelectionEvent {
    pub id: Option<Arc<WlDataOffer>>,
}

impl ConcreteProxy for WlDataDevice {
    const INTERFACE: &'static Interface = &WL_DATA_DEVICE;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
            data_offer_listeners: Default::default(),
            enter_listeners: Default::default(),
            leave_listeners: Default::default(),
            motion_listeners: Default::default(),
            drop_listeners: Default::default(),
            selection_listeners: Default::default(),
        })
    }
}

impl Proxy for WlDataDevice {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_DATA_DEVICE
    }

    fn dispatch(
        &self,
        conn: &Arc<Connection>,
        opcode: u16,
        reader: &mut EventReader<'_>,
    ) -> Result<(), WireError> {
        match opcode {
            0 => {
                let id = reader.uint("id")?;
                reader.finish()?;
                let ev = DataOfferEvent {
                    id: conn.create_remote::<WlDataOffer>(id)?,
                };
                self.data_offer_listeners.emit(&ev);
            }
            1 => {
                let ev = EnterEvent {
                    serial: reader.uint("serial")?,
                    surface: reader
                        .object(conn, "surface")?
                        .and_then(|p| p.try_downcast()),
                    x: reader.fixed("x")?,
                    y: reader.fixed("y")?,
                    id: reader.object(conn, "id")?.and_then(|p| p.try_downcast()),
                };
                reader.finish()?;
                self.enter_listeners.emit(&ev);
            }
            2 => {
                reader.finish()?;
                self.leave_listeners.emit(&LeaveEvent);
            }
            3 => {
                let ev = MotionEvent {
                    time: reader.uint("time")?,
                    x: reader.fixed("x")?,
                    y: reader.fixed("y")?,
                };
                reader.finish()?;
                self.motion_listeners.emit(&ev);
            }
            4 => {
                reader.finish()?;
                self.drop_listeners.emit(&DropEvent);
            }
            5 => {
                let ev = SelectionEvent {
                    id: reader.object(conn, "id")?.and_then(|p| p.try_downcast()),
                };
                reader.finish()?;
                self.selection_listeners.emit(&ev);
            }
            _ => return Err(WireError::UnknownOpcode(opcode)),
        }
        Ok(())
    }
}

impl WlDataDevice {
    /// Starts a drag-and-drop operation. A null source means the transfer
    /// stays internal to the client; a null icon hides the drag icon.
    pub fn start_drag(
        &self,
        source: Option<&WlDataSource>,
        origin: &WlSurface,
        icon: Option<&WlSurface>,
        serial: u32,
    ) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(
            self,
            0,
            &[
                Arg::Object(source.map(|s| s.core().id())),
                Arg::Object(Some(origin.core().id())),
                Arg::Object(icon.map(|i| i.core().id())),
                Arg::Uint(serial),
            ],
        )
    }

    /// Sets the selection. A null source clears it.
    pub fn set_selection(
        &self,
        source: Option<&WlDataSource>,
        serial: u32,
    ) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(
            self,
            1,
            &[
                Arg::Object(source.map(|s| s.core().id())),
                Arg::Uint(serial),
            ],
        )
    }

    pub fn release(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 2, &[])
    }

    pub fn add_data_offer_listener(&self, listener: Arc<dyn Listener<DataOfferEvent>>) {
        self.data_offer_listeners.add(listener);
    }

    pub fn remove_data_offer_listener(&self, listener: &Arc<dyn Listener<DataOfferEvent>>) {
        self.data_offer_listeners.remove(listener);
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

    pub fn add_drop_listener(&self, listener: Arc<dyn Listener<DropEvent>>) {
        self.drop_listeners.add(listener);
    }

    pub fn remove_drop_listener(&self, listener: &Arc<dyn Listener<DropEvent>>) {
        self.drop_listeners.remove(listener);
    }

    pub fn add_selection_listener(&self, listener: Arc<dyn Listener<SelectionEvent>>) {
        self.selection_listeners.add(listener);
    }

    pub fn remove_selection_listener(&self, listener: &Arc<dyn Listener<SelectionEvent>>) {
        self.selection_listeners.remove(listener);
    }
}

impl Debug for WlDataDevice {
    fmt_proxy!("WlDataDevice");
}
