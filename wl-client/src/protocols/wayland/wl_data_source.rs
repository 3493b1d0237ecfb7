//! offer to transfer data
//!
//! The wl_data_source object is the source side of a wl_data_offer. It is
//! created by the source client in a data transfer and provides a way to
//! describe the offered data.

use crate::protocol_helpers::prelude::*;

pub static WL_DATA_SOURCE: Interface = Interface {
    name: "wl_data_source",
    version: 3,
    requests: &[
        MessageDesc {
            name: "offer",
            signature: &[ArgKind::Str],
        },
        MessageDesc {
            name: "destroy",
            signature: &[],
        },
        MessageDesc {
            name: "set_actions",
            signature: &[ArgKind::Uint],
        },
    ],
    events: &[
        MessageDesc {
            name: "target",
            signature: &[ArgKind::Str],
        },
        MessageDesc {
            name: "send",
            signature: &[ArgKind::Str, ArgKind::Fd],
        },
        MessageDesc {
            name: "cancelled",
            signature: &[],
        },
        MessageDesc {
            name: "dnd_drop_performed",
            signature: &[],
        },
        MessageDesc {
            name: "dnd_finished",
            signature: &[],
        },
        MessageDesc {
            name: "action",
            signature: &[ArgKind::Uint],
        },
    ],
};

/// A wl_data_source proxy.
pub struct WlDataSource {
    core: ProxyCore,
    target_listeners: ListenerSet<TargetEvent>,
    send_listeners: ListenerSet<SendEvent>,
    cancelled_listeners: ListenerSet<CancelledEvent>,
    dnd_drop_performed_listeners: ListenerSet<DndDropPerformedEvent>,
    dnd_finished_listeners: ListenerSet<DndFinishedEvent>,
    action_listeners: ListenerSet<ActionEvent>,
}

/// A target accepted, or rejected with a null mime type, the offered data.
#[derive(Debug)]
pub struct TargetEvent {
    pub mime_type: Option<String>,
}

/// A target wants the data written to the descriptor in the given mime
/// type.
///
/// The first listener that takes the descriptor owns it; an unclaimed
/// descriptor is closed after dispatch.
#[derive(Debug)]
pub struct SendEvent {
    pub mime_type: String,
    pub fd: EventFd,
}

/// The data source was replaced or the drag-and-drop was cancelled.
#[derive(Debug)]
pub struct CancelledEvent;

#[derive(Debug)]
pub struct DndDropPerformedEvent;

#[derive(Debug)]
pub struct DndFinishedEvent;

#[derive(Debug)]
pub struct ActionEvent {
    pub dnd_action: u32,
}

impl ConcreteProxy for WlDataSource {
    const INTERFACE: &'static Interface = &WL_DATA_SOURCE;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
            target_listeners: Default::default(),
            send_listeners: Default::default(),
            cancelled_listeners: Default::default(),
            dnd_drop_performed_listeners: Default::default(),
            dnd_finished_listeners: Default::default(),
            action_listeners: Default::default(),
        })
    }
}

impl Proxy for WlDataSource {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_DATA_SOURCE
    }

    fn dispatch(
        &self,
        _conn: &Arc<Connection>,
        opcode: u16,
        reader: &mut EventReader<'_>,
    ) -> Result<(), WireError> {
        match opcode {
            0 => {
                let ev = TargetEvent {
                    mime_type: reader.nullable_string("mime_type")?,
                };
                reader.finish()?;
                self.target_listeners.emit(&ev);
            }
            1 => {
                let ev = SendEvent {
                    mime_type: reader.string("mime_type")?,
                    fd: EventFd::new(reader.fd("fd")?),
                };
                reader.finish()?;
                self.send_listeners.emit(&ev);
            }
            2 => {
                reader.finish()?;
                self.cancelled_listeners.emit(&CancelledEvent);
            }
            3 => {
                reader.finish()?;
                self.dnd_drop_performed_listeners.emit(&DndDropPerformedEvent);
            }
            4 => {
                reader.finish()?;
                self.dnd_finished_listeners.emit(&DndFinishedEvent);
            }
            5 => {
                let ev = ActionEvent {
                    dnd_action: reader.uint("dnd_action")?,
                };
                reader.finish()?;
                self.action_listeners.emit(&ev);
            }
            _ => return Err(WireError::UnknownOpcode(opcode)),
        }
        Ok(())
    }
}

impl WlDataSource {
    /// Adds a mime type to the set this source offers.
    pub fn offer(&self, mime_type: &str) -> Result<(), ConnectionError> {
        self.core
            .conn()?
            .send_request(self, 0, &[Arg::Str(mime_type)])
    }

    pub fn destroy(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 1, &[])
    }

    pub fn set_actions(&self, dnd_actions: u32) -> Result<(), ConnectionError> {
        self.core
            .conn()?
            .send_request(self, 2, &[Arg::Uint(dnd_actions)])
    }

    pub fn add_target_listener(&self, listener: Arc<dyn Listener<TargetEvent>>) {
        self.target_listeners.add(listener);
    }

    pub fn remove_target_listener(&self, listener: &Arc<dyn Listener<TargetEvent>>) {
        self.target_listeners.remove(listener);
    }

    pub fn add_send_listener(&self, listener: Arc<dyn Listener<SendEvent>>) {
        self.send_listeners.add(listener);
    }

    pub fn remove_send_listener(&self, listener: &Arc<dyn Listener<SendEvent>>) {
        self.send_listeners.remove(listener);
    }

    pub fn add_cancelled_listener(&self, listener: Arc<dyn Listener<CancelledEvent>>) {
        self.cancelled_listeners.add(listener);
    }

    pub fn remove_cancelled_listener(&self, listener: &Arc<dyn Listener<CancelledEvent>>) {
        self.cancelled_listeners.remove(listener);
    }

    pub fn add_dnd_drop_performed_listener(
        &self,
        listener: Arc<dyn Listener<DndDropPerformedEvent>>,
    ) {
        self.dnd_drop_performed_listeners.add(listener);
    }

    pub fn remove_dnd_drop_performed_listener(
        &self,
        listener: &Arc<dyn Listener<DndDropPerformedEvent>>,
    ) {
        self.dnd_drop_performed_listeners.remove(listener);
    }

    pub fn add_dnd_finished_listener(&self, listener: Arc<dyn Listener<DndFinishedEvent>>) {
        self.dnd_finished_listeners.add(listener);
    }

    pub fn remove_dnd_finished_listener(&self, listener: &Arc<dyn Listener<DndFinishedEvent>>) {
        self.dnd_finished_listeners.remove(listener);
    }

    pub fn add_action_listener(&self, listener: Arc<dyn Listener<ActionEvent>>) {
        self.action_listeners.add(listener);
    }

    pub fn remove_action_listener(&self, listener: &Arc<dyn Listener<ActionEvent>>) {
        self.action_listeners.remove(listener);
    }
}

impl Debug for WlDataSource {
    fmt_proxy!("WlDataSource");
}
