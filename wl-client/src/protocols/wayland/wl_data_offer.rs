//! offer to transfer data
//!
//! A wl_data_offer represents a piece of data offered for transfer by
//! another client (source client). Offers are introduced by
//! wl_data_device.data_offer events and describe the different mime types
//! that the data can be converted to.

use crate::protocol_helpers::prelude::*;

pub static WL_DATA_OFFER: Interface = Interface {
    name: "wl_data_offer",
    version: 3,
    requests: &[
        MessageDesc {
            name: "accept",
            signature: &[ArgKind::Uint, ArgKind::Str],
        },
        MessageDesc {
            name: "receive",
            signature: &[ArgKind::Str, ArgKind::Fd],
        },
        MessageDesc {
            name: "destroy",
            signature: &[],
        },
        MessageDesc {
            name: "finish",
            signature: &[],
        },
        MessageDesc {
            name: "set_actions",
            signature: &[ArgKind::Uint, ArgKind::Uint],
        },
    ],
    events: &[
        MessageDesc {
            name: "offer",
            signature: &[ArgKind::Str],
        },
        MessageDesc {
            name: "source_actions",
            signature: &[ArgKind::Uint],
        },
        MessageDesc {
            name: "action",
            signature: &[ArgKind::Uint],
        },
    ],
};

/// A wl_data_offer proxy. Instances are created by the server through
/// wl_data_device.data_offer events.
pub struct WlDataOffer {
    core: ProxyCore,
    offer_listeners: ListenerSet<OfferEvent>,
    source_actions_listeners: ListenerSet<SourceActionsEvent>,
    action_listeners: ListenerSet<ActionEvent>,
}

/// The offered data can be converted to this mime type.
#[derive(Debug)]
pub struct OfferEvent {
    pub mime_type: String,
}

/// The drag-and-drop actions the source side supports.
#[derive(Debug)]
pub struct SourceActionsEvent {
    pub source_actions: u32,
}

/// The action the compositor selected for the ongoing drag-and-drop.
#[derive(Debug)]
pub struct ActionEvent {
    pub dnd_action: u32,
}

impl ConcreteProxy for WlDataOffer {
    const INTERFACE: &'static Interface = &WL_DATA_OFFER;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
            offer_listeners: Default::default(),
            source_actions_listeners: Default::default(),
            action_listeners: Default::default(),
        })
    }
}

impl Proxy for WlDataOffer {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_DATA_OFFER
    }

    fn dispatch(
        &self,
        _conn: &Arc<Connection>,
        opcode: u16,
        reader: &mut EventReader<'_>,
    ) -> Result<(), WireError> {
        match opcode {
            0 => {
                let ev = OfferEvent {
                    mime_type: reader.string("mime_type")?,
                };
                reader.finish()?;
                self.offer_listeners.emit(&ev);
            }
            1 => {
                let ev = SourceActionsEvent {
                    source_actions: reader.uint("source_actions")?,
                };
                reader.finish()?;
                self.source_actions_listeners.emit(&ev);
            }
            2 => {
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

impl WlDataOffer {
    pub fn accept(&self, serial: u32, mime_type: &str) -> Result<(), ConnectionError> {
        self.core
            .conn()?
            .send_request(self, 0, &[Arg::Uint(serial), Arg::Str(mime_type)])
    }

    /// Asks to receive the data in the given mime type, written to the
    /// write end of a pipe passed as `fd`. The transport duplicates the
    /// descriptor; the caller keeps its copy.
    pub fn receive(&self, mime_type: &str, fd: BorrowedFd<'_>) -> Result<(), ConnectionError> {
        self.core
            .conn()?
            .send_request(self, 1, &[Arg::Str(mime_type), Arg::Fd(fd)])
    }

    pub fn destroy(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 2, &[])
    }

    /// Notifies that the drag-and-drop operation finished successfully.
    pub fn finish(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 3, &[])
    }

    pub fn set_actions(
        &self,
        dnd_actions: u32,
        preferred_action: u32,
    ) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(
            self,
            4,
            &[Arg::Uint(dnd_actions), Arg::Uint(preferred_action)],
        )
    }

    pub fn add_offer_listener(&self, listener: Arc<dyn Listener<OfferEvent>>) {
        self.offer_listeners.add(listener);
    }

    pub fn remove_offer_listener(&self, listener: &Arc<dyn Listener<OfferEvent>>) {
        self.offer_listeners.remove(listener);
    }

    pub fn add_source_actions_listener(&self, listener: Arc<dyn Listener<SourceActionsEvent>>) {
        self.source_actions_listeners.add(listener);
    }

    pub fn remove_source_actions_listener(&self, listener: &Arc<dyn Listener<SourceActionsEvent>>) {
        self.source_actions_listeners.remove(listener);
    }

    pub fn add_action_listener(&self, listener: Arc<dyn Listener<ActionEvent>>) {
        self.action_listeners.add(listener);
    }

    pub fn remove_action_listener(&self, listener: &Arc<dyn Listener<ActionEvent>>) {
        self.action_listeners.remove(listener);
    }
}

impl Debug for WlDataOffer {
    fmt_proxy!("WlDataOffer");
}
