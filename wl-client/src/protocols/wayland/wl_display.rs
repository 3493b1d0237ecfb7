//! core global object
//!
//! The core global object. This is a special singleton object. It is used for
//! internal wayland protocol features.

use {
    super::{wl_callback::WlCallback, wl_registry::WlRegistry},
    crate::protocol_helpers::prelude::*,
};

pub static WL_DISPLAY: Interface = Interface {
    name: "wl_display",
    version: 1,
    requests: &[
        MessageDesc {
            name: "sync",
            signature: &[ArgKind::NewId],
        },
        MessageDesc {
            name: "get_registry",
            signature: &[ArgKind::NewId],
        },
    ],
    events: &[
        MessageDesc {
            name: "error",
            signature: &[ArgKind::Object, ArgKind::Uint, ArgKind::Str],
        },
        MessageDesc {
            name: "delete_id",
            signature: &[ArgKind::Uint],
        },
    ],
};

/// The wl_display proxy. It is permanently registered with id 1.
pub struct WlDisplay {
    core: ProxyCore,
    error_listeners: ListenerSet<ErrorEvent>,
    delete_id_listeners: ListenerSet<DeleteIdEvent>,
}

/// The server violated the protocol or ran out of resources.
///
/// The meaning of the code is scoped to the interface of the offending
/// object. After this event the connection is torn down.
#[derive(Debug)]
pub struct ErrorEvent {
    /// The object that caused the error, if it is still known.
    pub object: Option<Arc<dyn Proxy>>,
    /// The id of the object that caused the error.
    pub object_id: u32,
    /// The interface-scoped error code.
    pub code: u32,
    /// A human-readable diagnostic.
    pub message: String,
}

/// The server has acknowledged that a client id was freed. The id is
/// eligible for reuse by the time listeners see this event.
#[derive(Debug)]
pub struct DeleteIdEvent {
    pub id: u32,
}

pub const ERROR_INVALID_OBJECT: u32 = 0;
pub const ERROR_INVALID_METHOD: u32 = 1;
pub const ERROR_NO_MEMORY: u32 = 2;
pub const ERROR_IMPLEMENTATION: u32 = 3;

impl ConcreteProxy for WlDisplay {
    const INTERFACE: &'static Interface = &WL_DISPLAY;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
            error_listeners: Default::default(),
            delete_id_listeners: Default::default(),
        })
    }
}

impl Proxy for WlDisplay {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_DISPLAY
    }

    fn dispatch(
        &self,
        conn: &Arc<Connection>,
        opcode: u16,
        reader: &mut EventReader<'_>,
    ) -> Result<(), WireError> {
        match opcode {
            0 => {
                let object_id = reader.uint("object_id")?;
                let ev = ErrorEvent {
                    object: conn.lookup(object_id),
                    object_id,
                    code: reader.uint("code")?,
                    message: reader.string("message")?,
                };
                reader.finish()?;
                self.error_listeners.emit(&ev);
                conn.set_remote_error(ev.object_id, ev.code, ev.message);
            }
            1 => {
                let ev = DeleteIdEvent {
                    id: reader.uint("id")?,
                };
                reader.finish()?;
                conn.recycle_id(ev.id);
                self.delete_id_listeners.emit(&ev);
            }
            _ => return Err(WireError::UnknownOpcode(opcode)),
        }
        Ok(())
    }
}

impl WlDisplay {
    /// Creates a callback that the server completes with a done event once
    /// all requests sent before the sync have been processed.
    pub fn sync(&self) -> Result<Arc<WlCallback>, ConnectionError> {
        let conn = self.core.conn()?;
        let callback = WlCallback::new(&conn);
        conn.send_request(self, 0, &[Arg::NewId(callback.clone())])?;
        Ok(callback)
    }

    /// Creates a registry proxy through which the server advertises its
    /// globals.
    pub fn get_registry(&self) -> Result<Arc<WlRegistry>, ConnectionError> {
        let conn = self.core.conn()?;
        let registry = WlRegistry::new(&conn);
        conn.send_request(self, 1, &[Arg::NewId(registry.clone())])?;
        Ok(registry)
    }

    pub fn add_error_listener(&self, listener: Arc<dyn Listener<ErrorEvent>>) {
        self.error_listeners.add(listener);
    }

    pub fn remove_error_listener(&self, listener: &Arc<dyn Listener<ErrorEvent>>) {
        self.error_listeners.remove(listener);
    }

    pub fn add_delete_id_listener(&self, listener: Arc<dyn Listener<DeleteIdEvent>>) {
        self.delete_id_listeners.add(listener);
    }

    pub fn remove_delete_id_listener(&self, listener: &Arc<dyn Listener<DeleteIdEvent>>) {
        self.delete_id_listeners.remove(listener);
    }
}

impl Debug for WlDisplay {
    fmt_proxy!("WlDisplay");
}
