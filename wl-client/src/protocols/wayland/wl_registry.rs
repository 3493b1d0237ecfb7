//! global registry object
//!
//! The singleton global registry object. The server has a number of global
//! objects that are available to all clients. These objects typically
//! represent an actual object in the server (for example, an input device)
//! or they are singleton objects that provide extension functionality.

use crate::protocol_helpers::prelude::*;

pub static WL_REGISTRY: Interface = Interface {
    name: "wl_registry",
    version: 1,
    requests: &[
        // The new_id of bind carries a dynamic interface; the interface name
        // and version travel as explicit arguments ahead of the id.
        MessageDesc {
            name: "bind",
            signature: &[ArgKind::Uint, ArgKind::Str, ArgKind::Uint, ArgKind::NewId],
        },
    ],
    events: &[
        MessageDesc {
            name: "global",
            signature: &[ArgKind::Uint, ArgKind::Str, ArgKind::Uint],
        },
        MessageDesc {
            name: "global_remove",
            signature: &[ArgKind::Uint],
        },
    ],
};

/// A wl_registry proxy.
pub struct WlRegistry {
    core: ProxyCore,
    global_listeners: ListenerSet<GlobalEvent>,
    global_remove_listeners: ListenerSet<GlobalRemoveEvent>,
}

/// The server advertises a global object.
#[derive(Debug)]
pub struct GlobalEvent {
    /// The numeric name of the global, used in bind requests.
    pub name: u32,
    /// The interface implemented by the global.
    pub interface: String,
    /// The highest version the server supports.
    pub version: u32,
}

/// A global was removed. The numeric name may be reused afterwards.
#[derive(Debug)]
pub struct GlobalRemoveEvent {
    pub name: u32,
}

impl ConcreteProxy for WlRegistry {
    const INTERFACE: &'static Interface = &WL_REGISTRY;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
            global_listeners: Default::default(),
            global_remove_listeners: Default::default(),
        })
    }
}

impl Proxy for WlRegistry {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_REGISTRY
    }

    fn dispatch(
        &self,
        _conn: &Arc<Connection>,
        opcode: u16,
        reader: &mut EventReader<'_>,
    ) -> Result<(), WireError> {
        match opcode {
            0 => {
                let ev = GlobalEvent {
                    name: reader.uint("name")?,
                    interface: reader.string("interface")?,
                    version: reader.uint("version")?,
                };
                reader.finish()?;
                self.global_listeners.emit(&ev);
            }
            1 => {
                let ev = GlobalRemoveEvent {
                    name: reader.uint("name")?,
                };
                reader.finish()?;
                self.global_remove_listeners.emit(&ev);
            }
            _ => return Err(WireError::UnknownOpcode(opcode)),
        }
        Ok(())
    }
}

impl WlRegistry {
    /// Binds a global to a fresh proxy of the requested interface.
    ///
    /// The name and version should come from a global event; requesting a
    /// version the server does not support is a protocol error.
    pub fn bind<T>(&self, name: u32, version: u32) -> Result<Arc<T>, ConnectionError>
    where
        T: ConcreteProxy,
    {
        let conn = self.core.conn()?;
        let id = T::new(&conn);
        conn.send_request(
            self,
            0,
            &[
                Arg::Uint(name),
                Arg::Str(T::INTERFACE.name),
                Arg::Uint(version),
                Arg::NewId(id.clone()),
            ],
        )?;
        Ok(id)
    }

    pub fn add_global_listener(&self, listener: Arc<dyn Listener<GlobalEvent>>) {
        self.global_listeners.add(listener);
    }

    pub fn remove_global_listener(&self, listener: &Arc<dyn Listener<GlobalEvent>>) {
        self.global_listeners.remove(listener);
    }

    pub fn add_global_remove_listener(&self, listener: Arc<dyn Listener<GlobalRemoveEvent>>) {
        self.global_remove_listeners.add(listener);
    }

    pub fn remove_global_remove_listener(&self, listener: &Arc<dyn Listener<GlobalRemoveEvent>>) {
        self.global_remove_listeners.remove(listener);
    }
}

impl Debug for WlRegistry {
    fmt_proxy!("WlRegistry");
}
