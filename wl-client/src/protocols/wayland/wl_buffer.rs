//! content for a wl_surface
//!
//! A buffer provides the content for a wl_surface. Buffers are created
//! through factory interfaces such as wl_shm.

use crate::protocol_helpers::prelude::*;

pub static WL_BUFFER: Interface = Interface {
    name: "wl_buffer",
    version: 1,
    requests: &[MessageDesc {
        name: "destroy",
        signature: &[],
    }],
    events: &[MessageDesc {
        name: "release",
        signature: &[],
    }],
};

/// A wl_buffer proxy.
pub struct WlBuffer {
    core: ProxyCore,
    release_listeners: ListenerSet<ReleaseEvent>,
}

/// The compositor no longer reads from the buffer; the client may reuse the
/// backing storage.
#[derive(Debug)]
pub struct ReleaseEvent;

impl ConcreteProxy for WlBuffer {
    const INTERFACE: &'static Interface = &WL_BUFFER;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
            release_listeners: Default::default(),
        })
    }
}

impl Proxy for WlBuffer {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_BUFFER
    }

    fn dispatch(
        &self,
        _conn: &Arc<Connection>,
        opcode: u16,
        reader: &mut EventReader<'_>,
    ) -> Result<(), WireError> {
        match opcode {
            0 => {
                reader.finish()?;
                self.release_listeners.emit(&ReleaseEvent);
            }
            _ => return Err(WireError::UnknownOpcode(opcode)),
        }
        Ok(())
    }
}

impl WlBuffer {
    pub fn destroy(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 0, &[])
    }

    pub fn add_release_listener(&self, listener: Arc<dyn Listener<ReleaseEvent>>) {
        self.release_listeners.add(listener);
    }

    pub fn remove_release_listener(&self, listener: &Arc<dyn Listener<ReleaseEvent>>) {
        self.release_listeners.remove(listener);
    }
}

impl Debug for WlBuffer {
    fmt_proxy!("WlBuffer");
}
