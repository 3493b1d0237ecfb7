//! callback object
//!
//! Clients can handle the done event to get notified when the related
//! request is done.

use crate::protocol_helpers::prelude::*;

pub static WL_CALLBACK: Interface = Interface {
    name: "wl_callback",
    version: 1,
    requests: &[],
    events: &[MessageDesc {
        name: "done",
        signature: &[ArgKind::Uint],
    }],
};

/// A wl_callback proxy.
pub struct WlCallback {
    core: ProxyCore,
    done_listeners: ListenerSet<DoneEvent>,
}

/// The related request is done.
#[derive(Debug)]
pub struct DoneEvent {
    /// Request-specific data, e.g. a timestamp for frame callbacks.
    pub callback_data: u32,
}

impl ConcreteProxy for WlCallback {
    const INTERFACE: &'static Interface = &WL_CALLBACK;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
            done_listeners: Default::default(),
        })
    }
}

impl Proxy for WlCallback {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_CALLBACK
    }

    fn dispatch(
        &self,
        _conn: &Arc<Connection>,
        opcode: u16,
        reader: &mut EventReader<'_>,
    ) -> Result<(), WireError> {
        match opcode {
            0 => {
                let ev = DoneEvent {
                    callback_data: reader.uint("callback_data")?,
                };
                reader.finish()?;
                self.done_listeners.emit(&ev);
            }
            _ => return Err(WireError::UnknownOpcode(opcode)),
        }
        Ok(())
    }
}

impl WlCallback {
    pub fn add_done_listener(&self, listener: Arc<dyn Listener<DoneEvent>>) {
        self.done_listeners.add(listener);
    }

    pub fn remove_done_listener(&self, listener: &Arc<dyn Listener<DoneEvent>>) {
        self.done_listeners.remove(listener);
    }
}

impl Debug for WlCallback {
    fmt_proxy!("WlCallback");
}
