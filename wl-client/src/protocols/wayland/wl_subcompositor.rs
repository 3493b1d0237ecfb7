//! sub-surface compositing
//!
//! The global interface exposing sub-surface compositing capabilities.

use {
    super::{wl_subsurface::WlSubsurface, wl_surface::WlSurface},
    crate::protocol_helpers::prelude::*,
};

pub static WL_SUBCOMPOSITOR: Interface = Interface {
    name: "wl_subcompositor",
    version: 1,
    requests: &[
        MessageDesc {
            name: "destroy",
            signature: &[],
        },
        MessageDesc {
            name: "get_subsurface",
            signature: &[ArgKind::NewId, ArgKind::Object, ArgKind::Object],
        },
    ],
    events: &[],
};

/// A wl_subcompositor proxy.
pub struct WlSubcompositor {
    core: ProxyCore,
}

pub const ERROR_BAD_SURFACE: u32 = 0;

impl ConcreteProxy for WlSubcompositor {
    const INTERFACE: &'static Interface = &WL_SUBCOMPOSITOR;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
        })
    }
}

impl Proxy for WlSubcompositor {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_SUBCOMPOSITOR
    }

    fn dispatch(
        &self,
        _conn: &Arc<Connection>,
        opcode: u16,
        _reader: &mut EventReader<'_>,
    ) -> Result<(), WireError> {
        Err(WireError::UnknownOpcode(opcode))
    }
}

impl WlSubcompositor {
    pub fn destroy(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 0, &[])
    }

    /// Turns `surface` into a sub-surface of `parent`.
    pub fn get_subsurface(
        &self,
        surface: &WlSurface,
        parent: &WlSurface,
    ) -> Result<Arc<WlSubsurface>, ConnectionError> {
        let conn = self.core.conn()?;
        let id = WlSubsurface::new(&conn);
        conn.send_request(
            self,
            1,
            &[
                Arg::NewId(id.clone()),
                Arg::Object(Some(surface.core().id())),
                Arg::Object(Some(parent.core().id())),
            ],
        )?;
        Ok(id)
    }
}

impl Debug for WlSubcompositor {
    fmt_proxy!("WlSubcompositor");
}
