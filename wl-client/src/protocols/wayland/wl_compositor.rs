//! the compositor singleton
//!
//! A compositor. This object is a singleton global. The compositor is in
//! charge of combining the contents of multiple surfaces into one displayable
//! output.

use {
    super::{wl_region::WlRegion, wl_surface::WlSurface},
    crate::protocol_helpers::prelude::*,
};

pub static WL_COMPOSITOR: Interface = Interface {
    name: "wl_compositor",
    version: 4,
    requests: &[
        MessageDesc {
            name: "create_surface",
            signature: &[ArgKind::NewId],
        },
        MessageDesc {
            name: "create_region",
            signature: &[ArgKind::NewId],
        },
    ],
    events: &[],
};

/// A wl_compositor proxy.
pub struct WlCompositor {
    core: ProxyCore,
}

impl ConcreteProxy for WlCompositor {
    const INTERFACE: &'static Interface = &WL_COMPOSITOR;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
        })
    }
}

impl Proxy for WlCompositor {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_COMPOSITOR
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

impl WlCompositor {
    pub fn create_surface(&self) -> Result<Arc<WlSurface>, ConnectionError> {
        let conn = self.core.conn()?;
        let id = WlSurface::new(&conn);
        conn.send_request(self, 0, &[Arg::NewId(id.clone())])?;
        Ok(id)
    }

    pub fn create_region(&self) -> Result<Arc<WlRegion>, ConnectionError> {
        let conn = self.core.conn()?;
        let id = WlRegion::new(&conn);
        conn.send_request(self, 1, &[Arg::NewId(id.clone())])?;
        Ok(id)
    }
}

impl Debug for WlCompositor {
    fmt_proxy!("WlCompositor");
}
