//! sub-surface interface
//!
//! An additional interface to a wl_surface object, which has been made a
//! sub-surface. A sub-surface has one parent surface.

use {super::wl_surface::WlSurface, crate::protocol_helpers::prelude::*};

pub static WL_SUBSURFACE: Interface = Interface {
    name: "wl_subsurface",
    version: 1,
    requests: &[
        MessageDesc {
            name: "destroy",
            signature: &[],
        },
        MessageDesc {
            name: "set_position",
            signature: &[ArgKind::Int, ArgKind::Int],
        },
        MessageDesc {
            name: "place_above",
            signature: &[ArgKind::Object],
        },
        MessageDesc {
            name: "place_below",
            signature: &[ArgKind::Object],
        },
        MessageDesc {
            name: "set_sync",
            signature: &[],
        },
        MessageDesc {
            name: "set_desync",
            signature: &[],
        },
    ],
    events: &[],
};

/// A wl_subsurface proxy.
pub struct WlSubsurface {
    core: ProxyCore,
}

pub const ERROR_BAD_SURFACE: u32 = 0;

impl ConcreteProxy for WlSubsurface {
    const INTERFACE: &'static Interface = &WL_SUBSURFACE;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
        })
    }
}

impl Proxy for WlSubsurface {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_SUBSURFACE
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

impl WlSubsurface {
    pub fn destroy(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 0, &[])
    }

    /// Schedules a new sub-surface position, taking effect on the next
    /// parent commit.
    pub fn set_position(&self, x: i32, y: i32) -> Result<(), ConnectionError> {
        self.core
            .conn()?
            .send_request(self, 1, &[Arg::Int(x), Arg::Int(y)])
    }

    pub fn place_above(&self, sibling: &WlSurface) -> Result<(), ConnectionError> {
        self.core
            .conn()?
            .send_request(self, 2, &[Arg::Object(Some(sibling.core().id()))])
    }

    pub fn place_below(&self, sibling: &WlSurface) -> Result<(), ConnectionError> {
        self.core
            .conn()?
            .send_request(self, 3, &[Arg::Object(Some(sibling.core().id()))])
    }

    pub fn set_sync(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 4, &[])
    }

    pub fn set_desync(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 5, &[])
    }
}

impl Debug for WlSubsurface {
    fmt_proxy!("WlSubsurface");
}
