//! region interface
//!
//! A region object describes an area. Region objects are used to describe
//! the opaque and input regions of a surface.

use crate::protocol_helpers::prelude::*;

pub static WL_REGION: Interface = Interface {
    name: "wl_region",
    version: 1,
    requests: &[
        MessageDesc {
            name: "destroy",
            signature: &[],
        },
        MessageDesc {
            name: "add",
            signature: &[ArgKind::Int, ArgKind::Int, ArgKind::Int, ArgKind::Int],
        },
        MessageDesc {
            name: "subtract",
            signature: &[ArgKind::Int, ArgKind::Int, ArgKind::Int, ArgKind::Int],
        },
    ],
    events: &[],
};

/// A wl_region proxy.
pub struct WlRegion {
    core: ProxyCore,
}

impl ConcreteProxy for WlRegion {
    const INTERFACE: &'static Interface = &WL_REGION;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
        })
    }
}

impl Proxy for WlRegion {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_REGION
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

impl WlRegion {
    pub fn destroy(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 0, &[])
    }

    pub fn add(&self, x: i32, y: i32, width: i32, height: i32) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(
            self,
            1,
            &[Arg::Int(x), Arg::Int(y), Arg::Int(width), Arg::Int(height)],
        )
    }

    pub fn subtract(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(
            self,
            2,
            &[Arg::Int(x), Arg::Int(y), Arg::Int(width), Arg::Int(height)],
        )
    }
}

impl Debug for WlRegion {
    fmt_proxy!("WlRegion");
}
