//! a shared memory pool
//!
//! The wl_shm_pool object encapsulates a piece of memory shared between the
//! compositor and client. Through the wl_shm_pool object, the client can
//! allocate shared memory wl_buffer objects.

use {super::wl_buffer::WlBuffer, crate::protocol_helpers::prelude::*};

pub static WL_SHM_POOL: Interface = Interface {
    name: "wl_shm_pool",
    version: 1,
    requests: &[
        MessageDesc {
            name: "create_buffer",
            signature: &[
                ArgKind::NewId,
                ArgKind::Int,
                ArgKind::Int,
                ArgKind::Int,
                ArgKind::Int,
                ArgKind::Uint,
            ],
        },
        MessageDesc {
            name: "destroy",
            signature: &[],
        },
        MessageDesc {
            name: "resize",
            signature: &[ArgKind::Int],
        },
    ],
    events: &[],
};

/// A wl_shm_pool proxy.
pub struct WlShmPool {
    core: ProxyCore,
}

impl ConcreteProxy for WlShmPool {
    const INTERFACE: &'static Interface = &WL_SHM_POOL;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
        })
    }
}

impl Proxy for WlShmPool {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_SHM_POOL
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

impl WlShmPool {
    pub fn create_buffer(
        &self,
        offset: i32,
        width: i32,
        height: i32,
        stride: i32,
        format: u32,
    ) -> Result<Arc<WlBuffer>, ConnectionError> {
        let conn = self.core.conn()?;
        let id = WlBuffer::new(&conn);
        conn.send_request(
            self,
            0,
            &[
                Arg::NewId(id.clone()),
                Arg::Int(offset),
                Arg::Int(width),
                Arg::Int(height),
                Arg::Int(stride),
                Arg::Uint(format),
            ],
        )?;
        Ok(id)
    }

    pub fn destroy(&self) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 1, &[])
    }

    /// Grows the pool to `size` bytes. The pool can never shrink.
    pub fn resize(&self, size: i32) -> Result<(), ConnectionError> {
        self.core.conn()?.send_request(self, 2, &[Arg::Int(size)])
    }
}

impl Debug for WlShmPool {
    fmt_proxy!("WlShmPool");
}
