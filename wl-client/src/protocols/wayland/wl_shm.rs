//! shared memory support
//!
//! A singleton global that provides support for shared memory. Clients can
//! create wl_shm_pool objects using the create_pool request.

use {super::wl_shm_pool::WlShmPool, crate::protocol_helpers::prelude::*};

pub static WL_SHM: Interface = Interface {
    name: "wl_shm",
    version: 1,
    requests: &[MessageDesc {
        name: "create_pool",
        signature: &[ArgKind::NewId, ArgKind::Fd, ArgKind::Int],
    }],
    events: &[MessageDesc {
        name: "format",
        signature: &[ArgKind::Uint],
    }],
};

/// A wl_shm proxy.
pub struct WlShm {
    core: ProxyCore,
    format_listeners: ListenerSet<FormatEvent>,
}

/// The server advertises a supported pixel format.
#[derive(Debug)]
pub struct FormatEvent {
    pub format: u32,
}

pub const ERROR_INVALID_FORMAT: u32 = 0;
pub const ERROR_INVALID_STRIDE: u32 = 1;
pub const ERROR_INVALID_FD: u32 = 2;

pub const FORMAT_ARGB8888: u32 = 0;
pub const FORMAT_XRGB8888: u32 = 1;
pub const FORMAT_RGB565: u32 = 0x36314752;

impl ConcreteProxy for WlShm {
    const INTERFACE: &'static Interface = &WL_SHM;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
            format_listeners: Default::default(),
        })
    }
}

impl Proxy for WlShm {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_SHM
    }

    fn dispatch(
        &self,
        _conn: &Arc<Connection>,
        opcode: u16,
        reader: &mut EventReader<'_>,
    ) -> Result<(), WireError> {
        match opcode {
            0 => {
                let ev = FormatEvent {
                    format: reader.uint("format")?,
                };
                reader.finish()?;
                self.format_listeners.emit(&ev);
            }
            _ => return Err(WireError::UnknownOpcode(opcode)),
        }
        Ok(())
    }
}

impl WlShm {
    /// Creates a pool backed by the mappable descriptor `fd`.
    ///
    /// The transport duplicates the descriptor; the caller keeps its copy.
    pub fn create_pool(
        &self,
        fd: BorrowedFd<'_>,
        size: i32,
    ) -> Result<Arc<WlShmPool>, ConnectionError> {
        let conn = self.core.conn()?;
        let id = WlShmPool::new(&conn);
        conn.send_request(
            self,
            0,
            &[Arg::NewId(id.clone()), Arg::Fd(fd), Arg::Int(size)],
        )?;
        Ok(id)
    }

    pub fn add_format_listener(&self, listener: Arc<dyn Listener<FormatEvent>>) {
        self.format_listeners.add(listener);
    }

    pub fn remove_format_listener(&self, listener: &Arc<dyn Listener<FormatEvent>>) {
        self.format_listeners.remove(listener);
    }
}

impl Debug for WlShm {
    fmt_proxy!("WlShm");
}
