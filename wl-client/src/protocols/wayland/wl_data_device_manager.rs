//! data transfer interface
//!
//! The wl_data_device_manager is a singleton global object that provides
//! access to inter-client data transfer mechanisms such as copy-and-paste
//! and drag-and-drop.

use {
    super::{wl_data_device::WlDataDevice, wl_data_source::WlDataSource, wl_seat::WlSeat},
    crate::protocol_helpers::prelude::*,
};

pub static WL_DATA_DEVICE_MANAGER: Interface = Interface {
    name: "wl_data_device_manager",
    version: 3,
    requests: &[
        MessageDesc {
            name: "create_data_source",
            signature: &[ArgKind::NewId],
        },
        MessageDesc {
            name: "get_data_device",
            signature: &[ArgKind::NewId, ArgKind::Object],
        },
    ],
    events: &[],
};

/// A wl_data_device_manager proxy.
pub struct WlDataDeviceManager {
    core: ProxyCore,
}

pub const DND_ACTION_NONE: u32 = 0;
pub const DND_ACTION_COPY: u32 = 1;
pub const DND_ACTION_MOVE: u32 = 2;
pub const DND_ACTION_ASK: u32 = 4;

impl ConcreteProxy for WlDataDeviceManager {
    const INTERFACE: &'static Interface = &WL_DATA_DEVICE_MANAGER;

    fn new(conn: &Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            core: ProxyCore::new(conn),
        })
    }
}

impl Proxy for WlDataDeviceManager {
    fn core(&self) -> &ProxyCore {
        &self.core
    }

    fn interface(&self) -> &'static Interface {
        &WL_DATA_DEVICE_MANAGER
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

impl WlDataDeviceManager {
    pub fn create_data_source(&self) -> Result<Arc<WlDataSource>, ConnectionError> {
        let conn = self.core.conn()?;
        let id = WlDataSource::new(&conn);
        conn.send_request(self, 0, &[Arg::NewId(id.clone())])?;
        Ok(id)
    }

    pub fn get_data_device(&self, seat: &WlSeat) -> Result<Arc<WlDataDevice>, ConnectionError> {
        let conn = self.core.conn()?;
        let id = WlDataDevice::new(&conn);
        conn.send_request(
            self,
            1,
            &[Arg::NewId(id.clone()), Arg::Object(Some(seat.core().id()))],
        )?;
        Ok(id)
    }
}

impl Debug for WlDataDeviceManager {
    fmt_proxy!("WlDataDeviceManager");
}
