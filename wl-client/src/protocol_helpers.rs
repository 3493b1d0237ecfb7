//! Shared imports for the generated per-interface glue.

/// Expands to the body of a proxy `Debug` impl.
macro_rules! fmt_proxy {
    ($name:literal) => {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.debug_struct($name).field("id", &self.core.id()).finish()
        }
    };
}

pub(crate) use fmt_proxy;

pub(crate) mod prelude {
    pub(crate) use crate::protocol_helpers::fmt_proxy;
    pub(crate) use {
        crate::{
            conn::{Connection, ConnectionError},
            fixed::Fixed,
            object::{ConcreteProxy, Listener, ListenerSet, Proxy, ProxyArcUtils, ProxyCore},
            wire::{Arg, ArgKind, EventFd, EventReader, Interface, MessageDesc, WireError},
        },
        std::{
            fmt::{Debug, Formatter},
            os::fd::BorrowedFd,
            sync::Arc,
        },
    };
}
