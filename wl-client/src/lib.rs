//! A client-side runtime for the wayland display protocol.
//!
//! This crate implements the wire runtime of a wayland client: the object
//! registry, the length-prefixed binary framing over a unix stream socket,
//! and the request/event dispatch machinery that multiplexes many protocol
//! objects over one connection. Per-interface bindings for the core protocol
//! live in [`protocols`]; they are written in the shape a protocol generator
//! would produce and the runtime itself is interface-agnostic.
//!
//! # Example
//!
//! This example connects to the compositor, enumerates the globals, and
//! dispatches events until the compositor hangs up.
//!
//! ```no_run
//! use std::sync::Arc;
//! use wl_client::conn::Connection;
//! use wl_client::protocols::wayland::wl_registry::GlobalEvent;
//!
//! let conn = Connection::connect().unwrap();
//! let registry = conn.display().get_registry().unwrap();
//! registry.add_global_listener(Arc::new(|ev: &GlobalEvent| {
//!     println!("{} v{} (name {})", ev.interface, ev.version, ev.name);
//! }));
//! conn.run().unwrap();
//! ```
//!
//! # Objects
//!
//! Every protocol object is represented by a proxy implementing
//! [`Proxy`](object::Proxy). Proxies are created in one of two ways:
//!
//! - The client sends a request with a new_id argument. The generated
//!   request method creates the proxy and returns it; the runtime registers
//!   it with a client-allocated id immediately before the request is
//!   written.
//! - The server sends an event with a new_id argument, for example
//!   wl_data_device.data_offer. The event decoder creates the proxy,
//!   registers it with the server-assigned id, and passes it to the event
//!   listeners.
//!
//! Ids are 32 bit: id 0 is the null object, id 1 is always the wl_display,
//! ids up to 0xfeffffff are allocated by the client, and ids from 0xff000000
//! on are allocated by the server. When the server acknowledges a destroyed
//! object with wl_display.delete_id, the id returns to the allocator and is
//! preferred for the next allocation.
//!
//! # Listeners
//!
//! Events are delivered to listeners. Each proxy carries one listener set
//! per event; listeners are added and removed through generated
//! `add_*_listener`/`remove_*_listener` pairs and may be closures:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use wl_client::protocols::wayland::wl_callback::{DoneEvent, WlCallback};
//! # fn f(callback: &WlCallback) {
//! callback.add_done_listener(Arc::new(|ev: &DoneEvent| {
//!     eprintln!("done at {}", ev.callback_data);
//! }));
//! # }
//! ```
//!
//! Listeners for one event run in registration order, and events are
//! dispatched in the order the server emitted them. A wl_display.sync
//! roundtrip therefore acts as a barrier: its done callback runs after every
//! event the server emitted before processing the sync.
//!
//! # Threading
//!
//! A [`Connection`](conn::Connection) is `Send + Sync`. Requests may be sent
//! from any thread; a single outbound lock keeps frames from interleaving
//! and commits new-id allocations in wire order. Reading and dispatching is
//! single-threaded: one thread, typically dedicated, calls
//! [`run`](conn::Connection::run) and all listeners run on it. Listeners may
//! send requests but must not dispatch recursively.
//!
//! # File descriptors
//!
//! Descriptors attached to requests are duplicated by the transport; the
//! caller keeps its copy. Descriptors received with events are handed to
//! listeners through [`EventFd`](wire::EventFd): the first listener that
//! takes the descriptor owns it, and an unclaimed descriptor is closed after
//! dispatch.
//!
//! # Logging
//!
//! If the `WAYLAND_DEBUG` environment variable is set to 1, every sent and
//! received message is written to STDERR:
//!
//! ```text
//! [1679788.330] server <= wl_display#1.get_registry(wl_registry#2)
//! [1679788.331] server -> wl_registry#2.global(1, "wl_compositor", 4)
//! ```
//!
//! Library diagnostics are emitted through the `log` crate.

pub mod conn;
pub mod fixed;
pub mod object;
mod protocol_helpers;
/// Auto-generated wayland protocols.
pub mod protocols;
#[cfg(test)]
mod test_framework;
mod trans;
pub mod wire;
