//! The connection to the compositor.

use {
    crate::{
        object::{ConcreteProxy, IdError, ObjectTable, Proxy},
        protocols::wayland::wl_display::WlDisplay,
        trans::{self, InputBuffer, Socket, TransError},
        wire::{
            Arg, EventReader, HEADER_WORDS, Interface, MAX_MESSAGE_WORDS, MessageDesc,
            MessageFormatter, WireError, format_event_args, format_request_args,
        },
    },
    parking_lot::Mutex,
    std::{
        collections::VecDeque,
        env::{remove_var, var, var_os},
        error::Error,
        fmt::{self, Display, Formatter},
        io::{self, BufWriter, Write},
        os::{
            fd::{FromRawFd, OwnedFd},
            unix::ffi::OsStrExt,
        },
        str::FromStr,
        sync::{
            Arc, OnceLock,
            atomic::{AtomicBool, Ordering::SeqCst},
        },
    },
    thiserror::Error,
    uapi::c::{self, sockaddr_un},
};

#[cfg(test)]
mod tests;

const XDG_RUNTIME_DIR: &str = "XDG_RUNTIME_DIR";
const WAYLAND_SOCKET: &str = "WAYLAND_SOCKET";
const WAYLAND_DISPLAY: &str = "WAYLAND_DISPLAY";
const WAYLAND_DEBUG: &str = "WAYLAND_DEBUG";

const DEFAULT_DISPLAY: &str = "wayland-0";

/// An error emitted by a [`Connection`].
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ConnectionError(#[from] ConnectionErrorKind);

#[derive(Debug, Error)]
pub(crate) enum ConnectionErrorKind {
    #[error("the connection is already defunct")]
    Defunct,
    #[error("the sending proxy is not registered")]
    UnregisteredSender,
    #[error("{WAYLAND_SOCKET} does not contain a valid number")]
    WaylandSocketNotNumber,
    #[error("F_GETFD failed on {WAYLAND_SOCKET}")]
    WaylandSocketGetFd(#[source] io::Error),
    #[error("F_SETFD failed on {WAYLAND_SOCKET}")]
    WaylandSocketSetFd(#[source] io::Error),
    #[error("{XDG_RUNTIME_DIR} is not set")]
    XrdNotSet,
    #[error("the socket path is too long")]
    SocketPathTooLong,
    #[error("could not create a socket")]
    CreateSocket(#[source] io::Error),
    #[error("could not connect to {0}")]
    Connect(String, #[source] io::Error),
    #[error("could not write a frame to the compositor")]
    SendFrame(#[source] TransError),
    #[error("could not read from the compositor")]
    ReadFrame(#[source] TransError),
    #[error("received a malformed frame")]
    Framing(#[source] TransError),
    #[error("received a frame for the unknown object id {0}")]
    UnknownSender(u32),
    #[error(transparent)]
    Dispatch(Box<DispatchError>),
    #[error("the compositor reported an error on object {object_id}: code {code}: {message}")]
    Protocol {
        object_id: u32,
        code: u32,
        message: String,
    },
    #[error("{interface}.{message} has a mismatched argument list")]
    SignatureMismatch {
        interface: &'static str,
        message: &'static str,
    },
    #[error("{interface} has no request with opcode {opcode}")]
    UnknownRequest {
        interface: &'static str,
        opcode: u16,
    },
    #[error("{interface}.{message} does not fit into a message")]
    MessageTooLarge {
        interface: &'static str,
        message: &'static str,
    },
    #[error("could not register a new-id argument")]
    Register(#[source] IdError),
    #[error("could not duplicate an outgoing file descriptor")]
    DupFd(#[source] io::Error),
}

impl ConnectionError {
    pub(crate) fn defunct() -> Self {
        Self(ConnectionErrorKind::Defunct)
    }

    /// Returns whether this error was emitted because the connection is
    /// already defunct.
    pub fn is_defunct(&self) -> bool {
        matches!(self.0, ConnectionErrorKind::Defunct)
    }

    /// Returns the contents of the wl_display.error event if this error was
    /// caused by one.
    pub fn protocol_error(&self) -> Option<(u32, u32, &str)> {
        match &self.0 {
            ConnectionErrorKind::Protocol {
                object_id,
                code,
                message,
            } => Some((*object_id, *code, message)),
            _ => None,
        }
    }
}

/// The context of a failed event dispatch.
#[derive(Debug)]
pub struct DispatchError {
    object: u32,
    interface: &'static str,
    opcode: u16,
    message: Option<&'static str>,
    source: WireError,
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "could not handle a {}#{}.", self.interface, self.object)?;
        match self.message {
            Some(name) => write!(f, "{name}")?,
            None => write!(f, "{}", self.opcode)?,
        }
        write!(f, " event")
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// A connection to the compositor.
///
/// The connection multiplexes all protocol objects over one socket. Requests
/// can be sent from any thread; they are serialized by a single outbound
/// lock. Events are read and dispatched by whichever single thread calls
/// [`read_and_dispatch`](Self::read_and_dispatch) or [`run`](Self::run), and
/// listeners run on that thread.
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use wl_client::conn::Connection;
/// # use wl_client::protocols::wayland::wl_registry::GlobalEvent;
/// let conn = Connection::connect().unwrap();
/// let registry = conn.display().get_registry().unwrap();
/// registry.add_global_listener(Arc::new(|ev: &GlobalEvent| {
///     eprintln!("global {}: {} v{}", ev.name, ev.interface, ev.version);
/// }));
/// conn.run().unwrap();
/// ```
pub struct Connection {
    socket: Socket,
    outgoing: Mutex<Outgoing>,
    incoming: Mutex<Incoming>,
    pub(crate) objects: ObjectTable,
    display: OnceLock<Arc<WlDisplay>>,
    defunct: AtomicBool,
    remote_error: Mutex<Option<(u32, u32, String)>>,
    debug: AtomicBool,
    log_writer: Mutex<BufWriter<uapi::Fd>>,
}

struct Outgoing {
    buffer: Box<[u32; MAX_MESSAGE_WORDS]>,
    fds: Vec<OwnedFd>,
}

#[derive(Default)]
struct Incoming {
    buffer: InputBuffer,
    fds: VecDeque<OwnedFd>,
}

/// These functions can be used to create a connection.
impl Connection {
    /// Connects to the compositor derived from the environment.
    ///
    /// If the `WAYLAND_SOCKET` environment variable is set, the inherited
    /// descriptor is adopted and the variable is removed. Otherwise the
    /// display name is taken from `WAYLAND_DISPLAY`, defaulting to
    /// `wayland-0`, and resolved against `XDG_RUNTIME_DIR` unless it is
    /// absolute.
    pub fn connect() -> Result<Arc<Self>, ConnectionError> {
        if let Some(wayland_socket) = var_os(WAYLAND_SOCKET) {
            let fd = str::from_utf8(wayland_socket.as_bytes())
                .ok()
                .and_then(|s| i32::from_str(s).ok())
                .ok_or(ConnectionErrorKind::WaylandSocketNotNumber)?;
            let flags = uapi::fcntl_getfd(fd)
                .map_err(|e| ConnectionErrorKind::WaylandSocketGetFd(e.into()))?;
            uapi::fcntl_setfd(fd, flags | c::FD_CLOEXEC)
                .map_err(|e| ConnectionErrorKind::WaylandSocketSetFd(e.into()))?;
            // SAFETY: This is unsound.
            let fd = unsafe {
                remove_var(WAYLAND_SOCKET);
                OwnedFd::from_raw_fd(fd)
            };
            return Self::connect_to_fd(fd);
        }
        let mut name = var(WAYLAND_DISPLAY).unwrap_or_else(|_| DEFAULT_DISPLAY.to_string());
        if !name.starts_with("/") {
            let Ok(xrd) = var(XDG_RUNTIME_DIR) else {
                return Err(ConnectionErrorKind::XrdNotSet.into());
            };
            name = format!("{xrd}/{name}");
        }
        Self::connect_to_path(&name)
    }

    /// Connects to the compositor socket at a filesystem path.
    pub fn connect_to_path(path: &str) -> Result<Arc<Self>, ConnectionError> {
        let mut addr = sockaddr_un {
            sun_family: c::AF_UNIX as _,
            sun_path: [0; 108],
        };
        if path.len() > addr.sun_path.len() - 1 {
            return Err(ConnectionErrorKind::SocketPathTooLong.into());
        }
        let sun_path = uapi::as_bytes_mut(&mut addr.sun_path[..]);
        sun_path[..path.len()].copy_from_slice(path.as_bytes());
        sun_path[path.len()] = 0;
        let socket = uapi::socket(c::AF_UNIX, c::SOCK_STREAM | c::SOCK_CLOEXEC, 0)
            .map_err(|e| ConnectionErrorKind::CreateSocket(e.into()))?;
        uapi::connect(socket.raw(), &addr)
            .map_err(|e| ConnectionErrorKind::Connect(path.to_string(), e.into()))?;
        Self::connect_to_fd(socket.into())
    }

    /// Adopts an already connected socket.
    pub fn connect_to_fd(fd: OwnedFd) -> Result<Arc<Self>, ConnectionError> {
        let conn = Arc::new(Connection {
            socket: Socket::new(fd),
            outgoing: Mutex::new(Outgoing {
                buffer: Box::new([0; MAX_MESSAGE_WORDS]),
                fds: Vec::new(),
            }),
            incoming: Default::default(),
            objects: Default::default(),
            display: OnceLock::new(),
            defunct: Default::default(),
            remote_error: Default::default(),
            debug: AtomicBool::new(var(WAYLAND_DEBUG).as_deref() == Ok("1")),
            log_writer: Mutex::new(BufWriter::with_capacity(
                1024,
                uapi::Fd::new(c::STDERR_FILENO),
            )),
        });
        let display = WlDisplay::new(&conn);
        conn.objects
            .register(&(display.clone() as Arc<dyn Proxy>))
            .map_err(ConnectionErrorKind::Register)?;
        let _ = conn.display.set(display);
        Ok(conn)
    }
}

impl Connection {
    /// Returns the wl_display proxy. It is always registered with id 1.
    pub fn display(&self) -> &Arc<WlDisplay> {
        self.display.get().unwrap()
    }

    /// Enables or disables wire logging.
    ///
    /// If this function is not used, then logging is enabled if and only if
    /// the `WAYLAND_DEBUG` environment variable is set to `1`. Messages are
    /// written to STDERR.
    pub fn set_logging(&self, enabled: bool) {
        self.debug.store(enabled, SeqCst);
    }

    /// Returns whether the connection has been torn down.
    pub fn is_defunct(&self) -> bool {
        self.defunct.load(SeqCst)
    }

    /// Encodes one request and writes it to the socket.
    ///
    /// The argument list must match the schema that the sender's interface
    /// declares for the opcode. A proxy passed as [`Arg::NewId`] is
    /// registered with the object table immediately before the frame is
    /// written, under the same lock, so that id assignment commits in wire
    /// order.
    ///
    /// A validation failure leaves the connection usable; a transport error
    /// tears it down.
    pub fn send_request(
        &self,
        sender: &dyn Proxy,
        opcode: u16,
        args: &[Arg<'_>],
    ) -> Result<(), ConnectionError> {
        let interface = sender.interface();
        let Some(desc) = interface.requests.get(opcode as usize) else {
            return Err(ConnectionErrorKind::UnknownRequest {
                interface: interface.name,
                opcode,
            }
            .into());
        };
        if args.len() != desc.signature.len()
            || args
                .iter()
                .zip(desc.signature)
                .any(|(arg, kind)| arg.kind() != *kind)
        {
            return Err(ConnectionErrorKind::SignatureMismatch {
                interface: interface.name,
                message: desc.name,
            }
            .into());
        }
        let size_words = HEADER_WORDS + args.iter().map(Arg::size_words).sum::<usize>();
        if size_words > MAX_MESSAGE_WORDS {
            return Err(ConnectionErrorKind::MessageTooLarge {
                interface: interface.name,
                message: desc.name,
            }
            .into());
        }
        if self.is_defunct() {
            return Err(ConnectionError::defunct());
        }
        let sender_id = sender.core().id();
        if sender_id == 0 {
            return Err(ConnectionErrorKind::UnregisteredSender.into());
        }
        let outgoing = &mut *self.outgoing.lock();
        outgoing.fds.clear();
        let mut fmt = MessageFormatter {
            buffer: &mut outgoing.buffer[..],
            words_written: 0,
            fds: &mut outgoing.fds,
        };
        fmt.words([sender_id, opcode as u32]);
        for arg in args {
            match arg {
                Arg::Int(v) => fmt.words([*v as u32]),
                Arg::Uint(v) => fmt.words([*v]),
                Arg::Fixed(v) => fmt.words([v.to_wire() as u32]),
                Arg::Str(s) => fmt.string(s),
                Arg::Array(a) => fmt.array(a),
                Arg::Object(id) => fmt.words([id.unwrap_or(0)]),
                Arg::NewId(proxy) => {
                    self.objects
                        .register(proxy)
                        .map_err(ConnectionErrorKind::Register)?;
                    fmt.words([proxy.core().id()]);
                }
                Arg::Fd(fd) => {
                    let dup = fd
                        .try_clone_to_owned()
                        .map_err(ConnectionErrorKind::DupFd)?;
                    fmt.fd(dup);
                }
            }
        }
        let words = fmt.finish();
        if self.debug.load(SeqCst) {
            self.log_request(interface, sender_id, desc, args);
        }
        if let Err(e) = self.socket.send(&outgoing.buffer[..words], &mut outgoing.fds) {
            self.close();
            return Err(ConnectionErrorKind::SendFrame(e).into());
        }
        Ok(())
    }

    /// Pumps one inbound quantum.
    ///
    /// Reads one chunk from the socket, blocking if necessary, then parses
    /// and dispatches every complete frame the buffer contains. Listeners
    /// run on the calling thread.
    ///
    /// Returns `false` on end-of-stream, after which the connection is
    /// defunct. Frames from unknown sender ids, malformed frames, and decode
    /// failures tear the connection down.
    pub fn read_and_dispatch(self: &Arc<Self>) -> Result<bool, ConnectionError> {
        if self.is_defunct() {
            return Err(ConnectionError::defunct());
        }
        let incoming = &mut *self.incoming.lock();
        match self.pump(incoming) {
            Ok(true) => Ok(true),
            Ok(false) => {
                self.close();
                incoming.fds.clear();
                Ok(false)
            }
            Err(e) => {
                self.close();
                incoming.fds.clear();
                Err(e.into())
            }
        }
    }

    fn pump(self: &Arc<Self>, incoming: &mut Incoming) -> Result<bool, ConnectionErrorKind> {
        let n = self
            .socket
            .recv(&mut incoming.buffer, &mut incoming.fds)
            .map_err(ConnectionErrorKind::ReadFrame)?;
        if n == 0 {
            return Ok(false);
        }
        loop {
            let msg = trans::next_message(&mut incoming.buffer)
                .map_err(ConnectionErrorKind::Framing)?;
            let Some(msg) = msg else {
                break;
            };
            let sender_id = msg[0];
            let opcode = (msg[1] & 0xffff) as u16;
            let Some(proxy) = self.objects.lookup(sender_id) else {
                return Err(ConnectionErrorKind::UnknownSender(sender_id));
            };
            let interface = proxy.interface();
            let desc = interface.events.get(opcode as usize);
            if self.debug.load(SeqCst)
                && let Some(desc) = desc
            {
                self.log_event(interface, sender_id, desc, &msg[HEADER_WORDS..]);
            }
            let mut reader = EventReader::new(&msg[HEADER_WORDS..], &mut incoming.fds);
            if let Err(e) = proxy.dispatch(self, opcode, &mut reader) {
                return Err(ConnectionErrorKind::Dispatch(Box::new(DispatchError {
                    object: sender_id,
                    interface: interface.name,
                    opcode,
                    message: desc.map(|d| d.name),
                    source: e,
                })));
            }
            if let Some((object_id, code, message)) = self.remote_error.lock().take() {
                return Err(ConnectionErrorKind::Protocol {
                    object_id,
                    code,
                    message,
                });
            }
        }
        Ok(true)
    }

    /// Reads and dispatches until end-of-stream or an error.
    pub fn run(self: &Arc<Self>) -> Result<(), ConnectionError> {
        while self.read_and_dispatch()? {}
        Ok(())
    }

    /// Tears the connection down.
    ///
    /// This shuts down the socket in both directions, waking a blocked
    /// reader, and drops the object table. Subsequent calls to
    /// [`send_request`](Self::send_request) and
    /// [`read_and_dispatch`](Self::read_and_dispatch) fail. This function is
    /// idempotent.
    pub fn close(&self) {
        if self.defunct.swap(true, SeqCst) {
            return;
        }
        self.socket.shutdown();
        self.objects.clear();
    }
}

/// These functions are used by the generated per-interface glue.
impl Connection {
    /// Creates and registers a proxy for an object that the server introduced
    /// through a new-id event argument.
    pub fn create_remote<T>(self: &Arc<Self>, id: u32) -> Result<Arc<T>, WireError>
    where
        T: ConcreteProxy,
    {
        let proxy = T::new(self);
        proxy.core().set_id(id);
        self.objects
            .register(&(proxy.clone() as Arc<dyn Proxy>))
            .map_err(WireError::NewId)?;
        Ok(proxy)
    }

    pub(crate) fn lookup(&self, id: u32) -> Option<Arc<dyn Proxy>> {
        self.objects.lookup(id)
    }

    /// Routes a wl_display.delete_id event into the object table.
    pub(crate) fn recycle_id(&self, id: u32) {
        if self.objects.unregister(id).is_none() {
            log::warn!("received a delete_id for the unknown id {id}");
        }
        self.objects.reclaim(id);
    }

    /// Records a wl_display.error event. The connection is torn down once
    /// the error listeners have run.
    pub(crate) fn set_remote_error(&self, object_id: u32, code: u32, message: String) {
        *self.remote_error.lock() = Some((object_id, code, message));
    }
}

impl Connection {
    #[cold]
    fn log(&self, args: fmt::Arguments<'_>) {
        let writer = &mut *self.log_writer.lock();
        let _ = writer.write_fmt(args);
        let _ = writer.flush();
    }

    #[cold]
    fn log_request(
        &self,
        interface: &'static Interface,
        id: u32,
        desc: &'static MessageDesc,
        args: &[Arg<'_>],
    ) {
        let (millis, micros) = time_since_epoch();
        self.log(format_args!(
            "[{millis:7}.{micros:03}] server <= {}#{}.{}({})\n",
            interface.name,
            id,
            desc.name,
            format_request_args(args),
        ));
    }

    #[cold]
    fn log_event(
        &self,
        interface: &'static Interface,
        id: u32,
        desc: &'static MessageDesc,
        msg: &[u32],
    ) {
        let (millis, micros) = time_since_epoch();
        self.log(format_args!(
            "[{millis:7}.{micros:03}] server -> {}#{}.{}({})\n",
            interface.name,
            id,
            desc.name,
            format_event_args(desc, msg),
        ));
    }
}

#[inline]
fn time_since_epoch() -> (u32, u16) {
    let mut ts = c::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    let _ = uapi::clock_gettime(c::CLOCK_REALTIME, &mut ts);
    let sec = ts.tv_sec as u64;
    let nsec = ts.tv_nsec as u64;
    let time = sec.wrapping_mul(1_000_000).wrapping_add(nsec / 1_000) as u32;
    let millis = time / 1_000;
    let micros = (time % 1_000) as u16;
    (millis, micros)
}
