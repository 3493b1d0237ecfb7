//! The wayland wire format.
//!
//! A message consists of a two-word header (sender object id, then message
//! size in the upper 16 bits and opcode in the lower 16 bits) followed by the
//! encoded arguments. All words are little-endian and all messages are padded
//! to a multiple of 4 bytes. File descriptors never appear in the byte stream;
//! they travel as ancillary data and are consumed in argument order.

use {
    crate::{conn::Connection, fixed::Fixed, object::Proxy},
    debug_fn::debug_fn,
    parking_lot::Mutex,
    std::{
        collections::VecDeque,
        fmt::{Debug, Display, Formatter},
        os::fd::{AsRawFd, OwnedFd},
        sync::Arc,
    },
    thiserror::Error,
};

#[cfg(test)]
mod tests;

pub(crate) const WORD_SIZE: usize = size_of::<u32>();
pub(crate) const HEADER_WORDS: usize = 2;
pub(crate) const HEADER_SIZE: usize = HEADER_WORDS * WORD_SIZE;
pub(crate) const MAX_MESSAGE_SIZE: usize = 4096;
pub(crate) const MAX_MESSAGE_WORDS: usize = MAX_MESSAGE_SIZE / WORD_SIZE;

/// The description of one interface as supplied by the protocol generator.
///
/// Opcodes are indices into the request and event lists.
pub struct Interface {
    /// The interface name as it appears in wl_registry.global events.
    pub name: &'static str,
    /// The interface version from the protocol definition.
    pub version: u32,
    /// The requests of this interface, in declaration order.
    pub requests: &'static [MessageDesc],
    /// The events of this interface, in declaration order.
    pub events: &'static [MessageDesc],
}

/// The description of one request or event.
pub struct MessageDesc {
    /// The message name from the protocol definition.
    pub name: &'static str,
    /// The argument kinds of the message, in declaration order.
    pub signature: &'static [ArgKind],
}

/// The kind of one argument in a message signature.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ArgKind {
    Int,
    Uint,
    Fixed,
    Str,
    Array,
    Object,
    NewId,
    Fd,
}

/// An argument value of an outgoing request.
pub enum Arg<'a> {
    Int(i32),
    Uint(u32),
    Fixed(Fixed),
    Str(&'a str),
    Array(&'a [u8]),
    /// An object reference. `None` encodes the null object.
    Object(Option<u32>),
    /// A proxy that is registered with the object table immediately before
    /// the frame is sent.
    NewId(Arc<dyn Proxy>),
    /// A descriptor that is duplicated and attached as ancillary data.
    Fd(std::os::fd::BorrowedFd<'a>),
}

impl Arg<'_> {
    pub(crate) fn kind(&self) -> ArgKind {
        match self {
            Arg::Int(_) => ArgKind::Int,
            Arg::Uint(_) => ArgKind::Uint,
            Arg::Fixed(_) => ArgKind::Fixed,
            Arg::Str(_) => ArgKind::Str,
            Arg::Array(_) => ArgKind::Array,
            Arg::Object(_) => ArgKind::Object,
            Arg::NewId(_) => ArgKind::NewId,
            Arg::Fd(_) => ArgKind::Fd,
        }
    }

    /// The number of words this argument occupies in the byte stream.
    pub(crate) fn size_words(&self) -> usize {
        match self {
            Arg::Str(s) => 1 + (s.len() + 1).div_ceil(WORD_SIZE),
            Arg::Array(a) => 1 + a.len().div_ceil(WORD_SIZE),
            Arg::Fd(_) => 0,
            _ => 1,
        }
    }
}

/// An error emitted while decoding the arguments of a received message.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("argument {0} is not present in the message")]
    MissingArgument(&'static str),
    #[error("argument {0} is not valid UTF-8")]
    NonUtf8(&'static str),
    #[error("argument {0} is a null string but the argument is not nullable")]
    NullString(&'static str),
    #[error("the file descriptor for argument {0} is missing")]
    MissingFd(&'static str),
    #[error("there are trailing bytes after the message")]
    TrailingBytes,
    #[error("unknown event opcode {0}")]
    UnknownOpcode(u16),
    #[error("could not register a server-created object")]
    NewId(#[source] crate::object::IdError),
}

/// Formats one message into a word buffer.
///
/// The size field of the header is patched in by [`finish`](Self::finish) once
/// all arguments have been written. The caller must have verified that the
/// message fits into the buffer.
pub(crate) struct MessageFormatter<'a> {
    pub(crate) buffer: &'a mut [u32],
    pub(crate) words_written: usize,
    pub(crate) fds: &'a mut Vec<OwnedFd>,
}

impl MessageFormatter<'_> {
    #[inline(always)]
    pub(crate) fn words<const N: usize>(&mut self, words: [u32; N]) {
        self.buffer[self.words_written..][..words.len()].copy_from_slice(&words);
        self.words_written += words.len();
    }

    #[inline(always)]
    pub(crate) fn array(&mut self, data: &[u8]) {
        self.words([data.len() as u32]);
        let tail = uapi::as_bytes_mut(&mut self.buffer[self.words_written..]);
        tail[..data.len()].copy_from_slice(data);
        let pad = data.len().next_multiple_of(WORD_SIZE);
        tail[data.len()..pad].fill(0);
        self.words_written += pad / WORD_SIZE;
    }

    #[inline(always)]
    pub(crate) fn string(&mut self, data: &str) {
        let len = data.len() + 1;
        self.words([len as u32]);
        let tail = uapi::as_bytes_mut(&mut self.buffer[self.words_written..]);
        tail[..data.len()].copy_from_slice(data.as_bytes());
        let pad = len.next_multiple_of(WORD_SIZE);
        tail[data.len()..pad].fill(0);
        self.words_written += pad / WORD_SIZE;
    }

    #[inline(always)]
    pub(crate) fn fd(&mut self, fd: OwnedFd) {
        self.fds.push(fd);
    }

    /// Patches the header size field and returns the total number of words.
    pub(crate) fn finish(self) -> usize {
        let size = self.words_written * WORD_SIZE;
        self.buffer[1] |= (size as u32) << 16;
        self.words_written
    }
}

/// A cursor over the argument words of one received message.
///
/// Decoding consumes the words left to right and pulls one descriptor from
/// the ancillary queue per `fd` argument, in argument order.
pub struct EventReader<'a> {
    msg: &'a [u32],
    offset: usize,
    fds: &'a mut VecDeque<OwnedFd>,
}

impl<'a> EventReader<'a> {
    pub(crate) fn new(msg: &'a [u32], fds: &'a mut VecDeque<OwnedFd>) -> Self {
        Self {
            msg,
            offset: 0,
            fds,
        }
    }

    pub fn uint(&mut self, name: &'static str) -> Result<u32, WireError> {
        let Some(&word) = self.msg.get(self.offset) else {
            return Err(WireError::MissingArgument(name));
        };
        self.offset += 1;
        Ok(word)
    }

    pub fn int(&mut self, name: &'static str) -> Result<i32, WireError> {
        self.uint(name).map(|v| v as i32)
    }

    pub fn fixed(&mut self, name: &'static str) -> Result<Fixed, WireError> {
        self.uint(name).map(|v| Fixed::from_wire(v as i32))
    }

    pub fn string(&mut self, name: &'static str) -> Result<String, WireError> {
        match self.nullable_string(name)? {
            Some(s) => Ok(s),
            None => Err(WireError::NullString(name)),
        }
    }

    pub fn nullable_string(&mut self, name: &'static str) -> Result<Option<String>, WireError> {
        let len = self.uint(name)? as usize;
        if len == 0 {
            return Ok(None);
        }
        let words = len.div_ceil(WORD_SIZE);
        if self.offset + words > self.msg.len() {
            return Err(WireError::MissingArgument(name));
        }
        let bytes = &uapi::as_bytes(&self.msg[self.offset..])[..len];
        self.offset += words;
        let Ok(s) = str::from_utf8(&bytes[..len - 1]) else {
            return Err(WireError::NonUtf8(name));
        };
        Ok(Some(s.to_owned()))
    }

    pub fn array(&mut self, name: &'static str) -> Result<Vec<u8>, WireError> {
        let len = self.uint(name)? as usize;
        let words = len.div_ceil(WORD_SIZE);
        if self.offset + words > self.msg.len() {
            return Err(WireError::MissingArgument(name));
        }
        let bytes = &uapi::as_bytes(&self.msg[self.offset..])[..len];
        self.offset += words;
        Ok(bytes.to_vec())
    }

    /// Decodes an object argument.
    ///
    /// A zero id or an id that is no longer in the object table decodes to
    /// `None`.
    pub fn object(
        &mut self,
        conn: &Connection,
        name: &'static str,
    ) -> Result<Option<Arc<dyn Proxy>>, WireError> {
        let id = self.uint(name)?;
        if id == 0 {
            return Ok(None);
        }
        Ok(conn.lookup(id))
    }

    pub fn fd(&mut self, name: &'static str) -> Result<OwnedFd, WireError> {
        self.fds.pop_front().ok_or(WireError::MissingFd(name))
    }

    /// Verifies that the message contains no bytes beyond the decoded
    /// arguments.
    pub fn finish(&self) -> Result<(), WireError> {
        if self.offset != self.msg.len() {
            return Err(WireError::TrailingBytes);
        }
        Ok(())
    }
}

/// A received file descriptor whose ownership has not been claimed yet.
///
/// The first listener that calls [`take`](Self::take) owns the descriptor.
/// A descriptor that no listener claims is closed when the event is dropped.
pub struct EventFd(Mutex<Option<OwnedFd>>);

impl EventFd {
    /// Wraps a descriptor popped from the ancillary queue.
    pub fn new(fd: OwnedFd) -> Self {
        Self(Mutex::new(Some(fd)))
    }

    /// Takes ownership of the descriptor.
    ///
    /// Returns `None` if another listener has already claimed it.
    pub fn take(&self) -> Option<OwnedFd> {
        self.0.lock().take()
    }
}

impl Drop for EventFd {
    fn drop(&mut self) {
        if let Some(fd) = self.0.get_mut().take() {
            log::debug!("closing the unclaimed event file descriptor {}", fd.as_raw_fd());
        }
    }
}

impl Debug for EventFd {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &*self.0.lock() {
            Some(fd) => write!(f, "EventFd({})", fd.as_raw_fd()),
            None => f.write_str("EventFd(claimed)"),
        }
    }
}

/// Formats the arguments of a received message for wire logging.
///
/// Descriptors are not part of the byte stream and are printed as `fd`;
/// object and new-id arguments are printed as raw ids.
pub(crate) fn format_event_args<'a>(
    desc: &'static MessageDesc,
    msg: &'a [u32],
) -> impl Display + use<'a> {
    debug_fn(move |f| {
        let mut first = true;
        let mut offset = 0;
        for kind in desc.signature {
            if !std::mem::take(&mut first) {
                f.write_str(", ")?;
            }
            if offset >= msg.len() && *kind != ArgKind::Fd {
                return f.write_str("<truncated>");
            }
            match kind {
                ArgKind::Int => write!(f, "{}", msg[offset] as i32)?,
                ArgKind::Uint | ArgKind::Object | ArgKind::NewId => write!(f, "{}", msg[offset])?,
                ArgKind::Fixed => write!(f, "{}", Fixed::from_wire(msg[offset] as i32))?,
                ArgKind::Str | ArgKind::Array => {
                    let len = msg[offset] as usize;
                    let words = len.div_ceil(WORD_SIZE);
                    if offset + 1 + words > msg.len() {
                        return f.write_str("<truncated>");
                    }
                    let bytes = &uapi::as_bytes(&msg[offset + 1..])[..len];
                    match kind {
                        ArgKind::Str if len == 0 => f.write_str("null")?,
                        ArgKind::Str => {
                            write!(f, "{:?}", String::from_utf8_lossy(&bytes[..len - 1]))?
                        }
                        _ => write_array(f, bytes)?,
                    }
                    offset += words;
                }
                ArgKind::Fd => {
                    f.write_str("fd")?;
                    continue;
                }
            }
            offset += 1;
        }
        Ok(())
    })
}

/// Formats the arguments of an outgoing request for wire logging.
pub(crate) fn format_request_args<'a>(args: &'a [Arg<'a>]) -> impl Display + use<'a> {
    debug_fn(move |f| {
        let mut first = true;
        for arg in args {
            if !std::mem::take(&mut first) {
                f.write_str(", ")?;
            }
            match arg {
                Arg::Int(v) => write!(f, "{v}")?,
                Arg::Uint(v) => write!(f, "{v}")?,
                Arg::Fixed(v) => write!(f, "{v}")?,
                Arg::Str(s) => write!(f, "{s:?}")?,
                Arg::Array(a) => write_array(f, a)?,
                Arg::Object(id) => write!(f, "{}", id.unwrap_or(0))?,
                Arg::NewId(p) => write!(f, "{}#{}", p.interface().name, p.core().id())?,
                Arg::Fd(fd) => write!(f, "fd {}", fd.as_raw_fd())?,
            }
        }
        Ok(())
    })
}

fn write_array(f: &mut Formatter<'_>, array: &[u8]) -> std::fmt::Result {
    f.write_str("0x")?;
    if array.is_empty() {
        return f.write_str("0");
    }
    for b in array {
        write!(f, "{b:02x}")?;
    }
    Ok(())
}
