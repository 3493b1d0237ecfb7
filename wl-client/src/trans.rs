//! The stream-socket transport.
//!
//! The transport owns the connection to the compositor. It moves raw bytes
//! and ancillary file descriptors; it never interprets message arguments.
//! Frame reassembly validates only the header invariants.

use {
    crate::wire::{HEADER_SIZE, MAX_MESSAGE_SIZE, MAX_MESSAGE_WORDS, WORD_SIZE},
    error_reporter::Report,
    isnt::std_1::primitive::IsntSliceExt,
    smallvec::SmallVec,
    std::{
        collections::VecDeque,
        io,
        mem::MaybeUninit,
        os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd},
        slice,
    },
    thiserror::Error,
    uapi::{Errno, Msghdr, MsghdrMut, c, sockaddr_none_mut, sockaddr_none_ref},
};

#[cfg(test)]
mod tests;

const BUFFER_LEN: usize = MAX_MESSAGE_WORDS * 2;

/// An error emitted by the transport.
#[derive(Debug, Error)]
pub enum TransError {
    #[error("failed to read from socket")]
    ReadFromSocket(#[source] io::Error),
    #[error("failed to write to socket")]
    WriteToSocket(#[source] io::Error),
    #[error("the connection is closed")]
    Closed,
    #[error("message has a supposed length {0} < {HEADER_SIZE}")]
    MessageTooSmall(usize),
    #[error("message has a supposed length {0} > {MAX_MESSAGE_SIZE}")]
    MessageTooLarge(usize),
    #[error("message has a supposed length {0} that is not a multiple of {WORD_SIZE}")]
    MessageNotAligned(usize),
}

/// The socket to the compositor.
pub(crate) struct Socket {
    fd: OwnedFd,
}

pub(crate) struct InputBuffer {
    buffer: Box<[u32; BUFFER_LEN]>,
    valid_from_word: usize,
    valid_bytes: usize,
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self {
            buffer: Box::new([0; BUFFER_LEN]),
            valid_from_word: 0,
            valid_bytes: 0,
        }
    }
}

impl InputBuffer {
    fn compact(&mut self) {
        if self.valid_from_word == 0 {
            return;
        }
        if self.valid_bytes > 0 {
            let start = self.valid_from_word * WORD_SIZE;
            let buf = uapi::as_bytes_mut(&mut self.buffer[..]);
            buf.copy_within(start..start + self.valid_bytes, 0);
        }
        self.valid_from_word = 0;
    }
}

/// Extracts the next complete frame from the buffer.
///
/// Returns `None` if the buffered bytes do not contain a complete frame yet.
/// The returned slice includes the two header words.
pub(crate) fn next_message(buffer: &mut InputBuffer) -> Result<Option<&[u32]>, TransError> {
    if buffer.valid_bytes < HEADER_SIZE {
        return Ok(None);
    }
    let size = (buffer.buffer[buffer.valid_from_word + 1] >> 16) as usize;
    if size < HEADER_SIZE {
        return Err(TransError::MessageTooSmall(size));
    }
    if size > MAX_MESSAGE_SIZE {
        return Err(TransError::MessageTooLarge(size));
    }
    if size % WORD_SIZE != 0 {
        return Err(TransError::MessageNotAligned(size));
    }
    if size > buffer.valid_bytes {
        return Ok(None);
    }
    let start = buffer.valid_from_word;
    let end = start + size / WORD_SIZE;
    buffer.valid_from_word = end;
    buffer.valid_bytes -= size;
    Ok(Some(&buffer.buffer[start..end]))
}

impl Socket {
    pub(crate) fn new(fd: OwnedFd) -> Self {
        Self { fd }
    }

    /// Reads one chunk of bytes and any ancillary descriptors delivered with
    /// it.
    ///
    /// Returns the number of bytes read; zero means end-of-stream. Blocks if
    /// no data is available.
    pub(crate) fn recv(
        &self,
        buffer: &mut InputBuffer,
        fds: &mut VecDeque<OwnedFd>,
    ) -> Result<usize, TransError> {
        buffer.compact();
        loop {
            let mut iovec =
                &mut uapi::as_bytes_mut(&mut buffer.buffer[..])[buffer.valid_bytes..];
            let mut control_buf = [0u8; 128];
            let mut header = MsghdrMut {
                iov: slice::from_mut(&mut iovec),
                control: Some(&mut control_buf),
                name: sockaddr_none_mut(),
                flags: 0,
            };
            let (init, _, mut control) =
                match uapi::recvmsg(self.fd.as_raw_fd(), &mut header, c::MSG_CMSG_CLOEXEC) {
                    Ok(r) => r,
                    Err(Errno(c::EINTR)) => continue,
                    Err(Errno(c::ECONNRESET)) => return Err(TransError::Closed),
                    Err(e) => {
                        return Err(TransError::ReadFromSocket(io::Error::from_raw_os_error(
                            e.0,
                        )));
                    }
                };
            let n = init.len();
            buffer.valid_bytes += n;
            while control.is_not_empty() {
                let Ok((_, hdr, data)) = uapi::cmsg_read(&mut control) else {
                    break;
                };
                if hdr.cmsg_level != c::SOL_SOCKET || hdr.cmsg_type != c::SCM_RIGHTS {
                    continue;
                }
                for fd in uapi::pod_iter::<RawFd, _>(data).unwrap() {
                    // SAFETY: The kernel guarantees that fd is valid
                    unsafe {
                        fds.push_back(OwnedFd::from_raw_fd(fd));
                    }
                }
            }
            return Ok(n);
        }
    }

    /// Writes one frame as a unit.
    ///
    /// The descriptors are attached as ancillary data to the first write that
    /// carries bytes of the frame and are closed once the frame has been
    /// written completely.
    pub(crate) fn send(&self, words: &[u32], fds: &mut Vec<OwnedFd>) -> Result<(), TransError> {
        let bytes = uapi::as_bytes(words);
        let mut sent = 0;
        while sent < bytes.len() {
            let mut control_buf = SmallVec::<[MaybeUninit<u8>; 128]>::new();
            let mut control = None;
            if sent == 0 && fds.is_not_empty() {
                let data_len = size_of::<RawFd>() * fds.len();
                let cmsg_space = uapi::cmsg_space(data_len);
                control_buf.reserve_exact(cmsg_space);
                // SAFETY: control_buf contains only MaybeUninit elements.
                unsafe {
                    control_buf.set_len(cmsg_space);
                }
                let hdr = c::cmsghdr {
                    cmsg_len: 0,
                    cmsg_level: c::SOL_SOCKET,
                    cmsg_type: c::SCM_RIGHTS,
                };
                let mut raw = SmallVec::<[RawFd; 128 / 4]>::new();
                for fd in fds.iter() {
                    raw.push(fd.as_raw_fd());
                }
                let mut buf = &mut control_buf[..];
                uapi::cmsg_write(&mut buf, hdr, &raw[..]).unwrap();
                control = Some(&control_buf[..]);
            }
            let buf = &bytes[sent..];
            let msghdr = Msghdr {
                iov: slice::from_ref(&buf),
                control,
                name: sockaddr_none_ref(),
            };
            let n = match uapi::sendmsg(self.fd.as_raw_fd(), &msghdr, c::MSG_NOSIGNAL) {
                Ok(n) => n,
                Err(Errno(c::EINTR)) => continue,
                Err(Errno(c::ECONNRESET)) => return Err(TransError::Closed),
                Err(Errno(c::EPIPE)) => return Err(TransError::Closed),
                Err(e) => {
                    return Err(TransError::WriteToSocket(io::Error::from_raw_os_error(
                        e.0,
                    )));
                }
            };
            if sent == 0 {
                fds.clear();
            }
            sent += n;
        }
        Ok(())
    }

    /// Shuts down both directions of the socket.
    ///
    /// This wakes a reader that is blocked in [`recv`](Self::recv); the wakeup
    /// surfaces as an end-of-stream read.
    pub(crate) fn shutdown(&self) {
        if let Err(e) = uapi::shutdown(self.fd.as_raw_fd(), c::SHUT_RDWR) {
            log::warn!(
                "Could not shut down the socket: {}",
                Report::new(io::Error::from(e)),
            );
        }
    }
}
