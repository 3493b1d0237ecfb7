//! A mock compositor for tests.
//!
//! The server end of a socketpair. Events are crafted with raw writes;
//! client frames are reassembled with a plain byte buffer so that the tests
//! do not depend on the code they exercise.

use {
    crate::conn::Connection,
    log::LevelFilter,
    std::{
        collections::VecDeque,
        mem::MaybeUninit,
        os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd},
        slice,
        sync::Arc,
    },
    uapi::{Msghdr, MsghdrMut, c, sockaddr_none_mut, sockaddr_none_ref},
};

pub fn install_logger() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Trace)
        .try_init();
}

pub(crate) struct TestServer {
    socket: OwnedFd,
    buf: Vec<u8>,
    pub(crate) fds: VecDeque<OwnedFd>,
}

/// One frame received from the client.
pub(crate) struct Frame {
    pub(crate) id: u32,
    pub(crate) opcode: u16,
    /// The argument words, without the header.
    pub(crate) args: Vec<u32>,
}

pub(crate) fn test_conn() -> (Arc<Connection>, TestServer) {
    install_logger();
    let (client, server) = uapi::socketpair(c::AF_UNIX, c::SOCK_STREAM | c::SOCK_CLOEXEC, 0)
        .unwrap();
    let conn = Connection::connect_to_fd(client.into()).unwrap();
    (
        conn,
        TestServer {
            socket: server.into(),
            buf: Vec::new(),
            fds: VecDeque::new(),
        },
    )
}

/// Encodes a string argument: length including the NUL, bytes, NUL, zero
/// padding to a word boundary.
pub(crate) fn string_words(s: &str) -> Vec<u32> {
    let len = s.len() + 1;
    let mut bytes = vec![0u8; len.next_multiple_of(4)];
    bytes[..s.len()].copy_from_slice(s.as_bytes());
    let mut words = vec![len as u32];
    for chunk in bytes.chunks(4) {
        words.push(u32::from_le_bytes(chunk.try_into().unwrap()));
    }
    words
}

impl TestServer {
    /// Sends raw words without touching the header.
    pub(crate) fn send_raw(&self, words: &[u32]) {
        let mut bytes = uapi::as_bytes(words);
        while !bytes.is_empty() {
            let msghdr = Msghdr {
                iov: slice::from_ref(&bytes),
                control: None::<&[MaybeUninit<u8>]>,
                name: sockaddr_none_ref(),
            };
            let n = uapi::sendmsg(self.socket.as_raw_fd(), &msghdr, 0).unwrap();
            bytes = &bytes[n..];
        }
    }

    /// Sends one event frame, patching the size into the header.
    pub(crate) fn send_event(&self, id: u32, opcode: u16, args: &[u32]) {
        let mut words = vec![id, opcode as u32];
        words.extend_from_slice(args);
        words[1] |= ((words.len() * 4) as u32) << 16;
        self.send_raw(&words);
    }

    /// Sends one event frame with descriptors attached as ancillary data.
    pub(crate) fn send_event_with_fds(&self, id: u32, opcode: u16, args: &[u32], fds: &[RawFd]) {
        let mut words = vec![id, opcode as u32];
        words.extend_from_slice(args);
        words[1] |= ((words.len() * 4) as u32) << 16;
        let data_len = size_of::<RawFd>() * fds.len();
        let mut control_buf = vec![MaybeUninit::new(0u8); uapi::cmsg_space(data_len)];
        let hdr = c::cmsghdr {
            cmsg_len: 0,
            cmsg_level: c::SOL_SOCKET,
            cmsg_type: c::SCM_RIGHTS,
        };
        let mut buf = &mut control_buf[..];
        uapi::cmsg_write(&mut buf, hdr, fds).unwrap();
        let bytes = uapi::as_bytes(&words[..]);
        let msghdr = Msghdr {
            iov: slice::from_ref(&bytes),
            control: Some(&control_buf[..]),
            name: sockaddr_none_ref(),
        };
        uapi::sendmsg(self.socket.as_raw_fd(), &msghdr, 0).unwrap();
    }

    /// Shuts down the server end, hanging up on the client.
    pub(crate) fn hang_up(&self) {
        uapi::shutdown(self.socket.as_raw_fd(), c::SHUT_RDWR).unwrap();
    }

    /// Receives one frame from the client, blocking if necessary.
    pub(crate) fn recv_frame(&mut self) -> Frame {
        loop {
            if self.buf.len() >= 8 {
                let second = u32::from_le_bytes(self.buf[4..8].try_into().unwrap());
                let size = (second >> 16) as usize;
                assert!(size >= 8 && size % 4 == 0);
                if self.buf.len() >= size {
                    let frame: Vec<u8> = self.buf.drain(..size).collect();
                    let id = u32::from_le_bytes(frame[0..4].try_into().unwrap());
                    let args = frame[8..]
                        .chunks(4)
                        .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
                        .collect();
                    return Frame {
                        id,
                        opcode: (second & 0xffff) as u16,
                        args,
                    };
                }
            }
            self.fill();
        }
    }

    fn fill(&mut self) {
        let mut chunk = [0u8; 4096];
        let mut iovec = &mut chunk[..];
        let mut control_buf = [0u8; 256];
        let mut header = MsghdrMut {
            iov: slice::from_mut(&mut iovec),
            control: Some(&mut control_buf),
            name: sockaddr_none_mut(),
            flags: 0,
        };
        let (init, _, mut control) = uapi::recvmsg(
            self.socket.as_raw_fd(),
            &mut header,
            c::MSG_CMSG_CLOEXEC,
        )
        .unwrap();
        assert!(!init.is_empty(), "client hung up");
        let n = init.len();
        while !control.is_empty() {
            let (_, hdr, data) = uapi::cmsg_read(&mut control).unwrap();
            if hdr.cmsg_level != c::SOL_SOCKET || hdr.cmsg_type != c::SCM_RIGHTS {
                continue;
            }
            for fd in uapi::pod_iter::<RawFd, _>(data).unwrap() {
                // SAFETY: The kernel guarantees that fd is valid
                unsafe {
                    self.fds.push_back(OwnedFd::from_raw_fd(fd));
                }
            }
        }
        self.buf.extend_from_slice(&chunk[..n]);
    }
}
