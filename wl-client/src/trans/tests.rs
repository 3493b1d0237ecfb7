use {
    crate::trans::{InputBuffer, Socket, TransError, next_message},
    std::{
        collections::VecDeque,
        os::fd::{AsRawFd, OwnedFd},
    },
    uapi::c,
};

fn socket_pair() -> (Socket, Socket) {
    let (a, b) = uapi::socketpair(c::AF_UNIX, c::SOCK_STREAM | c::SOCK_CLOEXEC, 0).unwrap();
    (Socket::new(a.into()), Socket::new(b.into()))
}

fn recv_frame(socket: &Socket) -> (Vec<u32>, VecDeque<OwnedFd>) {
    let mut buffer = InputBuffer::default();
    let mut fds = VecDeque::new();
    loop {
        assert_ne!(socket.recv(&mut buffer, &mut fds).unwrap(), 0);
        if let Some(msg) = next_message(&mut buffer).unwrap() {
            return (msg.to_vec(), fds);
        }
    }
}

#[test]
fn frame_round_trip() {
    let (a, b) = socket_pair();
    let words = [7u32, (16 << 16) | 3, 0xdead_beef, 42];
    a.send(&words, &mut Vec::new()).unwrap();
    let (msg, fds) = recv_frame(&b);
    assert_eq!(msg, words);
    assert!(fds.is_empty());
}

#[test]
fn fds_ride_out_of_band() {
    let (a, b) = socket_pair();
    let fd1: OwnedFd = uapi::memfd_create("", 0).unwrap().into();
    let fd2: OwnedFd = uapi::memfd_create("", 0).unwrap().into();
    let ino1 = uapi::fstat(fd1.as_raw_fd()).unwrap().st_ino;
    let ino2 = uapi::fstat(fd2.as_raw_fd()).unwrap().st_ino;
    let words = [3u32, (12 << 16) | 1, 4096];
    a.send(&words, &mut vec![fd1, fd2]).unwrap();
    let (msg, fds) = recv_frame(&b);
    // The byte stream contains exactly the frame, no fd bytes.
    assert_eq!(msg, words);
    assert_eq!(fds.len(), 2);
    assert_eq!(uapi::fstat(fds[0].as_raw_fd()).unwrap().st_ino, ino1);
    assert_eq!(uapi::fstat(fds[1].as_raw_fd()).unwrap().st_ino, ino2);
}

#[test]
fn partial_frames_are_reassembled() {
    let (a, b) = socket_pair();
    let words = [5u32, (16 << 16) | 2, 1, 2];
    let mut buffer = InputBuffer::default();
    let mut fds = VecDeque::new();
    a.send(&words[..1], &mut Vec::new()).unwrap();
    b.recv(&mut buffer, &mut fds).unwrap();
    assert!(next_message(&mut buffer).unwrap().is_none());
    a.send(&words[1..], &mut Vec::new()).unwrap();
    loop {
        b.recv(&mut buffer, &mut fds).unwrap();
        if let Some(msg) = next_message(&mut buffer).unwrap() {
            assert_eq!(msg, words);
            break;
        }
    }
}

#[test]
fn two_frames_in_one_chunk() {
    let (a, b) = socket_pair();
    let words = [1u32, (8 << 16), 2, (12 << 16) | 1, 9];
    a.send(&words, &mut Vec::new()).unwrap();
    let mut buffer = InputBuffer::default();
    let mut fds = VecDeque::new();
    loop {
        b.recv(&mut buffer, &mut fds).unwrap();
        if let Some(msg) = next_message(&mut buffer).unwrap() {
            assert_eq!(msg, &words[..2]);
            break;
        }
    }
    let second = next_message(&mut buffer).unwrap().unwrap();
    assert_eq!(second, &words[2..]);
    assert!(next_message(&mut buffer).unwrap().is_none());
}

fn framing_error(second_word: u32) -> TransError {
    let (a, b) = socket_pair();
    a.send(&[1, second_word], &mut Vec::new()).unwrap();
    let mut buffer = InputBuffer::default();
    let mut fds = VecDeque::new();
    b.recv(&mut buffer, &mut fds).unwrap();
    next_message(&mut buffer).unwrap_err()
}

#[test]
fn message_too_small() {
    assert!(matches!(
        framing_error(4 << 16),
        TransError::MessageTooSmall(4)
    ));
}

#[test]
fn message_too_large() {
    assert!(matches!(
        framing_error(8192 << 16),
        TransError::MessageTooLarge(8192)
    ));
}

#[test]
fn message_not_aligned() {
    assert!(matches!(
        framing_error(4090 << 16),
        TransError::MessageNotAligned(4090)
    ));
}

#[test]
fn end_of_stream() {
    let (a, b) = socket_pair();
    drop(a);
    let mut buffer = InputBuffer::default();
    let mut fds = VecDeque::new();
    assert_eq!(b.recv(&mut buffer, &mut fds).unwrap(), 0);
}

#[test]
fn shutdown_wakes_reader() {
    let (a, b) = socket_pair();
    b.shutdown();
    let mut buffer = InputBuffer::default();
    let mut fds = VecDeque::new();
    assert_eq!(b.recv(&mut buffer, &mut fds).unwrap(), 0);
    drop(a);
}
