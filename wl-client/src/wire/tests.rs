use {
    crate::{
        fixed::Fixed,
        wire::{EventFd, EventReader, MessageFormatter, WireError},
    },
    std::{
        collections::VecDeque,
        os::fd::{AsRawFd, OwnedFd},
    },
};

fn format_msg(f: impl FnOnce(&mut MessageFormatter<'_>)) -> (Vec<u32>, Vec<OwnedFd>) {
    let mut buffer = [0u32; 1024];
    let mut fds = Vec::new();
    let mut fmt = MessageFormatter {
        buffer: &mut buffer,
        words_written: 0,
        fds: &mut fds,
    };
    fmt.words([1, 0]);
    f(&mut fmt);
    let words = fmt.finish();
    (buffer[..words].to_vec(), fds)
}

fn reader<'a>(args: &'a [u32], fds: &'a mut VecDeque<OwnedFd>) -> EventReader<'a> {
    EventReader::new(args, fds)
}

#[test]
fn string_encoding() {
    let (words, _) = format_msg(|fmt| fmt.string("hi"));
    assert_eq!(words.len(), 4);
    assert_eq!(words[1] >> 16, 16);
    assert_eq!(words[2], 3);
    assert_eq!(uapi::as_bytes(&words[3..]), b"hi\0\0");
}

#[test]
fn string_round_trip() {
    for s in ["", "a", "ab", "abc", "abcd", "abcde", "üß"] {
        let (words, _) = format_msg(|fmt| fmt.string(s));
        let mut fds = VecDeque::new();
        let mut reader = reader(&words[2..], &mut fds);
        assert_eq!(reader.string("s").unwrap(), s);
        reader.finish().unwrap();
    }
}

#[test]
fn array_round_trip() {
    let arrays: &[&[u8]] = &[&[], &[1], &[1, 2], &[1, 2, 3], &[1, 2, 3, 4], &[1, 2, 3, 4, 5]];
    for a in arrays {
        let (words, _) = format_msg(|fmt| fmt.array(a));
        let mut fds = VecDeque::new();
        let mut reader = reader(&words[2..], &mut fds);
        assert_eq!(reader.array("a").unwrap(), *a);
        reader.finish().unwrap();
    }
}

#[test]
fn frame_length_integrity() {
    let cases: &[(fn(&mut MessageFormatter<'_>), usize)] = &[
        (|_| (), 8),
        (|fmt| fmt.words([7]), 12),
        (|fmt| fmt.string("abc"), 16),
        (|fmt| fmt.array(&[1, 2, 3, 4, 5]), 20),
    ];
    for (f, expected) in cases {
        let (words, _) = format_msg(f);
        let size = (words[1] >> 16) as usize;
        assert_eq!(size, words.len() * 4);
        assert_eq!(size, *expected);
        assert_eq!(size % 4, 0);
    }
}

#[test]
fn scalar_round_trip() {
    let (words, _) = format_msg(|fmt| {
        fmt.words([u32::MAX, (-7i32) as u32, Fixed::from_f64_lossy(1.5).to_wire() as u32])
    });
    let mut fds = VecDeque::new();
    let mut reader = reader(&words[2..], &mut fds);
    assert_eq!(reader.uint("u").unwrap(), u32::MAX);
    assert_eq!(reader.int("i").unwrap(), -7);
    assert_eq!(reader.fixed("f").unwrap(), Fixed::from_f64_lossy(1.5));
    reader.finish().unwrap();
}

#[test]
fn truncated_string() {
    // Claims 9 bytes but only one payload word follows.
    let words = [9u32, 0x6261_6261];
    let mut fds = VecDeque::new();
    let mut reader = reader(&words, &mut fds);
    assert!(matches!(
        reader.string("s"),
        Err(WireError::MissingArgument("s"))
    ));
}

#[test]
fn non_utf8_string() {
    let words = [5u32, 0xffff_ffff, 0];
    let mut fds = VecDeque::new();
    let mut reader = reader(&words, &mut fds);
    assert!(matches!(reader.string("s"), Err(WireError::NonUtf8("s"))));
}

#[test]
fn null_string() {
    let words = [0u32];
    let mut fds = VecDeque::new();
    let mut r = reader(&words, &mut fds);
    assert!(matches!(r.string("s"), Err(WireError::NullString("s"))));
    let mut r = reader(&words, &mut fds);
    assert_eq!(r.nullable_string("s").unwrap(), None);
}

#[test]
fn trailing_bytes() {
    let words = [1u32, 2];
    let mut fds = VecDeque::new();
    let mut reader = reader(&words, &mut fds);
    reader.uint("a").unwrap();
    assert!(matches!(reader.finish(), Err(WireError::TrailingBytes)));
}

#[test]
fn missing_argument() {
    let mut fds = VecDeque::new();
    let mut reader = reader(&[], &mut fds);
    assert!(matches!(
        reader.uint("a"),
        Err(WireError::MissingArgument("a"))
    ));
}

#[test]
fn missing_fd() {
    let mut fds = VecDeque::new();
    let mut reader = reader(&[], &mut fds);
    assert!(matches!(reader.fd("fd"), Err(WireError::MissingFd("fd"))));
}

#[test]
fn fd_order() {
    let fd1: OwnedFd = uapi::memfd_create("", 0).unwrap().into();
    let fd2: OwnedFd = uapi::memfd_create("", 0).unwrap().into();
    let ino1 = uapi::fstat(fd1.as_raw_fd()).unwrap().st_ino;
    let ino2 = uapi::fstat(fd2.as_raw_fd()).unwrap().st_ino;
    assert_ne!(ino1, ino2);
    let mut fds = VecDeque::from([fd1, fd2]);
    let mut reader = reader(&[], &mut fds);
    let got1 = reader.fd("f1").unwrap();
    let got2 = reader.fd("f2").unwrap();
    assert_eq!(uapi::fstat(got1.as_raw_fd()).unwrap().st_ino, ino1);
    assert_eq!(uapi::fstat(got2.as_raw_fd()).unwrap().st_ino, ino2);
}

#[test]
fn event_fd_claimed_once() {
    let fd: OwnedFd = uapi::memfd_create("", 0).unwrap().into();
    let event_fd = EventFd::new(fd);
    assert!(event_fd.take().is_some());
    assert!(event_fd.take().is_none());
}
