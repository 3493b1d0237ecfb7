use {
    crate::{
        object::{DISPLAY_ID, Proxy, ProxyArcUtils},
        protocols::wayland::{
            wl_callback::DoneEvent,
            wl_compositor::WlCompositor,
            wl_data_device::DataOfferEvent,
            wl_data_device_manager::WlDataDeviceManager,
            wl_data_offer::WlDataOffer,
            wl_display::{ErrorEvent, WlDisplay},
            wl_keyboard::KeymapEvent,
            wl_registry::GlobalEvent,
            wl_seat::WlSeat,
            wl_shm::WlShm,
        },
        test_framework::{string_words, test_conn},
        wire::Arg,
    },
    parking_lot::Mutex,
    std::{
        os::fd::{AsFd, AsRawFd, OwnedFd},
        sync::Arc,
    },
};

#[test]
fn bootstrap() {
    let (conn, mut server) = test_conn();
    assert_eq!(conn.objects.len(), 1);
    let display = conn
        .objects
        .lookup(DISPLAY_ID)
        .unwrap()
        .try_downcast::<WlDisplay>()
        .unwrap();
    assert!(Arc::ptr_eq(&display, conn.display()));
    let callback = display.sync().unwrap();
    assert_eq!(callback.core().id(), 2);
    let frame = server.recv_frame();
    assert_eq!(frame.id, 1);
    assert_eq!(frame.opcode, 0);
    assert_eq!(frame.args, [2]);
}

#[test]
fn registry_enumeration() {
    let (conn, server) = test_conn();
    let registry = conn.display().get_registry().unwrap();
    assert_eq!(registry.core().id(), 2);
    let log = Arc::new(Mutex::new(Vec::new()));
    for marker in [1, 2] {
        let log = log.clone();
        registry.add_global_listener(Arc::new(move |ev: &GlobalEvent| {
            log.lock()
                .push((marker, ev.name, ev.interface.clone(), ev.version));
        }));
    }
    let mut args = vec![1u32];
    args.extend(string_words("wl_compositor"));
    args.push(4);
    server.send_event(2, 0, &args);
    assert!(conn.read_and_dispatch().unwrap());
    assert_eq!(
        *log.lock(),
        [
            (1, 1, "wl_compositor".to_string(), 4),
            (2, 1, "wl_compositor".to_string(), 4),
        ],
    );
}

#[test]
fn new_id_in_event() {
    let (conn, server) = test_conn();
    let registry = conn.display().get_registry().unwrap();
    let manager = registry.bind::<WlDataDeviceManager>(1, 3).unwrap();
    let seat = registry.bind::<WlSeat>(2, 5).unwrap();
    let device = manager.get_data_device(&seat).unwrap();
    assert_eq!(device.core().id(), 5);
    let got = Arc::new(Mutex::new(None));
    {
        let got = got.clone();
        device.add_data_offer_listener(Arc::new(move |ev: &DataOfferEvent| {
            *got.lock() = Some(ev.id.clone());
        }));
    }
    server.send_event(5, 0, &[0xff00_0001]);
    conn.read_and_dispatch().unwrap();
    let offer = conn
        .objects
        .lookup(0xff00_0001)
        .unwrap()
        .try_downcast::<WlDataOffer>()
        .unwrap();
    assert_eq!(offer.core().id(), 0xff00_0001);
    assert!(Arc::ptr_eq(&offer, got.lock().as_ref().unwrap()));
}

#[test]
fn id_reuse_after_delete_id() {
    let (conn, server) = test_conn();
    let registry = conn.display().get_registry().unwrap();
    let compositor = registry.bind::<WlCompositor>(1, 4).unwrap();
    let s1 = compositor.create_surface().unwrap();
    let s2 = compositor.create_surface().unwrap();
    let s3 = compositor.create_surface().unwrap();
    assert_eq!(s1.core().id(), 4);
    assert_eq!(s2.core().id(), 5);
    assert_eq!(s3.core().id(), 6);
    s2.destroy().unwrap();
    server.send_event(1, 1, &[5]);
    conn.read_and_dispatch().unwrap();
    assert!(conn.objects.lookup(5).is_none());
    let s4 = compositor.create_surface().unwrap();
    assert_eq!(s4.core().id(), 5);
}

#[test]
fn unknown_sender_tears_down() {
    let (conn, server) = test_conn();
    server.send_event(99, 0, &[]);
    let err = conn.read_and_dispatch().unwrap_err();
    assert!(!err.is_defunct());
    assert!(conn.is_defunct());
    assert!(conn.display().sync().unwrap_err().is_defunct());
}

#[test]
fn unknown_opcode_tears_down() {
    let (conn, server) = test_conn();
    server.send_event(1, 7, &[]);
    conn.read_and_dispatch().unwrap_err();
    assert!(conn.is_defunct());
}

#[test]
fn sync_barrier() {
    let (conn, server) = test_conn();
    let registry = conn.display().get_registry().unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    {
        let log = log.clone();
        registry.add_global_listener(Arc::new(move |ev: &GlobalEvent| {
            log.lock().push(format!("global {}", ev.name));
        }));
    }
    let callback = conn.display().sync().unwrap();
    {
        let log = log.clone();
        callback.add_done_listener(Arc::new(move |_: &DoneEvent| {
            log.lock().push("done".to_string());
        }));
    }
    let mut global = vec![7u32];
    global.extend(string_words("wl_shm"));
    global.push(1);
    server.send_event(2, 0, &global);
    global[0] = 8;
    server.send_event(2, 0, &global);
    server.send_event(callback.core().id(), 0, &[1234]);
    while log.lock().len() < 3 {
        assert!(conn.read_and_dispatch().unwrap());
    }
    assert_eq!(*log.lock(), ["global 7", "global 8", "done"]);
}

#[test]
fn requests_preserve_order() {
    let (conn, mut server) = test_conn();
    let c1 = conn.display().sync().unwrap();
    let c2 = conn.display().sync().unwrap();
    let f1 = server.recv_frame();
    let f2 = server.recv_frame();
    assert_eq!((f1.id, f1.opcode, f1.args), (1, 0, vec![c1.core().id()]));
    assert_eq!((f2.id, f2.opcode, f2.args), (1, 0, vec![c2.core().id()]));
}

#[test]
fn display_error_is_terminal() {
    let (conn, server) = test_conn();
    let seen = Arc::new(Mutex::new(None));
    {
        let seen = seen.clone();
        conn.display()
            .add_error_listener(Arc::new(move |ev: &ErrorEvent| {
                *seen.lock() = Some((
                    ev.object.clone(),
                    ev.object_id,
                    ev.code,
                    ev.message.clone(),
                ));
            }));
    }
    let mut args = vec![1u32, 2];
    args.extend(string_words("oops"));
    server.send_event(1, 0, &args);
    let err = conn.read_and_dispatch().unwrap_err();
    assert_eq!(err.protocol_error(), Some((1, 2, "oops")));
    assert!(conn.is_defunct());
    let seen = seen.lock().take().unwrap();
    assert_eq!((seen.1, seen.2, seen.3.as_str()), (1, 2, "oops"));
    let object = seen.0.unwrap().try_downcast::<WlDisplay>().unwrap();
    assert_eq!(object.core().id(), DISPLAY_ID);
}

#[test]
fn event_fd_reaches_listener() {
    let (conn, server) = test_conn();
    let registry = conn.display().get_registry().unwrap();
    let seat = registry.bind::<WlSeat>(1, 5).unwrap();
    let keyboard = seat.get_keyboard().unwrap();
    let keymap: OwnedFd = uapi::memfd_create("", 0).unwrap().into();
    let ino = uapi::fstat(keymap.as_raw_fd()).unwrap().st_ino;
    let got = Arc::new(Mutex::new(None));
    {
        let got = got.clone();
        keyboard.add_keymap_listener(Arc::new(move |ev: &KeymapEvent| {
            *got.lock() = Some((ev.format, ev.fd.take().unwrap(), ev.size));
        }));
    }
    server.send_event_with_fds(keyboard.core().id(), 0, &[1, 817], &[keymap.as_raw_fd()]);
    conn.read_and_dispatch().unwrap();
    let (format, fd, size) = got.lock().take().unwrap();
    assert_eq!(format, 1);
    assert_eq!(size, 817);
    assert_eq!(uapi::fstat(fd.as_raw_fd()).unwrap().st_ino, ino);
}

#[test]
fn fd_passing() {
    let (conn, mut server) = test_conn();
    let registry = conn.display().get_registry().unwrap();
    let shm = registry.bind::<WlShm>(3, 1).unwrap();
    let pool_fd: OwnedFd = uapi::memfd_create("", 0).unwrap().into();
    let ino = uapi::fstat(pool_fd.as_raw_fd()).unwrap().st_ino;
    let pool = shm.create_pool(pool_fd.as_fd(), 4096).unwrap();
    server.recv_frame();
    server.recv_frame();
    let frame = server.recv_frame();
    assert_eq!(frame.id, shm.core().id());
    assert_eq!(frame.opcode, 0);
    // The byte stream carries only the new id and the size.
    assert_eq!(frame.args, [pool.core().id(), 4096]);
    assert_eq!(server.fds.len(), 1);
    let received = server.fds.pop_front().unwrap();
    assert_eq!(uapi::fstat(received.as_raw_fd()).unwrap().st_ino, ino);
    // The caller keeps its copy.
    assert!(uapi::fstat(pool_fd.as_raw_fd()).is_ok());
}

#[test]
fn misuse_keeps_connection_usable() {
    let (conn, _server) = test_conn();
    let display = conn.display().clone();
    let err = conn
        .send_request(&*display, 0, &[Arg::Uint(5)])
        .unwrap_err();
    assert!(!err.is_defunct());
    assert!(!conn.is_defunct());
    display.sync().unwrap();
}

#[test]
fn listener_may_send_requests() {
    let (conn, server) = test_conn();
    let registry = conn.display().get_registry().unwrap();
    let display = conn.display().clone();
    let sent = Arc::new(Mutex::new(false));
    {
        let sent = sent.clone();
        registry.add_global_listener(Arc::new(move |_: &GlobalEvent| {
            display.sync().unwrap();
            *sent.lock() = true;
        }));
    }
    let mut args = vec![1u32];
    args.extend(string_words("wl_output"));
    args.push(3);
    server.send_event(2, 0, &args);
    conn.read_and_dispatch().unwrap();
    assert!(*sent.lock());
}

#[test]
fn hangup_ends_run() {
    let (conn, server) = test_conn();
    server.hang_up();
    conn.run().unwrap();
    assert!(conn.is_defunct());
}

#[test]
fn close_fails_later_calls() {
    let (conn, _server) = test_conn();
    conn.close();
    conn.close();
    assert!(conn.display().sync().unwrap_err().is_defunct());
    assert!(conn.read_and_dispatch().unwrap_err().is_defunct());
}
