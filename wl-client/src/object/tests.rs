use {
    crate::{
        object::{
            ConcreteProxy, Listener, ListenerSet, MIN_SERVER_ID, ObjectTable, Proxy,
            ProxyArcUtils,
        },
        protocols::wayland::{
            wl_callback::WlCallback, wl_keyboard::WlKeyboard, wl_surface::WlSurface,
        },
        test_framework::test_conn,
    },
    parking_lot::Mutex,
    std::sync::Arc,
};

#[test]
fn listeners_run_in_registration_order() {
    let set = ListenerSet::<u32>::default();
    let log = Arc::new(Mutex::new(Vec::new()));
    let l1 = {
        let log = log.clone();
        Arc::new(move |_: &u32| log.lock().push(1))
    };
    let l2 = {
        let log = log.clone();
        Arc::new(move |_: &u32| log.lock().push(2))
    };
    set.add(l1.clone());
    set.add(l2);
    set.add(l1);
    set.emit(&0);
    assert_eq!(*log.lock(), [1, 2, 1]);
}

#[test]
fn remove_is_by_identity() {
    let set = ListenerSet::<u32>::default();
    let count = Arc::new(Mutex::new(0));
    let listener = {
        let count = count.clone();
        Arc::new(move |_: &u32| *count.lock() += 1)
    };
    let listener: Arc<dyn Listener<u32>> = listener;
    set.add(listener.clone());
    set.add(listener.clone());
    set.remove(&listener);
    assert_eq!(set.len(), 1);
    set.emit(&0);
    assert_eq!(*count.lock(), 1);
}

#[test]
fn remove_unregistered_is_noop() {
    let set = ListenerSet::<u32>::default();
    let stranger: Arc<dyn Listener<u32>> = Arc::new(|_: &u32| ());
    set.add(Arc::new(|_: &u32| ()));
    set.remove(&stranger);
    assert_eq!(set.len(), 1);
}

#[test]
fn bijection() {
    let (conn, _server) = test_conn();
    let table = ObjectTable::default();
    for _ in 0..5 {
        let proxy = WlCallback::new(&conn) as Arc<dyn Proxy>;
        let id = table.register(&proxy).unwrap();
        assert_eq!(proxy.core().id(), id);
        let found = table.lookup(id).unwrap();
        assert_eq!(found.core().id(), id);
        assert!(Arc::ptr_eq(&found, &proxy));
    }
}

#[test]
fn allocation_is_monotonic() {
    let (conn, _server) = test_conn();
    let table = ObjectTable::default();
    for expected in 1..=4 {
        let proxy = WlCallback::new(&conn) as Arc<dyn Proxy>;
        assert_eq!(table.register(&proxy).unwrap(), expected);
    }
}

#[test]
fn unregistered_id_is_not_reused_before_reclaim() {
    let (conn, _server) = test_conn();
    let table = ObjectTable::default();
    for _ in 0..3 {
        table
            .register(&(WlCallback::new(&conn) as Arc<dyn Proxy>))
            .unwrap();
    }
    table.unregister(2);
    assert!(table.lookup(2).is_none());
    let proxy = WlCallback::new(&conn) as Arc<dyn Proxy>;
    assert_eq!(table.register(&proxy).unwrap(), 4);
    table.reclaim(2);
    let proxy = WlCallback::new(&conn) as Arc<dyn Proxy>;
    assert_eq!(table.register(&proxy).unwrap(), 2);
}

#[test]
fn server_assigned_ids() {
    let (conn, _server) = test_conn();
    let table = ObjectTable::default();
    let proxy = WlCallback::new(&conn) as Arc<dyn Proxy>;
    proxy.core().set_id(MIN_SERVER_ID + 7);
    assert_eq!(table.register(&proxy).unwrap(), MIN_SERVER_ID + 7);
    assert!(table.lookup(MIN_SERVER_ID + 7).is_some());
    let dup = WlCallback::new(&conn) as Arc<dyn Proxy>;
    dup.core().set_id(MIN_SERVER_ID + 7);
    assert!(table.register(&dup).is_err());
    // Server ids never come from the client allocator.
    table.unregister(MIN_SERVER_ID + 7);
    table.reclaim(MIN_SERVER_ID + 7);
    let proxy = WlCallback::new(&conn) as Arc<dyn Proxy>;
    assert_eq!(table.register(&proxy).unwrap(), 1);
}

#[test]
fn downcast() {
    let (conn, _server) = test_conn();
    let surface = WlSurface::new(&conn);
    let proxy = surface.clone() as Arc<dyn Proxy>;
    let back = proxy.try_downcast::<WlSurface>().unwrap();
    assert!(Arc::ptr_eq(&back, &surface));
    assert!(proxy.try_downcast::<WlKeyboard>().is_none());
}

#[test]
#[should_panic(expected = "wl_surface")]
fn wrong_downcast() {
    let (conn, _server) = test_conn();
    let proxy = WlSurface::new(&conn) as Arc<dyn Proxy>;
    proxy.downcast::<WlKeyboard>();
}
