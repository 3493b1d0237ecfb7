//! Wayland objects.
//!
//! Every protocol object is represented by a proxy that carries its assigned
//! object id and a back-reference to the [`Connection`]. The connection owns
//! all live proxies through its object table; proxies reach the connection
//! through a weak reference.

use {
    crate::{
        conn::{Connection, ConnectionError},
        wire::{EventReader, Interface, WireError},
    },
    parking_lot::{Mutex, RwLock},
    std::{
        any::Any,
        collections::{HashMap, hash_map::Entry},
        fmt::Debug,
        sync::{
            Arc, Weak,
            atomic::{AtomicU32, Ordering::Relaxed},
        },
    },
    thiserror::Error,
};

#[cfg(test)]
mod tests;

/// The object id permanently bound to the wl_display proxy.
pub const DISPLAY_ID: u32 = 1;

/// The largest object id that the client side may allocate.
pub const MAX_CLIENT_ID: u32 = 0xfeffffff;

/// The smallest object id. Ids below this value are allocated by the client,
/// ids at or above it by the server.
pub const MIN_SERVER_ID: u32 = 0xff000000;

/// A wayland object.
///
/// This trait is implemented by every generated interface type. The opcode
/// passed to [`dispatch`](Self::dispatch) is an index into
/// [`Interface::events`]; the reader is positioned at the first argument
/// word of the frame.
pub trait Proxy: Any + Debug + Send + Sync {
    /// Returns the [`ProxyCore`] of this object.
    fn core(&self) -> &ProxyCore;

    /// Returns the interface description of this object.
    fn interface(&self) -> &'static Interface;

    /// Decodes one event and broadcasts it to the listeners registered for
    /// its opcode.
    fn dispatch(
        &self,
        conn: &Arc<Connection>,
        opcode: u16,
        reader: &mut EventReader<'_>,
    ) -> Result<(), WireError>;
}

/// A concrete (not `dyn`) object.
pub trait ConcreteProxy: Proxy + Sized {
    /// The interface of the object.
    const INTERFACE: &'static Interface;

    /// Creates a fresh, unregistered proxy.
    ///
    /// The proxy receives its id when it is registered with the object table,
    /// either as a new-id request argument or via
    /// [`Connection::create_remote`].
    fn new(conn: &Arc<Connection>) -> Arc<Self>;
}

/// Core data shared by all proxies.
pub struct ProxyCore {
    id: AtomicU32,
    conn: Weak<Connection>,
}

impl ProxyCore {
    pub fn new(conn: &Arc<Connection>) -> Self {
        Self {
            id: AtomicU32::new(0),
            conn: Arc::downgrade(conn),
        }
    }

    /// Returns the object id of this proxy.
    ///
    /// The id is 0 until the proxy has been registered with the object table.
    pub fn id(&self) -> u32 {
        self.id.load(Relaxed)
    }

    pub(crate) fn set_id(&self, id: u32) {
        self.id.store(id, Relaxed);
    }

    /// Returns the connection this proxy belongs to.
    pub fn conn(&self) -> Result<Arc<Connection>, ConnectionError> {
        self.conn.upgrade().ok_or_else(ConnectionError::defunct)
    }
}

/// A listener for events of type `E`.
///
/// This trait is implemented for all `Fn(&E)` closures.
pub trait Listener<E>: Send + Sync + 'static {
    fn handle(&self, event: &E);
}

impl<E, F> Listener<E> for F
where
    F: Fn(&E) + Send + Sync + 'static,
{
    fn handle(&self, event: &E) {
        self(event)
    }
}

/// The listeners registered for one event opcode.
///
/// The dispatch path iterates under a shared guard; registration takes the
/// exclusive guard. The same listener may be added multiple times and is then
/// invoked that many times. Removal is by `Arc` identity and removes the
/// first occurrence; removing a listener that is not registered is a no-op.
pub struct ListenerSet<E> {
    listeners: RwLock<Vec<Arc<dyn Listener<E>>>>,
}

impl<E> Default for ListenerSet<E> {
    fn default() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }
}

impl<E: 'static> ListenerSet<E> {
    pub fn add(&self, listener: Arc<dyn Listener<E>>) {
        self.listeners.write().push(listener);
    }

    pub fn remove(&self, listener: &Arc<dyn Listener<E>>) {
        let mut listeners = self.listeners.write();
        if let Some(pos) = listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
            listeners.remove(pos);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Invokes all listeners in registration order.
    ///
    /// Listeners run on the dispatch thread. They may send requests but must
    /// not register or remove listeners of this set.
    pub fn emit(&self, event: &E) {
        for listener in self.listeners.read().iter() {
            listener.handle(event);
        }
    }
}

/// Utilities for `Arc<dyn Proxy>`.
pub trait ProxyArcUtils {
    /// Tries to downcast the proxy to a [`ConcreteProxy`].
    fn try_downcast<T>(&self) -> Option<Arc<T>>
    where
        T: ConcreteProxy;

    /// Downcasts the proxy to a [`ConcreteProxy`].
    ///
    /// This function panics if the proxy has a different interface.
    fn downcast<T>(&self) -> Arc<T>
    where
        T: ConcreteProxy;
}

impl ProxyArcUtils for Arc<dyn Proxy> {
    fn try_downcast<T>(&self) -> Option<Arc<T>>
    where
        T: ConcreteProxy,
    {
        (self.clone() as Arc<dyn Any + Send + Sync>).downcast().ok()
    }

    fn downcast<T>(&self) -> Arc<T>
    where
        T: ConcreteProxy,
    {
        let Some(t) = self.try_downcast() else {
            panic!(
                "Tried to downcast {} to {}",
                self.interface().name,
                T::INTERFACE.name,
            );
        };
        t
    }
}

/// An error emitted while assigning an object id.
#[derive(Debug, Error)]
pub enum IdError {
    #[error("the id {0} is already in use")]
    InUse(u32),
    #[error("there are no client ids available")]
    Exhausted,
}

/// The bijective mapping between live proxies and object ids.
pub(crate) struct ObjectTable {
    table: Mutex<Table>,
}

struct Table {
    map: HashMap<u32, Arc<dyn Proxy>>,
    next: u32,
    free: Vec<u32>,
}

impl Default for ObjectTable {
    fn default() -> Self {
        Self {
            table: Mutex::new(Table {
                map: HashMap::new(),
                next: DISPLAY_ID,
                free: Vec::new(),
            }),
        }
    }
}

impl ObjectTable {
    /// Inserts a proxy into the table.
    ///
    /// If the proxy already carries an id because the server assigned it, the
    /// proxy is inserted at that id. Otherwise a client id is allocated,
    /// preferring ids reclaimed via delete_id over the monotonic counter.
    pub(crate) fn register(&self, proxy: &Arc<dyn Proxy>) -> Result<u32, IdError> {
        let table = &mut *self.table.lock();
        let carried = proxy.core().id();
        let id = if carried != 0 {
            carried
        } else if let Some(id) = table.free.pop() {
            id
        } else {
            if table.next > MAX_CLIENT_ID {
                return Err(IdError::Exhausted);
            }
            let id = table.next;
            table.next += 1;
            id
        };
        let Entry::Vacant(entry) = table.map.entry(id) else {
            return Err(IdError::InUse(id));
        };
        entry.insert(proxy.clone());
        proxy.core().set_id(id);
        Ok(id)
    }

    pub(crate) fn lookup(&self, id: u32) -> Option<Arc<dyn Proxy>> {
        self.table.lock().map.get(&id).cloned()
    }

    /// Removes a proxy from the table.
    ///
    /// Client-range ids are not eligible for reuse until the server
    /// acknowledges them via delete_id; server-range removal has no effect on
    /// the allocator.
    pub(crate) fn unregister(&self, id: u32) -> Option<Arc<dyn Proxy>> {
        self.table.lock().map.remove(&id)
    }

    /// Makes a client id available for reuse. This is the delete_id path.
    pub(crate) fn reclaim(&self, id: u32) {
        if id >= MIN_SERVER_ID {
            return;
        }
        self.table.lock().free.push(id);
    }

    pub(crate) fn len(&self) -> usize {
        self.table.lock().map.len()
    }

    pub(crate) fn clear(&self) {
        let table = &mut *self.table.lock();
        table.map.clear();
        table.free.clear();
    }
}
