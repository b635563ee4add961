//! Cart sessions
//!
//! Every customer session owns its cart. Requests of the same session are
//! serialized on the cart's mutex; different sessions never share a cart.
//!
//! Only carts holding items are kept: an emptied cart is dropped once no
//! request uses it, and carts left idle past the timeout are swept whenever
//! a new session starts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::domain::Cart;

/// Idle time after which a cart is swept
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Characters of a session id kept in logs
const LOGGED_SESSION_CHARS: usize = 8;

/// Leading part of a session id, enough to correlate log lines but not to
/// take over the cart
pub fn short_session_id(id: &str) -> &str {
    id.get(..LOGGED_SESSION_CHARS).unwrap_or(id)
}

/// Shared handle to one session's cart
pub type SessionCart = Arc<tokio::sync::Mutex<Cart>>;

#[derive(Debug)]
struct Entry {
    cart: SessionCart,
    last_seen: Instant,
}

impl Entry {
    /// No request holds a handle besides the registry
    fn is_unused(&self) -> bool {
        Arc::strong_count(&self.cart) == 1
    }
}

/// Registry of carts by session id
#[derive(Debug, Clone)]
pub struct CartSessions {
    carts: Arc<Mutex<HashMap<Uuid, Entry>>>,
    idle_timeout: Duration,
}

impl Default for CartSessions {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl CartSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            carts: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<Uuid, Entry>> {
        self.carts.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cart of the session, created empty on first use
    pub fn cart(&self, session_id: Uuid) -> SessionCart {
        let now = Instant::now();
        let mut carts = self.registry();

        if let Some(entry) = carts.get_mut(&session_id) {
            entry.last_seen = now;
            return Arc::clone(&entry.cart);
        }

        let idle_timeout = self.idle_timeout;
        let before = carts.len();
        carts.retain(|_, entry| !entry.is_unused() || now.duration_since(entry.last_seen) < idle_timeout);
        if carts.len() < before {
            tracing::debug!(swept = before - carts.len(), "Idle cart sessions dropped");
        }

        let cart = SessionCart::default();
        carts.insert(
            session_id,
            Entry {
                cart: Arc::clone(&cart),
                last_seen: now,
            },
        );
        cart
    }

    /// Cart of the session if it has one; never creates a cart
    pub fn get(&self, session_id: Uuid) -> Option<SessionCart> {
        let mut carts = self.registry();
        carts.get_mut(&session_id).map(|entry| {
            entry.last_seen = Instant::now();
            Arc::clone(&entry.cart)
        })
    }

    /// Drop the session's cart if it is empty and no request holds it.
    ///
    /// Callers must release their own handle first.
    pub fn release_if_empty(&self, session_id: Uuid) {
        let mut carts = self.registry();
        let droppable = carts.get(&session_id).is_some_and(|entry| {
            entry.is_unused()
                && entry
                    .cart
                    .try_lock()
                    .map(|cart| cart.is_empty())
                    .unwrap_or(false)
        });
        if droppable {
            carts.remove(&session_id);
        }
    }

    /// Number of sessions holding a cart
    pub fn len(&self) -> usize {
        self.registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
