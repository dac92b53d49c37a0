use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use codecollab_core::protocol::{ClientIdentity, SessionId};

/// Session registry: `session_id -> identity`.
///
/// Ids are random v4 UUIDs; a vacant-entry insert guarantees no two live
/// sessions ever share one.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, ClientIdentity>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Store `identity` under a freshly generated session id.
    pub fn register(&self, identity: ClientIdentity) -> SessionId {
        loop {
            let id = Uuid::new_v4().to_string();
            if let Entry::Vacant(slot) = self.sessions.entry(id.clone()) {
                slot.insert(identity);
                return id;
            }
        }
    }

    pub fn lookup(&self, session_id: &str) -> Option<ClientIdentity> {
        self.sessions.get(session_id).map(|r| r.value().clone())
    }

    /// Remove a session. Unknown ids are a no-op.
    ///
    /// Returns the identity only to the caller that actually removed it, so
    /// concurrent removals of one id observe it at most once.
    pub fn remove(&self, session_id: &str) -> Option<ClientIdentity> {
        self.sessions.remove(session_id).map(|(_, identity)| identity)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn clear(&self) {
        self.sessions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> ClientIdentity {
        ClientIdentity::from_parts(Some("ada".into()), None, None)
    }

    #[test]
    fn register_then_lookup() {
        let reg = SessionRegistry::new();
        let id = reg.register(ada());
        assert_eq!(reg.lookup(&id).map(|i| i.username), Some("ada".to_string()));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn ids_are_unique() {
        let reg = SessionRegistry::new();
        let a = reg.register(ada());
        let b = reg.register(ada());
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn remove_is_idempotent() {
        let reg = SessionRegistry::new();
        let id = reg.register(ada());
        assert!(reg.remove(&id).is_some());
        assert!(reg.remove(&id).is_none());
        assert!(reg.remove("never-registered").is_none());
        assert!(reg.is_empty());
    }
}
