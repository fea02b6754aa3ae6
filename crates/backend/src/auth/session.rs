use tokio::sync::watch;
use tracing::debug;

use crate::models::user::Identity;

/// Owns the current identity-or-none and notifies subscribers whenever it changes.
pub struct SessionStore {
    tx: watch::Sender<Option<Identity>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    /// Replaces the identity. Every subscriber observes the change, even if the value is equal.
    pub fn set(&self, identity: Option<Identity>) {
        debug!(
            user = ?identity.as_ref().map(|i| &i.alias),
            subscribers = self.tx.receiver_count(),
            "session changed"
        );
        self.tx.send_replace(identity);
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: Some(self.tx.subscribe()),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A live session-change feed. Delivery stops on [`SessionSubscription::unsubscribe`] or drop.
///
/// Changes published between two reads coalesce into the latest value.
pub struct SessionSubscription {
    rx: Option<watch::Receiver<Option<Identity>>>,
}

impl SessionSubscription {
    /// Waits for the next change. Returns `None` once unsubscribed or when the store is gone.
    pub async fn changed(&mut self) -> Option<Option<Identity>> {
        let rx = self.rx.as_mut()?;
        rx.changed().await.ok()?;
        Some(rx.borrow_and_update().clone())
    }

    /// Returns the pending change, if any, without waiting.
    pub fn try_next(&mut self) -> Option<Option<Identity>> {
        let rx = self.rx.as_mut()?;
        match rx.has_changed() {
            Ok(true) => Some(rx.borrow_and_update().clone()),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.rx.is_some()
    }

    pub fn unsubscribe(&mut self) {
        self.rx = None;
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::user::UserRole;

    fn identity(alias: &str) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            alias: alias.to_string(),
            role: UserRole::Regular,
        }
    }

    #[test]
    fn subscription_sees_changes_after_subscribing_only() {
        let store = SessionStore::new();
        store.set(Some(identity("early")));
        let mut subscription = store.subscribe();
        assert_eq!(subscription.try_next(), None);

        let late = identity("late");
        store.set(Some(late.clone()));
        assert_eq!(subscription.try_next(), Some(Some(late)));
        assert_eq!(subscription.try_next(), None);

        store.set(None);
        assert_eq!(subscription.try_next(), Some(None));
    }

    #[test]
    fn unsubscribe_stops_delivery_and_releases_receiver() {
        let store = SessionStore::new();
        let mut subscription = store.subscribe();
        assert_eq!(store.subscriber_count(), 1);

        subscription.unsubscribe();
        assert_eq!(store.subscriber_count(), 0);
        store.set(Some(identity("ignored")));
        assert_eq!(subscription.try_next(), None);
        assert!(!subscription.is_active());
    }

    #[tokio::test]
    async fn changed_waits_for_the_next_value() {
        let store = std::sync::Arc::new(SessionStore::new());
        let mut subscription = store.subscribe();
        let publisher = store.clone();
        let who = identity("async");
        let expected = who.clone();
        tokio::spawn(async move { publisher.set(Some(who)) });
        assert_eq!(subscription.changed().await, Some(Some(expected)));
    }
}
