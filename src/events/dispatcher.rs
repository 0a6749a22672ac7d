use std::{collections::HashMap, fmt, hash::Hash, rc::Rc};

/// A typed event emitted by one kind of emitter.
///
/// Each emitter defines a closed enum of payloads; `Kind` is the discriminant listeners
/// subscribe to and `Target` identifies the emitter while the event is in flight.
pub trait Event {
    /// Subscription key.
    type Kind: Copy + Eq + Hash + fmt::Debug;
    /// Emitter identity stamped onto the event during dispatch.
    type Target: Copy + fmt::Debug;

    /// The subscription key of this event.
    fn kind(&self) -> Self::Kind;

    /// Set or clear the in-flight target.
    fn set_target(&mut self, target: Option<Self::Target>);
}

/// A listener receives the emitter's context and the event.
///
/// Returning an error stops delivery to the listeners after it in the same dispatch.
pub type Listener<E, C> = Rc<dyn Fn(&mut C, &E) -> anyhow::Result<()>>;

/// Wrap a closure as a [`Listener`].
pub fn listener<E, C, F>(f: F) -> Listener<E, C>
where
    C: ?Sized,
    F: Fn(&mut C, &E) -> anyhow::Result<()> + 'static,
{
    Rc::new(f)
}

/// Synchronous, single-threaded publish/subscribe registry.
///
/// Listener identity is `Rc` pointer identity: registering the same `Rc` twice for one kind
/// is a no-op, and removal matches by pointer.
pub struct EventDispatcher<E: Event, C: ?Sized = ()> {
    listeners: HashMap<E::Kind, Vec<Listener<E, C>>>,
}

impl<E: Event, C: ?Sized> Default for EventDispatcher<E, C> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }
}

impl<E: Event, C: ?Sized> fmt::Debug for EventDispatcher<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, list) in &self.listeners {
            map.entry(kind, &list.len());
        }
        map.finish()
    }
}

impl<E: Event, C: ?Sized> EventDispatcher<E, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event_listener(&mut self, kind: E::Kind, listener: &Listener<E, C>) {
        let list = self.listeners.entry(kind).or_default();
        if !list.iter().any(|l| Rc::ptr_eq(l, listener)) {
            list.push(Rc::clone(listener));
        }
    }

    pub fn has_event_listener(&self, kind: E::Kind, listener: &Listener<E, C>) -> bool {
        self.listeners
            .get(&kind)
            .is_some_and(|list| list.iter().any(|l| Rc::ptr_eq(l, listener)))
    }

    pub fn remove_event_listener(&mut self, kind: E::Kind, listener: &Listener<E, C>) {
        if let Some(list) = self.listeners.get_mut(&kind)
            && let Some(pos) = list.iter().position(|l| Rc::ptr_eq(l, listener))
        {
            list.remove(pos);
        }
    }

    /// Drop every listener of every kind.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Copy of the listener list for `kind` as it is right now.
    pub fn snapshot(&self, kind: E::Kind) -> Vec<Listener<E, C>> {
        self.listeners.get(&kind).cloned().unwrap_or_default()
    }

    /// Deliver `event` to a snapshot of the current listeners.
    pub fn dispatch_event(
        &self,
        ctx: &mut C,
        event: &mut E,
        target: E::Target,
    ) -> anyhow::Result<()> {
        let listeners = self.snapshot(event.kind());
        deliver(&listeners, ctx, event, target)
    }
}

/// Deliver `event` to an already-taken snapshot.
///
/// Used by emitters that live inside the context they hand to listeners: take the snapshot,
/// release the borrow, then deliver.
pub fn deliver<E: Event, C: ?Sized>(
    listeners: &[Listener<E, C>],
    ctx: &mut C,
    event: &mut E,
    target: E::Target,
) -> anyhow::Result<()> {
    if listeners.is_empty() {
        return Ok(());
    }
    event.set_target(Some(target));
    let mut outcome = Ok(());
    for listener in listeners {
        if let Err(err) = listener(ctx, event) {
            tracing::debug!(kind = ?event.kind(), ?target, "listener failed, aborting dispatch");
            outcome = Err(err);
            break;
        }
    }
    event.set_target(None);
    outcome
}

#[cfg(test)]
#[path = "../../tests/unit/events/dispatcher.rs"]
mod tests;
