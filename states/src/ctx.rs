use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

use flume::{Receiver, Sender};
use log::warn;

use crate::updater::Update;
use crate::{State, StateError, Updater};

type Listener = Box<dyn FnMut(&'static str)>;

/// Handle returned by [`StateCtx::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Owner of every registered state.
///
/// All reads and writes happen on the thread that owns the context. Other
/// threads and tasks go through an [`Updater`].
pub struct StateCtx {
    storage: BTreeMap<TypeId, (&'static str, Box<dyn Any>)>,

    send: Sender<Update>,
    recv: Receiver<Update>,

    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for StateCtx {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.storage.values().map(|(name, _)| *name).collect();
        f.debug_struct("StateCtx")
            .field("states", &names)
            .field("pending", &self.recv.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();

        Self {
            storage: BTreeMap::new(),
            send,
            recv,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Registers `state`, replacing any previous value of the same type.
    pub fn add_state<T: State>(&mut self, state: T) {
        let name = state.name();
        self.storage
            .insert(TypeId::of::<T>(), (name, Box::new(state)));
    }

    pub fn contains<T: State>(&self) -> bool {
        self.storage.contains_key(&TypeId::of::<T>())
    }

    pub fn try_state<T: State>(&self) -> Result<&T, StateError> {
        self.storage
            .get(&TypeId::of::<T>())
            .and_then(|(_, boxed)| boxed.downcast_ref::<T>())
            .ok_or_else(|| {
                StateError::state_not_found(TypeId::of::<T>(), type_name::<T>(), "try_state")
            })
    }

    /// Borrows a registered state.
    ///
    /// # Panics
    /// Panics if `T` was never registered with [`StateCtx::add_state`].
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Mutates a registered state and notifies listeners.
    pub fn try_update<T: State, R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Result<R, StateError> {
        let (name, boxed) = self.storage.get_mut(&TypeId::of::<T>()).ok_or_else(|| {
            StateError::state_not_found(TypeId::of::<T>(), type_name::<T>(), "try_update")
        })?;
        let name = *name;
        let state = boxed.downcast_mut::<T>().ok_or_else(|| {
            StateError::state_not_found(TypeId::of::<T>(), type_name::<T>(), "try_update downcast")
        })?;

        let result = f(state);
        self.notify(name);
        Ok(result)
    }

    /// Mutates a registered state and notifies listeners.
    ///
    /// # Panics
    /// Panics if `T` was never registered with [`StateCtx::add_state`].
    pub fn update<T: State, R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        self.try_update(f).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Registers a change listener. It receives the name of the state that changed.
    pub fn subscribe(&mut self, listener: impl FnMut(&'static str) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn updater(&self) -> Updater {
        Updater::new(self.send.clone())
    }

    /// Applies every update posted through an [`Updater`] since the last call.
    ///
    /// Returns the number of updates applied.
    pub fn sync(&mut self) -> usize {
        let mut applied = 0;

        while let Ok(update) = self.recv.try_recv() {
            if self.apply(update) {
                applied += 1;
            }
        }

        applied
    }

    /// Waits until an update is posted, then applies everything queued.
    ///
    /// The context keeps its own sender alive, so this only returns once
    /// something has been posted.
    pub async fn wait_sync(&mut self) -> usize {
        let Ok(update) = self.recv.recv_async().await else {
            return 0;
        };
        let first = usize::from(self.apply(update));
        first + self.sync()
    }

    fn apply(&mut self, update: Update) -> bool {
        let Some((name, slot)) = self.storage.get_mut(&update.id) else {
            warn!("StateCtx: dropping update for unregistered state {}", update.name);
            return false;
        };
        let name = *name;
        (update.apply)(slot.as_mut());
        self.notify(name);
        true
    }

    fn notify(&mut self, name: &'static str) {
        for (_, listener) in &mut self.listeners {
            listener(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Default, PartialEq, Eq)]
    struct Counter {
        value: i32,
    }

    impl State for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }
    }

    #[derive(Debug, Default)]
    struct Unregistered;

    impl State for Unregistered {}

    #[test]
    fn update_mutates_and_notifies() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        ctx.subscribe(move |name| sink.borrow_mut().push(name));

        let doubled = ctx.update::<Counter, _>(|c| {
            c.value = 21;
            c.value * 2
        });

        assert_eq!(doubled, 42);
        assert_eq!(ctx.state::<Counter>().value, 21);
        assert_eq!(*seen.borrow(), vec!["counter"]);
    }

    #[test]
    fn missing_state_is_an_error() {
        let mut ctx = StateCtx::new();

        assert!(ctx.try_state::<Counter>().is_err());
        let err = ctx
            .try_update::<Counter, _>(|c| c.value += 1)
            .expect_err("unregistered state should not update");
        assert!(err.to_string().contains("State not found"));
    }

    #[test]
    fn updater_changes_apply_only_on_sync() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());

        let updater = ctx.updater();
        updater.set(Counter { value: 5 });
        updater.apply::<Counter>(|c| c.value += 1);

        assert_eq!(ctx.state::<Counter>().value, 0);
        assert_eq!(ctx.sync(), 2);
        assert_eq!(ctx.state::<Counter>().value, 6);
        assert_eq!(ctx.sync(), 0);
    }

    #[tokio::test]
    async fn wait_sync_applies_posted_update() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());

        let updater = ctx.updater();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            updater.set(Counter { value: 3 });
        });

        assert_eq!(ctx.wait_sync().await, 1);
        assert_eq!(ctx.state::<Counter>().value, 3);
    }

    #[test]
    fn sync_drops_updates_for_unregistered_states() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());

        ctx.updater().set(Unregistered);

        assert_eq!(ctx.sync(), 0);
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());

        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        let id = ctx.subscribe(move |_| *sink.borrow_mut() += 1);

        ctx.update::<Counter, _>(|c| c.value += 1);
        assert!(ctx.unsubscribe(id));
        assert!(!ctx.unsubscribe(id));
        ctx.update::<Counter, _>(|c| c.value += 1);

        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn updater_outlives_context_without_panicking() {
        let ctx = StateCtx::new();
        let updater = ctx.updater();
        drop(ctx);

        updater.set(Counter { value: 1 });
    }

    #[tokio::test]
    async fn updater_is_send_across_tasks() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());

        let updater = ctx.updater();
        tokio::spawn(async move {
            updater.apply::<Counter>(|c| c.value = 7);
        })
        .await
        .expect("task should finish");

        ctx.sync();
        assert_eq!(ctx.state::<Counter>().value, 7);
    }
}
