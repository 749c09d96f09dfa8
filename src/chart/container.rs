use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tracing::trace;

/// Callback receiving the new container width in pixels.
pub type ResizeListener = Box<dyn FnMut(u32)>;

/// Host element a chart surface is bound to.
pub trait ChartContainer {
    /// Current client width, or `None` while the container is not attached.
    fn client_width(&self) -> Option<u32>;

    /// Registers `listener` for width changes until the returned token is
    /// released.
    fn subscribe_resize(&self, listener: ResizeListener) -> ResizeSubscription;
}

/// Unsubscribe token for a resize listener.
///
/// The release action runs exactly once: on [`Self::unsubscribe`] or on drop,
/// whichever comes first.
pub struct ResizeSubscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl ResizeSubscription {
    #[must_use]
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for ResizeSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeSubscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[derive(Default)]
struct ContainerInner {
    width: Cell<Option<u32>>,
    next_listener_id: Cell<u64>,
    listeners: RefCell<IndexMap<u64, SharedListener>>,
}

type SharedListener = Rc<RefCell<ResizeListener>>;

/// In-memory container used by the CLI and tests.
///
/// Clones share the same element, so a host can keep one handle to drive
/// `resize` while the chart lifecycle owns another.
#[derive(Clone, Default)]
pub struct HeadlessContainer {
    inner: Rc<ContainerInner>,
}

impl HeadlessContainer {
    /// A container that is not attached yet.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attached(width: u32) -> Self {
        let container = Self::default();
        container.attach(width);
        container
    }

    /// Attaches the container without notifying listeners.
    pub fn attach(&self, width: u32) {
        self.inner.width.set(Some(width));
    }

    pub fn detach(&self) {
        self.inner.width.set(None);
    }

    /// Sets a new width and notifies every listener registered at call time.
    ///
    /// Listeners may subscribe or unsubscribe while being notified. A
    /// listener released mid-dispatch is skipped; one added mid-dispatch
    /// first hears the next resize. A nested `resize` from inside a listener
    /// skips that listener.
    pub fn resize(&self, width: u32) {
        self.inner.width.set(Some(width));
        let snapshot: Vec<(u64, SharedListener)> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();
        trace!(width, listeners = snapshot.len(), "dispatch container resize");
        for (id, listener) in snapshot {
            if !self.inner.listeners.borrow().contains_key(&id) {
                continue;
            }
            if let Ok(mut listener) = listener.try_borrow_mut() {
                listener(width);
            }
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl ChartContainer for HeadlessContainer {
    fn client_width(&self) -> Option<u32> {
        self.inner.width.get()
    }

    fn subscribe_resize(&self, listener: ResizeListener) -> ResizeSubscription {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .insert(id, Rc::new(RefCell::new(listener)));

        let inner: Weak<ContainerInner> = Rc::downgrade(&self.inner);
        ResizeSubscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                let removed = inner.listeners.borrow_mut().shift_remove(&id);
                drop(removed);
            }
        })
    }
}

impl fmt::Debug for HeadlessContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessContainer")
            .field("width", &self.client_width())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::{ChartContainer, HeadlessContainer, ResizeSubscription};

    #[test]
    fn subscription_release_runs_exactly_once() {
        let released = Rc::new(Cell::new(0));
        let counter = Rc::clone(&released);
        let subscription = ResizeSubscription::new(move || counter.set(counter.get() + 1));
        assert!(subscription.is_active());
        subscription.unsubscribe();
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn dropping_token_removes_listener() {
        let container = HeadlessContainer::attached(640);
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        let subscription = container.subscribe_resize(Box::new(move |width| sink.set(width)));
        container.resize(800);
        assert_eq!(seen.get(), 800);

        drop(subscription);
        assert_eq!(container.listener_count(), 0);
        container.resize(900);
        assert_eq!(seen.get(), 800);
        assert_eq!(container.client_width(), Some(900));
    }

    #[test]
    fn token_outliving_container_is_harmless() {
        let container = HeadlessContainer::attached(100);
        let subscription = container.subscribe_resize(Box::new(|_| {}));
        drop(container);
        subscription.unsubscribe();
    }

    #[test]
    fn listener_can_release_its_own_token_during_resize() {
        let container = HeadlessContainer::attached(320);
        let token: Rc<RefCell<Option<ResizeSubscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(Cell::new(0));

        let slot = Rc::clone(&token);
        let counter = Rc::clone(&calls);
        let subscription = container.subscribe_resize(Box::new(move |_| {
            counter.set(counter.get() + 1);
            slot.borrow_mut().take();
        }));
        *token.borrow_mut() = Some(subscription);

        container.resize(480);
        assert_eq!(calls.get(), 1);
        assert_eq!(container.listener_count(), 0);

        container.resize(500);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn listener_can_subscribe_during_resize() {
        let container = HeadlessContainer::attached(320);
        let late_widths = Rc::new(RefCell::new(Vec::new()));
        let late_tokens: Rc<RefCell<Vec<ResizeSubscription>>> = Rc::new(RefCell::new(Vec::new()));

        let host = container.clone();
        let widths = Rc::clone(&late_widths);
        let tokens = Rc::clone(&late_tokens);
        let _first = container.subscribe_resize(Box::new(move |_| {
            if tokens.borrow().is_empty() {
                let sink = Rc::clone(&widths);
                let late = host.subscribe_resize(Box::new(move |width| sink.borrow_mut().push(width)));
                tokens.borrow_mut().push(late);
            }
        }));

        container.resize(400);
        assert_eq!(container.listener_count(), 2);
        assert!(late_widths.borrow().is_empty());

        container.resize(410);
        assert_eq!(*late_widths.borrow(), vec![410]);
    }

    #[test]
    fn releasing_a_later_listener_mid_dispatch_skips_it() {
        let container = HeadlessContainer::attached(320);
        let victim_calls = Rc::new(Cell::new(0));
        let victim_token: Rc<RefCell<Option<ResizeSubscription>>> = Rc::new(RefCell::new(None));

        let slot = Rc::clone(&victim_token);
        let _killer = container.subscribe_resize(Box::new(move |_| {
            slot.borrow_mut().take();
        }));
        let counter = Rc::clone(&victim_calls);
        let victim = container.subscribe_resize(Box::new(move |_| counter.set(counter.get() + 1)));
        *victim_token.borrow_mut() = Some(victim);

        container.resize(640);
        assert_eq!(victim_calls.get(), 0);
        assert_eq!(container.listener_count(), 1);
    }
}
