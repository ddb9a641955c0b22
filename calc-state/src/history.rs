use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::{AddressBar, MemoryAddressBar, NavigationEvent, SharedAddressBar};

/// Handle for removing a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Returns `false` once it no longer wants events.
type Listener = Box<dyn FnMut(&NavigationEvent) -> bool>;

/// Fan-out of back/forward navigation to interested sessions.
#[derive(Default)]
pub struct HistoryBridge {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl HistoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` to run after every navigation.
    pub fn on_history_navigation(
        &mut self,
        mut handler: impl FnMut(&NavigationEvent) + 'static,
    ) -> ListenerId {
        self.subscribe(move |event| {
            handler(event);
            true
        })
    }

    /// Registers `handler` until it returns `false`; it is then dropped
    /// during that same dispatch.
    pub fn subscribe(
        &mut self,
        handler: impl FnMut(&NavigationEvent) -> bool + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(handler)));
        id
    }

    /// Returns whether a listener was removed.
    pub fn remove_listener(
        &mut self,
        id: ListenerId,
    ) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Runs every listener, in registration order, and drops those that
    /// unsubscribed.
    pub fn dispatch(
        &mut self,
        event: &NavigationEvent,
    ) {
        debug!(href = %event.href, listeners = self.listeners.len(), "history navigation");
        self.listeners.retain_mut(|(id, listener)| {
            let keep = listener(event);
            if !keep {
                debug!(listener = id.0, "listener unsubscribed");
            }
            keep
        });
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Browser chrome for the in-memory history: back, forward, and opening a
/// URL, each followed by a dispatch to the bridge's listeners.
///
/// Listeners run after the address bar has been released, so a listener may
/// read or write the URL itself.
pub struct Navigator {
    address_bar: Rc<RefCell<MemoryAddressBar>>,
    bridge: HistoryBridge,
}

impl Navigator {
    pub fn new(address_bar: Rc<RefCell<MemoryAddressBar>>) -> Self {
        Self {
            address_bar,
            bridge: HistoryBridge::new(),
        }
    }

    /// The address bar, as sessions see it.
    pub fn address_bar(&self) -> SharedAddressBar {
        self.address_bar.clone()
    }

    pub fn href(&self) -> String {
        self.address_bar.borrow().href()
    }

    pub fn bridge_mut(&mut self) -> &mut HistoryBridge {
        &mut self.bridge
    }

    pub fn on_history_navigation(
        &mut self,
        handler: impl FnMut(&NavigationEvent) + 'static,
    ) -> ListenerId {
        self.bridge.on_history_navigation(handler)
    }

    pub fn subscribe(
        &mut self,
        handler: impl FnMut(&NavigationEvent) -> bool + 'static,
    ) -> ListenerId {
        self.bridge.subscribe(handler)
    }

    pub fn remove_listener(
        &mut self,
        id: ListenerId,
    ) -> bool {
        self.bridge.remove_listener(id)
    }

    /// Returns `false` when there is nothing to go back to.
    pub fn back(&mut self) -> bool {
        let event = self.address_bar.borrow_mut().back();
        self.deliver(event)
    }

    /// Returns `false` when there is nothing to go forward to.
    pub fn forward(&mut self) -> bool {
        let event = self.address_bar.borrow_mut().forward();
        self.deliver(event)
    }

    pub fn navigate(
        &mut self,
        url: &str,
    ) {
        let event = self.address_bar.borrow_mut().navigate(url);
        self.bridge.dispatch(&event);
    }

    fn deliver(
        &mut self,
        event: Option<NavigationEvent>,
    ) -> bool {
        match event {
            Some(event) => {
                self.bridge.dispatch(&event);
                true
            }
            None => false,
        }
    }
}
