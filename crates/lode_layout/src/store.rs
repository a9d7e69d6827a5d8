//! Layout state store
//!
//! Readers hold a [`LayoutStore`] handle and either take snapshots or
//! subscribe. Only the [`LayoutController`](crate::LayoutController) can
//! publish, and it always publishes a complete [`LayoutState`], so a reader
//! never sees the device class of one pass next to the dimensions of another.

use lode_core::{Store, SubscriptionHandle};

use crate::result::LayoutResult;

/// One consistent layout snapshot
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutState {
    pub is_mobile: bool,
    /// `None` until the first viewport measurement
    pub current_layout: Option<LayoutResult>,
    pub screen_width: f32,
    pub screen_height: f32,
}

/// Read handle to the current layout state
#[derive(Clone, Default)]
pub struct LayoutStore {
    inner: Store<LayoutState>,
}

impl LayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> LayoutState {
        self.inner.get()
    }

    /// Borrow the current state without cloning
    pub fn with<R>(&self, f: impl FnOnce(&LayoutState) -> R) -> R {
        self.inner.with(f)
    }

    /// Number of snapshots published so far
    pub fn version(&self) -> u64 {
        self.inner.version()
    }

    /// Run `callback` with every newly published snapshot
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&LayoutState) + 'static,
    {
        self.inner.subscribe(callback)
    }

    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.inner.unsubscribe(handle)
    }

    pub(crate) fn publish(&self, state: LayoutState) {
        self.inner.set(state);
    }
}
