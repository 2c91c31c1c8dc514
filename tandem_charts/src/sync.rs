// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip synchronization across independently rendered charts.
//!
//! A [`SyncBus`] is a cloneable handle over a shared, single-threaded, replay-latest stream of
//! `Option<TooltipState>`. Every handle clone observes the same stream; there is no global
//! registry. Charts attach through a [`SyncLink`].

extern crate alloc;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::tooltip::TooltipState;

type Callback = Rc<dyn Fn(Option<&TooltipState>)>;

#[derive(Default)]
struct Inner {
    latest: Option<TooltipState>,
    emitted: bool,
    origin: Option<u64>,
    emissions: u64,
    next_id: u64,
    subscribers: Vec<(u64, Callback)>,
}

impl Inner {
    fn is_subscribed(&self, id: u64) -> bool {
        self.subscribers.iter().any(|(sid, _)| *sid == id)
    }
}

/// A shared hover-state channel.
///
/// Publishing stores the state as the latest value and delivers it to every current
/// subscriber; late subscribers receive the latest value on subscribe. The last write wins:
/// a publish issued from inside a callback supersedes the delivery in progress.
#[derive(Clone, Default)]
pub struct SyncBus {
    inner: Rc<RefCell<Inner>>,
}

impl core::fmt::Debug for SyncBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SyncBus")
            .field("latest", &inner.latest)
            .field("subscribers", &inner.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl SyncBus {
    /// Creates a bus with no value and no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `state` to every subscriber. `None` clears the hover.
    pub fn publish(&self, state: Option<TooltipState>) {
        self.publish_from(None, state);
    }

    pub(crate) fn publish_from(&self, origin: Option<u64>, state: Option<TooltipState>) {
        let (emission, targets) = {
            let mut inner = self.inner.borrow_mut();
            inner.latest = state.clone();
            inner.emitted = true;
            inner.origin = origin;
            inner.emissions += 1;
            let targets: Vec<(u64, Callback)> = inner.subscribers.clone();
            (inner.emissions, targets)
        };
        if targets.is_empty() {
            tracing::trace!(active = state.is_some(), "published with no subscribers");
            return;
        }
        tracing::trace!(
            active = state.is_some(),
            subscribers = targets.len(),
            "publishing tooltip state"
        );
        for (id, callback) in targets {
            {
                let inner = self.inner.borrow();
                if inner.emissions != emission {
                    // A callback published a newer value, which has already been delivered.
                    return;
                }
                if !inner.is_subscribed(id) {
                    continue;
                }
            }
            callback(state.as_ref());
        }
    }

    /// Returns the latest published state (`None` if nothing is hovered or nothing was ever
    /// published).
    pub fn latest(&self) -> Option<TooltipState> {
        self.inner.borrow().latest.clone()
    }

    /// Returns `true` once anything (including `None`) has been published.
    pub fn has_emitted(&self) -> bool {
        self.inner.borrow().emitted
    }

    /// Registers `callback`, replaying the latest value to it immediately if one exists.
    ///
    /// The registration lasts until the returned [`Subscription`] is dropped.
    pub fn subscribe(&self, callback: impl Fn(Option<&TooltipState>) + 'static) -> Subscription {
        let callback: Callback = Rc::new(callback);
        let (id, replay) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Rc::clone(&callback)));
            (id, inner.emitted.then(|| inner.latest.clone()))
        };
        tracing::trace!(id, replay = replay.is_some(), "subscribed");
        if let Some(latest) = replay {
            callback(latest.as_ref());
        }
        Subscription {
            bus: self.clone(),
            id,
        }
    }

    /// Returns the number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn unsubscribe(&self, id: u64) {
        self.inner
            .borrow_mut()
            .subscribers
            .retain(|(sid, _)| *sid != id);
        tracing::trace!(id, "unsubscribed");
    }

    fn latest_is_active_from(&self, origin: u64) -> bool {
        let inner = self.inner.borrow();
        inner.origin == Some(origin) && inner.latest.is_some()
    }
}

/// A live registration on a [`SyncBus`]; dropping it unsubscribes.
///
/// A subscription keeps the bus's shared state alive.
#[derive(Debug)]
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    bus: SyncBus,
    id: u64,
}

impl Subscription {
    /// Returns the subscriber id, unique within its bus.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the bus this subscription belongs to.
    pub fn bus(&self) -> &SyncBus {
        &self.bus
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.id);
    }
}

/// A chart's attachment to a [`SyncBus`]: a subscription plus the last observed state.
///
/// When the link is dropped (or [`SyncLink::unlink`]ed) while the bus still shows an active
/// hover published through this link, `None` is published so sibling charts do not keep a
/// stale crosshair.
#[derive(Debug)]
pub struct SyncLink {
    subscription: Subscription,
    observed: Rc<RefCell<Option<TooltipState>>>,
}

impl SyncLink {
    /// Subscribes to `bus`.
    pub fn new(bus: &SyncBus) -> Self {
        let observed: Rc<RefCell<Option<TooltipState>>> = Rc::default();
        let slot = Rc::clone(&observed);
        let subscription = bus.subscribe(move |state| {
            *slot.borrow_mut() = state.cloned();
        });
        Self {
            subscription,
            observed,
        }
    }

    /// Publishes `state` on the bus, tagged as coming from this link.
    pub fn publish(&self, state: Option<TooltipState>) {
        self.subscription
            .bus
            .publish_from(Some(self.subscription.id), state);
    }

    /// Returns the last state delivered to this link.
    pub fn observed(&self) -> Option<TooltipState> {
        self.observed.borrow().clone()
    }

    /// Returns the bus.
    pub fn bus(&self) -> &SyncBus {
        &self.subscription.bus
    }

    /// Detaches from the bus, clearing the hover if it was published through this link.
    pub fn unlink(self) {}
}

impl Drop for SyncLink {
    fn drop(&mut self) {
        let bus = &self.subscription.bus;
        if bus.latest_is_active_from(self.subscription.id) {
            tracing::debug!(id = self.subscription.id, "clearing hover owned by a dropped link");
            bus.publish_from(None, None);
        }
    }
}

/// Where a chart's hover state lives: on a bus when linked, locally otherwise.
#[derive(Debug, Default)]
pub(crate) struct HoverSlot {
    link: Option<SyncLink>,
    local: Option<TooltipState>,
}

impl HoverSlot {
    pub(crate) fn link(&mut self, bus: &SyncBus) {
        self.local = None;
        self.link = Some(SyncLink::new(bus));
    }

    pub(crate) fn unlink(&mut self) {
        if let Some(link) = self.link.take() {
            link.unlink();
        }
    }

    pub(crate) fn bus(&self) -> Option<&SyncBus> {
        self.link.as_ref().map(SyncLink::bus)
    }

    pub(crate) fn publish(&mut self, state: Option<TooltipState>) {
        match &self.link {
            Some(link) => link.publish(state),
            None => self.local = state,
        }
    }

    pub(crate) fn current(&self) -> Option<TooltipState> {
        match &self.link {
            Some(link) => link.observed(),
            None => self.local.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn state(x: f64) -> TooltipState {
        TooltipState {
            pointer_offset_x: x * 10.0,
            x,
            active_datum: None,
            active_series_key: None,
        }
    }

    fn recorder(bus: &SyncBus) -> (Subscription, Rc<RefCell<Vec<Option<f64>>>>) {
        let seen: Rc<RefCell<Vec<Option<f64>>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let sub = bus.subscribe(move |s| sink.borrow_mut().push(s.map(|s| s.x)));
        (sub, seen)
    }

    #[test]
    fn publishing_without_subscribers_is_stored() {
        let bus = SyncBus::new();
        assert!(!bus.has_emitted());
        bus.publish(Some(state(1.0)));
        assert_eq!(bus.latest(), Some(state(1.0)));
    }

    #[test]
    fn late_subscribers_receive_the_latest_value() {
        let bus = SyncBus::new();
        let (_early, early) = recorder(&bus);
        assert!(early.borrow().is_empty(), "nothing to replay yet");

        bus.publish(Some(state(1.0)));
        bus.publish(Some(state(2.0)));
        let (_late, late) = recorder(&bus);
        assert_eq!(*late.borrow(), vec![Some(2.0)]);
        assert_eq!(*early.borrow(), vec![Some(1.0), Some(2.0)]);
    }

    #[test]
    fn dropping_a_subscription_unsubscribes() {
        let bus = SyncBus::new();
        let (sub, seen) = recorder(&bus);
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(Some(state(3.0)));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn reentrant_publish_wins() {
        let bus = SyncBus::new();
        let inner = bus.clone();
        let _echo = bus.subscribe(move |s| {
            if s.is_some_and(|s| s.x == 1.0) {
                inner.publish(Some(state(9.0)));
            }
        });
        let (_after, seen) = recorder(&bus);
        bus.publish(Some(state(1.0)));
        assert_eq!(bus.latest(), Some(state(9.0)));
        assert_eq!(seen.borrow().last(), Some(&Some(9.0)));
        assert!(!seen.borrow().contains(&Some(1.0)), "superseded delivery is skipped");
    }

    #[test]
    fn dropping_the_publishing_link_clears_the_hover() {
        let bus = SyncBus::new();
        let a = SyncLink::new(&bus);
        let b = SyncLink::new(&bus);
        a.publish(Some(state(4.0)));
        assert_eq!(b.observed(), Some(state(4.0)));
        assert_eq!(a.observed(), Some(state(4.0)));

        a.unlink();
        assert_eq!(b.observed(), None);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn dropping_a_non_publishing_link_leaves_the_hover() {
        let bus = SyncBus::new();
        let a = SyncLink::new(&bus);
        let b = SyncLink::new(&bus);
        a.publish(Some(state(4.0)));
        drop(b);
        assert_eq!(a.observed(), Some(state(4.0)));
        assert_eq!(bus.latest(), Some(state(4.0)));
    }
}
