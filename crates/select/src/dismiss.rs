//! Document-level pointer-down listeners.
//!
//! Controls that close on an outside click subscribe here when mounted. The
//! returned [`Subscription`] detaches the listener when dropped, so a torn-down
//! control never leaves a listener behind.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box of a control (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Edges are inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

type Listener = Rc<dyn Fn(Point)>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Fan-out of pointer-down events to every subscribed listener.
///
/// Single-threaded (`Rc`), matching a UI event loop.
#[derive(Clone, Default)]
pub struct PointerHub {
    inner: Rc<RefCell<HubInner>>,
}

impl core::fmt::Debug for PointerHub {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PointerHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(Point) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        let listener: Listener = Rc::new(listener);
        inner.listeners.push((id, listener));
        Subscription {
            hub: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Deliver a pointer-down at `at` to every listener.
    pub fn pointer_down(&self, at: Point) {
        // Snapshot first: a listener may drop its own subscription.
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(at);
        }
    }
}

/// Registration guard; dropping it detaches the listener.
#[must_use = "dropping a Subscription detaches the listener immediately"]
#[derive(Debug)]
pub struct Subscription {
    hub: Weak<RefCell<HubInner>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
