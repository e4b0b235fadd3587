use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::frame::Frame;

/// Callback invoked once per display refresh.
pub type FrameCallback = Box<dyn FnMut(Frame)>;

/// Identifies one registered render loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoopHandle(pub u64);

/// Host refresh-notification seam.
///
/// `start` registers a callback that runs once per refresh until `stop` is
/// called with the returned handle. Stopping an unknown or already stopped
/// handle is a no-op. Implementations drop the callback on `stop`, which
/// releases whatever it captured.
pub trait FrameScheduler {
    fn start(&self, callback: FrameCallback) -> LoopHandle;
    fn stop(&self, handle: LoopHandle);
    fn is_running(&self, handle: LoopHandle) -> bool;
}

struct Slot {
    frame: Frame,
    /// `None` while the callback is executing.
    callback: Option<FrameCallback>,
}

struct ManualInner {
    dt_s: f64,
    next_id: u64,
    loops: BTreeMap<u64, Slot>,
}

/// Scheduler driven explicitly by [`ManualScheduler::tick`].
///
/// Used by tests and headless tools. Loops run in registration order. The
/// scheduler never holds its own borrow while a callback runs, so callbacks
/// may start or stop loops (including their own).
#[derive(Clone)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualInner>>,
}

impl ManualScheduler {
    pub fn new(dt_s: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ManualInner {
                dt_s,
                next_id: 0,
                loops: BTreeMap::new(),
            })),
        }
    }

    pub fn active_loops(&self) -> usize {
        self.inner.borrow().loops.len()
    }

    /// Runs one refresh: every loop registered before the tick gets one frame.
    ///
    /// Returns how many callbacks ran.
    pub fn tick(&self) -> usize {
        let ids: Vec<u64> = self.inner.borrow().loops.keys().copied().collect();
        let mut ran = 0usize;

        for id in ids {
            let taken = {
                let mut inner = self.inner.borrow_mut();
                inner
                    .loops
                    .get_mut(&id)
                    .and_then(|slot| slot.callback.take().map(|cb| (slot.frame, cb)))
            };
            let Some((frame, mut callback)) = taken else {
                continue;
            };

            callback(frame);
            ran += 1;

            // A loop stopped from inside its own callback is gone from the map;
            // its callback is dropped here, outside the borrow.
            let orphaned = {
                let mut inner = self.inner.borrow_mut();
                match inner.loops.get_mut(&id) {
                    Some(slot) => {
                        slot.frame = frame.next();
                        slot.callback = Some(callback);
                        None
                    }
                    None => Some(callback),
                }
            };
            drop(orphaned);
        }

        ran
    }

    pub fn tick_n(&self, n: usize) -> usize {
        (0..n).map(|_| self.tick()).sum()
    }
}

impl FrameScheduler for ManualScheduler {
    fn start(&self, callback: FrameCallback) -> LoopHandle {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id = inner.next_id.wrapping_add(1);
        let frame = Frame::first(inner.dt_s);
        inner.loops.insert(
            id,
            Slot {
                frame,
                callback: Some(callback),
            },
        );
        LoopHandle(id)
    }

    fn stop(&self, handle: LoopHandle) {
        let removed = self.inner.borrow_mut().loops.remove(&handle.0);
        drop(removed);
    }

    fn is_running(&self, handle: LoopHandle) -> bool {
        self.inner.borrow().loops.contains_key(&handle.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameScheduler, LoopHandle, ManualScheduler};
    use crate::frame::Frame;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<(char, u64)>>>, tag: char) -> super::FrameCallback {
        let log = log.clone();
        Box::new(move |frame: Frame| log.borrow_mut().push((tag, frame.index)))
    }

    #[test]
    fn runs_loops_in_registration_order_with_per_loop_frames() {
        let sched = ManualScheduler::new(1.0);
        let log = Rc::new(RefCell::new(Vec::new()));
        sched.start(recorder(&log, 'a'));
        sched.tick();
        sched.start(recorder(&log, 'b'));
        sched.tick();

        assert_eq!(*log.borrow(), vec![('a', 0), ('a', 1), ('b', 0)]);
    }

    #[test]
    fn stopped_loop_never_fires_again() {
        let sched = ManualScheduler::new(1.0);
        let log = Rc::new(RefCell::new(Vec::new()));
        let h = sched.start(recorder(&log, 'a'));
        assert_eq!(sched.tick(), 1);
        sched.stop(h);
        assert!(!sched.is_running(h));
        assert_eq!(sched.tick_n(3), 0);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn stopping_unknown_handle_is_a_noop() {
        let sched = ManualScheduler::new(1.0);
        sched.stop(LoopHandle(42));
        assert_eq!(sched.active_loops(), 0);
    }

    #[test]
    fn callback_may_stop_itself() {
        let sched = ManualScheduler::new(1.0);
        let handle_cell: Rc<RefCell<Option<LoopHandle>>> = Rc::new(RefCell::new(None));
        let count = Rc::new(RefCell::new(0));

        let s = sched.clone();
        let hc = handle_cell.clone();
        let c = count.clone();
        let h = sched.start(Box::new(move |_: Frame| {
            *c.borrow_mut() += 1;
            if let Some(h) = *hc.borrow() {
                s.stop(h);
            }
        }));
        *handle_cell.borrow_mut() = Some(h);

        sched.tick_n(5);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(sched.active_loops(), 0);
    }

    #[test]
    fn dropping_callback_on_stop_releases_captures() {
        let sched = ManualScheduler::new(1.0);
        let token = Rc::new(());
        let captured = token.clone();
        let h = sched.start(Box::new(move |_: Frame| {
            let _ = captured.as_ref();
        }));
        assert_eq!(Rc::strong_count(&token), 2);
        sched.stop(h);
        assert_eq!(Rc::strong_count(&token), 1);
    }
}
