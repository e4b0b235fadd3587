use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::frame::Frame;
use crate::scheduler::{FrameScheduler, LoopHandle};

/// Live render state of one mounted component.
///
/// `dispose` releases every GPU-side handle the session acquired. It is called
/// exactly once by [`Mount`], after the frame loop has been stopped.
pub trait RenderSession {
    type Error: std::fmt::Display;

    fn render_frame(&mut self, frame: Frame) -> Result<(), Self::Error>;
    fn dispose(&mut self);
}

/// Owns one session and the loop that drives it.
///
/// The frame callback only holds a weak reference, so the session's lifetime
/// is the mount's lifetime. Teardown runs on [`Mount::unmount`] or on drop,
/// whichever comes first.
pub struct Mount<S: RenderSession + 'static, F: FrameScheduler> {
    label: &'static str,
    scheduler: F,
    session: Rc<RefCell<S>>,
    handle: Option<LoopHandle>,
}

impl<S: RenderSession + 'static, F: FrameScheduler> Mount<S, F> {
    pub fn start(label: &'static str, scheduler: F, session: S) -> Self {
        let session = Rc::new(RefCell::new(session));
        let weak = Rc::downgrade(&session);

        let handle = scheduler.start(Box::new(move |frame: Frame| {
            let Some(session) = weak.upgrade() else {
                return;
            };
            // A frame arriving while the host holds the session (resize, input)
            // is skipped rather than re-entered.
            let Ok(mut session) = session.try_borrow_mut() else {
                return;
            };
            if let Err(err) = session.render_frame(frame) {
                warn!(
                    component = label,
                    frame = frame.index,
                    time = frame.time.seconds(),
                    "render failed: {err}"
                );
            }
        }));
        debug!(component = label, loop_id = handle.0, "mounted");

        Self {
            label,
            scheduler,
            session,
            handle: Some(handle),
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle
            .is_some_and(|handle| self.scheduler.is_running(handle))
    }

    /// Runs `f` against the session, e.g. to forward resize or input.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.session.borrow_mut())
    }

    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.scheduler.stop(handle);
        self.session.borrow_mut().dispose();
        debug!(component = self.label, loop_id = handle.0, "unmounted");
    }
}

impl<S: RenderSession + 'static, F: FrameScheduler> Drop for Mount<S, F> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Holds at most one [`Mount`]; replacing it tears the previous one down first.
pub struct MountSlot<S: RenderSession + 'static, F: FrameScheduler> {
    current: Option<Mount<S, F>>,
}

impl<S: RenderSession + 'static, F: FrameScheduler> Default for MountSlot<S, F> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<S: RenderSession + 'static, F: FrameScheduler> MountSlot<S, F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, label: &'static str, scheduler: F, session: S) {
        if let Some(previous) = self.current.take() {
            previous.unmount();
        }
        self.current = Some(Mount::start(label, scheduler, session));
    }

    pub fn clear(&mut self) {
        if let Some(previous) = self.current.take() {
            previous.unmount();
        }
    }

    pub fn get(&self) -> Option<&Mount<S, F>> {
        self.current.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.current.is_some()
    }
}
