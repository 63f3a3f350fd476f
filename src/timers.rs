//! Tick-driven timer scheduling

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Per-tick list of expiring callbacks.
///
/// Timers are owned by an explicit `Timers` value and advance only when the
/// owner calls [`tick`](Self::tick) with however much time it considers
/// elapsed; nothing here reads a clock. Finished and cancelled entries are
/// removed while ticking, newest first.
///
/// # Examples
///
/// ```
/// use esox_poolkit::Timers;
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
///
/// let mut timers = Timers::new();
/// let fired = Rc::new(Cell::new(false));
///
/// let flag = Rc::clone(&fired);
/// timers.delay(Duration::from_millis(30), move || flag.set(true));
///
/// timers.tick(Duration::from_millis(20));
/// assert!(!fired.get());
///
/// timers.tick(Duration::from_millis(20));
/// assert!(fired.get());
/// assert!(timers.is_empty());
/// ```
pub struct Timers {
    entries: Vec<Entry>,
}

struct Entry {
    ctrl: Rc<TimerCtrl>,
    kind: Kind,
    action: Box<dyn FnMut()>,
}

enum Kind {
    Delay {
        after: Duration,
    },
    DelayFrames {
        frames: u32,
    },
    Interval {
        every: Duration,
        stop: Option<Box<dyn FnMut() -> bool>>,
    },
}

#[derive(Default)]
struct TimerCtrl {
    cancelled: Cell<bool>,
    paused: Cell<bool>,
    elapsed: Cell<Duration>,
    ticks: Cell<u32>,
}

impl Timers {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Run `action` once, on the first tick at which at least `after` time
    /// has accumulated.
    pub fn delay(&mut self, after: Duration, action: impl FnMut() + 'static) -> TimerHandle {
        self.push(Kind::Delay { after }, action)
    }

    /// Run `action` once, after `frames` ticks have elapsed. Zero frames
    /// fires on the next tick.
    pub fn delay_frames(&mut self, frames: u32, action: impl FnMut() + 'static) -> TimerHandle {
        self.push(Kind::DelayFrames { frames }, action)
    }

    /// Run `action` every `every` of accumulated time, until cancelled.
    pub fn interval(&mut self, every: Duration, action: impl FnMut() + 'static) -> TimerHandle {
        self.push(
            Kind::Interval {
                every,
                stop: None,
            },
            action,
        )
    }

    /// Run `action` every `every` of accumulated time, stopping once `stop`
    /// returns true. The stop check runs before each accumulation, so a
    /// stopped interval does not fire on the tick that stops it.
    pub fn interval_until(
        &mut self,
        every: Duration,
        stop: impl FnMut() -> bool + 'static,
        action: impl FnMut() + 'static,
    ) -> TimerHandle {
        self.push(
            Kind::Interval {
                every,
                stop: Some(Box::new(stop)),
            },
            action,
        )
    }

    /// Advance every non-paused timer by `dt`, firing the expired ones and
    /// dropping finished or cancelled entries.
    pub fn tick(&mut self, dt: Duration) {
        for index in (0..self.entries.len()).rev() {
            if self.entries[index].ctrl.cancelled.get() {
                self.entries.remove(index);
                continue;
            }
            if self.entries[index].ctrl.paused.get() {
                continue;
            }
            if self.entries[index].advance(dt) {
                self.entries.remove(index);
            }
        }
    }

    /// Number of scheduled timers, including paused ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, kind: Kind, action: impl FnMut() + 'static) -> TimerHandle {
        let ctrl = Rc::new(TimerCtrl::default());
        self.entries.push(Entry {
            ctrl: Rc::clone(&ctrl),
            kind,
            action: Box::new(action),
        });
        TimerHandle { ctrl }
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}

impl Entry {
    /// Advance by `dt`; true means the entry is finished.
    fn advance(&mut self, dt: Duration) -> bool {
        match &mut self.kind {
            Kind::Delay { after } => {
                let elapsed = self.ctrl.elapsed.get() + dt;
                self.ctrl.elapsed.set(elapsed);
                if elapsed >= *after {
                    (self.action)();
                    true
                } else {
                    false
                }
            }
            Kind::DelayFrames { frames } => {
                let ticks = self.ctrl.ticks.get() + 1;
                self.ctrl.ticks.set(ticks);
                if ticks > *frames {
                    (self.action)();
                    true
                } else {
                    false
                }
            }
            Kind::Interval { every, stop } => {
                if let Some(stop) = stop
                    && stop()
                {
                    return true;
                }

                let elapsed = self.ctrl.elapsed.get() + dt;
                if elapsed >= *every {
                    // the remainder is dropped so slow ticks don't burst
                    self.ctrl.elapsed.set(Duration::ZERO);
                    (self.action)();
                } else {
                    self.ctrl.elapsed.set(elapsed);
                }
                false
            }
        }
    }
}

/// Control handle for one scheduled timer.
///
/// Handles are cheap clones; the underlying timer keeps running whether or
/// not any handle is held.
#[derive(Clone)]
pub struct TimerHandle {
    ctrl: Rc<TimerCtrl>,
}

impl TimerHandle {
    /// Stop the timer without firing it; it is removed on the next tick.
    pub fn cancel(&self) {
        self.ctrl.cancelled.set(true);
    }

    /// Suspend accumulation until [`resume`](Self::resume).
    pub fn pause(&self) {
        self.ctrl.paused.set(true);
    }

    pub fn resume(&self) {
        self.ctrl.paused.set(false);
    }

    /// Restart the timer from zero accumulated time and ticks.
    pub fn reset(&self) {
        self.ctrl.elapsed.set(Duration::ZERO);
        self.ctrl.ticks.set(0);
    }

    pub fn is_cancelled(&self) -> bool {
        self.ctrl.cancelled.get()
    }

    pub fn is_paused(&self) -> bool {
        self.ctrl.paused.get()
    }
}
