//! Frame timing and interval scheduling.
//!
//! The [`Clock`] supplies the run loop's frame delta via [`Clock::tick`],
//! keeps a sliding FPS average, optionally caps the frame rate by
//! sleeping, and fires interval-scheduled callbacks (window timers) as
//! part of each tick.
//!
//! The model is single-threaded and cooperative: a `Clock` is a cheap
//! cloneable handle (`Rc<RefCell<..>>`) so windows can hold a reference
//! to the clock they were bound to and unschedule their timers when
//! they close.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Number of frame samples in the sliding FPS window.
const FPS_WINDOW: usize = 60;

/// A callback scheduled against the clock. The argument is the time in
/// seconds elapsed since the handler last fired.
pub type TimerHandler = Rc<RefCell<dyn FnMut(f64)>>;

struct ScheduledTimer {
    handler: TimerHandler,
    interval: f64,
    last_fire: Instant,
}

#[derive(Default)]
struct ClockState {
    last_tick: Option<Instant>,
    min_frame_time: Option<Duration>,
    samples: VecDeque<f64>,
    scheduled: Vec<ScheduledTimer>,
}

/// Frame clock with interval-based callback scheduling.
#[derive(Clone, Default)]
pub struct Clock {
    state: Rc<RefCell<ClockState>>,
}

impl Clock {
    /// Creates a clock with no FPS limit and nothing scheduled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by one frame and returns the time in seconds
    /// since the previous tick (0.0 on the first tick).
    ///
    /// Sleeps first if an FPS limit is set, then fires every scheduled
    /// handler whose interval has elapsed, passing the actual elapsed
    /// time. Handlers run synchronously on the calling thread.
    pub fn tick(&self) -> f64 {
        let sleep_for = {
            let state = self.state.borrow();
            match (state.min_frame_time, state.last_tick) {
                (Some(min), Some(last)) => min.checked_sub(last.elapsed()),
                _ => None,
            }
        };
        if let Some(remaining) = sleep_for {
            std::thread::sleep(remaining);
        }

        let now = Instant::now();
        let (dt, due) = {
            let mut state = self.state.borrow_mut();
            let dt = state
                .last_tick
                .map_or(0.0, |last| now.duration_since(last).as_secs_f64());
            state.last_tick = Some(now);
            state.samples.push_back(dt);
            if state.samples.len() > FPS_WINDOW {
                state.samples.pop_front();
            }

            let mut due = Vec::new();
            for timer in &mut state.scheduled {
                let elapsed = now.duration_since(timer.last_fire).as_secs_f64();
                if elapsed >= timer.interval {
                    timer.last_fire = now;
                    due.push((Rc::clone(&timer.handler), elapsed));
                }
            }
            (dt, due)
        };

        // State borrow is released before user callbacks run, so a
        // handler may schedule or unschedule timers.
        for (handler, elapsed) in due {
            (handler.borrow_mut())(elapsed);
        }
        dt
    }

    /// Caps the tick rate at `fps` frames per second; 0 removes the cap.
    pub fn set_fps_limit(&self, fps: f64) {
        self.state.borrow_mut().min_frame_time = if fps > 0.0 {
            Some(Duration::from_secs_f64(1.0 / fps))
        } else {
            None
        };
    }

    /// Average frames per second over the recent sample window.
    #[must_use]
    pub fn get_fps(&self) -> f64 {
        let state = self.state.borrow();
        let total: f64 = state.samples.iter().sum();
        if total > 0.0 {
            state.samples.len() as f64 / total
        } else {
            0.0
        }
    }

    /// Schedules `handler` to fire every `interval` seconds (an interval
    /// of 0 fires on every tick). The same handler may be scheduled only
    /// once; rescheduling resets its interval and fire time.
    pub fn schedule_interval(&self, handler: TimerHandler, interval: f64) {
        let mut state = self.state.borrow_mut();
        if let Some(timer) = state
            .scheduled
            .iter_mut()
            .find(|timer| Rc::ptr_eq(&timer.handler, &handler))
        {
            timer.interval = interval;
            timer.last_fire = Instant::now();
            return;
        }
        state.scheduled.push(ScheduledTimer {
            handler,
            interval,
            last_fire: Instant::now(),
        });
    }

    /// Removes `handler` from the schedule. Unscheduling a handler that
    /// is not scheduled is a no-op.
    pub fn unschedule(&self, handler: &TimerHandler) {
        self.state
            .borrow_mut()
            .scheduled
            .retain(|timer| !Rc::ptr_eq(&timer.handler, handler));
    }

    /// Number of currently scheduled handlers.
    #[must_use]
    pub fn scheduled_count(&self) -> usize {
        self.state.borrow().scheduled.len()
    }
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Clock")
            .field("scheduled", &state.scheduled.len())
            .field("min_frame_time", &state.min_frame_time)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (TimerHandler, Rc<RefCell<u32>>) {
        let count = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&count);
        let handler: TimerHandler = Rc::new(RefCell::new(move |_dt| {
            *sink.borrow_mut() += 1;
        }));
        (handler, count)
    }

    #[test]
    fn first_tick_is_zero() {
        let clock = Clock::new();
        assert_eq!(clock.tick(), 0.0);
        assert!(clock.tick() >= 0.0);
    }

    #[test]
    fn zero_interval_fires_every_tick() {
        let clock = Clock::new();
        let (handler, count) = counter();
        clock.schedule_interval(handler, 0.0);
        clock.tick();
        clock.tick();
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn long_interval_does_not_fire_immediately() {
        let clock = Clock::new();
        let (handler, count) = counter();
        clock.schedule_interval(handler, 3600.0);
        clock.tick();
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn unschedule_stops_firing() {
        let clock = Clock::new();
        let (handler, count) = counter();
        clock.schedule_interval(Rc::clone(&handler), 0.0);
        clock.tick();
        clock.unschedule(&handler);
        clock.tick();
        assert_eq!(*count.borrow(), 1);
        assert_eq!(clock.scheduled_count(), 0);
    }

    #[test]
    fn handler_may_unschedule_itself() {
        let clock = Clock::new();
        let inner = Clock::clone(&clock);
        let slot: Rc<RefCell<Option<TimerHandler>>> = Rc::new(RefCell::new(None));
        let slot_ref = Rc::clone(&slot);
        let handler: TimerHandler = Rc::new(RefCell::new(move |_dt| {
            if let Some(me) = slot_ref.borrow().as_ref() {
                inner.unschedule(me);
            }
        }));
        *slot.borrow_mut() = Some(Rc::clone(&handler));
        clock.schedule_interval(handler, 0.0);
        clock.tick();
        assert_eq!(clock.scheduled_count(), 0);
    }
}
