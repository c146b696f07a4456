//! Run loop.
//!
//! Drives a backend adapter frame by frame: the clock paces the loop
//! and fires interval timers, the adapter drains native events and runs
//! the draw/idle/swap phase for every live window. The loop ends when
//! the last window closes.

use crate::backend::Backend;
use crate::clock::Clock;
use crate::event::{EventArgs, EventType};

/// Runs `backend` until its last window closes.
///
/// Before the first frame every live window is bound to `clock` (which
/// arms its timer stack) and receives `on_init` exactly once; the fps
/// limit is set to `framerate` (0 disables the cap). Each frame then
/// ticks the clock and hands the elapsed time to [`Backend::process`].
pub fn run(backend: &mut dyn Backend, clock: &Clock, framerate: f64) {
    clock.set_fps_limit(framerate);
    for id in backend.window_ids() {
        if let Some(window) = backend.window_mut(id) {
            window.bind_clock(clock.clone());
            window.emit(EventType::Init, &EventArgs::None);
        }
    }
    log::info!(
        "entering run loop: {} backend, {} window(s)",
        backend.name(),
        backend.window_count()
    );
    while backend.process(clock.tick()) > 0 {}
    log::info!("run loop finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::backend::headless::HeadlessBackend;
    use crate::config::Config;
    use crate::window::WindowSettings;

    #[test]
    fn init_fires_once_then_loop_ends_when_last_window_closes() {
        let mut backend = HeadlessBackend::new();
        let id = backend
            .create_window(&WindowSettings::default(), &Config::default())
            .unwrap();

        let inits = Rc::new(RefCell::new(0));
        let draws = Rc::new(RefCell::new(0));
        {
            let window = backend.window_mut(id).unwrap();
            let inits = Rc::clone(&inits);
            window
                .attach(EventType::Init, move |_| *inits.borrow_mut() += 1)
                .unwrap();
            let draws = Rc::clone(&draws);
            let close = window.close_handle();
            window
                .attach(EventType::Draw, move |_| {
                    *draws.borrow_mut() += 1;
                    if *draws.borrow() == 3 {
                        close.request();
                    }
                })
                .unwrap();
        }

        let clock = Clock::new();
        run(&mut backend, &clock, 0.0);

        assert_eq!(*inits.borrow(), 1);
        // The close request lands during frame 3; the adapter finalizes
        // it at the start of frame 4, before dispatching any draw.
        assert_eq!(*draws.borrow(), 3);
        assert_eq!(backend.window_count(), 0);
    }

    #[test]
    fn timers_armed_at_run_fire_against_the_loop_clock() {
        let mut backend = HeadlessBackend::new();
        let id = backend
            .create_window(&WindowSettings::default(), &Config::default())
            .unwrap();

        let ticks = Rc::new(RefCell::new(0));
        {
            let window = backend.window_mut(id).unwrap();
            let ticks = Rc::clone(&ticks);
            // Zero interval: due on every clock tick.
            window.timer(0.0, move |_dt| *ticks.borrow_mut() += 1);
            let close = window.close_handle();
            let mut frames = 0;
            window
                .attach(EventType::Draw, move |_| {
                    frames += 1;
                    if frames == 2 {
                        close.request();
                    }
                })
                .unwrap();
        }

        let clock = Clock::new();
        run(&mut backend, &clock, 0.0);
        assert!(*ticks.borrow() >= 2);
    }

    #[test]
    fn run_returns_immediately_with_no_windows() {
        let mut backend = HeadlessBackend::new();
        let clock = Clock::new();
        run(&mut backend, &clock, 60.0);
        assert_eq!(backend.window_count(), 0);
    }
}
