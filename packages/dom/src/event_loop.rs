//! Event Loop
//!
//! Cooperative, single-threaded task scheduling with a virtual clock. Timers
//! and animation frames only run when the loop is driven (`advance_by`,
//! `run_until_idle`); microtasks are drained after every task.

use std::cell::RefCell;
use std::collections::VecDeque;

/// Frame length used by `request_animation_frame`
pub const FRAME_MS: f64 = 16.0;

const MAX_IDLE_ITERATIONS: usize = 10_000;

pub type Task = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Timer {
    id: TimerId,
    due: f64,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct LoopState {
    now: f64,
    next_id: u64,
    seq: u64,
    timers: Vec<Timer>,
    microtasks: VecDeque<Task>,
}

thread_local! {
    static EVENT_LOOP: RefCell<LoopState> = RefCell::new(LoopState::default());
}

/// Current virtual time in milliseconds
pub fn now() -> f64 {
    EVENT_LOOP.with(|l| l.borrow().now)
}

fn schedule(due: f64, task: Task) -> TimerId {
    EVENT_LOOP.with(|l| {
        let mut state = l.borrow_mut();
        state.next_id += 1;
        state.seq += 1;
        let id = TimerId(state.next_id);
        let seq = state.seq;
        state.timers.push(Timer { id, due, seq, task });
        id
    })
}

pub fn set_timeout(delay_ms: f64, f: impl FnOnce() + 'static) -> TimerId {
    let due = now() + delay_ms.max(0.0);
    schedule(due, Box::new(f))
}

/// Returns whether a pending timer was cancelled
pub fn clear_timeout(id: TimerId) -> bool {
    EVENT_LOOP.with(|l| {
        let mut state = l.borrow_mut();
        let before = state.timers.len();
        state.timers.retain(|t| t.id != id);
        state.timers.len() != before
    })
}

/// Run `f` at the next frame boundary
pub fn request_animation_frame(f: impl FnOnce() + 'static) -> TimerId {
    let current = now();
    let due = ((current / FRAME_MS).floor() + 1.0) * FRAME_MS;
    schedule(due, Box::new(f))
}

pub fn cancel_animation_frame(id: TimerId) -> bool {
    clear_timeout(id)
}

pub fn queue_microtask(f: impl FnOnce() + 'static) {
    EVENT_LOOP.with(|l| l.borrow_mut().microtasks.push_back(Box::new(f)));
}

/// Drain the microtask queue, including microtasks queued while draining.
pub fn run_microtasks() -> usize {
    let mut ran = 0;
    loop {
        let task = EVENT_LOOP.with(|l| l.borrow_mut().microtasks.pop_front());
        match task {
            Some(task) => {
                task();
                ran += 1;
            }
            None => return ran,
        }
    }
}

fn take_next_timer(deadline: Option<f64>) -> Option<Timer> {
    EVENT_LOOP.with(|l| {
        let mut state = l.borrow_mut();
        let index = state
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| deadline.map_or(true, |d| t.due <= d))
            .min_by(|(_, a), (_, b)| {
                a.due
                    .partial_cmp(&b.due)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(i, _)| i)?;
        let timer = state.timers.remove(index);
        if timer.due > state.now {
            state.now = timer.due;
        }
        Some(timer)
    })
}

/// Move the clock forward, running every timer that becomes due.
/// Returns the number of tasks run (timers and microtasks).
pub fn advance_by(ms: f64) -> usize {
    let deadline = now() + ms.max(0.0);
    let mut ran = run_microtasks();
    while let Some(timer) = take_next_timer(Some(deadline)) {
        (timer.task)();
        ran += 1 + run_microtasks();
    }
    EVENT_LOOP.with(|l| {
        let mut state = l.borrow_mut();
        if deadline > state.now {
            state.now = deadline;
        }
    });
    ran
}

/// Run until no timers or microtasks remain, jumping the clock as needed.
pub fn run_until_idle() -> usize {
    let mut ran = run_microtasks();
    let mut iterations = 0;
    while let Some(timer) = take_next_timer(None) {
        (timer.task)();
        ran += 1 + run_microtasks();
        iterations += 1;
        if iterations >= MAX_IDLE_ITERATIONS {
            tracing::warn!("event loop did not become idle after {} timers", iterations);
            break;
        }
    }
    ran
}

pub fn pending_timers() -> usize {
    EVENT_LOOP.with(|l| l.borrow().timers.len())
}

pub fn pending_microtasks() -> usize {
    EVENT_LOOP.with(|l| l.borrow().microtasks.len())
}

/// Drop all pending work and rewind the clock
pub fn reset() {
    let dropped = EVENT_LOOP.with(|l| {
        let mut state = l.borrow_mut();
        let timers = std::mem::take(&mut state.timers);
        let microtasks = std::mem::take(&mut state.microtasks);
        state.now = 0.0;
        (timers, microtasks)
    });
    drop(dropped);
}
