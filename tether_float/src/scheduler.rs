// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative single-threaded task queues: render-flush ticks and animation frames.
//!
//! The controller suspends in exactly two places: after a render pass (before starting
//! auto-update) and for one animation frame (when coalescing virtual-reference updates).
//! The host drives both queues by calling [`Scheduler::flush_ticks`] after each render
//! and [`Scheduler::run_animation_frame`] once per frame.
//!
//! Each drain runs only the tasks queued before it started; tasks queued while draining
//! wait for the next drain. A cancelled task never runs, even when it was cancelled by an
//! earlier task in the same drain.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

/// Handle of a queued task, used to cancel it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

type Task = Box<dyn FnOnce()>;

#[derive(Default)]
struct Queues {
    next_id: u64,
    ticks: VecDeque<(TaskId, Task)>,
    frames: VecDeque<(TaskId, Task)>,
    frames_run: u64,
}

impl Queues {
    fn allocate(&mut self) -> TaskId {
        self.next_id += 1;
        TaskId(self.next_id)
    }
}

#[derive(Copy, Clone)]
enum Queue {
    Ticks,
    Frames,
}

/// Tick and animation-frame queues of one host.
#[derive(Default)]
pub struct Scheduler {
    queues: RefCell<Queues>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = self.queues.borrow();
        f.debug_struct("Scheduler")
            .field("pending_ticks", &q.ticks.len())
            .field("pending_frames", &q.frames.len())
            .field("frames_run", &q.frames_run)
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Create empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after the current render pass.
    pub fn next_tick(&self, task: impl FnOnce() + 'static) -> TaskId {
        let mut q = self.queues.borrow_mut();
        let id = q.allocate();
        q.ticks.push_back((id, Box::new(task)));
        id
    }

    /// Run `task` on the next animation frame.
    pub fn request_animation_frame(&self, task: impl FnOnce() + 'static) -> TaskId {
        let mut q = self.queues.borrow_mut();
        let id = q.allocate();
        q.frames.push_back((id, Box::new(task)));
        id
    }

    /// Drop a queued task. Returns `false` if it already ran or was cancelled.
    pub fn cancel(&self, id: TaskId) -> bool {
        let mut q = self.queues.borrow_mut();
        if let Some(i) = q.ticks.iter().position(|(t, _)| *t == id) {
            q.ticks.remove(i);
            return true;
        }
        if let Some(i) = q.frames.iter().position(|(t, _)| *t == id) {
            q.frames.remove(i);
            return true;
        }
        false
    }

    /// Run the ticks queued so far. Returns how many ran.
    pub fn flush_ticks(&self) -> usize {
        self.drain(Queue::Ticks)
    }

    /// Run the frame callbacks queued so far. Returns how many ran.
    pub fn run_animation_frame(&self) -> usize {
        self.queues.borrow_mut().frames_run += 1;
        self.drain(Queue::Frames)
    }

    /// Number of ticks waiting for the next flush.
    pub fn pending_ticks(&self) -> usize {
        self.queues.borrow().ticks.len()
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending_frames(&self) -> usize {
        self.queues.borrow().frames.len()
    }

    /// Number of frames run so far.
    pub fn frames_run(&self) -> u64 {
        self.queues.borrow().frames_run
    }

    fn drain(&self, queue: Queue) -> usize {
        let batch: Vec<TaskId> = {
            let q = self.queues.borrow();
            match queue {
                Queue::Ticks => q.ticks.iter().map(|(id, _)| *id).collect(),
                Queue::Frames => q.frames.iter().map(|(id, _)| *id).collect(),
            }
        };
        let mut ran = 0;
        for id in batch {
            let task = {
                let mut q = self.queues.borrow_mut();
                let list = match queue {
                    Queue::Ticks => &mut q.ticks,
                    Queue::Frames => &mut q.frames,
                };
                list.iter()
                    .position(|(t, _)| *t == id)
                    .and_then(|i| list.remove(i))
            };
            if let Some((_, task)) = task {
                task();
                ran += 1;
            }
        }
        ran
    }
}
