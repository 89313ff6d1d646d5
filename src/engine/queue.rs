//! Time-ordered event queue
//!
//! Pending events form a doubly linked list threaded through an arena of
//! slots, kept in non-decreasing time order. Events with equal times stay in
//! the order they were scheduled. The queue owns the only links; owners hold
//! an [`EventId`] and hand it back to cancel or move their event.
//!
//! Searches for an insertion point walk linearly from the nearer end, which is
//! plenty for the handful of events a rotation keeps in flight.

use tracing::trace;

use super::event::{EventId, EventState};
use crate::core::error::{Result, SimError};
use crate::core::types::Tick;

#[derive(Debug)]
struct Slot<E> {
    generation: u32,
    state: EventState,
    time: Tick,
    prev: Option<u32>,
    next: Option<u32>,
    payload: Option<E>,
}

/// Ordered queue of scheduled events with a monotonic clock
#[derive(Debug)]
pub struct EventQueue<E> {
    slots: Vec<Slot<E>>,
    free: Vec<u32>,
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
    now: Tick,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            now: 0,
        }
    }

    /// Current simulation time (time of the most recently fired event)
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Number of scheduled events
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Lifecycle state of an event, or `None` once its slot was reused
    pub fn state(&self, id: EventId) -> Option<EventState> {
        self.slot(id).map(|slot| slot.state)
    }

    /// Absolute time an event will fire at, if it is scheduled
    pub fn time_of(&self, id: EventId) -> Option<Tick> {
        self.slot(id)
            .filter(|slot| slot.state == EventState::Scheduled)
            .map(|slot| slot.time)
    }

    /// Time of the earliest scheduled event
    pub fn peek_time(&self) -> Option<Tick> {
        self.head.map(|index| self.time_at(index))
    }

    /// Scheduled events front to back
    pub fn scheduled(&self) -> impl Iterator<Item = (EventId, Tick)> + '_ {
        std::iter::successors(self.head, move |&index| self.slots[index as usize].next).map(
            move |index| {
                let slot = &self.slots[index as usize];
                let id = EventId {
                    index,
                    generation: slot.generation,
                };
                (id, slot.time)
            },
        )
    }

    /// Store a new event in state `Created` without scheduling it
    pub fn create(&mut self, payload: E) -> EventId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.state = EventState::Created;
            slot.time = 0;
            slot.prev = None;
            slot.next = None;
            slot.payload = Some(payload);
            return EventId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            state: EventState::Created,
            time: 0,
            prev: None,
            next: None,
            payload: Some(payload),
        });
        EventId {
            index,
            generation: 0,
        }
    }

    /// Create an event and schedule it `delay` ticks from now
    pub fn push(&mut self, delay: Tick, payload: E) -> Result<EventId> {
        let id = self.create(payload);
        self.schedule(delay, id)?;
        Ok(id)
    }

    /// Schedule a created event `delay` ticks from now
    ///
    /// The event lands after every queued event with an equal or earlier
    /// time. Only events in state `Created` can be scheduled: a scheduled
    /// event must be moved with [`reschedule`](Self::reschedule), and finished
    /// events are discarded for good.
    pub fn schedule(&mut self, delay: Tick, id: EventId) -> Result<()> {
        let state = self.state(id).ok_or_else(|| {
            SimError::InvalidState(format!("cannot schedule {id}: event was discarded"))
        })?;
        if state != EventState::Created {
            return Err(SimError::InvalidState(format!(
                "cannot schedule {id}: event is {state}"
            )));
        }

        let time = self.now.saturating_add(delay);
        let mut prev = self.tail;
        while let Some(p) = prev {
            if self.time_at(p) > time {
                prev = self.slots[p as usize].prev;
            } else {
                break;
            }
        }

        let slot = &mut self.slots[id.index as usize];
        slot.time = time;
        slot.state = EventState::Scheduled;
        self.link_after(id.index, prev);
        self.len += 1;

        trace!(target: "rotation_sim::engine", %id, time, "scheduled");
        Ok(())
    }

    /// Move a scheduled event so it fires `delay` ticks from now
    ///
    /// Does nothing if the event is not scheduled.
    pub fn reschedule(&mut self, delay: Tick, id: EventId) {
        if self.state(id) != Some(EventState::Scheduled) {
            trace!(target: "rotation_sim::engine", %id, "reschedule ignored");
            return;
        }

        let index = id.index;
        let time = self.now.saturating_add(delay);
        let current = self.time_at(index);

        if time < current {
            let old_prev = self.slots[index as usize].prev;
            let mut prev = old_prev;
            while let Some(p) = prev {
                if self.time_at(p) > time {
                    prev = self.slots[p as usize].prev;
                } else {
                    break;
                }
            }
            if prev != old_prev {
                self.unlink(index);
                self.link_after(index, prev);
            }
        } else if time > current {
            let old_next = self.slots[index as usize].next;
            let mut next = old_next;
            while let Some(n) = next {
                if self.time_at(n) <= time {
                    next = self.slots[n as usize].next;
                } else {
                    break;
                }
            }
            if next != old_next {
                self.unlink(index);
                self.link_before(index, next);
            }
        }

        self.slots[index as usize].time = time;
        trace!(target: "rotation_sim::engine", %id, from = current, to = time, "rescheduled");
    }

    /// Remove a scheduled event without running it
    ///
    /// Does nothing if the event is not scheduled.
    pub fn cancel(&mut self, id: EventId) {
        if self.state(id) != Some(EventState::Scheduled) {
            trace!(target: "rotation_sim::engine", %id, "cancel ignored");
            return;
        }

        self.unlink(id.index);
        self.len -= 1;
        let slot = &mut self.slots[id.index as usize];
        slot.state = EventState::Cancelled;
        slot.payload = None;
        self.free.push(id.index);

        trace!(target: "rotation_sim::engine", %id, "cancelled");
    }

    /// Take the earliest event if it is due strictly before `end`
    ///
    /// Advances the clock to the event's time and marks it executed; the
    /// caller is responsible for running its payload.
    pub fn pop_due(&mut self, end: Tick) -> Option<(EventId, E)> {
        let index = self.head?;
        if self.time_at(index) >= end {
            return None;
        }

        self.unlink(index);
        self.len -= 1;

        let slot = &mut self.slots[index as usize];
        let payload = slot.payload.take()?;
        slot.state = EventState::Executed;
        self.now = slot.time;
        let id = EventId {
            index,
            generation: slot.generation,
        };
        self.free.push(index);

        trace!(target: "rotation_sim::engine", %id, now = self.now, "executing");
        Some((id, payload))
    }

    /// Fire every event due strictly before `end`, in order
    ///
    /// The handler may schedule, move or cancel events on this queue; new
    /// events due before `end` fire within the same call. Stops at the first
    /// handler error. Returns the number of events fired.
    pub fn run_until<F>(&mut self, end: Tick, mut handler: F) -> Result<usize>
    where
        F: FnMut(&mut Self, EventId, E) -> Result<()>,
    {
        let mut fired = 0;
        while let Some((id, payload)) = self.pop_due(end) {
            handler(self, id, payload)?;
            fired += 1;
        }
        Ok(fired)
    }

    /// Cancel every scheduled event and rewind the clock to zero
    pub fn reset(&mut self) {
        while let Some(index) = self.head {
            let generation = self.slots[index as usize].generation;
            self.cancel(EventId { index, generation });
        }
        self.now = 0;
    }

    fn slot(&self, id: EventId) -> Option<&Slot<E>> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
    }

    fn time_at(&self, index: u32) -> Tick {
        self.slots[index as usize].time
    }

    fn unlink(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        let prev = slot.prev.take();
        let next = slot.next.take();

        match prev {
            Some(p) => self.slots[p as usize].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n as usize].prev = prev,
            None => self.tail = prev,
        }
    }

    fn link(&mut self, index: u32, prev: Option<u32>, next: Option<u32>) {
        let slot = &mut self.slots[index as usize];
        slot.prev = prev;
        slot.next = next;

        match prev {
            Some(p) => self.slots[p as usize].next = Some(index),
            None => self.head = Some(index),
        }
        match next {
            Some(n) => self.slots[n as usize].prev = Some(index),
            None => self.tail = Some(index),
        }
    }

    fn link_after(&mut self, index: u32, prev: Option<u32>) {
        let next = match prev {
            Some(p) => self.slots[p as usize].next,
            None => self.head,
        };
        self.link(index, prev, next);
    }

    fn link_before(&mut self, index: u32, next: Option<u32>) {
        let prev = match next {
            Some(n) => self.slots[n as usize].prev,
            None => self.tail,
        };
        self.link(index, prev, next);
    }
}
