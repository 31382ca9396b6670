//! Deferred per-part actions, run a number of host ticks after scheduling.
//!
//! Tasks are keyed by part identity. A task whose part no longer resolves
//! when it comes due is dropped without effect.

use crate::domain::model::{Part, PartId};
use crate::domain::ports::PartLookup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferredAction {
    /// Regenerate cached drag data once the new geometry has been observed.
    RefreshDragCube,
    RefreshMassDisplay,
}

impl DeferredAction {
    pub fn apply(self, part: &mut Part) {
        match self {
            DeferredAction::RefreshDragCube => part.drag_cube.refresh(),
            DeferredAction::RefreshMassDisplay => {
                part.mass_display = format_mass(part.total_mass());
            }
        }
    }
}

/// Mass in tons, shown in kilograms below one ton.
pub fn format_mass(tons: f64) -> String {
    if tons < 1.0 {
        format!("{:.1} kg", tons * 1000.0)
    } else {
        format!("{:.3} t", tons)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct ScheduledTask {
    id: TaskId,
    due_tick: u64,
    part: PartId,
    action: DeferredAction,
}

#[derive(Debug, Default)]
pub struct TickScheduler {
    tick: u64,
    next_id: u64,
    tasks: Vec<ScheduledTask>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Schedules `action` for `part` after `delay` ticks. Scheduling an action
    /// that is already pending for the part moves it instead of duplicating it.
    pub fn schedule(&mut self, part: PartId, action: DeferredAction, delay: u64) -> TaskId {
        let due_tick = self.tick + delay.max(1);
        if let Some(task) = self
            .tasks
            .iter_mut()
            .find(|t| t.part == part && t.action == action)
        {
            task.due_tick = due_tick;
            return task.id;
        }
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            due_tick,
            part,
            action,
        });
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Cancels everything pending for a part; hosts call this on destruction.
    pub fn cancel_for(&mut self, part: PartId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.part != part);
        before - self.tasks.len()
    }

    pub fn is_pending(&self, part: PartId, action: DeferredAction) -> bool {
        self.tasks
            .iter()
            .any(|t| t.part == part && t.action == action)
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Advances one tick and runs the tasks that came due, in scheduling
    /// order. Returns how many took effect.
    pub fn advance<L: PartLookup + ?Sized>(&mut self, parts: &mut L) -> usize {
        self.tick += 1;
        let tick = self.tick;
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|t| t.due_tick <= tick);
        self.tasks = waiting;

        let mut executed = 0;
        for task in due {
            match parts.part_mut(task.part) {
                Some(part) => {
                    task.action.apply(part);
                    executed += 1;
                }
                None => {
                    tracing::debug!(
                        "Part {} is gone, dropping deferred {:?}",
                        task.part,
                        task.action
                    );
                }
            }
        }
        executed
    }
}
