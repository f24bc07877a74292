use crate::battle::state::AttackKind;
use std::time::Duration;

/// Deferred battle step, resolved when its due time is reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskKind {
    /// Damage was rolled when the attack was accepted.
    ResolvePlayerAttack { kind: AttackKind, damage: u16 },
    /// Success was rolled when the ball was thrown.
    ResolveCapture { success: bool },
    EnemyAttack,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTask {
    pub session_id: u64,
    pub due_at: Duration,
    pub kind: TaskKind,
    seq: u64,
}

/// Logical-clock task queue. Nothing here reads wall-clock time: the clock
/// only moves when a front end calls `advance_to`, or as due tasks are popped.
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    now: Duration,
    next_seq: u64,
    /// Sorted by `(due_at, seq)`, so equal due times fire in scheduling order.
    tasks: Vec<ScheduledTask>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, session_id: u64, delay: Duration, kind: TaskKind) -> Duration {
        let due_at = self.now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;

        let index = self
            .tasks
            .partition_point(|t| (t.due_at, t.seq) <= (due_at, seq));
        self.tasks.insert(
            index,
            ScheduledTask {
                session_id,
                due_at,
                kind,
                seq,
            },
        );
        tracing::trace!(session_id, ?kind, due_ms = due_at.as_millis() as u64, "task scheduled");
        due_at
    }

    /// Removes the earliest task due at or before `deadline` and moves the
    /// clock to its due time.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<ScheduledTask> {
        if self.tasks.first()?.due_at > deadline {
            return None;
        }
        let task = self.tasks.remove(0);
        self.now = self.now.max(task.due_at);
        Some(task)
    }

    /// Moves the clock forward. The clock never runs backwards.
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.tasks.first().map(|t| t.due_at)
    }

    /// Drops every queued task of a session. Returns how many were dropped.
    pub fn cancel_session(&mut self, session_id: u64) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.session_id != session_id);
        before - self.tasks.len()
    }

    pub fn pending(&self) -> &[ScheduledTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
