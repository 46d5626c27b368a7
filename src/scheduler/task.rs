use crate::color::Color;

pub trait TaskId: Copy {}

/// Extra argument handed to the task when it fires
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Plain,
    WithColor(Color),
}

impl Payload {
    pub fn color_or(self, fallback: Color) -> Color {
        match self {
            Payload::Plain => fallback,
            Payload::WithColor(color) => color,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Task<T: TaskId> {
    pub id: T,
    /// Due time in milliseconds
    pub timestamp: u32,
    /// Repeat interval; `None` for one-shot tasks
    pub period: Option<u32>,
    pub payload: Payload,
    pub(super) sequence: u32,
}

impl<T: TaskId> Task<T> {
    pub fn new(id: T, timestamp: u32, period: Option<u32>, payload: Payload) -> Self {
        Self {
            id,
            timestamp,
            period,
            payload,
            sequence: 0,
        }
    }

    /// Milliseconds past due, or `None` if the task is not due yet
    pub(super) fn overdue_by(&self, now: u32) -> Option<u32> {
        let overdue = now.wrapping_sub(self.timestamp);
        if overdue > i32::MAX as u32 {
            None
        } else {
            Some(overdue)
        }
    }
}
