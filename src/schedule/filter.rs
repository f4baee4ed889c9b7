use super::model::{Event, SessionType};

/// Narrow an event list down. Every criterion that is set must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub program: Option<String>,
    pub session_type: Option<SessionType>,
    pub room: Option<String>,
    /// one of the instructors, compared as written
    pub lecturer: Option<String>,
}

impl EventFilter {
    pub fn is_empty(&self) -> bool {
        self.program.is_none() && self.session_type.is_none() && self.room.is_none() && self.lecturer.is_none()
    }

    pub fn matches(&self, event: &Event) -> bool {
        if let Some(program) = &self.program {
            if &event.program != program {
                return false;
            }
        }
        if self.session_type.is_some() && event.session_type != self.session_type {
            return false;
        }
        if self.room.is_some() && event.location != self.room {
            return false;
        }
        if let Some(lecturer) = &self.lecturer {
            if !event.instructors.iter().any(|i| i == lecturer) {
                return false;
            }
        }
        true
    }

    /// keep the matching events, order unchanged
    pub fn apply(&self, events: Vec<Event>) -> Vec<Event> {
        if self.is_empty() {
            return events;
        }
        events.into_iter().filter(|e| self.matches(e)).collect()
    }
}
