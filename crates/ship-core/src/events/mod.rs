//! Event System
//!
//! Voyage events are defined in the `ship-events` crate; this module adds
//! the per-day queue, the JSONL logger and the catalog of what can happen.

pub mod catalog;
pub mod logger;

pub use logger::EventLogger;
pub use ship_events::*;

use bevy_ecs::prelude::*;

/// Resource storing events generated during the current day
#[derive(Resource, Debug)]
pub struct DayEvents {
    pub events: Vec<VoyageEvent>,
    next_event_id: u64,
}

impl Default for DayEvents {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            next_event_id: 1,
        }
    }
}

impl DayEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids keep counting across days so every event in a run is unique
    pub fn generate_id(&mut self) -> String {
        let id = generate_event_id(self.next_event_id);
        self.next_event_id += 1;
        id
    }

    pub fn push(&mut self, event: VoyageEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<VoyageEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn of_type(&self, event_type: EventType) -> impl Iterator<Item = &VoyageEvent> {
        self.events.iter().filter(move |e| e.event_type == event_type)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_continue_after_drain() {
        let mut day = DayEvents::new();
        let first = day.generate_id();
        day.push(VoyageEvent::new(first.clone(), 1, EventType::Incident, "theft", "stolen food"));
        assert_eq!(first, "evt_00000001");

        let drained = day.drain();
        assert_eq!(drained.len(), 1);
        assert!(day.is_empty());
        assert_eq!(day.generate_id(), "evt_00000002");
    }

    #[test]
    fn test_filter_by_type() {
        let mut day = DayEvents::new();
        for (event_type, subtype) in [
            (EventType::Incident, "fight"),
            (EventType::Protest, "organized"),
            (EventType::Incident, "accident"),
        ] {
            let id = day.generate_id();
            day.push(VoyageEvent::new(id, 3, event_type, subtype, ""));
        }
        assert_eq!(day.of_type(EventType::Incident).count(), 2);
        assert_eq!(day.of_type(EventType::Mutiny).count(), 0);
    }
}
