use petrack_domain::domain_event::{DomainEvent, EventKind};
use petrack_macros::domain_event;

#[domain_event(version = 1)]
enum ShelterEvent {
    #[event(event_type = "shelter.opened")]
    Opened { shelter_id: String, name: String },
    #[event(event_type = "shelter.renamed", event_version = 2)]
    Renamed { shelter_id: String, to: String },
    Closed { shelter_id: String },
}

fn main() {
    let ev = ShelterEvent::opened("s-1".to_string(), "north".to_string());
    assert_eq!(ev.event_type(), "shelter.opened");
    assert_eq!(ev.schema_version(), 1);
    assert_eq!(ev.kind(), ShelterEventKind::Opened);

    let renamed = ShelterEvent::renamed("s-1".to_string(), "south".to_string());
    assert_eq!(renamed.schema_version(), 2);

    let closed = ShelterEvent::closed("s-1".to_string());
    assert_eq!(closed.event_type(), "Closed");
    assert_eq!(ShelterEventKind::ALL.len(), 3);
    assert_eq!(ShelterEventKind::Renamed.name(), "shelter.renamed");
    assert_eq!(ShelterEventKind::Closed.to_string(), "Closed");
}
