use petrack_domain::aggregate::AggregateRoot;
use petrack_domain::entity::Entity;
use petrack_domain::value_object::Version;
use petrack_macros::{aggregate_root, domain_event, entity, entity_id};

#[entity_id]
struct KennelId(String);

#[domain_event]
enum KennelEvent {
    Cleaned { kennel_id: KennelId },
}

#[aggregate_root(event = KennelEvent)]
#[entity(id = KennelId)]
#[derive(Clone)]
struct Kennel {
    name: String,
}

fn main() {
    let mut kennel = Kennel::new(KennelId::new("k-1"), Version::new());
    kennel.name = "north".to_string();
    assert!(!kennel.has_pending_events());

    kennel.append_event(KennelEvent::cleaned(kennel.id().clone()));
    assert_eq!(kennel.pending_count(), 1);

    // 待发布事件不参与序列化
    let json = serde_json::to_value(&kennel).unwrap();
    assert!(json.get("domain_events").is_none());

    kennel.clear_pending_events();
    assert!(!kennel.has_pending_events());
}
