use petrack_macros::domain_event;
use serde::{Deserialize, Serialize};

#[domain_event]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum KennelEvent {
    Cleaned { kennel_id: String, by: Option<String> },
}

fn main() {
    let ev = KennelEvent::cleaned("k-1".to_string(), None);
    let json = serde_json::to_string(&ev).unwrap();
    let back: KennelEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(ev, back);
}
