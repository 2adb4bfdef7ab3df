use petrack_macros::entity_id;

#[entity_id]
struct OwnerId(String);

#[entity_id]
pub struct PetTagId(String);

fn main() {
    let id = OwnerId::new("owner-1");
    assert_eq!(id.as_str(), "owner-1");
    assert_eq!(id.to_string(), "owner-1");

    let parsed: OwnerId = "owner-1".parse().unwrap();
    assert_eq!(parsed, id);

    let a = PetTagId::generate();
    let b = PetTagId::generate();
    assert_ne!(a, b);

    let raw: String = a.into();
    assert!(!raw.is_empty());
}
