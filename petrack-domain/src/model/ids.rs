use petrack_macros::entity_id;

#[entity_id]
pub struct PetId(String);

#[entity_id]
pub struct UserId(String);

#[entity_id]
pub struct BreedId(String);

#[entity_id]
pub struct MorphologyId(String);

#[entity_id]
pub struct PetRecordId(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(PetId::generate(), PetId::generate());
    }

    #[test]
    fn conversions() {
        let id: UserId = "u-42".parse().unwrap();
        assert_eq!(id.as_str(), "u-42");
        assert_eq!(id, UserId::from("u-42"));
        assert_eq!(String::from(id.clone()), "u-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u-42\"");
        assert!(UserId::default().as_str().is_empty());
    }
}
