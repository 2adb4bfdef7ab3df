use super::ids::{BreedId, MorphologyId, PetId, UserId};
use crate::aggregate::AggregateRoot;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::events::PetrackEvent;
use crate::value_object::Version;
use bon::Builder;
use chrono::{DateTime, Utc};
use petrack_macros::{aggregate_root, entity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

/// 登记新宠物所需的数据
#[derive(Builder, Debug, Clone)]
pub struct NewPet {
    #[builder(into)]
    name: String,
    owner_id: UserId,
    breed_id: BreedId,
    #[builder(default)]
    gender: Gender,
    #[builder(into)]
    description: Option<String>,
    birth_date: Option<DateTime<Utc>>,
    morphology_id: Option<MorphologyId>,
}

#[aggregate_root(event = PetrackEvent)]
#[entity(id = PetId)]
#[derive(Clone)]
pub struct Pet {
    name: String,
    description: Option<String>,
    birth_date: Option<DateTime<Utc>>,
    owner_id: UserId,
    breed_id: BreedId,
    gender: Gender,
    morphology_id: Option<MorphologyId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    is_deleted: bool,
}

impl Pet {
    /// 登记新宠物，记录 `PetCreated`
    pub fn register(new: NewPet) -> DomainResult<Self> {
        if new.name.trim().is_empty() {
            return Err(DomainError::invalid_value("pet name cannot be empty"));
        }
        if new.owner_id.as_str().is_empty() {
            return Err(DomainError::invalid_value("owner id cannot be empty"));
        }

        let now = Utc::now();
        let mut pet = Pet::new(PetId::generate(), Version::new());
        pet.name = new.name;
        pet.description = new.description;
        pet.birth_date = new.birth_date;
        pet.owner_id = new.owner_id;
        pet.breed_id = new.breed_id;
        pet.gender = new.gender;
        pet.morphology_id = new.morphology_id;
        pet.created_at = now;
        pet.updated_at = now;

        let event = PetrackEvent::pet_created(
            pet.id.clone(),
            pet.owner_id.clone(),
            pet.breed_id.clone(),
        );
        pet.append_event(event);
        Ok(pet)
    }

    /// 转移所有权，记录 `PetOwnershipChanged`
    pub fn change_owner(&mut self, new_owner_id: UserId) -> DomainResult<()> {
        if new_owner_id.as_str().is_empty() {
            return Err(DomainError::invalid_value("owner id cannot be empty"));
        }

        let old_owner_id = std::mem::replace(&mut self.owner_id, new_owner_id.clone());
        self.touch();
        self.append_event(PetrackEvent::pet_ownership_changed(
            self.id.clone(),
            old_owner_id,
            new_owner_id,
        ));
        Ok(())
    }

    /// 更新形态（可清空），记录 `PetMorphologyUpdated`
    pub fn update_morphology(&mut self, morphology_id: Option<MorphologyId>) {
        let old = std::mem::replace(&mut self.morphology_id, morphology_id.clone());
        self.touch();
        self.append_event(PetrackEvent::pet_morphology_updated(
            self.id.clone(),
            self.owner_id.clone(),
            old,
            morphology_id,
        ));
    }

    /// 标记删除，记录 `PetDeleted`
    pub fn mark_deleted(&mut self) -> DomainResult<()> {
        if self.is_deleted {
            return Err(DomainError::invalid_state(format!(
                "pet {} is already deleted",
                self.id
            )));
        }
        self.is_deleted = true;
        self.touch();
        self.append_event(PetrackEvent::pet_deleted(
            self.id.clone(),
            self.owner_id.clone(),
        ));
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn birth_date(&self) -> Option<&DateTime<Utc>> {
        self.birth_date.as_ref()
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn breed_id(&self) -> &BreedId {
        &self.breed_id
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn morphology_id(&self) -> Option<&MorphologyId> {
        self.morphology_id.as_ref()
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn updated_at(&self) -> &DateTime<Utc> {
        &self.updated_at
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_event::DomainEvent;
    use crate::events::PetrackEventKind;

    fn new_pet() -> Pet {
        Pet::register(
            NewPet::builder()
                .name("Mochi")
                .owner_id(UserId::new("owner-1"))
                .breed_id(BreedId::new("ball-python"))
                .gender(Gender::Female)
                .build(),
        )
        .unwrap()
    }

    #[test]
    fn register_records_created_event() {
        let pet = new_pet();
        assert_eq!(pet.name(), "Mochi");
        assert_eq!(pet.gender(), Gender::Female);
        assert!(pet.version().is_new());

        let events = pet.pending_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            PetrackEvent::PetCreated {
                pet_id,
                owner_id,
                breed_id,
                ..
            } => {
                assert_eq!(pet_id, pet.id());
                assert_eq!(owner_id.as_str(), "owner-1");
                assert_eq!(breed_id.as_str(), "ball-python");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn register_rejects_blank_name() {
        let err = Pet::register(
            NewPet::builder()
                .name("  ")
                .owner_id(UserId::new("owner-1"))
                .breed_id(BreedId::new("b"))
                .build(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidValue { .. }));
    }

    #[test]
    fn change_owner_records_old_and_new() {
        let mut pet = new_pet();
        pet.clear_pending_events();

        pet.change_owner(UserId::new("owner-2")).unwrap();
        assert_eq!(pet.owner_id().as_str(), "owner-2");
        match &pet.pending_events()[0] {
            PetrackEvent::PetOwnershipChanged {
                old_owner_id,
                new_owner_id,
                ..
            } => {
                assert_eq!(old_owner_id.as_str(), "owner-1");
                assert_eq!(new_owner_id.as_str(), "owner-2");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn change_owner_rejects_empty_id_without_event() {
        let mut pet = new_pet();
        pet.clear_pending_events();

        let err = pet.change_owner(UserId::new("")).unwrap_err();
        assert!(matches!(err, DomainError::InvalidValue { .. }));
        assert_eq!(pet.owner_id().as_str(), "owner-1");
        assert!(!pet.has_pending_events());
    }

    #[test]
    fn morphology_update_and_delete_accrue_in_order() {
        let mut pet = new_pet();
        pet.update_morphology(Some(MorphologyId::new("banana")));
        pet.update_morphology(None);
        pet.mark_deleted().unwrap();

        let kinds: Vec<_> = pet.pending_events().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                PetrackEventKind::PetCreated,
                PetrackEventKind::PetMorphologyUpdated,
                PetrackEventKind::PetMorphologyUpdated,
                PetrackEventKind::PetDeleted,
            ]
        );
        assert!(pet.is_deleted());
        assert!(pet.morphology_id().is_none());

        let err = pet.mark_deleted().unwrap_err();
        assert!(matches!(err, DomainError::InvalidState { .. }));
        assert_eq!(pet.pending_count(), 4);
    }

    #[test]
    fn morphology_update_carries_current_owner() {
        let mut pet = new_pet();
        pet.change_owner(UserId::new("owner-2")).unwrap();
        pet.clear_pending_events();

        pet.update_morphology(Some(MorphologyId::new("banana")));
        match &pet.pending_events()[0] {
            PetrackEvent::PetMorphologyUpdated {
                owner_id,
                old_morphology_id,
                new_morphology_id,
                ..
            } => {
                assert_eq!(owner_id.as_str(), "owner-2");
                assert!(old_morphology_id.is_none());
                assert_eq!(new_morphology_id.as_ref().map(|m| m.as_str()), Some("banana"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn pending_events_are_not_serialized() {
        let pet = new_pet();
        let json = serde_json::to_value(&pet).unwrap();
        assert!(json.get("domain_events").is_none());
        assert_eq!(json["name"], "Mochi");
        assert_eq!(json["gender"], "female");

        let back: Pet = serde_json::from_value(json).unwrap();
        assert!(!back.has_pending_events());
        assert_eq!(back.id(), pet.id());
    }
}
