//! 领域处理器：每个处理器只关心一种事件，其余事件直接忽略
//!
use async_trait::async_trait;
use petrack_domain::eventing::EventHandler;
use petrack_domain::events::PetrackEvent;
use tracing::info;

#[derive(Debug, Default, Clone, Copy)]
pub struct PetCreatedHandler;

#[async_trait]
impl EventHandler<PetrackEvent> for PetCreatedHandler {
    async fn handle(&self, event: &PetrackEvent) -> anyhow::Result<()> {
        if let PetrackEvent::PetCreated {
            pet_id,
            owner_id,
            breed_id,
            ..
        } = event
        {
            info!(%pet_id, %owner_id, %breed_id, "pet created");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PetOwnershipChangedHandler;

#[async_trait]
impl EventHandler<PetrackEvent> for PetOwnershipChangedHandler {
    async fn handle(&self, event: &PetrackEvent) -> anyhow::Result<()> {
        if let PetrackEvent::PetOwnershipChanged {
            pet_id,
            old_owner_id,
            new_owner_id,
            ..
        } = event
        {
            info!(%pet_id, %old_owner_id, %new_owner_id, "pet ownership changed");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PetMorphologyUpdatedHandler;

#[async_trait]
impl EventHandler<PetrackEvent> for PetMorphologyUpdatedHandler {
    async fn handle(&self, event: &PetrackEvent) -> anyhow::Result<()> {
        if let PetrackEvent::PetMorphologyUpdated {
            pet_id,
            old_morphology_id,
            new_morphology_id,
            ..
        } = event
        {
            info!(
                %pet_id,
                old_morphology_id = ?old_morphology_id.as_ref().map(|m| m.as_str()),
                new_morphology_id = ?new_morphology_id.as_ref().map(|m| m.as_str()),
                "pet morphology updated"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PetDeletedHandler;

#[async_trait]
impl EventHandler<PetrackEvent> for PetDeletedHandler {
    async fn handle(&self, event: &PetrackEvent) -> anyhow::Result<()> {
        if let PetrackEvent::PetDeleted {
            pet_id, owner_id, ..
        } = event
        {
            info!(%pet_id, %owner_id, "pet deleted");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UserCreatedHandler;

#[async_trait]
impl EventHandler<PetrackEvent> for UserCreatedHandler {
    async fn handle(&self, event: &PetrackEvent) -> anyhow::Result<()> {
        if let PetrackEvent::UserCreated {
            user_id,
            username,
            email,
            ..
        } = event
        {
            info!(%user_id, %username, %email, "user created");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UserUpdatedHandler;

#[async_trait]
impl EventHandler<PetrackEvent> for UserUpdatedHandler {
    async fn handle(&self, event: &PetrackEvent) -> anyhow::Result<()> {
        if let PetrackEvent::UserUpdated {
            user_id,
            updated_fields,
            ..
        } = event
        {
            info!(%user_id, ?updated_fields, "user updated");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PetRecordCreatedHandler;

#[async_trait]
impl EventHandler<PetrackEvent> for PetRecordCreatedHandler {
    async fn handle(&self, event: &PetrackEvent) -> anyhow::Result<()> {
        if let PetrackEvent::PetRecordCreated {
            pet_id,
            record_type,
            ..
        } = event
        {
            info!(%pet_id, ?record_type, "pet record created");
        }
        Ok(())
    }
}
