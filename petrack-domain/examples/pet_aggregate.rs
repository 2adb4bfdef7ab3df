/// Pet 聚合示例
/// 演示聚合记录事件、发布器分发并清空待发布事件
use async_trait::async_trait;
use petrack_domain::aggregate::AggregateRoot;
use petrack_domain::domain_event::DomainEvent;
use petrack_domain::entity::Entity;
use petrack_domain::eventing::{EventBus, EventHandler, EventPublisher};
use petrack_domain::events::{PetrackEvent, PetrackEventKind};
use petrack_domain::model::{BreedId, Gender, MorphologyId, NewPet, Pet, UserId};
use std::sync::Arc;

struct PrintHandler;

#[async_trait]
impl EventHandler<PetrackEvent> for PrintHandler {
    async fn handle(&self, event: &PetrackEvent) -> anyhow::Result<()> {
        println!(
            "  -> {} {} for {}",
            event.event_type(),
            event.event_id(),
            event.subject_id()
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let bus = Arc::new(EventBus::<PetrackEvent>::new());
    bus.subscribe_many(
        PetrackEventKind::ALL
            .iter()
            .copied()
            .filter(PetrackEventKind::is_pet_event),
        Arc::new(PrintHandler),
    );
    let publisher = EventPublisher::new(bus);

    let mut pet = Pet::register(
        NewPet::builder()
            .name("Mochi")
            .owner_id(UserId::new("owner-1"))
            .breed_id(BreedId::new("ball-python"))
            .gender(Gender::Female)
            .build(),
    )?;
    pet.change_owner(UserId::new("owner-2"))?;
    pet.update_morphology(Some(MorphologyId::new("banana")));

    println!("pet {} has {} pending events", pet.id(), pet.pending_count());
    publisher.publish_from_aggregate(&mut pet).await;
    println!("after publishing: {} pending events", pet.pending_count());

    Ok(())
}
