use async_trait::async_trait;
use petrack_application::create_test_event_bus;
use petrack_application::repository::InMemoryPetRepository;
use petrack_domain::aggregate::AggregateRoot;
use petrack_domain::entity::Entity;
use petrack_domain::error::DomainError;
use petrack_domain::eventing::{EventHandler, EventPublisher};
use petrack_domain::events::{PetrackEvent, PetrackEventKind};
use petrack_domain::model::{BreedId, NewPet, Pet, UserId};
use petrack_domain::persist::AggregateRepository;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct Counter(AtomicUsize);

#[async_trait]
impl EventHandler<PetrackEvent> for Counter {
    async fn handle(&self, _event: &PetrackEvent) -> anyhow::Result<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn setup() -> (InMemoryPetRepository, Arc<Counter>) {
    let bus = create_test_event_bus();
    let counter = Arc::new(Counter::default());
    bus.subscribe_many(
        PetrackEventKind::ALL
            .iter()
            .copied()
            .filter(PetrackEventKind::is_pet_event),
        counter.clone(),
    );
    (InMemoryPetRepository::new(EventPublisher::new(bus)), counter)
}

fn new_pet() -> Pet {
    Pet::register(
        NewPet::builder()
            .name("Mochi")
            .owner_id(UserId::new("owner-1"))
            .breed_id(BreedId::new("ball-python"))
            .build(),
    )
    .unwrap()
}

#[tokio::test]
async fn successful_save_publishes_pending_events() {
    let (repo, counter) = setup();
    let mut pet = new_pet();
    pet.change_owner(UserId::new("owner-2")).unwrap();

    repo.save(&mut pet).await.unwrap();

    assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    assert!(!pet.has_pending_events());
}

#[tokio::test]
async fn failed_save_publishes_nothing_and_keeps_events() {
    let (repo, counter) = setup();
    let mut pet = new_pet();
    repo.save(&mut pet).await.unwrap();
    assert_eq!(counter.0.load(Ordering::SeqCst), 1);

    let mut stale = repo.load(pet.id()).await.unwrap().unwrap();
    pet.change_owner(UserId::new("owner-2")).unwrap();
    repo.save(&mut pet).await.unwrap();
    assert_eq!(counter.0.load(Ordering::SeqCst), 2);

    stale.mark_deleted().unwrap();
    let err = repo.save(&mut stale).await.unwrap_err();

    assert!(matches!(err, DomainError::VersionConflict { .. }));
    assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    assert_eq!(stale.pending_count(), 1);
    assert!(matches!(
        stale.pending_events()[0],
        PetrackEvent::PetDeleted { .. }
    ));

    let stored = repo.load(pet.id()).await.unwrap().unwrap();
    assert!(!stored.is_deleted());
    assert_eq!(stored.owner_id(), &UserId::new("owner-2"));
}

#[tokio::test]
async fn repository_is_usable_behind_arc() {
    let (repo, counter) = setup();
    let repo: Arc<dyn AggregateRepository<Pet>> = Arc::new(repo);
    let mut pet = new_pet();
    repo.save(&mut pet).await.unwrap();
    assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    assert!(repo.load(pet.id()).await.unwrap().is_some());
}
