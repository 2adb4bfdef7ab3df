/// 领域事件端到端示例
/// 启动时注册全部处理器，经仓储保存聚合后分发事件；邮件通道故障不影响其余处理器
use petrack_application::audit::InMemoryAuditLog;
use petrack_application::config::LogConfig;
use petrack_application::notification::{InMemoryNotifier, NotificationChannel};
use petrack_application::repository::{InMemoryPetRepository, InMemoryUserRepository};
use petrack_application::{HandlerDeps, default_event_bus, default_event_publisher};
use petrack_application::{register_all_event_handlers, telemetry};
use petrack_domain::entity::Entity;
use petrack_domain::model::{BreedId, Gender, MorphologyId, NewPet, Pet, User};
use petrack_domain::persist::AggregateRepository;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init(&LogConfig::from_env()?);

    let audit = Arc::new(InMemoryAuditLog::new());
    let notifier = Arc::new(InMemoryNotifier::new());
    register_all_event_handlers(
        &default_event_bus(),
        &HandlerDeps::new(audit.clone(), notifier.clone()),
    );
    println!(
        "registered {} handlers",
        default_event_bus().total_handler_count()
    );

    let users = InMemoryUserRepository::new(default_event_publisher());
    let pets = InMemoryPetRepository::new(default_event_publisher());

    let mut alice = User::register("alice", "alice@example.com", "argon2$hash")?;
    let mut bob = User::register("bob", "bob@example.com", "argon2$hash")?;
    users.save(&mut alice).await?;
    users.save(&mut bob).await?;

    let mut pet = Pet::register(
        NewPet::builder()
            .name("Mochi")
            .owner_id(alice.id().clone())
            .breed_id(BreedId::new("ball-python"))
            .gender(Gender::Female)
            .build(),
    )?;
    pets.save(&mut pet).await?;

    notifier.fail_channel(NotificationChannel::Email);
    pet.change_owner(bob.id().clone())?;
    pet.update_morphology(Some(MorphologyId::new("banana")));
    pets.save(&mut pet).await?;

    println!("pet {} at {}", pet.id(), pet.version());
    println!("audit records: {}", audit.len());
    for channel in [
        NotificationChannel::InApp,
        NotificationChannel::Email,
        NotificationChannel::Push,
    ] {
        println!("{channel}: {} sent", notifier.sent_on(channel).len());
    }

    Ok(())
}
