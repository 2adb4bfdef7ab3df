//! 领域模型：宠物、用户与宠物档案聚合
//!
//! 聚合方法在修改状态的同时记录领域事件，由仓储写入成功后统一发布。
//!
mod ids;
mod pet;
mod pet_record;
mod user;

pub use ids::{BreedId, MorphologyId, PetId, PetRecordId, UserId};
pub use pet::{Gender, NewPet, Pet};
pub use pet_record::{PetRecord, PetRecordType};
pub use user::{User, UserType};
