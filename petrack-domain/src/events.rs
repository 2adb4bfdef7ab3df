//! 宠物追踪系统的领域事件
//!
//! 全部事件汇集在一个枚举中，总线以生成的 `PetrackEventKind` 为键分发。
//!
use crate::model::{BreedId, MorphologyId, PetId, PetRecordType, UserId};
use petrack_macros::domain_event;

#[domain_event(version = 1)]
pub enum PetrackEvent {
    // --- 宠物 ---
    PetCreated {
        pet_id: PetId,
        owner_id: UserId,
        breed_id: BreedId,
    },
    PetOwnershipChanged {
        pet_id: PetId,
        old_owner_id: UserId,
        new_owner_id: UserId,
    },
    PetMorphologyUpdated {
        pet_id: PetId,
        owner_id: UserId,
        old_morphology_id: Option<MorphologyId>,
        new_morphology_id: Option<MorphologyId>,
    },
    PetDeleted {
        pet_id: PetId,
        owner_id: UserId,
    },

    // --- 用户 ---
    UserCreated {
        user_id: UserId,
        username: String,
        email: String,
    },
    UserUpdated {
        user_id: UserId,
        updated_fields: Vec<String>,
    },
    UserDeleted {
        user_id: UserId,
        username: String,
    },
    UserPasswordChanged {
        user_id: UserId,
    },

    // --- 宠物档案 ---
    PetRecordCreated {
        pet_id: PetId,
        record_type: PetRecordType,
        record_data: serde_json::Value,
    },
    PetRecordUpdated {
        pet_id: PetId,
        record_type: PetRecordType,
        record_data: serde_json::Value,
        updated_fields: Vec<String>,
    },
    PetRecordDeleted {
        pet_id: PetId,
        record_type: PetRecordType,
        record_data: serde_json::Value,
    },
}

impl PetrackEventKind {
    pub fn is_pet_event(&self) -> bool {
        matches!(
            self,
            Self::PetCreated
                | Self::PetOwnershipChanged
                | Self::PetMorphologyUpdated
                | Self::PetDeleted
        )
    }

    pub fn is_user_event(&self) -> bool {
        matches!(
            self,
            Self::UserCreated | Self::UserUpdated | Self::UserDeleted | Self::UserPasswordChanged
        )
    }

    pub fn is_pet_record_event(&self) -> bool {
        matches!(
            self,
            Self::PetRecordCreated | Self::PetRecordUpdated | Self::PetRecordDeleted
        )
    }
}

impl PetrackEvent {
    /// 事件所关联的主体标识（宠物或用户）
    pub fn subject_id(&self) -> &str {
        match self {
            Self::PetCreated { pet_id, .. }
            | Self::PetOwnershipChanged { pet_id, .. }
            | Self::PetMorphologyUpdated { pet_id, .. }
            | Self::PetDeleted { pet_id, .. }
            | Self::PetRecordCreated { pet_id, .. }
            | Self::PetRecordUpdated { pet_id, .. }
            | Self::PetRecordDeleted { pet_id, .. } => pet_id.as_str(),
            Self::UserCreated { user_id, .. }
            | Self::UserUpdated { user_id, .. }
            | Self::UserDeleted { user_id, .. }
            | Self::UserPasswordChanged { user_id, .. } => user_id.as_str(),
        }
    }
}
