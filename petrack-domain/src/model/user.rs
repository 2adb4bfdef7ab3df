use super::ids::UserId;
use crate::aggregate::AggregateRoot;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::events::PetrackEvent;
use crate::value_object::Version;
use chrono::{DateTime, Utc};
use petrack_macros::{aggregate_root, entity};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    #[default]
    User,
    Guest,
}

// Debug 手写，避免输出密码哈希
#[aggregate_root(event = PetrackEvent)]
#[entity(id = UserId, debug = false)]
#[derive(Clone)]
pub struct User {
    username: String,
    email: String,
    full_name: Option<String>,
    hashed_password: String,
    user_type: UserType,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    is_deleted: bool,
}

impl User {
    /// 注册新用户，记录 `UserCreated`
    pub fn register(
        username: impl Into<String>,
        email: impl Into<String>,
        hashed_password: impl Into<String>,
    ) -> DomainResult<Self> {
        let username = username.into();
        let email = email.into();
        let hashed_password = hashed_password.into();
        if username.trim().is_empty() {
            return Err(DomainError::invalid_value("username cannot be empty"));
        }
        validate_email(&email)?;
        if hashed_password.is_empty() {
            return Err(DomainError::invalid_value("password hash cannot be empty"));
        }

        let now = Utc::now();
        let mut user = User::new(UserId::generate(), Version::new());
        user.username = username;
        user.email = email;
        user.hashed_password = hashed_password;
        user.is_active = true;
        user.created_at = now;
        user.updated_at = now;

        let event = PetrackEvent::user_created(
            user.id.clone(),
            user.username.clone(),
            user.email.clone(),
        );
        user.append_event(event);
        Ok(user)
    }

    /// 更新资料；仅在有字段实际变化时记录 `UserUpdated`（携带变化的字段名）
    pub fn update_profile(
        &mut self,
        email: Option<String>,
        full_name: Option<String>,
    ) -> DomainResult<()> {
        let mut updated_fields = Vec::new();

        if let Some(email) = email {
            validate_email(&email)?;
            if email != self.email {
                self.email = email;
                updated_fields.push("email".to_string());
            }
        }
        if let Some(full_name) = full_name {
            if self.full_name.as_deref() != Some(full_name.as_str()) {
                self.full_name = Some(full_name);
                updated_fields.push("full_name".to_string());
            }
        }

        if updated_fields.is_empty() {
            return Ok(());
        }
        self.touch();
        self.append_event(PetrackEvent::user_updated(self.id.clone(), updated_fields));
        Ok(())
    }

    /// 更换密码哈希，记录 `UserPasswordChanged`
    pub fn change_password(&mut self, hashed_password: impl Into<String>) -> DomainResult<()> {
        let hashed_password = hashed_password.into();
        if hashed_password.is_empty() {
            return Err(DomainError::invalid_value("password hash cannot be empty"));
        }
        self.hashed_password = hashed_password;
        self.touch();
        self.append_event(PetrackEvent::user_password_changed(self.id.clone()));
        Ok(())
    }

    /// 标记删除并停用，记录 `UserDeleted`
    pub fn mark_deleted(&mut self) -> DomainResult<()> {
        if self.is_deleted {
            return Err(DomainError::invalid_state(format!(
                "user {} is already deleted",
                self.id
            )));
        }
        self.is_deleted = true;
        self.is_active = false;
        self.touch();
        self.append_event(PetrackEvent::user_deleted(
            self.id.clone(),
            self.username.clone(),
        ));
        Ok(())
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn hashed_password(&self) -> &str {
        &self.hashed_password
    }

    pub fn user_type(&self) -> UserType {
        self.user_type
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn updated_at(&self) -> &DateTime<Utc> {
        &self.updated_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("user_type", &self.user_type)
            .field("is_active", &self.is_active)
            .field("is_deleted", &self.is_deleted)
            .field("pending_events", &self.pending_count())
            .finish_non_exhaustive()
    }
}

fn validate_email(email: &str) -> DomainResult<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(DomainError::invalid_value(format!(
            "invalid email address: {email}"
        ))),
    }
}
