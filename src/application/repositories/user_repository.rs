use async_trait::async_trait;

use crate::{
    application::error::ApplicationError,
    domain::models::user::{UserProfile, UserStats},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn touch_user(&self, profile: &UserProfile) -> Result<(), ApplicationError>;
    async fn record_upload(&self, user_id: i64, bytes: u64) -> Result<(), ApplicationError>;
    async fn record_download(&self, user_id: i64) -> Result<(), ApplicationError>;
    async fn get_user_stats(&self, user_id: i64) -> Result<Option<UserStats>, ApplicationError>;
}
