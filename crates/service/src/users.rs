use async_trait::async_trait;
use models::user::User;

use crate::errors::ServiceError;

/// Trait abstraction for user storage.
/// Handlers only see this; the file-backed `UserStore` is the implementation.
#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn create(&self, new_user: Option<User>) -> Result<User, ServiceError>;
    async fn get_by_id(&self, id: &str) -> Result<Option<User>, ServiceError>;
    async fn get_all(&self) -> Result<Vec<User>, ServiceError>;
    async fn update(&self, id: &str, updated: Option<User>) -> Result<User, ServiceError>;
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
}
