use std::{path::PathBuf, sync::Arc};

use models::user::{self, User};
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::storage::json_list_store::JsonListStore;
use crate::users::UserStorage;

/// File-backed user collection.
///
/// Every operation reads the whole file, mutates the list in memory and, if
/// anything changed, writes the whole list back. `Id` uniqueness is checked
/// on create only.
pub struct UserStore {
    list: JsonListStore<User>,
}

impl UserStore {
    /// Initialize the store from the given file path. Creates the file if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let list = JsonListStore::new(path);
        list.ensure_exists().await?;
        Ok(Arc::new(Self { list }))
    }

    pub fn path(&self) -> &std::path::Path {
        self.list.path()
    }

    pub async fn read(&self) -> Result<Vec<User>, ServiceError> {
        self.list.read().await
    }

    pub async fn write(&self, users: &[User]) -> Result<(), ServiceError> {
        self.list.write(users).await
    }

    /// Append a new user; `None` or an empty `Id` is invalid, a taken `Id` conflicts.
    pub async fn create(&self, new_user: Option<User>) -> Result<User, ServiceError> {
        let Some(new_user) = new_user else {
            warn!("invalid user data");
            return Err(ServiceError::invalid_user());
        };
        if let Err(e) = user::validate_new(&new_user) {
            warn!("invalid user data");
            return Err(e.into());
        }

        let mut users = self.read().await?;
        if users.iter().any(|u| u.id == new_user.id) {
            warn!(user_id = %new_user.id, "user already exists");
            return Err(ServiceError::user_exists(&new_user.id));
        }

        users.push(new_user.clone());
        self.write(&users).await?;
        info!(user_id = %new_user.id, "user created");
        Ok(new_user)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>, ServiceError> {
        let users = self.read().await?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    pub async fn get_all(&self) -> Result<Vec<User>, ServiceError> {
        self.read().await
    }

    /// Replace the record stored under `id` wholesale.
    ///
    /// The replacement keeps whatever `Id` it carries; it is not reconciled
    /// with `id` and not checked for uniqueness.
    pub async fn update(&self, id: &str, updated: Option<User>) -> Result<User, ServiceError> {
        let Some(updated) = updated else {
            warn!(user_id = %id, "invalid user data");
            return Err(ServiceError::invalid_user());
        };
        let mut users = self.read().await?;
        let idx = users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| ServiceError::user_not_found(id))?;

        if updated.id != id {
            warn!(user_id = %id, new_id = %updated.id, "update changes the record id");
        }
        users[idx] = updated.clone();
        self.write(&users).await?;
        info!(user_id = %id, "user updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let mut users = self.read().await?;
        let idx = users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| ServiceError::user_not_found(id))?;
        users.remove(idx);
        self.write(&users).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserStorage for UserStore {
    async fn create(&self, new_user: Option<User>) -> Result<User, ServiceError> { self.create(new_user).await }
    async fn get_by_id(&self, id: &str) -> Result<Option<User>, ServiceError> { self.get_by_id(id).await }
    async fn get_all(&self) -> Result<Vec<User>, ServiceError> { self.get_all().await }
    async fn update(&self, id: &str, updated: Option<User>) -> Result<User, ServiceError> { self.update(id, updated).await }
    async fn delete(&self, id: &str) -> Result<(), ServiceError> { self.delete(id).await }
}
