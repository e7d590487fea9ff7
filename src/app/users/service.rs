//! 用户业务服务

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::model::User;
use crate::core::error::CoreError;
use crate::infrastructure::database::UserStore;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, CoreError> {
        self.store.find_by_id(id).await?.ok_or(CoreError::NotFound)
    }

    /// 创建或覆盖用户，缺少 id 时生成新 id
    pub async fn create_user(&self, user: User) -> Result<User, CoreError> {
        let user = self.store.save(user.with_generated_id()).await?;
        info!("保存用户: {}", user);
        Ok(user)
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), CoreError> {
        self.store.delete_by_id(id).await?;
        info!("删除用户: {}", id);
        Ok(())
    }
}
