//! 内存存储
//!
//! 不依赖 Cassandra 集群即可运行服务；测试也使用它。
//! 原始语句不会被解释，只按执行顺序记录下来。

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::database::{StoreError, UserStore};
use crate::app::users::model::User;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    statements: RwLock<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已执行过的原始语句
    pub fn executed_statements(&self) -> Vec<String> {
        self.statements.read().clone()
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, StoreError> {
        let id = user.id.ok_or(StoreError::MissingId)?;
        self.users.write().insert(id, user.clone());
        Ok(user)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        self.users.write().remove(&id);
        Ok(())
    }

    async fn execute_statement(&self, statement: &str) -> Result<(), StoreError> {
        self.statements.write().push(statement.to_string());
        Ok(())
    }
}
