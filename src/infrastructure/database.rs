//! 数据库基础设施

use async_trait::async_trait;
use scylla::{Session, SessionBuilder};
use tracing::{debug, info};
use uuid::Uuid;

use crate::app::users::model::{User, UserQueries, UserRow};
use crate::infrastructure::config::CassandraConfig;

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("连接失败: {0}")]
    Connection(String),
    #[error("查询失败: {0}")]
    Query(String),
    #[error("用户缺少 id")]
    MissingId,
    #[error("行映射失败: {0}")]
    RowMapping(String),
}

/// 用户存储接口
///
/// 每个方法都是一次独立的存储调用，没有缓存，也没有跨调用的事务。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 返回表中全部用户，不保证顺序
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;

    /// 按主键查找，不存在时返回 `None`
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// 按 id 覆盖写入，返回写入的值
    async fn save(&self, user: User) -> Result<User, StoreError>;

    /// 按 id 删除，记录不存在也不报错
    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError>;

    /// 执行一条原始语句，仅供 schema 加载使用
    async fn execute_statement(&self, statement: &str) -> Result<(), StoreError>;
}

/// 基于 Cassandra 的用户存储
pub struct CassandraStore {
    session: Session,
    queries: UserQueries,
}

impl CassandraStore {
    pub async fn connect(config: &CassandraConfig) -> Result<Self, StoreError> {
        info!("连接 Cassandra: {:?}", config.contact_points);

        let mut builder = SessionBuilder::new().known_nodes(&config.contact_points);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.user(username, password);
        }

        let session = builder
            .build()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            session,
            queries: UserQueries::new(),
        })
    }
}

#[async_trait]
impl UserStore for CassandraStore {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let result = self
            .session
            .query(self.queries.select_all.as_str(), ())
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        result
            .rows_typed::<UserRow>()
            .map_err(|e| StoreError::RowMapping(e.to_string()))?
            .map(|row| {
                row.map(User::from_row)
                    .map_err(|e| StoreError::RowMapping(e.to_string()))
            })
            .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let result = self
            .session
            .query(self.queries.select_by_id.as_str(), (id,))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let row = result
            .maybe_first_row_typed::<UserRow>()
            .map_err(|e| StoreError::RowMapping(e.to_string()))?;

        Ok(row.map(User::from_row))
    }

    async fn save(&self, user: User) -> Result<User, StoreError> {
        let row = user.to_row()?;
        self.session
            .query(self.queries.insert.as_str(), row)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        debug!("已保存用户: {}", user);
        Ok(user)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        self.session
            .query(self.queries.delete_by_id.as_str(), (id,))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }

    async fn execute_statement(&self, statement: &str) -> Result<(), StoreError> {
        self.session
            .query(statement, ())
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }
}
