//! 用户数据模型

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::infrastructure::database::StoreError;

/// `users` 表名
pub const USERS_TABLE: &str = "users";

/// 字段与列的映射表，顺序即行元组的顺序
pub const USER_COLUMNS: [&str; 4] = ["id", "name", "email", "age"];

/// 一行 `users` 记录: (id, name, email, age)
pub type UserRow = (Uuid, Option<String>, Option<String>, Option<i32>);

/// 用户实体
///
/// 创建请求中 `id` 可以为空，由服务端生成；持久化后的记录总是带有 `id`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

impl User {
    /// 创建一个带新 id 的用户
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i32) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            name: Some(name.into()),
            email: Some(email.into()),
            age: Some(age),
        }
    }

    /// 如果没有 id，则生成一个新的随机 id
    pub fn with_generated_id(mut self) -> Self {
        if self.id.is_none() {
            self.id = Some(Uuid::new_v4());
        }
        self
    }

    /// 转换为存储行，缺少 id 时返回错误
    pub fn to_row(&self) -> Result<UserRow, StoreError> {
        let id = self.id.ok_or(StoreError::MissingId)?;
        Ok((id, self.name.clone(), self.email.clone(), self.age))
    }

    /// 从存储行还原
    pub fn from_row(row: UserRow) -> Self {
        let (id, name, email, age) = row;
        Self {
            id: Some(id),
            name,
            email,
            age,
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn text(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("null")
        }

        write!(f, "User{{id=")?;
        match self.id {
            Some(id) => write!(f, "{}", id)?,
            None => write!(f, "null")?,
        }
        write!(f, ", name='{}', email='{}', age=", text(&self.name), text(&self.email))?;
        match self.age {
            Some(age) => write!(f, "{}}}", age),
            None => write!(f, "null}}"),
        }
    }
}

/// 由列映射表生成的 CQL 语句
#[derive(Debug, Clone)]
pub struct UserQueries {
    pub select_all: String,
    pub select_by_id: String,
    pub insert: String,
    pub delete_by_id: String,
}

impl UserQueries {
    pub fn new() -> Self {
        let columns = USER_COLUMNS.join(", ");
        let placeholders = vec!["?"; USER_COLUMNS.len()].join(", ");
        let key = USER_COLUMNS[0];

        Self {
            select_all: format!("SELECT {} FROM {}", columns, USERS_TABLE),
            select_by_id: format!("SELECT {} FROM {} WHERE {} = ?", columns, USERS_TABLE, key),
            insert: format!(
                "INSERT INTO {} ({}) VALUES ({})",
                USERS_TABLE, columns, placeholders
            ),
            delete_by_id: format!("DELETE FROM {} WHERE {} = ?", USERS_TABLE, key),
        }
    }
}

impl Default for UserQueries {
    fn default() -> Self {
        Self::new()
    }
}
