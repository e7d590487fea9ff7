//! Schema 初始化
//!
//! 服务启动时执行一次：先执行 schema 脚本，再执行 data 脚本。
//! 脚本按行读取，`--` 开头的行和空行被跳过，以 `;` 结尾的行结束一条语句。

use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use super::database::{StoreError, UserStore};

const COMMENT_PREFIX: &str = "--";
const STATEMENT_TERMINATOR: char = ';';

/// Schema 加载错误，任何一种都会终止启动
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("读取脚本 {path} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("执行语句失败 `{statement}`: {source}")]
    Execute {
        statement: String,
        #[source]
        source: StoreError,
    },
}

/// 把脚本行拼接成完整语句
#[derive(Debug, Default)]
pub struct StatementBuffer {
    buffer: String,
}

impl StatementBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 送入一行原始文本，语句结束时返回完整语句
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            return None;
        }

        self.buffer.push_str(line);
        if line.ends_with(STATEMENT_TERMINATOR) {
            let statement = self.buffer.trim().to_string();
            self.buffer.clear();
            Some(statement)
        } else {
            self.buffer.push(' ');
            None
        }
    }

    /// 尚未以 `;` 结束的残留文本
    pub fn pending(&self) -> Option<&str> {
        let pending = self.buffer.trim();
        (!pending.is_empty()).then_some(pending)
    }
}

/// 启动时的脚本执行器
pub struct SchemaLoader<'a> {
    store: &'a dyn UserStore,
    keyspace: &'a str,
}

impl<'a> SchemaLoader<'a> {
    pub fn new(store: &'a dyn UserStore, keyspace: &'a str) -> Self {
        Self { store, keyspace }
    }

    /// 依次执行 schema 脚本和 data 脚本
    pub async fn run(&self, schema_script: &Path, data_script: &Path) -> Result<(), SchemaError> {
        info!("初始化 keyspace {} 的 schema", self.keyspace);

        self.execute_script(schema_script).await?;
        self.execute_script(data_script).await?;

        info!("schema 初始化完成");
        Ok(())
    }

    /// 执行一个脚本文件，返回执行的语句数
    pub async fn execute_script(&self, path: &Path) -> Result<usize, SchemaError> {
        let file = File::open(path).await.map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.execute_source(path, BufReader::new(file)).await
    }

    /// 从任意异步读取源执行语句，`path` 仅用于错误信息
    pub async fn execute_source<R>(&self, path: &Path, reader: R) -> Result<usize, SchemaError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut buffer = StatementBuffer::new();
        let mut executed = 0;

        while let Some(line) = lines.next_line().await.map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })? {
            let Some(statement) = buffer.push_line(&line) else {
                continue;
            };

            info!("执行 CQL: {}", statement);
            self.store
                .execute_statement(&statement)
                .await
                .map_err(|source| SchemaError::Execute {
                    statement: statement.clone(),
                    source,
                })?;
            executed += 1;
        }

        // 末尾未以 `;` 结束的语句不执行
        if let Some(pending) = buffer.pending() {
            debug!("忽略未结束的语句: {}", pending);
        }

        Ok(executed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::users::model::User;
    use crate::infrastructure::memory::MemoryStore;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use uuid::Uuid;

    fn script_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_buffer_joins_lines_with_single_space() {
        let mut buffer = StatementBuffer::new();
        assert_eq!(buffer.push_line("CREATE TABLE"), None);
        assert_eq!(buffer.push_line("   y (b int);  "), Some("CREATE TABLE y (b int);".to_string()));
        assert_eq!(buffer.pending(), None);
    }

    #[test]
    fn test_buffer_skips_comments_and_blank_lines() {
        let mut buffer = StatementBuffer::new();
        assert_eq!(buffer.push_line("-- comment;"), None);
        assert_eq!(buffer.push_line("   "), None);
        assert_eq!(buffer.push_line("  -- indented comment"), None);
        assert_eq!(buffer.pending(), None);
    }

    #[tokio::test]
    async fn test_comment_blank_and_multiline_script() {
        let store = MemoryStore::new();
        let loader = SchemaLoader::new(&store, "test_ks");
        let script = "-- comment\n\nCREATE TABLE x (a int);\nCREATE TABLE\ny (b int);\n";

        let executed = loader
            .execute_source(Path::new("inline.cql"), script.as_bytes())
            .await
            .unwrap();

        assert_eq!(executed, 2);
        assert_eq!(
            store.executed_statements(),
            vec!["CREATE TABLE x (a int);", "CREATE TABLE y (b int);"]
        );
    }

    #[tokio::test]
    async fn test_trailing_unterminated_statement_dropped() {
        let store = MemoryStore::new();
        let loader = SchemaLoader::new(&store, "test_ks");
        let script = "INSERT INTO users (id) VALUES (1);\nINSERT INTO users (id)\nVALUES (2)\n";

        let executed = loader
            .execute_source(Path::new("inline.cql"), script.as_bytes())
            .await
            .unwrap();

        assert_eq!(executed, 1);
        assert_eq!(
            store.executed_statements(),
            vec!["INSERT INTO users (id) VALUES (1);"]
        );
    }

    #[tokio::test]
    async fn test_schema_runs_before_data() {
        let schema = script_file("CREATE TABLE users (id uuid PRIMARY KEY);\n");
        let data = script_file("-- seed\nINSERT INTO users (id)\n  VALUES (uuid());\n");
        let store = MemoryStore::new();

        SchemaLoader::new(&store, "test_ks")
            .run(schema.path(), data.path())
            .await
            .unwrap();

        assert_eq!(
            store.executed_statements(),
            vec![
                "CREATE TABLE users (id uuid PRIMARY KEY);",
                "INSERT INTO users (id) VALUES (uuid());",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_script_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let data = script_file("INSERT INTO users (id) VALUES (uuid());\n");
        let store = MemoryStore::new();
        let missing = dir.path().join("schema.cql");

        let result = SchemaLoader::new(&store, "test_ks")
            .run(&missing, data.path())
            .await;

        match result {
            Err(SchemaError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(store.executed_statements().is_empty());
    }

    /// 以 `BAD` 开头的语句执行失败，其余语句被记录
    #[derive(Default)]
    struct RejectingStore {
        executed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl UserStore for RejectingStore {
        async fn find_all(&self) -> Result<Vec<User>, StoreError> {
            Ok(Vec::new())
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, StoreError> {
            Ok(None)
        }

        async fn save(&self, user: User) -> Result<User, StoreError> {
            Ok(user)
        }

        async fn delete_by_id(&self, _id: Uuid) -> Result<(), StoreError> {
            Ok(())
        }

        async fn execute_statement(&self, statement: &str) -> Result<(), StoreError> {
            self.executed.lock().push(statement.to_string());
            if statement.starts_with("BAD") {
                return Err(StoreError::Query("syntax error".to_string()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_execution_failure_aborts_remaining_scripts() {
        let schema = script_file("A;\nBAD\n x;\nC;\n");
        let data = script_file("D;\n");
        let store = RejectingStore::default();

        let result = SchemaLoader::new(&store, "test_ks")
            .run(schema.path(), data.path())
            .await;

        match result {
            Err(SchemaError::Execute { statement, .. }) => assert_eq!(statement, "BAD x;"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(*store.executed.lock(), vec!["A;", "BAD x;"]);
    }

    #[tokio::test]
    async fn test_read_error_reports_script_path() {
        let store = MemoryStore::new();
        let loader = SchemaLoader::new(&store, "test_ks");
        let source: &[u8] = b"CREATE TABLE a (x int);\n\xff\xfe\nCREATE TABLE b (y int);\n";

        let result = loader
            .execute_source(Path::new("db/schema.cql"), source)
            .await;

        match result {
            Err(SchemaError::Io { path, .. }) => assert_eq!(path, Path::new("db/schema.cql")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(store.executed_statements(), vec!["CREATE TABLE a (x int);"]);
    }

    #[tokio::test]
    async fn test_keyspace_setting_adds_no_statements() {
        let schema = script_file("USE user_service;\nCREATE TABLE users (id uuid PRIMARY KEY);\n");
        let data = script_file("");
        let store = MemoryStore::new();

        SchemaLoader::new(&store, "some_other_keyspace")
            .run(schema.path(), data.path())
            .await
            .unwrap();

        assert_eq!(
            store.executed_statements(),
            vec!["USE user_service;", "CREATE TABLE users (id uuid PRIMARY KEY);"]
        );
    }
}
