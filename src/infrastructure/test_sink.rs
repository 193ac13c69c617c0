//! 抽取结果的交付接口
//!
//! 管线只负责把试卷交出去：先 `add_test` 拿到 ID，再把题目挂到该 ID 上。

use crate::error::{AppError, AppResult, StorageError};
use crate::models::question::{ExtractedQuestion, ExtractedTest};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// 试卷持久化协作方
pub trait TestSink: Send + Sync {
    /// 创建试卷，返回其 ID
    fn add_test<'a>(&'a self, name: &'a str) -> BoxFuture<'a, AppResult<String>>;

    /// 将题目追加到已创建的试卷
    fn add_questions_to_test<'a>(
        &'a self,
        test_id: &'a str,
        questions: Vec<ExtractedQuestion>,
    ) -> BoxFuture<'a, AppResult<()>>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTest {
    id: String,
    name: String,
    created_at: String,
    questions: Vec<ExtractedQuestion>,
}

/// 每套试卷写成一个 JSON 文件的存储
pub struct JsonDirSink {
    dir: PathBuf,
    counter: AtomicU64,
}

impl JsonDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: AtomicU64::new(0),
        }
    }

    fn test_path(&self, test_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", test_id))
    }

    async fn write(&self, path: &Path, test: &StoredTest) -> AppResult<()> {
        let json = serde_json::to_vec_pretty(test).map_err(StorageError::from)?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| AppError::storage_write_failed(path.display().to_string(), e))
    }

    /// 创建试卷文件；ID 为时间戳加序号，文件已存在（如同一秒内的另一次运行）时顺延序号
    async fn create(&self, name: &str) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::storage_write_failed(self.dir.display().to_string(), e))?;

        let now = chrono::Local::now();
        loop {
            let seq = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            let id = format!("{}-{:04}", now.format("%Y%m%d%H%M%S"), seq);
            let path = self.test_path(&id);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(AppError::storage_write_failed(path.display().to_string(), e)),
            };

            let test = StoredTest {
                id: id.clone(),
                name: name.to_string(),
                created_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
                questions: Vec::new(),
            };
            let json = serde_json::to_vec_pretty(&test).map_err(StorageError::from)?;
            file.write_all(&json)
                .await
                .map_err(|e| AppError::storage_write_failed(path.display().to_string(), e))?;
            file.flush()
                .await
                .map_err(|e| AppError::storage_write_failed(path.display().to_string(), e))?;
            return Ok(id);
        }
    }

    async fn append(&self, test_id: &str, questions: Vec<ExtractedQuestion>) -> AppResult<()> {
        let path = self.test_path(test_id);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::UnknownTest(test_id.to_string()).into());
            }
            Err(e) => return Err(e.into()),
        };
        let mut test: StoredTest = serde_json::from_slice(&raw).map_err(StorageError::from)?;
        let added = questions.len();
        test.questions.extend(questions);
        self.write(&path, &test).await?;
        info!("💾 试卷 {} 已写入 {} 道题目: {}", test.name, added, path.display());
        Ok(())
    }
}

impl TestSink for JsonDirSink {
    fn add_test<'a>(&'a self, name: &'a str) -> BoxFuture<'a, AppResult<String>> {
        self.create(name).boxed()
    }

    fn add_questions_to_test<'a>(
        &'a self,
        test_id: &'a str,
        questions: Vec<ExtractedQuestion>,
    ) -> BoxFuture<'a, AppResult<()>> {
        self.append(test_id, questions).boxed()
    }
}

/// 内存中的试卷存储
#[derive(Default)]
pub struct MemoryTestSink {
    tests: Mutex<BTreeMap<String, ExtractedTest>>,
}

impl MemoryTestSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已保存试卷的快照，按创建顺序排列
    pub fn tests(&self) -> Vec<ExtractedTest> {
        self.tests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect()
    }
}

impl TestSink for MemoryTestSink {
    fn add_test<'a>(&'a self, name: &'a str) -> BoxFuture<'a, AppResult<String>> {
        let mut tests = self.tests.lock().unwrap_or_else(|e| e.into_inner());
        let id = format!("test-{:06}", tests.len() + 1);
        tests.insert(
            id.clone(),
            ExtractedTest {
                name: name.to_string(),
                questions: Vec::new(),
            },
        );
        futures::future::ready(Ok(id)).boxed()
    }

    fn add_questions_to_test<'a>(
        &'a self,
        test_id: &'a str,
        questions: Vec<ExtractedQuestion>,
    ) -> BoxFuture<'a, AppResult<()>> {
        let mut tests = self.tests.lock().unwrap_or_else(|e| e.into_inner());
        let result = match tests.get_mut(test_id) {
            Some(test) => {
                test.questions.extend(questions);
                Ok(())
            }
            None => Err(StorageError::UnknownTest(test_id.to_string()).into()),
        };
        futures::future::ready(result).boxed()
    }
}
