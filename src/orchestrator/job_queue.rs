//! 任务队列与调度器 - 编排层
//!
//! ## 职责
//!
//! 持有提交的文件任务，保证任意时刻最多一个任务处于处理中，按提交顺序（FIFO）依次运行。
//!
//! ## 设计特点
//!
//! - **单一入口**：所有状态变更都经过同一个命令通道，由调度器任务串行执行
//! - **事件驱动**：每次变更后检查"空闲且有等待任务 → 启动最早提交的任务"，没有轮询与定时器
//! - **只读视图**：对外通过 `watch` 通道发布任务列表快照
//! - **取消粒度**：只能移除等待中的任务，处理中的任务一定跑完

use crate::error::{AppResult, QueueError};
use crate::models::calibration::CalibrationConfig;
use crate::models::job::{any_working, Job, JobId, JobStatus, JobView, SourceFile};
use crate::orchestrator::file_processor::{JobRunner, ProgressReporter};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{error, info};

enum Command {
    Submit {
        files: Vec<SourceFile>,
        config: CalibrationConfig,
        reply: oneshot::Sender<Vec<JobId>>,
    },
    CancelAll {
        reply: oneshot::Sender<usize>,
    },
    ClearCompleted {
        reply: oneshot::Sender<usize>,
    },
    Progress {
        id: JobId,
        percent: u8,
    },
    Finished {
        id: JobId,
        outcome: Result<usize, String>,
    },
    Shutdown,
}

/// 任务队列句柄，可随意克隆
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<Vec<JobView>>,
}

impl JobQueue {
    /// 启动调度器（需要在 tokio 运行时中调用）
    pub fn start(runner: Arc<dyn JobRunner>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (view_tx, view) = watch::channel(Vec::new());

        let scheduler = Scheduler {
            jobs: Vec::new(),
            processing: None,
            next_id: 1,
            runner,
            tx: tx.downgrade(),
            view_tx,
        };
        tokio::spawn(scheduler.run(rx));

        Self { tx, view }
    }

    fn send(&self, command: Command) -> AppResult<()> {
        self.tx
            .send(command)
            .map_err(|_| QueueError::SchedulerStopped.into())
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> AppResult<T> {
        let (reply, rx) = oneshot::channel();
        self.send(build(reply))?;
        rx.await.map_err(|_| QueueError::SchedulerStopped.into())
    }

    /// 提交文件，每个文件生成一个等待中的任务，携带校准配置的快照
    ///
    /// 只等待调度器登记，不等待处理。
    pub async fn submit(
        &self,
        files: Vec<SourceFile>,
        config: CalibrationConfig,
    ) -> AppResult<Vec<JobId>> {
        self.request(|reply| Command::Submit {
            files,
            config,
            reply,
        })
        .await
    }

    /// 移除全部等待中的任务，返回移除数量
    pub async fn cancel_all(&self) -> AppResult<usize> {
        self.request(|reply| Command::CancelAll { reply }).await
    }

    /// 从列表中移除已完成的任务，返回移除数量
    pub async fn clear_completed(&self) -> AppResult<usize> {
        self.request(|reply| Command::ClearCompleted { reply }).await
    }

    /// 当前任务列表快照
    pub fn jobs(&self) -> Vec<JobView> {
        self.view.borrow().clone()
    }

    /// 是否有等待中或处理中的任务
    pub fn is_working(&self) -> bool {
        any_working(&self.view.borrow())
    }

    /// 订阅任务列表变化
    pub fn subscribe(&self) -> watch::Receiver<Vec<JobView>> {
        self.view.clone()
    }

    /// 等待队列清空（没有等待中与处理中的任务）
    pub async fn wait_idle(&self) -> AppResult<()> {
        let mut view = self.view.clone();
        loop {
            if !any_working(&view.borrow_and_update()) {
                return Ok(());
            }
            view.changed()
                .await
                .map_err(|_| QueueError::SchedulerStopped)?;
        }
    }

    /// 停止调度器；处理中的任务会跑完，但结果不再登记
    pub fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);
    }
}

struct Scheduler {
    jobs: Vec<Job>,
    processing: Option<JobId>,
    next_id: u64,
    runner: Arc<dyn JobRunner>,
    /// 弱引用：所有句柄释放且没有运行中的任务时调度器自然退出
    tx: mpsc::WeakUnboundedSender<Command>,
    view_tx: watch::Sender<Vec<JobView>>,
}

impl Scheduler {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Submit {
                    files,
                    config,
                    reply,
                } => {
                    let ids = self.submit(files, config);
                    self.settle();
                    let _ = reply.send(ids);
                }
                Command::CancelAll { reply } => {
                    let removed = self.remove_where(|job| job.status == JobStatus::Pending);
                    info!("🛑 已取消 {} 个等待中的任务", removed);
                    self.settle();
                    let _ = reply.send(removed);
                }
                Command::ClearCompleted { reply } => {
                    let removed = self.remove_where(|job| job.status == JobStatus::Completed);
                    self.settle();
                    let _ = reply.send(removed);
                }
                Command::Progress { id, percent } => {
                    self.record_progress(id, percent);
                    self.settle();
                }
                Command::Finished { id, outcome } => {
                    self.finish(id, outcome);
                    self.settle();
                }
                Command::Shutdown => break,
            }
        }
    }

    fn submit(&mut self, files: Vec<SourceFile>, config: CalibrationConfig) -> Vec<JobId> {
        files
            .into_iter()
            .map(|file| {
                let id = JobId(self.next_id);
                self.next_id += 1;
                info!("📥 任务 {} 已加入队列: {}", id, file.file_name);
                self.jobs.push(Job::new(id, file, config));
                id
            })
            .collect()
    }

    fn remove_where(&mut self, predicate: impl Fn(&Job) -> bool) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|job| !predicate(job));
        before - self.jobs.len()
    }

    fn record_progress(&mut self, id: JobId, percent: u8) {
        if let Some(job) = self.jobs.iter_mut().find(|j| j.id == id) {
            if job.status == JobStatus::Processing {
                job.progress = job.progress.max(percent.min(100));
            }
        }
    }

    fn finish(&mut self, id: JobId, outcome: Result<usize, String>) {
        if self.processing == Some(id) {
            self.processing = None;
        }
        let Some(job) = self.jobs.iter_mut().find(|j| j.id == id) else {
            return;
        };
        match outcome {
            Ok(count) => {
                job.status = JobStatus::Completed;
                job.progress = 100;
                job.total_questions = count;
                info!(
                    "✅ 任务 {} 完成: {} ({} 道题目)",
                    id, job.file.file_name, count
                );
            }
            Err(reason) => {
                job.status = JobStatus::Error;
                job.progress = 0;
                error!("❌ 任务 {} 失败: {} ({})", id, job.file.file_name, reason);
            }
        }
    }

    /// 状态变更后的统一收尾：必要时启动下一个任务，然后发布视图
    fn settle(&mut self) {
        self.start_next_if_idle();
        self.publish();
    }

    fn start_next_if_idle(&mut self) {
        if self.processing.is_some() {
            return;
        }
        let Some(job) = self
            .jobs
            .iter_mut()
            .find(|j| j.status == JobStatus::Pending)
        else {
            return;
        };
        let Some(tx) = self.tx.upgrade() else {
            return;
        };

        job.status = JobStatus::Processing;
        job.progress = 0;
        self.processing = Some(job.id);
        info!("▶️ 开始处理任务 {}: {}", job.id, job.file.file_name);

        let id = job.id;
        let job = job.clone();
        let runner = self.runner.clone();
        let progress_tx = tx.clone();
        let progress = ProgressReporter::new(move |percent| {
            let _ = progress_tx.send(Command::Progress { id, percent });
        });

        tokio::spawn(async move {
            let outcome = match AssertUnwindSafe(runner.run(&job, progress))
                .catch_unwind()
                .await
            {
                Ok(Ok(count)) => Ok(count),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err("任务执行时发生 panic".to_string()),
            };
            let _ = tx.send(Command::Finished { id, outcome });
        });
    }

    fn publish(&self) {
        self.view_tx
            .send_replace(self.jobs.iter().map(Job::view).collect());
    }
}
