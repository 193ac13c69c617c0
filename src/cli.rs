//! 命令行入口
//!
//! 子命令：`calibrate` 保存题目框与答案框，`show-calibration` 打印当前配置，
//! `run` 批量抽取（未指定文件时扫描输入目录）。

use crate::config::Config;
use crate::infrastructure::{CalibrationStore, FileCalibrationStore};
use crate::models::loaders::{collect_pdf_files, resolve_inputs};
use crate::models::{CalibrationConfig, Rectangle};
use crate::orchestrator::App;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "pdf_question_extract")]
#[command(about = "从固定版式的 PDF 试卷中批量抽取题目截图与正确答案")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 保存校准配置（参考缩放 2.0 下的像素坐标 x,y,width,height）
    Calibrate {
        #[arg(long)]
        question: Rectangle,
        #[arg(long)]
        answer: Rectangle,
    },
    /// 打印当前校准配置
    ShowCalibration,
    /// 处理 PDF 文件或目录；缺省处理 INPUT_FOLDER
    Run { files: Vec<PathBuf> },
}

pub async fn dispatch(args: Args, config: Config) -> Result<()> {
    match args.cmd {
        Command::Calibrate { question, answer } => {
            let store = FileCalibrationStore::new(&config.calibration_dir);
            let calibration = CalibrationConfig::new(question, answer);
            store.save(&calibration).await.context("保存校准配置失败")?;
            Ok(())
        }
        Command::ShowCalibration => {
            let store = FileCalibrationStore::new(&config.calibration_dir);
            match store.load().await? {
                Some(calibration) => {
                    println!("{}", serde_json::to_string_pretty(&calibration)?);
                }
                None => warn!("⚠️ 尚未保存校准配置: {}", store.path().display()),
            }
            Ok(())
        }
        Command::Run { files } => {
            let sources = if files.is_empty() {
                collect_pdf_files(&config.input_folder).await?
            } else {
                resolve_inputs(&files).await?
            };

            let app = App::initialize(config).await?;
            let stats = app.run(sources).await?;
            for job in app.queue().jobs() {
                info!(
                    "{} {} [{}] 题目: {}",
                    job.id,
                    job.file_name,
                    job.status.label(),
                    job.total_questions
                );
            }
            app.queue().shutdown();

            if stats.failed > 0 {
                warn!("⚠️ 有 {} 个文件处理失败，详见日志", stats.failed);
            }
            Ok(())
        }
    }
}
