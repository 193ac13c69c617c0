use anyhow::Result;
use clap::Parser;
use pdf_question_extract::cli::{self, Args};
use pdf_question_extract::utils::logging;
use pdf_question_extract::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init_log_file(&config.output_log_file)?;
    logging::init(config.verbose_logging, &config.output_log_file)?;

    cli::dispatch(args, config).await
}
