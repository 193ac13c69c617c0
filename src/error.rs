use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// PDF 打开/渲染/文本层错误
    #[error("PDF错误: {0}")]
    Pdf(#[from] PdfError),
    /// 图像处理错误
    #[error("图像错误: {0}")]
    Raster(#[from] RasterError),
    /// OCR 识别错误
    #[error("OCR错误: {0}")]
    Ocr(#[from] OcrError),
    /// 校准配置错误
    #[error("校准错误: {0}")]
    Calibration(#[from] CalibrationError),
    /// 结果存储错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 任务队列错误
    #[error("队列错误: {0}")]
    Queue(#[from] QueueError),
    /// 文件系统错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

/// PDF 相关错误
#[derive(Debug, Error)]
pub enum PdfError {
    /// 文档无法打开
    #[error("无法打开文档 {path}: {reason}")]
    OpenFailed { path: String, reason: String },
    /// 页码超出范围
    #[error("页码 {page} 超出范围 [1, {page_count}]")]
    PageOutOfRange { page: usize, page_count: usize },
    /// 渲染失败
    #[error("第 {page} 页渲染失败: {reason}")]
    RenderFailed { page: usize, reason: String },
    /// 文本层读取失败
    #[error("第 {page} 页文本层读取失败: {reason}")]
    TextLayerFailed { page: usize, reason: String },
    /// 外部程序调用失败
    #[error("外部程序 {program} 执行失败: {reason}")]
    ToolFailed { program: String, reason: String },
}

/// 图像处理错误
#[derive(Debug, Error)]
pub enum RasterError {
    /// 裁剪区域超出图像边界
    #[error("裁剪区域 {x},{y} {width}x{height} 超出图像边界 {raster_width}x{raster_height}")]
    CropOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        raster_width: u32,
        raster_height: u32,
    },
    /// 编码/解码失败
    #[error("图像编解码失败: {0}")]
    Codec(#[from] image::ImageError),
}

/// OCR 识别错误
#[derive(Debug, Error)]
pub enum OcrError {
    /// 引擎启动失败
    #[error("无法启动 OCR 引擎 {program}: {source}")]
    SpawnFailed {
        program: String,
        source: std::io::Error,
    },
    /// 引擎返回非零状态
    #[error("OCR 引擎异常退出 (状态: {status}): {stderr}")]
    EngineFailed { status: String, stderr: String },
}

/// 校准配置错误
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// 尚未校准
    #[error("尚未保存校准配置")]
    NotConfigured,
    /// 校准文件读写失败
    #[error("校准文件 {path} 读写失败: {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },
    /// 校准文件格式错误
    #[error("校准文件 {path} 格式错误: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },
    /// 矩形参数解析失败
    #[error("无法解析矩形参数 '{input}'，应为 x,y,width,height")]
    RectangleParse { input: String },
}

/// 结果存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 未知的试卷 ID
    #[error("未知的试卷ID: {0}")]
    UnknownTest(String),
    /// 写入失败
    #[error("写入 {path} 失败: {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },
    /// 序列化失败
    #[error("序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 词表文件解析失败
    #[error("词表文件 {path} 解析失败: {reason}")]
    VocabularyParseFailed { path: String, reason: String },
}

/// 任务队列错误
#[derive(Debug, Error)]
pub enum QueueError {
    /// 调度器已停止
    #[error("调度器已停止")]
    SchedulerStopped,
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文档打开失败错误
    pub fn pdf_open_failed(path: impl Into<String>, reason: impl ToString) -> Self {
        AppError::Pdf(PdfError::OpenFailed {
            path: path.into(),
            reason: reason.to_string(),
        })
    }

    /// 创建渲染失败错误
    pub fn render_failed(page: usize, reason: impl ToString) -> Self {
        AppError::Pdf(PdfError::RenderFailed {
            page,
            reason: reason.to_string(),
        })
    }

    /// 创建外部程序失败错误
    pub fn tool_failed(program: impl Into<String>, reason: impl ToString) -> Self {
        AppError::Pdf(PdfError::ToolFailed {
            program: program.into(),
            reason: reason.to_string(),
        })
    }

    /// 创建存储写入失败错误
    pub fn storage_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Storage(StorageError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Raster(RasterError::Codec(err))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
