use crate::models::job::SourceFile;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 判断路径是否为 PDF 文件（扩展名不区分大小写）
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// 从文件夹中收集所有 PDF 文件，按文件名排序以保证提交顺序稳定
pub async fn collect_pdf_files(folder_path: &str) -> Result<Vec<SourceFile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_pdf(&path) {
            tracing::info!(
                "发现文件: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );
            files.push(SourceFile::new(path));
        }
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(files)
}

/// 将命令行给出的路径展开为文件列表：目录展开为其中的 PDF，其余路径原样保留
pub async fn resolve_inputs(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(collect_pdf_files(&path.to_string_lossy()).await?);
        } else {
            files.push(SourceFile::new(path.clone()));
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collects_only_pdfs_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b_exam.pdf", "a_exam.PDF", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"%PDF-1.4").unwrap();
        }

        let files = collect_pdf_files(&dir.path().to_string_lossy()).await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a_exam.PDF", "b_exam.pdf"]);
    }

    #[tokio::test]
    async fn missing_folder_is_an_error() {
        assert!(collect_pdf_files("/definitely/not/here").await.is_err());
    }
}
