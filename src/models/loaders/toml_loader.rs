use crate::error::FileError;
use crate::models::submission::{QuestionBank, Submission};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载题库
pub async fn load_question_bank(toml_file_path: &Path) -> Result<QuestionBank> {
    let path_display = toml_file_path.display().to_string();
    if !toml_file_path.exists() {
        return Err(FileError::NotFound { path: path_display }.into());
    }

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: path_display.clone(),
            source,
        })?;

    let bank: QuestionBank = toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
        path: path_display,
        source,
    })?;

    Ok(bank)
}

/// 从 TOML 文件加载单份提交
pub async fn load_submission(toml_file_path: &Path) -> Result<Submission> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let submission: Submission = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    Ok(submission.with_file_path(toml_file_path.to_string_lossy().to_string()))
}

/// 从文件夹中加载所有提交
///
/// 无法解析的文件记录警告后跳过；结果按文件名排序，保证批次顺序稳定
pub async fn load_all_submissions(folder_path: &str) -> Result<Vec<Submission>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut submissions = Vec::new();
    for path in toml_files {
        tracing::debug!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_submission(&path).await {
            Ok(submission) => submissions.push(submission),
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(submissions)
}
