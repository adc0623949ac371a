// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/output/directory_record.rs - 目录记录输出
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;
use tracing::info;

use crate::{
  FromUrl, FromUrlWithScheme,
  output::{Page, Render},
  session::SubmitOutcome,
  utils::url_to_path,
};

#[derive(Error, Debug)]
pub enum DirectoryRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// `folder:` 方案，每个页面按日期存入 `<dir>/YYYY/MM/DD/`
///
/// 带 `?predicted` 参数时只记录预测成功的页面。
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  page_counter: Mutex<u16>,
  only_predicted: bool,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(DirectoryRecordOutputError::SchemeMismatch);
    }

    let only_predicted = uri.query_pairs().any(|(k, _)| k == "predicted");

    Ok(DirectoryRecordOutput {
      directory: url_to_path(uri),
      page_counter: Mutex::new(0),
      only_predicted,
    })
  }
}

impl DirectoryRecordOutput {
  fn page_id(&self) -> u16 {
    let mut counter = self
      .page_counter
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner());
    let id = counter.wrapping_add(1);
    *counter = id;
    id
  }

  fn page_path(&self, now: DateTime<Utc>) -> Result<PathBuf, DirectoryRecordOutputError> {
    let directory = self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()));
    std::fs::create_dir_all(&directory)?;

    Ok(directory.join(format!(
      "{}-{:04X}.html",
      now.format("%H-%M-%S"),
      self.page_id()
    )))
  }
}

impl Render for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn render_page(&self, page: &Page<'_>) -> Result<(), Self::Error> {
    let predicted = matches!(page.outcome, Some(SubmitOutcome::Predicted(_)));
    if self.only_predicted && !predicted {
      return Ok(());
    }

    let path = self.page_path(Utc::now())?;
    std::fs::write(&path, page.to_html())?;
    info!("页面已记录: {}", path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn pages_are_filed_by_date_with_counter() {
    let dir = tempfile::tempdir().unwrap();
    let url = url::Url::parse(&format!("folder://{}", dir.path().display())).unwrap();
    let output = DirectoryRecordOutput::from_url(&url).unwrap();
    assert!(!output.only_predicted);

    let now = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 1).unwrap();
    let first = output.page_path(now).unwrap();
    let second = output.page_path(now).unwrap();

    let day = dir.path().join("2026").join("03").join("07");
    assert!(day.is_dir());
    assert_eq!(first, day.join("09-05-01-0001.html"));
    assert_eq!(second, day.join("09-05-01-0002.html"));
  }

  #[test]
  fn predicted_flag_is_parsed() {
    let url = url::Url::parse("folder:///tmp/pages?predicted").unwrap();
    let output = DirectoryRecordOutput::from_url(&url).unwrap();
    assert!(output.only_predicted);
    assert_eq!(output.directory, PathBuf::from("/tmp/pages"));
  }
}
