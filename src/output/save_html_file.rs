// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/output/save_html_file.rs - 保存 HTML 文件
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

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  output::{Page, Render},
  utils::url_to_path,
};

pub struct SaveHtmlFileOutput {
  path: PathBuf,
}

#[derive(Error, Debug)]
pub enum SaveHtmlFileError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

impl FromUrlWithScheme for SaveHtmlFileOutput {
  const SCHEME: &'static str = "html";
}

impl FromUrl for SaveHtmlFileOutput {
  type Error = SaveHtmlFileError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(SaveHtmlFileError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    Ok(SaveHtmlFileOutput {
      path: url_to_path(uri),
    })
  }
}

impl Render for SaveHtmlFileOutput {
  type Error = SaveHtmlFileError;

  fn render_page(&self, page: &Page<'_>) -> Result<(), Self::Error> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&self.path, page.to_html())?;
    info!("保存页面到文件: {}", self.path.display());

    Ok(())
  }
}
