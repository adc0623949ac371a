// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/output.rs - 输出定义
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

use thiserror::Error;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  features::HouseFeatures,
  session::{Notice, SubmitOutcome},
  slideshow::BackgroundStyle,
};

pub trait Render {
  type Error;
  fn render_page(&self, page: &Page<'_>) -> Result<(), Self::Error>;
}

/// 一次求值后要展示的全部内容
#[derive(Debug)]
pub struct Page<'a> {
  pub background: &'a BackgroundStyle,
  /// 启动时产生的提示（模型加载、图片处理）
  pub startup_notices: &'a [Notice],
  /// 本次交互产生的提示
  pub notices: Vec<Notice>,
  pub uploaded: usize,
  pub processed: usize,
  pub model_loaded: bool,
  pub form: HouseFeatures,
  pub outcome: Option<SubmitOutcome>,
}

pub mod html;
pub use self::html::format_currency;

mod save_html_file;
pub use self::save_html_file::{SaveHtmlFileError, SaveHtmlFileOutput};

mod stdout;
pub use self::stdout::{StdoutOutput, StdoutOutputError};

#[cfg(feature = "directory_record")]
mod directory_record;
#[cfg(feature = "directory_record")]
pub use self::directory_record::{DirectoryRecordOutput, DirectoryRecordOutputError};

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("保存 HTML 文件错误: {0}")]
  SaveHtmlFileError(#[from] SaveHtmlFileError),
  #[error("标准输出错误: {0}")]
  StdoutOutputError(#[from] StdoutOutputError),
  #[cfg(feature = "directory_record")]
  #[error("目录记录输出错误: {0}")]
  DirectoryRecordOutputError(#[from] DirectoryRecordOutputError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

pub enum OutputWrapper {
  SaveHtmlFileOutput(SaveHtmlFileOutput),
  StdoutOutput(StdoutOutput),
  #[cfg(feature = "directory_record")]
  DirectoryRecordOutput(DirectoryRecordOutput),
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      SaveHtmlFileOutput::SCHEME => {
        let output = SaveHtmlFileOutput::from_url(url)?;
        Ok(OutputWrapper::SaveHtmlFileOutput(output))
      }
      StdoutOutput::SCHEME => {
        let output = StdoutOutput::from_url(url)?;
        Ok(OutputWrapper::StdoutOutput(output))
      }
      #[cfg(feature = "directory_record")]
      DirectoryRecordOutput::SCHEME => {
        let output = DirectoryRecordOutput::from_url(url)?;
        Ok(OutputWrapper::DirectoryRecordOutput(output))
      }
      other => Err(OutputError::SchemeMismatch(other.to_string())),
    }
  }
}

impl Render for OutputWrapper {
  type Error = OutputError;

  fn render_page(&self, page: &Page<'_>) -> Result<(), Self::Error> {
    match self {
      OutputWrapper::SaveHtmlFileOutput(output) => {
        output.render_page(page).map_err(OutputError::from)
      }
      OutputWrapper::StdoutOutput(output) => output.render_page(page).map_err(OutputError::from),
      #[cfg(feature = "directory_record")]
      OutputWrapper::DirectoryRecordOutput(output) => {
        output.render_page(page).map_err(OutputError::from)
      }
    }
  }
}
