// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/input.rs - 背景图片上传与表单提交输入
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
use tracing::{error, info};

use crate::{FromUrl, FromUrlWithScheme, session::Notice};

mod image_file;
mod image_folder;
mod submission;
mod upload;

pub use self::image_file::{ImageFileInput, ImageFileInputError};
pub use self::image_folder::{ImageFolderInput, ImageFolderInputError};
pub use self::submission::{SubmissionError, SubmissionReader};
pub use self::upload::{DEFAULT_MIME, ImageProcessingError, UploadedFile, mime_from_name};

/// 少于该数量时提示用户多上传几张
pub const RECOMMENDED_IMAGE_COUNT: usize = 3;

#[derive(Error, Debug)]
pub enum InputError {
  #[error("图片文件输入错误: {0}")]
  ImageFileInputError(#[from] ImageFileInputError),
  #[error("图片目录输入错误: {0}")]
  ImageFolderInputError(#[from] ImageFolderInputError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

pub enum InputWrapper {
  ImageFile(ImageFileInput),
  ImageFolder(ImageFolderInput),
}

impl FromUrl for InputWrapper {
  type Error = InputError;

  fn from_url(url: &url::Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      ImageFileInput::SCHEME => Ok(InputWrapper::ImageFile(ImageFileInput::from_url(url)?)),
      ImageFolderInput::SCHEME => Ok(InputWrapper::ImageFolder(ImageFolderInput::from_url(
        url,
      )?)),
      other => Err(InputError::SchemeMismatch(other.to_string())),
    }
  }
}

impl InputWrapper {
  pub fn into_uploads(self) -> Vec<UploadedFile> {
    match self {
      InputWrapper::ImageFile(input) => vec![input.into_upload()],
      InputWrapper::ImageFolder(input) => input.into_uploads(),
    }
  }
}

/// 一批上传图片的转换结果
#[derive(Debug, Default)]
pub struct UploadBatch {
  /// 上传的文件数
  pub uploaded: usize,
  /// 转换成功的 data URL，保持上传顺序
  pub data_urls: Vec<String>,
  /// 逐个文件的错误与提示
  pub notices: Vec<Notice>,
}

/// 逐个转换上传的图片，失败的文件被跳过，不会中断整批处理
pub fn convert_batch(files: &[UploadedFile]) -> UploadBatch {
  let mut batch = UploadBatch {
    uploaded: files.len(),
    ..Default::default()
  };

  if files.is_empty() {
    return batch;
  }

  if files.len() < RECOMMENDED_IMAGE_COUNT {
    batch.notices.push(Notice::info(format!(
      "Upload at least {} images for a better slideshow effect.",
      RECOMMENDED_IMAGE_COUNT
    )));
  }

  info!("正在处理 {} 张图片...", files.len());
  for file in files {
    match file.to_data_url() {
      Ok(url) => batch.data_urls.push(url),
      Err(e) => {
        error!("图片 {} 处理失败: {}", file.name, e);
        batch
          .notices
          .push(Notice::error(format!("Error processing image {}: {}", file.name, e)));
      }
    }
  }
  info!(
    "图片处理完成: 成功 {} 张, 失败 {} 张",
    batch.data_urls.len(),
    files.len() - batch.data_urls.len()
  );

  batch
}
