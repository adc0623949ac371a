// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/input/image_folder.rs - 图片目录输入
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
use tracing::{debug, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  input::{UploadedFile, mime_from_name},
  utils::url_to_path,
};

#[derive(Error, Debug)]
pub enum ImageFolderInputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("无法读取目录 {}: {}", .0.display(), .1)]
  IoError(PathBuf, std::io::Error),
}

/// `folder:` 方案，目录下所有 jpg/jpeg/png 文件，按文件名排序
pub struct ImageFolderInput {
  files: Vec<PathBuf>,
}

impl FromUrlWithScheme for ImageFolderInput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for ImageFolderInput {
  type Error = ImageFolderInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ImageFolderInputError::SchemeMismatch);
    }

    let directory = url_to_path(url);
    let entries = std::fs::read_dir(&directory)
      .map_err(|e| ImageFolderInputError::IoError(directory.clone(), e))?;

    let mut files = Vec::new();
    for entry in entries {
      let path = entry
        .map_err(|e| ImageFolderInputError::IoError(directory.clone(), e))?
        .path();
      let is_image = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(mime_from_name)
        .is_some();
      if path.is_file() && is_image {
        files.push(path);
      } else {
        debug!("跳过非图片文件: {}", path.display());
      }
    }
    files.sort();

    info!("目录 {} 中找到 {} 张图片", directory.display(), files.len());
    Ok(ImageFolderInput { files })
  }
}

impl ImageFolderInput {
  pub fn into_uploads(self) -> Vec<UploadedFile> {
    self.files.into_iter().map(UploadedFile::from_path).collect()
  }
}
