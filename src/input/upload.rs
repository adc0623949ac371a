// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/input/upload.rs - 上传文件与 data URL 转换
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

use std::path::{Path, PathBuf};

use base64::Engine;
use thiserror::Error;
use tracing::debug;

/// 未声明 MIME 类型时使用的默认类型
pub const DEFAULT_MIME: &str = "image/png";

#[derive(Error, Debug)]
pub enum ImageProcessingError {
  #[error("无法读取文件: {0}")]
  Unreadable(#[from] std::io::Error),
  #[error("文件内容为空")]
  Empty,
  #[cfg(feature = "probe_image")]
  #[error("无法识别的图片格式: {0}")]
  Unrecognized(image::ImageError),
}

#[derive(Debug, Clone)]
enum Payload {
  Bytes(Vec<u8>),
  Path(PathBuf),
}

/// 一个上传的文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
  pub name: String,
  pub mime: Option<String>,
  payload: Payload,
}

/// 根据文件扩展名推断声明的 MIME 类型
pub fn mime_from_name(name: &str) -> Option<String> {
  let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
  match ext.as_str() {
    "jpg" | "jpeg" => Some("image/jpeg".to_string()),
    "png" => Some("image/png".to_string()),
    _ => None,
  }
}

impl UploadedFile {
  pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
    let name = name.into();
    Self {
      mime: mime_from_name(&name),
      name,
      payload: Payload::Bytes(bytes),
    }
  }

  /// 以路径表示的上传文件，读取推迟到转换时进行
  pub fn from_path(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    let name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| path.display().to_string());
    Self {
      mime: mime_from_name(&name),
      name,
      payload: Payload::Path(path),
    }
  }

  pub fn with_mime(mut self, mime: Option<String>) -> Self {
    self.mime = mime;
    self
  }

  pub fn read_bytes(&self) -> Result<Vec<u8>, ImageProcessingError> {
    let bytes = match &self.payload {
      Payload::Bytes(bytes) => bytes.clone(),
      Payload::Path(path) => std::fs::read(path)?,
    };
    if bytes.is_empty() {
      return Err(ImageProcessingError::Empty);
    }
    Ok(bytes)
  }

  /// 转换为内嵌的 data URL
  pub fn to_data_url(&self) -> Result<String, ImageProcessingError> {
    let bytes = self.read_bytes()?;

    #[cfg(feature = "probe_image")]
    {
      let format = image::guess_format(&bytes).map_err(ImageProcessingError::Unrecognized)?;
      debug!("图片 {} 格式: {:?}", self.name, format);
    }

    let mime = self.mime.as_deref().unwrap_or(DEFAULT_MIME);
    debug!("图片 {} 大小 {} 字节, 类型 {}", self.name, bytes.len(), mime);
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:{};base64,{}", mime, encoded))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
  const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

  #[test]
  fn mime_follows_extension() {
    assert_eq!(mime_from_name("a.PNG").as_deref(), Some("image/png"));
    assert_eq!(mime_from_name("b.jpeg").as_deref(), Some("image/jpeg"));
    assert_eq!(mime_from_name("c.jpg").as_deref(), Some("image/jpeg"));
    assert_eq!(mime_from_name("d.webp"), None);
    assert_eq!(mime_from_name("noext"), None);
  }

  #[test]
  fn png_payload_becomes_png_data_url() {
    let url = UploadedFile::from_bytes("house.png", PNG_SIGNATURE.to_vec())
      .to_data_url()
      .unwrap();
    assert_eq!(url, "data:image/png;base64,iVBORw0KGgo=");
  }

  #[test]
  fn undeclared_mime_defaults_to_png() {
    let url = UploadedFile::from_bytes("blob", JPEG_SIGNATURE.to_vec())
      .to_data_url()
      .unwrap();
    assert!(url.starts_with("data:image/png;base64,"));

    let url = UploadedFile::from_bytes("blob", JPEG_SIGNATURE.to_vec())
      .with_mime(Some("image/jpeg".to_string()))
      .to_data_url()
      .unwrap();
    assert!(url.starts_with("data:image/jpeg;base64,"));
  }

  #[test]
  fn missing_and_empty_payloads_fail() {
    let missing = UploadedFile::from_path("/nonexistent/fangjia/house.png");
    assert_eq!(missing.name, "house.png");
    assert!(matches!(
      missing.to_data_url(),
      Err(ImageProcessingError::Unreadable(_))
    ));

    let empty = UploadedFile::from_bytes("empty.png", Vec::new());
    assert!(matches!(
      empty.to_data_url(),
      Err(ImageProcessingError::Empty)
    ));
  }

  #[cfg(feature = "probe_image")]
  #[test]
  fn non_image_payload_is_rejected() {
    let text = UploadedFile::from_bytes("notes.png", b"just some text".to_vec());
    assert!(matches!(
      text.to_data_url(),
      Err(ImageProcessingError::Unrecognized(_))
    ));
  }
}
