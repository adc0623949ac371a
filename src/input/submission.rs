// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/input/submission.rs - 按行读取的表单提交
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

use std::io::BufRead;

use thiserror::Error;
use tracing::debug;

use crate::features::{FeatureError, HouseFeatures};

#[derive(Error, Debug)]
pub enum SubmissionError {
  #[error("读取第 {line} 行失败: {source}")]
  Io {
    line: usize,
    source: std::io::Error,
  },
  #[error("第 {line} 行不是有效的 JSON 提交: {source}")]
  Json {
    line: usize,
    source: serde_json::Error,
  },
  #[error("第 {line} 行取值无效: {source}")]
  Invalid { line: usize, source: FeatureError },
}

/// 每行一个 JSON 对象，缺省字段取表单默认值，空行被忽略
pub struct SubmissionReader<R> {
  lines: std::io::Lines<R>,
  line: usize,
}

impl<R: BufRead> SubmissionReader<R> {
  pub fn new(reader: R) -> Self {
    Self {
      lines: reader.lines(),
      line: 0,
    }
  }
}

impl<R: BufRead> Iterator for SubmissionReader<R> {
  type Item = Result<HouseFeatures, SubmissionError>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      let text = self.lines.next()?;
      self.line += 1;
      let line = self.line;

      let text = match text {
        Ok(text) => text,
        Err(source) => return Some(Err(SubmissionError::Io { line, source })),
      };
      if text.trim().is_empty() {
        continue;
      }
      debug!("收到第 {} 行提交: {}", line, text);

      let result = serde_json::from_str::<HouseFeatures>(&text)
        .map_err(|source| SubmissionError::Json { line, source })
        .and_then(|features| {
          features
            .with_validation()
            .map_err(|source| SubmissionError::Invalid { line, source })
        });
      return Some(result);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_one_submission_per_line() {
    let input = "{\"bedrooms\": 5}\n\n{}\nnot json\n{\"grade\": 14}\n";
    let results: Vec<_> = SubmissionReader::new(input.as_bytes()).collect();
    assert_eq!(results.len(), 4);

    assert_eq!(results[0].as_ref().unwrap().bedrooms, 5);
    assert_eq!(results[1].as_ref().unwrap(), &HouseFeatures::default());
    assert!(matches!(
      results[2],
      Err(SubmissionError::Json { line: 4, .. })
    ));
    assert!(matches!(
      results[3],
      Err(SubmissionError::Invalid { line: 5, .. })
    ));
  }
}
