// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/model.rs - 模型
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

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 模型加载结果
///
/// 加载只在启动时进行一次，失败不会终止进程，只会让预测功能不可用。
#[derive(Debug)]
pub enum LoadOutcome<M> {
  Loaded(M),
  NotFound(PathBuf),
  Corrupt(String),
}

impl<M> LoadOutcome<M> {
  pub fn is_loaded(&self) -> bool {
    matches!(self, LoadOutcome::Loaded(_))
  }

  /// 面向用户的错误描述，加载成功时为 `None`
  pub fn error_message(&self) -> Option<String> {
    match self {
      LoadOutcome::Loaded(_) => None,
      LoadOutcome::NotFound(path) => Some(format!(
        "Model file '{}' not found. Please check the path.",
        path.display()
      )),
      LoadOutcome::Corrupt(reason) => Some(format!("Error loading model: {}", reason)),
    }
  }

  pub fn into_model(self) -> Option<M> {
    match self {
      LoadOutcome::Loaded(model) => Some(model),
      _ => None,
    }
  }
}

mod linear;
pub use self::linear::{
  LINEAR_SCHEME, LinearModelError, LinearRegression, LinearRegressionBuilder, LinearRegressionFile,
  StandardScaler, TargetScaler,
};
