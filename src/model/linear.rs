// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/model/linear.rs - 线性回归模型
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

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  features::{FEATURE_COUNT, FEATURE_NAMES, HouseFeatures},
  model::{LoadOutcome, Model},
  utils::url_to_path,
};

pub const LINEAR_SCHEME: &str = "linear";

#[derive(Error, Debug)]
pub enum LinearModelError {
  #[error("模型文件不存在: {}", .0.display())]
  NotFound(PathBuf),
  #[error("模型文件读取错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("模型文件格式错误: {0}")]
  FormatError(#[from] serde_json::Error),
  #[error("模型与输入特征不兼容: {0}")]
  Incompatible(String),
  #[error("模型路径错误: {0}")]
  ModelPathError(String),
  #[error("预测结果不是有限数值: {0}")]
  NonFinite(f64),
}

impl LinearModelError {
  pub fn incompatible(msg: impl Into<String>) -> Self {
    LinearModelError::Incompatible(msg.into())
  }
}

/// 输入标准化参数，`(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
  pub mean: Vec<f64>,
  pub scale: Vec<f64>,
}

/// 目标值反标准化参数，`y * scale + mean`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetScaler {
  pub mean: f64,
  pub scale: f64,
}

/// 模型文件内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressionFile {
  pub feature_names: Vec<String>,
  pub coefficients: Vec<f64>,
  pub intercept: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub scaler: Option<StandardScaler>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target_scaler: Option<TargetScaler>,
}

impl LinearRegressionFile {
  /// 以给定系数构造一个不带标准化的模型文件
  pub fn plain(coefficients: [f64; FEATURE_COUNT], intercept: f64) -> Self {
    Self {
      feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
      coefficients: coefficients.to_vec(),
      intercept,
      scaler: None,
      target_scaler: None,
    }
  }
}

/// 加载完成的线性回归模型，加载后只读
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
  coefficients: [f64; FEATURE_COUNT],
  intercept: f64,
  mean: [f64; FEATURE_COUNT],
  scale: [f64; FEATURE_COUNT],
  target: Option<TargetScaler>,
}

fn to_fixed(name: &str, values: &[f64]) -> Result<[f64; FEATURE_COUNT], LinearModelError> {
  let fixed: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| {
    LinearModelError::incompatible(format!(
      "{} 长度应为 {}, 实际为 {}",
      name,
      FEATURE_COUNT,
      values.len()
    ))
  })?;
  if let Some(bad) = fixed.iter().find(|v| !v.is_finite()) {
    return Err(LinearModelError::incompatible(format!(
      "{} 含有非有限数值 {}",
      name, bad
    )));
  }
  Ok(fixed)
}

impl TryFrom<LinearRegressionFile> for LinearRegression {
  type Error = LinearModelError;

  fn try_from(file: LinearRegressionFile) -> Result<Self, Self::Error> {
    if file.feature_names != FEATURE_NAMES {
      error!(
        "模型特征顺序不匹配: 期望 {:?}, 实际 {:?}",
        FEATURE_NAMES, file.feature_names
      );
      return Err(LinearModelError::incompatible(format!(
        "特征顺序应为 {:?}, 实际为 {:?}",
        FEATURE_NAMES, file.feature_names
      )));
    }

    let coefficients = to_fixed("coefficients", &file.coefficients)?;
    if !file.intercept.is_finite() {
      return Err(LinearModelError::incompatible("intercept 不是有限数值"));
    }

    let (mean, scale) = match file.scaler {
      Some(scaler) => {
        let mean = to_fixed("scaler.mean", &scaler.mean)?;
        let scale = to_fixed("scaler.scale", &scaler.scale)?;
        if scale.contains(&0.0) {
          return Err(LinearModelError::incompatible("scaler.scale 不能为 0"));
        }
        (mean, scale)
      }
      None => ([0.0; FEATURE_COUNT], [1.0; FEATURE_COUNT]),
    };

    if let Some(target) = file.target_scaler
      && !(target.mean.is_finite() && target.scale.is_finite() && target.scale != 0.0)
    {
      return Err(LinearModelError::incompatible(
        "target_scaler 必须为有限数值且 scale 不能为 0",
      ));
    }

    Ok(LinearRegression {
      coefficients,
      intercept: file.intercept,
      mean,
      scale,
      target: file.target_scaler,
    })
  }
}

impl LinearRegression {
  pub fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
    let linear = row
      .iter()
      .zip(&self.mean)
      .zip(&self.scale)
      .zip(&self.coefficients)
      .map(|(((x, mean), scale), coef)| coef * (x - mean) / scale)
      .sum::<f64>()
      + self.intercept;

    match self.target {
      Some(target) => linear * target.scale + target.mean,
      None => linear,
    }
  }
}

impl Model for LinearRegression {
  type Input = HouseFeatures;
  type Output = f64;
  type Error = LinearModelError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    let row = input.to_row();
    let price = self.predict_row(&row);
    debug!("输入行 {:?} 的预测结果: {}", row, price);
    if price.is_finite() {
      Ok(price)
    } else {
      Err(LinearModelError::NonFinite(price))
    }
  }
}

pub struct LinearRegressionBuilder {
  model_path: PathBuf,
}

impl FromUrlWithScheme for LinearRegressionBuilder {
  const SCHEME: &'static str = LINEAR_SCHEME;
}

impl FromUrl for LinearRegressionBuilder {
  type Error = LinearModelError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(LinearModelError::ModelPathError(format!(
        "模型路径必须使用 {} 方案, 实际为 {}",
        Self::SCHEME,
        url.scheme()
      )));
    }

    Ok(LinearRegressionBuilder {
      model_path: url_to_path(url),
    })
  }
}

impl LinearRegressionBuilder {
  pub fn with_path(path: impl Into<PathBuf>) -> Self {
    Self {
      model_path: path.into(),
    }
  }

  pub fn build(self) -> Result<LinearRegression, LinearModelError> {
    info!("加载模型文件: {}", self.model_path.display());
    let data = match std::fs::read(&self.model_path) {
      Ok(data) => data,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        return Err(LinearModelError::NotFound(self.model_path));
      }
      Err(e) => return Err(e.into()),
    };
    debug!("模型文件大小: {} 字节", data.len());

    let file: LinearRegressionFile = serde_json::from_slice(&data)?;
    let model = LinearRegression::try_from(file)?;
    info!("模型加载完成");
    Ok(model)
  }

  /// 加载模型，把错误归类为“不存在”与“已损坏”两类
  pub fn load(self) -> LoadOutcome<LinearRegression> {
    match self.build() {
      Ok(model) => LoadOutcome::Loaded(model),
      Err(LinearModelError::NotFound(path)) => {
        error!("模型文件不存在: {}", path.display());
        LoadOutcome::NotFound(path)
      }
      Err(e) => {
        error!("模型加载失败: {}", e);
        LoadOutcome::Corrupt(e.to_string())
      }
    }
  }
}
