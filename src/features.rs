// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/features.rs - 房屋特征向量与表单字段定义
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

use serde::Deserialize;
use thiserror::Error;

/// 特征数量
pub const FEATURE_COUNT: usize = 7;

/// 模型期望的列顺序
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
  "sqft_living",
  "bedrooms",
  "bathrooms",
  "floors",
  "grade",
  "waterfront",
  "yr_built",
];

pub const FLOOR_CHOICES: [f64; 6] = [1.0, 1.5, 2.0, 2.5, 3.0, 3.5];
pub const WATERFRONT_CHOICES: [f64; 2] = [0.0, 1.0];

#[derive(Error, Debug, PartialEq)]
pub enum FeatureError {
  #[error("字段 {name} 超出范围: {value} 不在 [{min}, {max}] 内")]
  OutOfRange {
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
  },
  #[error("字段 {name} 取值 {value} 不是可选值之一")]
  NotAChoice { name: &'static str, value: f64 },
}

/// 表单控件类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
  /// 整数输入框
  Integer,
  /// 小数输入框
  Decimal,
  /// 滑块
  Slider,
  /// 下拉选择
  Choice(&'static [f64]),
}

/// 表单字段描述
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
  pub name: &'static str,
  pub label: &'static str,
  pub kind: FieldKind,
  pub min: f64,
  pub max: f64,
  pub default: f64,
  pub step: f64,
}

impl FieldSpec {
  pub fn check(&self, value: f64) -> Result<(), FeatureError> {
    match self.kind {
      FieldKind::Choice(choices) => {
        if choices.iter().any(|c| (c - value).abs() < f64::EPSILON) {
          Ok(())
        } else {
          Err(FeatureError::NotAChoice {
            name: self.name,
            value,
          })
        }
      }
      _ => {
        if value.is_finite() && value >= self.min && value <= self.max {
          Ok(())
        } else {
          Err(FeatureError::OutOfRange {
            name: self.name,
            value,
            min: self.min,
            max: self.max,
          })
        }
      }
    }
  }

  /// 选项的显示文本
  pub fn choice_label(&self, value: f64) -> String {
    if self.name == "waterfront" {
      if value >= 1.0 { "Yes" } else { "No" }.to_string()
    } else {
      format!("{:.1}", value)
    }
  }
}

/// 表单字段表，顺序与 [`FEATURE_NAMES`] 一致
pub const FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
  FieldSpec {
    name: "sqft_living",
    label: "Living Area (Sq. Ft.)",
    kind: FieldKind::Integer,
    min: 300.0,
    max: 15000.0,
    default: 2000.0,
    step: 10.0,
  },
  FieldSpec {
    name: "bedrooms",
    label: "Bedrooms",
    kind: FieldKind::Integer,
    min: 0.0,
    max: 15.0,
    default: 3.0,
    step: 1.0,
  },
  FieldSpec {
    name: "bathrooms",
    label: "Bathrooms",
    kind: FieldKind::Decimal,
    min: 0.0,
    max: 10.0,
    default: 2.0,
    step: 0.25,
  },
  FieldSpec {
    name: "floors",
    label: "Floors",
    kind: FieldKind::Choice(&FLOOR_CHOICES),
    min: 1.0,
    max: 3.5,
    default: 2.0,
    step: 0.5,
  },
  FieldSpec {
    name: "grade",
    label: "Quality Grade (1 = poor, 13 = excellent)",
    kind: FieldKind::Slider,
    min: 1.0,
    max: 13.0,
    default: 7.0,
    step: 1.0,
  },
  FieldSpec {
    name: "waterfront",
    label: "Waterfront Property",
    kind: FieldKind::Choice(&WATERFRONT_CHOICES),
    min: 0.0,
    max: 1.0,
    default: 0.0,
    step: 1.0,
  },
  FieldSpec {
    name: "yr_built",
    label: "Year Built",
    kind: FieldKind::Integer,
    min: 1900.0,
    max: 2024.0,
    default: 2000.0,
    step: 1.0,
  },
];

/// 按字段名查找表单字段
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
  let specs: &'static [FieldSpec] = &FIELD_SPECS;
  specs.iter().find(|spec| spec.name == name)
}

/// 房屋特征，字段顺序即模型输入列顺序
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HouseFeatures {
  pub sqft_living: u32,
  pub bedrooms: u32,
  pub bathrooms: f64,
  pub floors: f64,
  pub grade: u32,
  pub waterfront: u8,
  pub yr_built: u32,
}

impl Default for HouseFeatures {
  fn default() -> Self {
    Self {
      sqft_living: 2000,
      bedrooms: 3,
      bathrooms: 2.0,
      floors: 2.0,
      grade: 7,
      waterfront: 0,
      yr_built: 2000,
    }
  }
}

impl HouseFeatures {
  pub fn columns() -> [&'static str; FEATURE_COUNT] {
    FEATURE_NAMES
  }

  /// 按模型列顺序展开为单行
  pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
    [
      self.sqft_living as f64,
      self.bedrooms as f64,
      self.bathrooms,
      self.floors,
      self.grade as f64,
      self.waterfront as f64,
      self.yr_built as f64,
    ]
  }

  /// 以表单控件的约束检查各字段
  pub fn validate(&self) -> Result<(), FeatureError> {
    FIELD_SPECS
      .iter()
      .zip(self.to_row())
      .try_for_each(|(spec, value)| spec.check(value))
  }

  pub fn with_validation(self) -> Result<Self, FeatureError> {
    self.validate()?;
    Ok(self)
  }
}
