// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/args.rs - 项目参数配置
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

use std::time::Duration;

use clap::Args;
use tracing::{error, info};
use url::Url;

use crate::{
  FromUrl,
  features::{HouseFeatures, field_spec},
  input::{InputWrapper, UploadBatch, convert_batch},
  model::{LinearRegression, LinearRegressionBuilder, LoadOutcome},
  session::{Interaction, Notice, Session},
  slideshow::BackgroundStyle,
};

/// 模型、背景与输出配置
#[derive(Args, Debug, Clone)]
pub struct AppArgs {
  /// 模型文件，例如 linear:lr_model.json
  #[arg(long, value_name = "MODEL", default_value = "linear:lr_model.json")]
  pub model: Url,

  /// 背景图片，可重复指定
  /// 支持格式:
  /// - 单个文件: image:///path/to/a.jpg
  /// - 目录: folder:///path/to/images
  #[arg(long = "background", value_name = "IMAGES")]
  pub backgrounds: Vec<Url>,

  /// 每张背景图片的展示时长（秒）
  #[arg(long, default_value = "6", value_name = "SECONDS", value_parser = parse_interval)]
  pub interval: Duration,

  /// 页面输出
  /// 支持格式:
  /// - 文件: html:///path/to/page.html
  /// - 按日期归档: folder:///path/to/pages[?predicted]
  /// - 标准输出: stdout:
  #[arg(long, value_name = "OUTPUT", default_value = "stdout:")]
  pub output: Url,
}

/// 表单字段，取值范围与页面控件一致
#[derive(Args, Debug, Clone)]
pub struct FormArgs {
  /// 居住面积（平方英尺）
  #[arg(long, default_value_t = 2000, value_parser = clap::value_parser!(u32).range(300..=15000))]
  pub sqft_living: u32,

  /// 卧室数量
  #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(0..=15))]
  pub bedrooms: u32,

  /// 浴室数量 (0.0 - 10.0)
  #[arg(long, default_value_t = 2.0, value_parser = parse_bathrooms)]
  pub bathrooms: f64,

  /// 楼层数 (1.0, 1.5, 2.0, 2.5, 3.0, 3.5)
  #[arg(long, default_value_t = 2.0, value_parser = parse_floors)]
  pub floors: f64,

  /// 质量等级 (1 - 13)
  #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=13))]
  pub grade: u32,

  /// 是否临水 (0 或 1)
  #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
  pub waterfront: u8,

  /// 建造年份 (1900 - 2024)
  #[arg(long, default_value_t = 2000, value_parser = clap::value_parser!(u32).range(1900..=2024))]
  pub yr_built: u32,

  /// 提交预测
  #[arg(long)]
  pub submit: bool,
}

fn parse_interval(s: &str) -> Result<Duration, String> {
  let secs: f64 = s.parse().map_err(|e| format!("{}", e))?;
  if !secs.is_finite() || secs <= 0.0 {
    return Err(format!("展示时长必须为正数, 实际为 {}", s));
  }
  Duration::try_from_secs_f64(secs).map_err(|e| format!("展示时长 {} 无效: {}", s, e))
}

fn parse_field(name: &str, s: &str) -> Result<f64, String> {
  let spec = field_spec(name).ok_or_else(|| format!("未知字段: {}", name))?;
  let value: f64 = s.parse().map_err(|e| format!("{}", e))?;
  spec.check(value).map_err(|e| e.to_string())?;
  Ok(value)
}

fn parse_bathrooms(s: &str) -> Result<f64, String> {
  parse_field("bathrooms", s)
}

fn parse_floors(s: &str) -> Result<f64, String> {
  parse_field("floors", s)
}

impl FormArgs {
  pub fn features(&self) -> HouseFeatures {
    HouseFeatures {
      sqft_living: self.sqft_living,
      bedrooms: self.bedrooms,
      bathrooms: self.bathrooms,
      floors: self.floors,
      grade: self.grade,
      waterfront: self.waterfront,
      yr_built: self.yr_built,
    }
  }

  pub fn interaction(&self) -> Interaction {
    let features = self.features();
    match features.validate() {
      Err(e) => Interaction::Rejected(e.to_string()),
      Ok(()) if self.submit => Interaction::Submit(features),
      Ok(()) => Interaction::Idle(features),
    }
  }
}

impl AppArgs {
  /// 收集所有背景图片；无法打开的来源记为错误提示并跳过
  pub fn collect_backgrounds(&self) -> UploadBatch {
    let mut files = Vec::new();
    let mut notices = Vec::new();
    for url in &self.backgrounds {
      match InputWrapper::from_url(url) {
        Ok(input) => files.extend(input.into_uploads()),
        Err(e) => {
          error!("背景图片来源 {} 无法打开: {}", url, e);
          notices.push(Notice::error(format!("Error processing image {}: {}", url, e)));
        }
      }
    }

    let mut batch = convert_batch(&files);
    notices.append(&mut batch.notices);
    batch.notices = notices;
    batch
  }

  pub fn load_model(&self) -> LoadOutcome<LinearRegression> {
    match LinearRegressionBuilder::from_url(&self.model) {
      Ok(builder) => builder.load(),
      Err(e) => {
        error!("模型路径无效: {}", e);
        LoadOutcome::Corrupt(e.to_string())
      }
    }
  }

  /// 启动时构造会话：加载模型一次、处理背景图片一次
  pub fn open_session(&self) -> anyhow::Result<Session<LinearRegression>> {
    info!("模型文件: {}", self.model);
    let outcome = self.load_model();
    let uploads = self.collect_backgrounds();
    let background = BackgroundStyle::generate(uploads.data_urls.clone(), self.interval)?;
    Ok(Session::new(outcome, uploads, background))
  }
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;

  #[derive(Parser, Debug)]
  struct TestCli {
    #[command(flatten)]
    app: AppArgs,
    #[command(flatten)]
    form: FormArgs,
  }

  #[test]
  fn defaults_match_form() {
    let cli = TestCli::try_parse_from(["fangjia"]).unwrap();
    assert_eq!(cli.form.features(), HouseFeatures::default());
    assert_eq!(
      cli.form.interaction(),
      Interaction::Idle(HouseFeatures::default())
    );
    assert_eq!(cli.app.interval, Duration::from_secs(6));
    assert_eq!(cli.app.model.as_str(), "linear:lr_model.json");
    assert_eq!(cli.app.output.scheme(), "stdout");
    assert!(cli.app.backgrounds.is_empty());
  }

  #[test]
  fn submit_flag_and_values() {
    let cli = TestCli::try_parse_from([
      "fangjia",
      "--sqft-living",
      "3500",
      "--floors",
      "1.5",
      "--waterfront",
      "1",
      "--submit",
    ])
    .unwrap();
    let Interaction::Submit(features) = cli.form.interaction() else {
      panic!("expected submit");
    };
    assert_eq!(features.sqft_living, 3500);
    assert_eq!(features.floors, 1.5);
    assert_eq!(features.waterfront, 1);
  }

  #[test]
  fn out_of_range_values_are_rejected() {
    assert!(TestCli::try_parse_from(["fangjia", "--sqft-living", "200"]).is_err());
    assert!(TestCli::try_parse_from(["fangjia", "--floors", "4"]).is_err());
    assert!(TestCli::try_parse_from(["fangjia", "--bathrooms", "10.5"]).is_err());
    assert!(TestCli::try_parse_from(["fangjia", "--waterfront", "2"]).is_err());
    assert!(TestCli::try_parse_from(["fangjia", "--yr-built", "2025"]).is_err());
    assert!(TestCli::try_parse_from(["fangjia", "--interval", "0"]).is_err());
    assert!(TestCli::try_parse_from(["fangjia", "--interval", "1e30"]).is_err());
  }

  #[test]
  fn fractional_fields_use_their_own_bounds() {
    // floors 只接受固定选项，bathrooms 接受 0.25 步进
    assert!(TestCli::try_parse_from(["fangjia", "--bathrooms", "2.25"]).is_ok());
    assert!(TestCli::try_parse_from(["fangjia", "--floors", "2.25"]).is_err());
    assert!(TestCli::try_parse_from(["fangjia", "--bathrooms", "0"]).is_ok());
    assert!(TestCli::try_parse_from(["fangjia", "--floors", "0"]).is_err());

    let cli = TestCli::try_parse_from(["fangjia", "--interval", "0.5"]).unwrap();
    assert_eq!(cli.app.interval, Duration::from_millis(500));
  }

  #[test]
  fn bad_background_source_is_reported() {
    let cli = TestCli::try_parse_from([
      "fangjia",
      "--background",
      "ftp://example.com/a.png",
      "--background",
      "image:///nonexistent/fangjia/b.png",
    ])
    .unwrap();
    let batch = cli.app.collect_backgrounds();
    assert_eq!(batch.uploaded, 1);
    assert!(batch.data_urls.is_empty());
    // 来源错误、文件错误、数量提示
    assert_eq!(batch.notices.len(), 3);
    assert!(batch.notices[0].message.contains("ftp://example.com/a.png"));
  }

  #[test]
  fn wrong_model_scheme_is_corrupt() {
    let cli = TestCli::try_parse_from(["fangjia", "--model", "image:///tmp/model.json"]).unwrap();
    assert!(matches!(cli.app.load_model(), LoadOutcome::Corrupt(_)));
  }
}
