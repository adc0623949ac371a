// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/session.rs - 会话状态与单次交互求值
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

use std::fmt::Display;

use tracing::{error, info, warn};

use crate::{
  features::HouseFeatures,
  input::UploadBatch,
  model::{LoadOutcome, Model},
  output::Page,
  slideshow::BackgroundStyle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
  Error,
  Warning,
  Info,
}

/// 面向用户的提示信息
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
  pub level: NoticeLevel,
  pub message: String,
}

impl Notice {
  pub fn error(message: impl Into<String>) -> Self {
    Self {
      level: NoticeLevel::Error,
      message: message.into(),
    }
  }

  pub fn warning(message: impl Into<String>) -> Self {
    Self {
      level: NoticeLevel::Warning,
      message: message.into(),
    }
  }

  pub fn info(message: impl Into<String>) -> Self {
    Self {
      level: NoticeLevel::Info,
      message: message.into(),
    }
  }
}

/// 一次用户交互
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
  /// 仅展示表单
  Idle(HouseFeatures),
  /// 点击了预测按钮
  Submit(HouseFeatures),
  /// 提交的内容无法解析
  Rejected(String),
}

/// 一次提交的结果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
  Predicted(f64),
  Failed(String),
  Unavailable,
}

/// 进程内只构造一次的会话，之后只读
pub struct Session<M> {
  model: Option<M>,
  background: BackgroundStyle,
  uploaded: usize,
  notices: Vec<Notice>,
}

impl<M> Session<M>
where
  M: Model<Input = HouseFeatures, Output = f64>,
  M::Error: Display,
{
  pub fn new(outcome: LoadOutcome<M>, uploads: UploadBatch, background: BackgroundStyle) -> Self {
    let mut notices = Vec::new();
    if let Some(message) = outcome.error_message() {
      notices.push(Notice::error(message));
    }
    notices.extend(uploads.notices);
    if !background.is_animated() {
      notices.push(Notice::warning(
        "No images uploaded. Using static dark background image.",
      ));
    }

    Self {
      model: outcome.into_model(),
      background,
      uploaded: uploads.uploaded,
      notices,
    }
  }

  pub fn model_loaded(&self) -> bool {
    self.model.is_some()
  }

  pub fn notices(&self) -> &[Notice] {
    &self.notices
  }

  /// 对一行特征做预测，失败不影响后续提交
  pub fn submit(&self, features: &HouseFeatures) -> SubmitOutcome {
    let Some(model) = &self.model else {
      warn!("模型未加载，预测不可用");
      return SubmitOutcome::Unavailable;
    };

    match model.infer(features) {
      Ok(price) => {
        info!("预测完成: {:.2}", price);
        SubmitOutcome::Predicted(price)
      }
      Err(e) => {
        error!("预测失败: {}", e);
        SubmitOutcome::Failed(e.to_string())
      }
    }
  }

  /// 对一次交互求值，得到要渲染的页面
  pub fn evaluate(&self, interaction: &Interaction) -> Page<'_> {
    let mut page = Page {
      background: &self.background,
      startup_notices: &self.notices,
      notices: Vec::new(),
      uploaded: self.uploaded,
      processed: self.background.image_count(),
      model_loaded: self.model_loaded(),
      form: HouseFeatures::default(),
      outcome: None,
    };

    match interaction {
      Interaction::Idle(features) => page.form = *features,
      Interaction::Submit(features) => {
        page.form = *features;
        match self.submit(features) {
          SubmitOutcome::Failed(reason) => {
            page
              .notices
              .push(Notice::error(format!("Prediction failed: {}", reason)));
            page.outcome = Some(SubmitOutcome::Failed(reason));
          }
          outcome => page.outcome = Some(outcome),
        }
      }
      Interaction::Rejected(reason) => {
        page
          .notices
          .push(Notice::error(format!("Invalid submission: {}", reason)));
      }
    }

    page
  }
}
