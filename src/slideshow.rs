// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/slideshow.rs - 背景轮播样式生成
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

use std::fmt::Write;
use std::time::Duration;

use base64::Engine;
use thiserror::Error;
use tracing::{debug, warn};

/// 每张图片默认展示时长
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(6);
/// 交叉淡入淡出的最长时长（秒）
const MAX_FADE_SECS: f64 = 1.0;
/// 背景遮罩颜色
const OVERLAY_COLOR: &str = "rgba(0,0,0,0.55)";
/// 动画名称
const ANIMATION_NAME: &str = "cinematicBg";

const FALLBACK_SVG: &str = r##"<svg width="1200" height="800" xmlns="http://www.w3.org/2000/svg"><rect width="1200" height="800" fill="#1b1c19"/><rect x="50" y="50" width="1100" height="700" stroke="#227c45" stroke-width="5" fill="none" stroke-opacity="0.3"/><rect x="100" y="100" width="500" height="200" fill="rgba(255, 255, 255, 0.05)" rx="10" ry="10"/><rect x="600" y="400" width="500" height="300" fill="rgba(255, 255, 255, 0.08)" rx="10" ry="10"/><line x1="50" y1="750" x2="1150" y2="50" stroke="#227c45" stroke-width="2" stroke-opacity="0.1"/><circle cx="600" cy="400" r="100" fill="rgba(255, 255, 255, 0.05)"/></svg>"##;

#[derive(Error, Debug, PartialEq)]
pub enum SlideshowError {
  #[error("每张图片的展示时长必须大于 0")]
  ZeroInterval,
  #[error("轮播周期过长: {count} 张图片, 每张 {interval:?}")]
  CycleTooLong { count: usize, interval: Duration },
}

/// 内置的静态背景图
pub fn fallback_image_url() -> String {
  format!(
    "data:image/svg+xml;base64,{}",
    base64::engine::general_purpose::STANDARD.encode(FALLBACK_SVG)
  )
}

/// 一张图片在周期中的关键帧
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeGroup {
  pub image: usize,
  /// 开始显示的位置（周期百分比）
  pub start: f64,
  /// 保持到的位置，其后开始淡出到下一张
  pub hold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundStyle {
  Static {
    image_url: String,
  },
  Animated {
    images: Vec<String>,
    total_duration: Duration,
    groups: Vec<KeyframeGroup>,
  },
}

/// 一段展示时长中保持不变的比例
///
/// 淡出占每段的最后 `min(1s, interval / 2)`。
pub fn hold_fraction(interval: Duration) -> f64 {
  let secs = interval.as_secs_f64();
  let fade = MAX_FADE_SECS.min(secs / 2.0);
  1.0 - fade / secs
}

impl BackgroundStyle {
  pub fn generate(images: Vec<String>, interval: Duration) -> Result<Self, SlideshowError> {
    if interval.is_zero() {
      return Err(SlideshowError::ZeroInterval);
    }

    if images.is_empty() {
      warn!("没有上传图片，使用静态背景");
      return Ok(BackgroundStyle::Static {
        image_url: fallback_image_url(),
      });
    }

    let count = images.len();
    let total_duration = u32::try_from(count)
      .ok()
      .and_then(|n| interval.checked_mul(n))
      .ok_or(SlideshowError::CycleTooLong { count, interval })?;

    let share = 100.0 / count as f64;
    let hold = share * hold_fraction(interval);
    let groups = (0..count)
      .map(|i| {
        let start = i as f64 * share;
        KeyframeGroup {
          image: i,
          start,
          hold: start + hold,
        }
      })
      .collect();
    debug!("背景轮播: {} 张图片, 周期 {:?}", count, total_duration);

    Ok(BackgroundStyle::Animated {
      images,
      total_duration,
      groups,
    })
  }

  pub fn is_animated(&self) -> bool {
    matches!(self, BackgroundStyle::Animated { .. })
  }

  pub fn image_count(&self) -> usize {
    match self {
      BackgroundStyle::Static { .. } => 0,
      BackgroundStyle::Animated { images, .. } => images.len(),
    }
  }

  /// `@keyframes` 块的内容，最后一帧在 100% 处回到第一张
  pub fn keyframes_css(&self) -> Option<String> {
    let BackgroundStyle::Animated { images, groups, .. } = self else {
      return None;
    };

    let mut css = String::new();
    for group in groups {
      let url = &images[group.image];
      let _ = writeln!(
        css,
        "  {:.2}% {{ background-image: url('{}'); }}",
        group.start, url
      );
      let _ = writeln!(
        css,
        "  {:.2}% {{ background-image: url('{}'); }}",
        group.hold, url
      );
    }
    let _ = writeln!(css, "  100% {{ background-image: url('{}'); }}", images[0]);
    Some(css)
  }

  /// 完整的背景样式表
  pub fn to_css(&self) -> String {
    let mut css = String::new();
    match self {
      BackgroundStyle::Static { image_url } => {
        let _ = writeln!(
          css,
          ".app {{\n  background-image: url('{}');\n  background-attachment: fixed;\n  background-size: cover;\n  background-position: center;\n  animation: none !important;\n}}",
          image_url
        );
      }
      BackgroundStyle::Animated {
        images,
        total_duration,
        ..
      } => {
        let _ = writeln!(
          css,
          ".app {{\n  background-size: cover;\n  background-attachment: fixed;\n  background-repeat: no-repeat;\n  background-image: url('{}');\n  animation: {} {}s infinite;\n}}",
          images[0],
          ANIMATION_NAME,
          total_duration.as_secs_f64()
        );
        let _ = writeln!(
          css,
          "@keyframes {} {{\n{}}}",
          ANIMATION_NAME,
          self.keyframes_css().unwrap_or_default()
        );
      }
    }

    let _ = writeln!(
      css,
      ".app::before {{\n  content: \"\";\n  position: fixed;\n  top: 0; left: 0;\n  width: 100%; height: 100%;\n  background: {};\n  z-index: 0;\n}}",
      OVERLAY_COLOR
    );
    css.push_str(
      ".sidebar, .tabs {\n  background: rgba(255, 255, 255, 0.15);\n  backdrop-filter: blur(8px);\n  border-radius: 16px;\n  padding: 20px;\n  z-index: 10;\n}\n",
    );
    css
  }
}
