// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/output/html.rs - 页面 HTML 生成
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

use crate::{
  features::{FEATURE_NAMES, FIELD_SPECS, FieldKind, FieldSpec},
  output::Page,
  session::{Notice, NoticeLevel, SubmitOutcome},
  utils::escape_html,
};

const PAGE_TITLE: &str = "LUXURY HOUSE PRICE PREDICTION";
const PAGE_SUBTITLE: &str =
  "Predict housing prices based on key architectural and locational features.";
const UNAVAILABLE_WARNING: &str = "Prediction feature unavailable due to model loading error.";

/// 静态展示的模型指标：(名称, 数值, 说明)
const MODEL_METRICS: [(&str, &str, &str); 3] = [
  ("R²", "0.7736", "Good Fit"),
  ("RMSE", "0.2540", "Scaled"),
  ("MSE", "0.0645", "Scaled"),
];

const BASE_CSS: &str = r#"* { color: white; font-family: 'Inter', sans-serif; box-sizing: border-box; }
body { margin: 0; }
.app { min-height: 100vh; display: flex; gap: 24px; padding: 24px; position: relative; }
.app > * { position: relative; z-index: 10; }
.sidebar { width: 300px; flex-shrink: 0; }
main { flex: 1; }
.title { text-align: center; color: #FFD700 !important; text-shadow: 2px 2px 6px #000000; }
.subtitle { text-align: center; font-size: 18px; color: #F0F0F0; }
.notice { padding: 12px 16px; border-radius: 8px; margin: 8px 0; }
.notice-error { background: rgba(200, 40, 40, 0.6); }
.notice-warning { background: rgba(200, 160, 20, 0.6); }
.notice-info { background: rgba(40, 100, 200, 0.6); }
.tabs > input[type="radio"] { display: none; }
.tabs > label { display: inline-block; padding: 8px 16px; cursor: pointer; border-bottom: 2px solid transparent; }
.tabs > input[type="radio"]:checked + label { border-bottom-color: #FFD700; }
.tab-panel { display: none; }
#tab-predict:checked ~ #panel-predict, #tab-info:checked ~ #panel-info { display: block; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
.field { display: flex; flex-direction: column; margin-bottom: 12px; }
.field input, .field select { color: black; padding: 6px; }
.field select option { color: black; }
.predict-button { width: 100%; padding: 12px; font-size: 18px; background: #ff4b4b; border: none; border-radius: 8px; cursor: pointer; }
.prediction-box { background-color: rgba(34, 139, 34, 0.9); padding: 20px; border-radius: 15px; text-align: center; margin-top: 20px; color: white !important; }
.prediction-box h1 { color: #FFD700 !important; }
.metrics { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; }
.metric-value { font-size: 28px; }
.metric-delta { color: #7CFC00 !important; }
"#;

/// 格式化为美元金额，千位分隔并保留两位小数
pub fn format_currency(value: f64) -> String {
  let cents = (value.abs() * 100.0).round() as u128;
  let (whole, frac) = (cents / 100, cents % 100);

  let digits = whole.to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }

  let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
  format!("{}${}.{:02}", sign, grouped, frac)
}

fn field_value(spec: &FieldSpec, value: f64) -> String {
  if spec.step.fract() == 0.0 {
    format!("{:.0}", value)
  } else {
    format!("{:.2}", value)
  }
}

fn write_notice(html: &mut String, notice: &Notice) {
  let class = match notice.level {
    NoticeLevel::Error => "notice-error",
    NoticeLevel::Warning => "notice-warning",
    NoticeLevel::Info => "notice-info",
  };
  let _ = writeln!(
    html,
    "<div class=\"notice {}\">{}</div>",
    class,
    escape_html(&notice.message)
  );
}

fn write_field(html: &mut String, spec: &FieldSpec, value: f64) {
  let _ = writeln!(
    html,
    "<div class=\"field\"><label for=\"{name}\">{label}</label>",
    name = spec.name,
    label = escape_html(spec.label)
  );
  match spec.kind {
    FieldKind::Choice(choices) => {
      let _ = writeln!(html, "<select id=\"{0}\" name=\"{0}\">", spec.name);
      for choice in choices {
        let selected = if (choice - value).abs() < f64::EPSILON {
          " selected"
        } else {
          ""
        };
        let _ = writeln!(
          html,
          "<option value=\"{}\"{}>{}</option>",
          choice,
          selected,
          spec.choice_label(*choice)
        );
      }
      html.push_str("</select>\n");
    }
    kind => {
      let input_type = if kind == FieldKind::Slider {
        "range"
      } else {
        "number"
      };
      let _ = writeln!(
        html,
        "<input type=\"{}\" id=\"{name}\" name=\"{name}\" min=\"{}\" max=\"{}\" step=\"{}\" value=\"{}\">",
        input_type,
        spec.min,
        spec.max,
        spec.step,
        field_value(spec, value),
        name = spec.name,
      );
    }
  }
  html.push_str("</div>\n");
}

fn write_sidebar(html: &mut String, page: &Page<'_>) {
  html.push_str("<aside class=\"sidebar\">\n<h2>ℹ️ App Configuration</h2>\n");
  html.push_str("<h3>🖼️ Background Images</h3>\n");
  if page.uploaded == 0 {
    html.push_str("<p>No images uploaded. The slideshow starts once images are uploaded.</p>\n");
  } else {
    let _ = writeln!(
      html,
      "<p>{} image(s) uploaded, {} shown in the slideshow.</p>",
      page.uploaded, page.processed
    );
  }
  html.push_str("<hr>\n<h3>Model Info</h3>\n");
  write_notice(
    html,
    &Notice::info("This app predicts house prices using a trained Linear Regression Model."),
  );
  html.push_str("</aside>\n");
}

fn write_prediction_tab(html: &mut String, page: &Page<'_>) {
  html.push_str("<section class=\"tab-panel\" id=\"panel-predict\">\n<h2>Enter Property Features</h2>\n");

  if !page.model_loaded {
    write_notice(html, &Notice::warning(UNAVAILABLE_WARNING));
    html.push_str("</section>\n");
    return;
  }

  html.push_str("<form method=\"get\">\n<div class=\"columns\">\n<div>\n");
  for (i, (spec, value)) in FIELD_SPECS.iter().zip(page.form.to_row()).enumerate() {
    if i == 4 {
      html.push_str("</div>\n<div>\n");
    }
    write_field(html, spec, value);
  }
  html.push_str("</div>\n</div>\n");
  html.push_str(
    "<button class=\"predict-button\" type=\"submit\" name=\"submit\" value=\"1\">💰 Predict Price</button>\n</form>\n",
  );

  if let Some(SubmitOutcome::Predicted(price)) = page.outcome {
    let _ = writeln!(
      html,
      "<div class=\"prediction-box\">\n<h2>🏡 Estimated Price</h2>\n<h1>{}</h1>\n<p>Based on the details you provided.</p>\n</div>",
      format_currency(price)
    );
  }
  html.push_str("</section>\n");
}

fn write_model_info_tab(html: &mut String) {
  html.push_str("<section class=\"tab-panel\" id=\"panel-info\">\n<h2>Model Overview &amp; Performance</h2>\n");
  html.push_str("<h3>📌 Model Used</h3>\n");
  write_notice(
    html,
    &Notice::info("Linear Regression was used for this prediction task."),
  );
  html.push_str("<h3>🧰 Training Features</h3>\n<ul>\n<li>");
  let features: Vec<_> = FEATURE_NAMES
    .iter()
    .map(|name| format!("<code>{}</code>", name))
    .collect();
  html.push_str(&features.join(", "));
  html.push_str(
    "</li>\n<li>Additional features were used during training but are omitted here for simplicity.</li>\n</ul>\n",
  );
  html.push_str("<h3>📊 Performance Metrics</h3>\n<div class=\"metrics\">\n");
  for (name, value, delta) in MODEL_METRICS {
    let _ = writeln!(
      html,
      "<div class=\"metric\"><div>{}</div><div class=\"metric-value\">{}</div><div class=\"metric-delta\">{}</div></div>",
      name, value, delta
    );
  }
  html.push_str("</div>\n</section>\n");
}

impl Page<'_> {
  pub fn to_html(&self) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", PAGE_TITLE);
    html.push_str("<style>\n");
    html.push_str(&self.background.to_css());
    html.push_str(BASE_CSS);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"app\">\n");

    write_sidebar(&mut html, self);

    html.push_str("<main>\n");
    let _ = writeln!(html, "<h1 class=\"title\">🏠 {}</h1>", PAGE_TITLE);
    let _ = writeln!(html, "<p class=\"subtitle\">{}</p>", PAGE_SUBTITLE);
    for notice in self.startup_notices.iter().chain(&self.notices) {
      write_notice(&mut html, notice);
    }

    html.push_str("<div class=\"tabs\">\n");
    html.push_str("<input type=\"radio\" name=\"tab\" id=\"tab-predict\" checked><label for=\"tab-predict\">🔑 Prediction</label>\n");
    html.push_str("<input type=\"radio\" name=\"tab\" id=\"tab-info\"><label for=\"tab-info\">📈 Model Info</label>\n");
    write_prediction_tab(&mut html, self);
    write_model_info_tab(&mut html);
    html.push_str("</div>\n</main>\n</div>\n</body>\n</html>\n");
    html
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    features::HouseFeatures,
    slideshow::{BackgroundStyle, DEFAULT_INTERVAL},
  };

  fn page<'a>(background: &'a BackgroundStyle, notices: &'a [Notice]) -> Page<'a> {
    Page {
      background,
      startup_notices: notices,
      notices: Vec::new(),
      uploaded: 0,
      processed: 0,
      model_loaded: true,
      form: HouseFeatures::default(),
      outcome: None,
    }
  }

  #[test]
  fn currency_formatting() {
    assert_eq!(format_currency(500_000.0), "$500,000.00");
    assert_eq!(format_currency(0.0), "$0.00");
    assert_eq!(format_currency(999.999), "$1,000.00");
    assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
    assert_eq!(format_currency(-1234.5), "-$1,234.50");
    assert_eq!(format_currency(-0.001), "$0.00");
    assert_eq!(format_currency(123.4), "$123.40");
  }

  #[test]
  fn idle_page_shows_form_with_defaults() {
    let background = BackgroundStyle::generate(Vec::new(), DEFAULT_INTERVAL).unwrap();
    let html = page(&background, &[]).to_html();

    assert!(html.contains("name=\"sqft_living\" min=\"300\" max=\"15000\" step=\"10\" value=\"2000\""));
    assert!(html.contains("name=\"bathrooms\" min=\"0\" max=\"10\" step=\"0.25\" value=\"2.00\""));
    assert!(html.contains("type=\"range\" id=\"grade\""));
    assert!(html.contains("<option value=\"2\" selected>2.0</option>"));
    assert!(html.contains("<option value=\"0\" selected>No</option>"));
    assert!(html.contains("<option value=\"1\">Yes</option>"));
    assert!(!html.contains("prediction-box\">"));
    assert!(html.contains("0.7736"));
  }

  #[test]
  fn predicted_page_shows_price() {
    let background = BackgroundStyle::generate(Vec::new(), DEFAULT_INTERVAL).unwrap();
    let mut page = page(&background, &[]);
    page.outcome = Some(SubmitOutcome::Predicted(500_000.0));
    let html = page.to_html();
    assert!(html.contains("<h1>$500,000.00</h1>"));
  }

  #[test]
  fn unavailable_model_replaces_form() {
    let background = BackgroundStyle::generate(Vec::new(), DEFAULT_INTERVAL).unwrap();
    let notices = [Notice::error("Model file 'x' not found. <Please>")];
    let mut page = page(&background, &notices);
    page.model_loaded = false;
    let html = page.to_html();

    assert!(!html.contains("<form"));
    assert!(html.contains(UNAVAILABLE_WARNING));
    assert!(html.contains("&lt;Please&gt;"));
  }
}
