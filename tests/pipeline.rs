// 该文件是 Fangjia （房价估算） 项目的一部分。
// tests/pipeline.rs - 端到端流程测试
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

use std::path::Path;

use clap::Parser;
use fangjia::{
  FromUrl,
  args::{AppArgs, FormArgs},
  features::FEATURE_COUNT,
  input::SubmissionReader,
  model::LinearRegressionFile,
  output::OutputWrapper,
  session::Interaction,
  task::{ContinuousTask, OneShotTask, Task},
};
use url::Url;

#[derive(Parser, Debug)]
struct Cli {
  #[command(flatten)]
  app: AppArgs,
  #[command(flatten)]
  form: FormArgs,
}

fn url(scheme: &str, path: &Path) -> String {
  Url::from_file_path(path)
    .unwrap()
    .as_str()
    .replacen("file:", &format!("{}:", scheme), 1)
}

fn write_constant_model(dir: &Path, price: f64) -> String {
  let path = dir.join("lr_model.json");
  let model = LinearRegressionFile::plain([0.0; FEATURE_COUNT], price);
  std::fs::write(&path, serde_json::to_string(&model).unwrap()).unwrap();
  url("linear", &path)
}

fn write_png(dir: &Path, name: &str) -> String {
  let path = dir.join(name);
  image::RgbImage::new(2, 2).save(&path).unwrap();
  url("image", &path)
}

fn run_once(args: &[&str]) -> String {
  let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
  let session = cli.app.open_session().unwrap();
  let output = OutputWrapper::from_url(&cli.app.output).unwrap();
  OneShotTask
    .run_task(std::iter::once(cli.form.interaction()), &session, output)
    .unwrap();
  let page = fangjia::utils::url_to_path(&cli.app.output);
  std::fs::read_to_string(page).unwrap()
}

#[test]
fn submitted_defaults_render_exact_price() {
  let dir = tempfile::tempdir().unwrap();
  let model = write_constant_model(dir.path(), 500_000.0);
  let output = url("html", &dir.path().join("out").join("page.html"));

  let html = run_once(&["fangjia", "--model", &model, "--output", &output, "--submit"]);

  assert!(html.contains("<h1>$500,000.00</h1>"));
  assert!(html.contains("animation: none !important;"));
  assert!(html.contains("No images uploaded. Using static dark background image."));
}

#[test]
fn idle_form_does_not_predict() {
  let dir = tempfile::tempdir().unwrap();
  let model = write_constant_model(dir.path(), 500_000.0);
  let output = url("html", &dir.path().join("page.html"));

  let html = run_once(&["fangjia", "--model", &model, "--output", &output]);

  assert!(html.contains("<form"));
  assert!(!html.contains("$500,000.00"));
}

#[test]
fn missing_model_shows_warning_instead_of_form() {
  let dir = tempfile::tempdir().unwrap();
  let model = url("linear", &dir.path().join("absent.json"));
  let output = url("html", &dir.path().join("page.html"));

  let html = run_once(&["fangjia", "--model", &model, "--output", &output, "--submit"]);

  assert!(html.contains("absent.json&#39; not found"));
  assert!(html.contains("Prediction feature unavailable due to model loading error."));
  assert!(!html.contains("<form"));
}

#[test]
fn uploaded_images_drive_slideshow() {
  let dir = tempfile::tempdir().unwrap();
  let model = write_constant_model(dir.path(), 1.0);
  let output = url("html", &dir.path().join("page.html"));
  let a = write_png(dir.path(), "a.png");
  let b = write_png(dir.path(), "b.png");
  let c = write_png(dir.path(), "c.png");
  let broken = url("image", &dir.path().join("missing.png"));

  let html = run_once(&[
    "fangjia",
    "--model",
    &model,
    "--output",
    &output,
    "--background",
    &a,
    "--background",
    &broken,
    "--background",
    &b,
    "--background",
    &c,
  ]);

  assert!(html.contains("animation: cinematicBg 18s infinite;"));
  assert!(html.contains("@keyframes cinematicBg"));
  assert_eq!(html.matches("data:image/png;base64,").count(), 1 + 3 * 2 + 1);
  assert!(html.contains("Error processing image missing.png"));
  assert!(html.contains("4 image(s) uploaded, 3 shown in the slideshow."));
}

#[test]
fn continuous_session_survives_bad_lines() {
  let dir = tempfile::tempdir().unwrap();
  let model = write_constant_model(dir.path(), 250_000.0);
  let record = dir.path().join("pages");
  let output = url("folder", &record);

  let cli = Cli::try_parse_from(["fangjia", "--model", &model, "--output", &output]).unwrap();
  let session = cli.app.open_session().unwrap();
  let output = OutputWrapper::from_url(&cli.app.output).unwrap();

  let lines = "{\"bedrooms\": 4}\n{\"floors\": 9}\n{}\n";
  let interactions = SubmissionReader::new(lines.as_bytes()).map(|s| match s {
    Ok(features) => Interaction::Submit(features),
    Err(e) => Interaction::Rejected(e.to_string()),
  });
  ContinuousTask::default()
    .run_task(interactions, &session, output)
    .unwrap();

  let mut pages = Vec::new();
  let mut stack = vec![record];
  while let Some(dir) = stack.pop() {
    for entry in std::fs::read_dir(dir).unwrap() {
      let path = entry.unwrap().path();
      if path.is_dir() {
        stack.push(path);
      } else {
        pages.push(std::fs::read_to_string(path).unwrap());
      }
    }
  }

  assert_eq!(pages.len(), 3);
  assert_eq!(
    pages.iter().filter(|p| p.contains("$250,000.00")).count(),
    2
  );
  assert_eq!(
    pages
      .iter()
      .filter(|p| p.contains("Invalid submission"))
      .count(),
    1
  );
}
