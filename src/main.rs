// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/main.rs - 单次渲染主程序
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

use anyhow::Result;
use clap::Parser;
use tracing::info;

use fangjia::{
  FromUrl,
  args::{AppArgs, FormArgs},
  output::OutputWrapper,
  task::{OneShotTask, Task},
};

/// 房价估算页面，渲染一次
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  #[command(flatten)]
  pub app: AppArgs,
  #[command(flatten)]
  pub form: FormArgs,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("输出路径: {}", args.app.output);
  info!("背景图片来源: {} 个", args.app.backgrounds.len());

  let session = args.app.open_session()?;
  let output = OutputWrapper::from_url(&args.app.output)?;

  OneShotTask.run_task(std::iter::once(args.form.interaction()), &session, output)?;

  Ok(())
}
