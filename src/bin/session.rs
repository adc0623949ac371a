// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/bin/session.rs - 连续交互会话
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
use tracing::{info, warn};

use fangjia::{
  FromUrl,
  args::AppArgs,
  input::SubmissionReader,
  output::OutputWrapper,
  session::Interaction,
  task::{ContinuousTask, Task},
};

/// 从标准输入逐行读取 JSON 提交，每行渲染一页
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  #[command(flatten)]
  pub app: AppArgs,

  /// 最多处理的提交数（不指定表示直到输入结束）
  #[arg(long, value_name = "COUNT")]
  pub max_submissions: Option<usize>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("输出路径: {}", args.app.output);

  let session = args.app.open_session()?;
  if !session.model_loaded() {
    warn!("模型未加载，所有提交都将显示预测不可用");
  }
  let output = OutputWrapper::from_url(&args.app.output)?;

  let stdin = std::io::stdin().lock();
  let interactions = SubmissionReader::new(stdin).map(|submission| match submission {
    Ok(features) => Interaction::Submit(features),
    Err(e) => {
      warn!("{}", e);
      Interaction::Rejected(e.to_string())
    }
  });

  ContinuousTask::default()
    .with_max_interactions(args.max_submissions)
    .with_ctrlc()?
    .run_task(interactions, &session, output)?;

  Ok(())
}
