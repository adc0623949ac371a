// 该文件是 Fangjia （房价估算） 项目的一部分。
// src/task.rs - 交互任务
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

use std::{fmt::Display, sync::mpsc::Receiver, thread, time::Duration};

use tracing::{info, warn};

use crate::{
  features::HouseFeatures,
  model::Model,
  output::Render,
  session::{Interaction, Session},
};

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(self, input: I, session: &Session<M>, output: O) -> Result<(), Self::Error>;
}

/// 单次交互：取第一个输入，求值并渲染一次
pub struct OneShotTask;

impl<
  ME: Display,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = Interaction>,
  M: Model<Input = HouseFeatures, Output = f64, Error = ME>,
  O: Render<Error = RE>,
> Task<I, M, O> for OneShotTask
{
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, session: &Session<M>, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let interaction = input.next().ok_or_else(|| anyhow::anyhow!("没有输入"))?;
    let now = std::time::Instant::now();
    let page = session.evaluate(&interaction);
    let elapsed = now.elapsed();
    info!("求值完成，耗时: {:.2?}", elapsed);
    output.render_page(&page)?;
    info!("渲染完成，耗时: {:.2?}", now.elapsed());

    Ok(())
  }
}

/// 连续交互：每个输入渲染一页，直到输入结束、达到数量上限或收到中断
#[derive(Default, Debug)]
pub struct ContinuousTask {
  max_interactions: Option<usize>,
  interrupt: Option<Receiver<()>>,
}

impl ContinuousTask {
  pub fn with_max_interactions(mut self, max_interactions: Option<usize>) -> Self {
    self.max_interactions = max_interactions;
    self
  }

  pub fn with_interrupt(mut self, interrupt: Receiver<()>) -> Self {
    self.interrupt = Some(interrupt);
    self
  }

  /// 安装 Ctrl-C 处理，收到信号后在当前交互结束时退出
  ///
  /// 中断标志只在每次交互渲染之后检查。输入阻塞时（例如标准输入没有新行）
  /// 循环不会醒来，30 秒后由强制退出结束进程。
  pub fn with_ctrlc(self) -> anyhow::Result<Self> {
    let (tx, rx) = std::sync::mpsc::channel();

    ctrlc::set_handler(move || {
      info!("收到中断信号，准备退出...");
      let _ = tx.send(());
      thread::spawn(|| {
        thread::sleep(Duration::from_secs(30));
        warn!("强制退出程序");
        std::process::exit(1);
      });
    })?;

    Ok(self.with_interrupt(rx))
  }

  fn interrupted(&self) -> bool {
    self
      .interrupt
      .as_ref()
      .map(|rx| rx.try_recv().is_ok())
      .unwrap_or(false)
  }
}

impl<
  ME: Display,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = Interaction>,
  M: Model<Input = HouseFeatures, Output = f64, Error = ME>,
  O: Render<Error = RE>,
> Task<I, M, O> for ContinuousTask
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, session: &Session<M>, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");

    let mut count = 0usize;
    for interaction in input {
      count += 1;
      info!("处理第 {} 次交互", count);
      let now = std::time::Instant::now();
      let page = session.evaluate(&interaction);
      output.render_page(&page)?;
      info!("交互处理完成，耗时: {:.2?}", now.elapsed());

      if self.max_interactions.map(|n| count >= n).unwrap_or(false) {
        info!("达到指定交互次数 {}, 退出任务循环", count);
        break;
      }
      if self.interrupted() {
        warn!("中断信号接收，退出任务循环");
        break;
      }
    }

    info!("任务完成，共处理 {} 次交互", count);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;
  use crate::{
    input::UploadBatch,
    model::LoadOutcome,
    output::Page,
    session::SubmitOutcome,
    slideshow::{BackgroundStyle, DEFAULT_INTERVAL},
  };

  struct Doubling;

  impl Model for Doubling {
    type Input = HouseFeatures;
    type Output = f64;
    type Error = String;

    fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
      Ok(input.sqft_living as f64 * 2.0)
    }
  }

  #[derive(Default)]
  struct Collect {
    outcomes: RefCell<Vec<Option<SubmitOutcome>>>,
  }

  impl Render for &Collect {
    type Error = std::io::Error;

    fn render_page(&self, page: &Page<'_>) -> Result<(), Self::Error> {
      self.outcomes.borrow_mut().push(page.outcome.clone());
      Ok(())
    }
  }

  fn session() -> Session<Doubling> {
    Session::new(
      LoadOutcome::Loaded(Doubling),
      UploadBatch::default(),
      BackgroundStyle::generate(Vec::new(), DEFAULT_INTERVAL).unwrap(),
    )
  }

  fn submit(sqft_living: u32) -> Interaction {
    Interaction::Submit(HouseFeatures {
      sqft_living,
      ..Default::default()
    })
  }

  #[test]
  fn one_shot_renders_first_interaction_only() {
    let collect = Collect::default();
    OneShotTask
      .run_task(vec![submit(1000), submit(2000)].into_iter(), &session(), &collect)
      .unwrap();
    assert_eq!(
      *collect.outcomes.borrow(),
      vec![Some(SubmitOutcome::Predicted(2000.0))]
    );
  }

  #[test]
  fn one_shot_without_input_fails() {
    let collect = Collect::default();
    let result = OneShotTask.run_task(std::iter::empty::<Interaction>(), &session(), &collect);
    assert!(result.is_err());
  }

  #[test]
  fn continuous_stops_at_limit() {
    let collect = Collect::default();
    let input = vec![
      submit(1000),
      Interaction::Rejected("oops".to_string()),
      submit(3000),
      submit(4000),
    ];
    ContinuousTask::default()
      .with_max_interactions(Some(3))
      .run_task(input.into_iter(), &session(), &collect)
      .unwrap();
    assert_eq!(
      *collect.outcomes.borrow(),
      vec![
        Some(SubmitOutcome::Predicted(2000.0)),
        None,
        Some(SubmitOutcome::Predicted(6000.0)),
      ]
    );
  }

  #[test]
  fn continuous_stops_on_interrupt() {
    let collect = Collect::default();
    let (tx, rx) = std::sync::mpsc::channel();
    tx.send(()).unwrap();
    ContinuousTask::default()
      .with_interrupt(rx)
      .run_task(vec![submit(1000), submit(2000)].into_iter(), &session(), &collect)
      .unwrap();
    assert_eq!(collect.outcomes.borrow().len(), 1);
  }
}
