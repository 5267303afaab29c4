use crate::application::services::PendingChangeModel;
use crate::common::result::TfvcResult;
use crate::infrastructure::filesystem::WorkspaceWatcher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

/// 監視の設定
#[derive(Debug, Clone, Default)]
pub struct WatchConfig {
    /// ポーリング間隔（Noneならファイルイベントのみ）
    pub poll_interval: Option<Duration>,

    /// 開始時に一度更新するか
    pub initial_refresh: bool,
}

impl WatchConfig {
    pub fn new() -> Self {
        Self {
            poll_interval: None,
            initial_refresh: true,
        }
    }

    pub fn with_poll_interval_secs(mut self, secs: Option<u64>) -> Self {
        self.poll_interval = secs.filter(|s| *s > 0).map(Duration::from_secs);
        self
    }
}

/// 監視の停止ハンドル
#[derive(Debug, Clone)]
pub struct WatchHandle {
    stop: Arc<watch::Sender<bool>>,
}

impl WatchHandle {
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }
}

/// ファイル変更とポーリングでモデルを更新し続けるユースケース
///
/// 更新はすべて `status()` を通るため、重複した要求はモデル側でまとめられる。
/// バックグラウンドの失敗はログに出すだけで監視は続く。
pub struct WatchWorkspaceUseCase {
    model: Arc<PendingChangeModel>,
    config: WatchConfig,
    stop: Arc<watch::Sender<bool>>,
}

impl WatchWorkspaceUseCase {
    pub fn new(model: Arc<PendingChangeModel>, config: WatchConfig) -> Self {
        let (stop, _) = watch::channel(false);
        Self {
            model,
            config,
            stop: Arc::new(stop),
        }
    }

    /// 別タスクから監視を止めるためのハンドル
    pub fn handle(&self) -> WatchHandle {
        WatchHandle {
            stop: self.stop.clone(),
        }
    }

    /// `root` を監視し、停止されるまで戻らない
    pub async fn execute(&self, root: &Path) -> TfvcResult<()> {
        let (_watcher, events) = WorkspaceWatcher::start(root)?;
        self.run(events).await;
        Ok(())
    }

    /// イベント受信ループ。チャネルが閉じるか停止されると終わる
    pub async fn run(&self, mut events: mpsc::Receiver<Vec<PathBuf>>) {
        let mut stopped = self.stop.subscribe();
        if *stopped.borrow() {
            return;
        }

        if self.config.initial_refresh {
            self.trigger(None).await;
        }

        let mut ticker = self.config.poll_interval.map(|period| {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            interval
        });

        loop {
            tokio::select! {
                _ = stopped.changed() => {
                    info!("Stopping workspace watch");
                    break;
                }
                received = events.recv() => match received {
                    Some(paths) => self.trigger(Some(&paths)).await,
                    None => {
                        debug!("File event channel closed");
                        break;
                    }
                },
                _ = tick(&mut ticker) => self.trigger(None).await,
            }
        }
    }

    async fn trigger(&self, paths: Option<&[PathBuf]>) {
        let result = match paths {
            Some(paths) => {
                debug!(count = paths.len(), "File change");
                self.model.on_file_change(paths).await
            }
            None => self.model.status().await,
        };
        if let Err(e) = result {
            error!("Background refresh failed: {}", e);
        }
    }
}

/// ポーリングが無効なら永遠に待つ
async fn tick(ticker: &mut Option<tokio::time::Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::{TfvcError, TfvcErrorCode};
    use crate::domain::entities::pending_change::PendingChange;
    use crate::domain::entities::settings::RefreshPolicy;
    use crate::infrastructure::tfvc::PendingChangeSource;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl PendingChangeSource for CountingSource {
        async fn get_status(&self) -> TfvcResult<Vec<PendingChange>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TfvcError::command_error(
                    "boom",
                    TfvcErrorCode::ExecutionFailed,
                    "status",
                ));
            }
            Ok(vec![PendingChange::new("edit", "/ws/a.txt")])
        }

        async fn get_file_content(&self, _: &str, _: Option<&str>) -> TfvcResult<String> {
            Ok(String::new())
        }
    }

    fn use_case(source: Arc<CountingSource>, config: WatchConfig) -> WatchWorkspaceUseCase {
        let model = Arc::new(PendingChangeModel::new(source, RefreshPolicy::Coalesce));
        WatchWorkspaceUseCase::new(model, config)
    }

    #[test]
    fn test_zero_interval_disables_polling() {
        let config = WatchConfig::new().with_poll_interval_secs(Some(0));
        assert!(config.poll_interval.is_none());
        let config = WatchConfig::new().with_poll_interval_secs(Some(5));
        assert_eq!(config.poll_interval, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_file_events_trigger_refresh() {
        let source = Arc::new(CountingSource::default());
        let watch = use_case(source.clone(), WatchConfig::new());
        let (tx, rx) = mpsc::channel(8);

        tx.send(vec![PathBuf::from("/ws/a.txt")]).await.unwrap();
        tx.send(vec![PathBuf::from("/ws/$tf/1/2.gz")]).await.unwrap();
        drop(tx);
        watch.run(rx).await;

        // initial refresh + one non-metadata event
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(watch.model.included_group().len(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_logged_and_watch_continues() {
        let source = Arc::new(CountingSource {
            fail: true,
            ..CountingSource::default()
        });
        let watch = use_case(source.clone(), WatchConfig::new());
        let (tx, rx) = mpsc::channel(8);

        tx.send(vec![PathBuf::from("/ws/a.txt")]).await.unwrap();
        tx.send(vec![PathBuf::from("/ws/b.txt")]).await.unwrap();
        drop(tx);
        watch.run(rx).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_and_stop() {
        let source = Arc::new(CountingSource::default());
        let mut config = WatchConfig::new().with_poll_interval_secs(Some(10));
        config.initial_refresh = false;
        let watch = Arc::new(use_case(source.clone(), config));
        let handle = watch.handle();
        let (_tx, rx) = mpsc::channel(8);

        let task = {
            let watch = watch.clone();
            tokio::spawn(async move { watch.run(rx).await })
        };

        tokio::time::sleep(Duration::from_secs(25)).await;
        handle.stop();
        task.await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stopped_before_start_returns_immediately() {
        let source = Arc::new(CountingSource::default());
        let watch = use_case(source.clone(), WatchConfig::new());
        watch.handle().stop();
        let (_tx, rx) = mpsc::channel(8);
        watch.run(rx).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
