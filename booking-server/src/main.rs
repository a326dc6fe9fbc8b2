use std::sync::Arc;

use anyhow::Context;
use booking_server::core::TaskKind;
use booking_server::message::EventType;
use booking_server::seed::SeedData;
use booking_server::{
    BackgroundTasks, BusNotifier, Config, MemoryDirectory, MemoryStore, MessageBus,
    ReservationMonitor, ReservationsManager, SystemClock, init_logger_with_file, print_banner,
};
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境与配置
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. 日志
    init_logger_with_file(&config.log_level, config.log_dir.as_deref());
    print_banner();
    tracing::info!(
        environment = %config.environment,
        timezone = %config.timezone,
        "Booking server starting..."
    );

    // 3. 存储与种子数据
    let store = Arc::new(MemoryStore::new());
    let directory = Arc::new(MemoryDirectory::new());
    if let Some(path) = &config.seed_file {
        SeedData::load(path)
            .and_then(|seed| seed.apply(store.as_ref(), directory.as_ref()))
            .with_context(|| format!("Failed to import seed file {}", path))?;
    }

    // 4. 消息总线
    let bus = MessageBus::with_capacity(config.bus_channel_capacity);
    let notifier = Arc::new(BusNotifier::new(bus.clone()));

    // 5. 预订引擎
    let manager = Arc::new(ReservationsManager::new(
        store,
        directory,
        notifier,
        Arc::new(SystemClock),
        config.booking_rules(),
    ));

    // 6. 后台任务
    let mut tasks = BackgroundTasks::new();
    let monitor = Arc::new(ReservationMonitor::new(manager, config.monitor_interval()));
    monitor.register(&mut tasks);

    let mut rx = bus.subscribe();
    let token = tasks.shutdown_token();
    tasks.spawn("bus_logger", TaskKind::Listener, async move {
        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Ok(msg) => {
                        let body = String::from_utf8_lossy(&msg.payload);
                        match msg.event_type {
                            EventType::Notification => {
                                tracing::info!(target: "bus", to = ?msg.target, %body, "Notification")
                            }
                            EventType::Sync => {
                                tracing::debug!(target: "bus", to = ?msg.target, %body, "Sync")
                            }
                        }
                    }
                    Err(RecvError::Lagged(n)) => tracing::warn!(skipped = n, "Bus logger lagged"),
                    Err(RecvError::Closed) => break,
                },
                _ = token.cancelled() => break,
            }
        }
    });
    tasks.log_summary();
    tracing::debug!(subscribers = bus.subscriber_count(), "Message bus ready");

    // 7. 等待退出信号
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("Shutdown signal received");

    tasks.shutdown(config.shutdown_timeout()).await;
    Ok(())
}
