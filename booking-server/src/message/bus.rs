use dashmap::DashMap;
use shared::error::AppError;
use shared::message::BusMessage;
use tokio::sync::broadcast;

/// 资源版本管理器
///
/// 每种资源类型维护独立的版本号，支持原子递增。
/// 客户端通过 SyncPayload 里的版本号判断数据新旧。
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 递增指定资源的版本号并返回新值（首次返回 1）
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 当前版本号，不存在时为 0
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

/// 进程内消息总线 (服务端 -> 订阅者)
#[derive(Debug, Clone)]
pub struct MessageBus {
    tx: broadcast::Sender<BusMessage>,
}

impl MessageBus {
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// 发布消息，返回收到消息的订阅者数量
    ///
    /// 没有订阅者时返回错误，调用方通常只记 debug 日志。
    pub fn publish(&self, msg: BusMessage) -> Result<usize, AppError> {
        self.tx
            .send(msg)
            .map_err(|_| AppError::internal("No active bus subscribers"))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::with_capacity(1024)
    }
}
