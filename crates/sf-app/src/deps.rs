//! # Preview Dependencies / 预览依赖
//!
//! Dependency grouping for one browsing context's preview session.
//! 一个浏览上下文的预览会话依赖分组。
//!
//! Just parameter grouping: no build steps, no defaults.

use std::sync::Arc;

use sf_core::ports::*;

/// Ports of one browsing context.
#[derive(Clone)]
pub struct PreviewDeps {
    /// Id of the context these ports belong to; tags outbound broadcasts.
    pub context_id: String,

    // Browser-profile storage / 存储
    pub local_storage: Arc<dyn KeyValueStoragePort>,
    pub session_storage: Arc<dyn KeyValueStoragePort>,

    // Cross-context notification / 跨上下文通知
    pub storage_events: Arc<dyn StorageEventsPort>,
    pub broadcast: Arc<dyn BroadcastChannelPort>,
    pub visibility: Arc<dyn VisibilityPort>,

    // Content API / 内容接口
    pub entity_read: Arc<dyn EntityReadPort>,
    pub entity_write: Arc<dyn EntityWritePort>,
    pub photos: Arc<dyn PhotoLookupPort>,

    // System / 系统
    pub clock: Arc<dyn ClockPort>,
}
