use shared::order::OrderType;

/// 购物车引擎配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | CART_ORDER_TYPE | all | 订单类型过滤: dine_in / dine_out / all |
/// | CART_INTENT_QUEUE | 64 | 用户操作队列容量 |
/// | CART_OPTIMISTIC_SYNC | true | 本地修改后是否同步到订单服务 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志格式 |
/// | LOG_DIR | (unset) | 滚动日志目录 |
///
/// # 示例
///
/// ```ignore
/// CART_ORDER_TYPE=dine_out LOG_LEVEL=debug cargo test
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// None = all order types
    pub order_type: Option<OrderType>,
    /// Capacity of the worker's intent channel
    pub intent_queue: usize,
    /// Persist quantity/add-on changes through the order service
    pub optimistic_sync: bool,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl EngineConfig {
    /// 从环境变量加载配置 (.env 文件优先加载)
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            order_type: lookup("CART_ORDER_TYPE")
                .map(|v| parse_order_type(&v, defaults.order_type))
                .unwrap_or(defaults.order_type),
            intent_queue: lookup("CART_INTENT_QUEUE")
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.intent_queue),
            optimistic_sync: lookup("CART_OPTIMISTIC_SYNC")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.optimistic_sync),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: lookup("LOG_JSON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_json),
            log_dir: lookup("LOG_DIR").filter(|d| !d.is_empty()),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            order_type: None,
            intent_queue: 64,
            optimistic_sync: true,
            log_level: "info".to_string(),
            log_json: false,
            log_dir: None,
        }
    }
}

fn parse_order_type(value: &str, fallback: Option<OrderType>) -> Option<OrderType> {
    if value.trim().eq_ignore_ascii_case("all") {
        return None;
    }
    match value.parse() {
        Ok(t) => Some(t),
        Err(e) => {
            tracing::warn!(value = %value, error = %e, "Invalid CART_ORDER_TYPE, using default");
            fallback
        }
    }
}
