//! Cart Engine - 收银端购物车订单聚合与选择引擎
//!
//! # 架构概述
//!
//! 维护当前营业中的订单快照，提供以下核心功能：
//!
//! - **数量调整** (`orders`): 商品行增减，数量归零即删除
//! - **附加项** (`orders::add_on`): 附加项勾选切换
//! - **多选** (`cart`): 订单选择、全选、快照刷新后自动修剪
//! - **价格** (`pricing`): 订单显示价格与购物车汇总
//! - **批量操作** (`batch`): 顺序下单/打印，单个失败不中断
//! - **视图投影** (`projection`): Loading / Empty / Success
//!
//! # 模块结构
//!
//! ```text
//! cart-engine/src/
//! ├── core/          # 配置
//! ├── cart/          # 快照存储、选择集
//! ├── orders/        # 数量、附加项、错误
//! ├── pricing/       # 价格计算、汇总
//! ├── batch/         # 批量下单/打印
//! ├── engine/        # CartEngine + 事件循环
//! ├── services/      # 外部协作者接口 + 内存实现
//! ├── projection.rs  # UI 状态投影
//! └── utils/         # 日志
//! ```

pub mod batch;
pub mod cart;
pub mod core;
pub mod engine;
pub mod orders;
pub mod pricing;
pub mod projection;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use batch::{BatchAction, BatchCoordinator, BatchOutcome, BatchProgress, BatchReport};
pub use cart::{CartStore, SelectionManager};
pub use core::EngineConfig;
pub use engine::{CartEngine, CartHandle, CartIntent, CartNotice, CartView, CartWorker};
pub use orders::{AddOnSelector, AddOnToggle, CartError, CartResult, MutationOutcome, QuantityMutator};
pub use pricing::{CartSummary, PricingCalculator};
pub use projection::{UiState, UiStateProjector};
pub use services::{AddOnCatalog, MemoryOrderStore, OrderDataSource, OrderService, ServiceCall};

// Re-export logger functions
pub use utils::{init_logger, init_logger_with_file};
