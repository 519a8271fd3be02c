// Test fixtures for integration testing

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test repository fixture for creating synthetic project trees
#[allow(dead_code)] // Used in integration tests
pub struct TestRepo {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

#[allow(dead_code)] // Used in integration tests
impl TestRepo {
    /// Create with custom files
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let mut paths = Vec::new();

        for (path, content) in files {
            let full_path = dir.path().join(path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&full_path, content).unwrap();
            paths.push(full_path);
        }

        Self { dir, files: paths }
    }

    /// A small shop project laid out like the default sources expect
    pub fn shop() -> Self {
        let architecture = long_section("## 系统架构", 40);

        Self::with_files(&[
            ("README.md", README),
            ("docs/architecture.md", &architecture),
            ("docs/库存管理.md", INVENTORY_DOC),
            ("系统状态.md", STATUS_DOC),
            (
                "backend/src/main/java/com/shop/order/OrderOrchestrator.java",
                ORDER_ORCHESTRATOR,
            ),
            (
                "backend/src/main/java/com/shop/stock/StockOrchestrator.java",
                STOCK_ORCHESTRATOR,
            ),
            (
                "backend/src/main/java/com/shop/order/OrderController.java",
                ORDER_CONTROLLER,
            ),
            (
                "backend/src/main/java/com/shop/testing/FakeOrchestrator.java",
                STOCK_ORCHESTRATOR,
            ),
            ("frontend/src/services/order.ts", ORDER_SERVICE),
            ("frontend/src/stores/cart.ts", CART_STORE),
            ("frontend/src/routeConfig.ts", ROUTE_CONFIG),
            ("frontend/src/utils/format.ts", FORMAT_UTIL),
        ])
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// A heading followed by `lines` distinct 58-character lines, no sub-headings
#[allow(dead_code)] // Used in integration tests
pub fn long_section(heading: &str, lines: usize) -> String {
    let mut text = String::from(heading);
    for i in 0..lines {
        text.push('\n');
        text.push_str(&format!(
            "Line {i:03}: the warehouse service reconciles stock levels ok"
        ));
    }
    text.push('\n');
    text
}

pub const README: &str = "## Getting started\n\
Install the backend with Maven and the frontend with npm, then run both dev servers.\n\
\n\
## Deployment\n\
Deployments are built by CI and rolled out to the staging cluster every night.\n";

pub const INVENTORY_DOC: &str = "# 库存管理\n\
库存 盘点 流程：每天晚上自动生成 盘点 任务，仓库人员确认后更新 库存 数量。\n\
\n\
## 调拨\n\
调拨 单据 需要 两个 仓库 的 负责人 审批，审批通过后 库存 自动 转移。\n\
调拨 记录 保存 一年，可以 在 后台 按 仓库 查询。\n";

pub const STATUS_DOC: &str = "# 系统状态\n\
Orders, stock, payments and users are all live. The order orchestrator, \
stock orchestrator and cart store were updated this sprint.\n";

pub const ORDER_ORCHESTRATOR: &str = r#"package com.shop.order;

import com.shop.stock.StockService;

/**
 * Order orchestrator: coordinates stock reservation and payment.
 * 如何添加 a new step: implement OrderStep and register it here.
 */
public class OrderOrchestrator {
    private final StockService stockService;
    private final PaymentService paymentService;

    public OrderOrchestrator(StockService stockService, PaymentService paymentService) {
        this.stockService = stockService;
        this.paymentService = paymentService;
    }

    // internal note: keep in sync with the saga diagram
    public Order createOrder(OrderRequest request) {
        stockService.reserve(request.getItems());
        return paymentService.charge(request);
    }
}
"#;

pub const STOCK_ORCHESTRATOR: &str = r#"package com.shop.stock;

/**
 * Stock orchestrator: moves stock between warehouses.
 */
public class StockOrchestrator {
    private final WarehouseRepository warehouses;

    public StockOrchestrator(WarehouseRepository warehouses) {
        this.warehouses = warehouses;
    }

    public Transfer transferStock(String from, String to, int quantity) {
        return warehouses.transfer(from, to, quantity);
    }
}
"#;

pub const ORDER_CONTROLLER: &str = r#"package com.shop.order;

@RestController
@RequestMapping("/api/orders")
public class OrderController {
    private final OrderOrchestrator orchestrator;

    @PostMapping
    public ResponseEntity<Order> create(@RequestBody OrderRequest request) {
        return ResponseEntity.ok(orchestrator.createOrder(request));
    }
}
"#;

pub const ORDER_SERVICE: &str = r#"import { http } from './http';

export const fetchOrders = async (page: number) => {
  const response = await http.get('/api/orders', { params: { page } });
  return response.data;
};

export async function cancelOrder(id: string) {
  return http.post(`/api/orders/${id}/cancel`);
}
"#;

pub const CART_STORE: &str = r#"import { defineStore } from 'pinia';

export const useCartStore = defineStore('cart', {
  state: () => ({ items: [] as CartItem[] }),
  actions: {
    addItem(item: CartItem) {
      this.items.push(item);
    },
  },
});
"#;

pub const ROUTE_CONFIG: &str = r#"export const routes = [
  { path: '/orders', component: () => import('./views/Orders.vue') },
  { path: '/stock', component: () => import('./views/Stock.vue') },
];
"#;

pub const FORMAT_UTIL: &str = r#"export function formatPrice(cents: number): string {
  return (cents / 100).toFixed(2) + ' CNY';
}

export const formatDate = (d: Date) => d.toISOString().slice(0, 10);
"#;
