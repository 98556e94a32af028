//! Seeds a small catalog and runs one replenishment cycle end to end.
//!
//! Dev smoke tool: `SURTIDO_SEED=25 cargo run --bin surtido-demo`.

use std::sync::Arc;

use anyhow::Context;
use rust_decimal::Decimal;

use surtido_catalog::{Article, CatalogStore, SupplierOffer};
use surtido_engine::{OrderFilter, ReplenishmentEngine, Supplier};
use surtido_purchasing::{ContactChannel, OrderStatus};

fn main() -> anyhow::Result<()> {
    surtido_observability::init();

    let seed: usize = std::env::var("SURTIDO_SEED")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .context("SURTIDO_SEED must be a number")?;

    let catalog = Arc::new(CatalogStore::new());
    let engine = ReplenishmentEngine::new(catalog.clone());

    let norte = Supplier::new("Distribuciones Norte", ContactChannel::Email);
    let sur = Supplier::new("Mayorista Sur", ContactChannel::Whatsapp);
    engine.suppliers().upsert(norte.clone())?;
    engine.suppliers().upsert(sur.clone())?;

    for i in 0..seed {
        let supplier = if i % 2 == 0 { &norte } else { &sur };
        let offer = SupplierOffer::new(
            supplier.id,
            supplier.name.clone(),
            format!("{}-{i:04}", &supplier.name[..4].to_uppercase()),
            Decimal::new(80 + i as i64 * 7, 2),
            Decimal::new(i as i64 % 2 * 600 + 400, 2), // 4 % or 10 %
            Decimal::new(50, 2),
        )
        .preferred();

        let mut article =
            Article::new(format!("ART-{i:03}"), format!("Artículo {i}"), "secos").with_offer(offer);
        article.available = (i as i64 * 3) % 25;
        article.reorder_point = 20;
        article.maximum = 60;
        catalog.upsert(article)?;
    }

    let report = engine.plan_suggestions_report();
    tracing::info!(
        suggestions = report.suggestions.len(),
        skipped = report.skipped.len(),
        "plan computed"
    );

    let lines = engine.lines_from_suggestions(&report.suggestions)?;
    let drafts = engine.aggregate_draft(&lines);

    for draft in drafts {
        let channel = engine.suppliers().default_channel(draft.supplier_id)?;
        let order = engine.submit_order(draft, channel, "demo", "ciclo de prueba")?;
        println!(
            "{}  {}  {} líneas  total {}",
            order.number(),
            order.supplier_name(),
            order.lines().len(),
            order.totals().total
        );
        engine.transition_order(order.id(), OrderStatus::Confirmado)?;
    }

    let open = engine.list_orders(&OrderFilter {
        status: Some(OrderStatus::Confirmado),
        ..Default::default()
    });
    println!(
        "{} pedidos confirmados, {} eventos en el diario",
        open.len(),
        engine.journal().len()
    );

    Ok(())
}
