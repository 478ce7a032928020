//! ターミナル表示用の整形

use chrono::{DateTime, NaiveDate};
use food_waste_common::types::{ExtractedItem, Inventory, InventoryItem, Resource};
use food_waste_common::FormattedDocument;
use std::fmt::Write;

/// 期限が近いとみなす日数
pub const EXPIRING_SOON_DAYS: i64 = 3;

/// アウトラインを見出し付きテキストにする
pub fn render_document(doc: &FormattedDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", doc.title());
    let _ = writeln!(out, "{}", "=".repeat(doc.title().chars().count().max(3)));

    if doc.is_empty() {
        let _ = writeln!(out, "\n(見出しが見つからないため表示できる内容がありません)");
        return out;
    }

    for section in &doc.sections {
        let _ = writeln!(out, "\n[{}]", section.heading);
        if !section.content.is_empty() {
            let _ = writeln!(out, "{}", section.content);
        }
        for item in &section.items {
            let _ = writeln!(out, "  • {}", item);
        }
    }
    out
}

fn format_quantity(quantity: f64, unit: &str) -> String {
    if unit.is_empty() {
        format!("{}", quantity)
    } else {
        format!("{} {}", quantity, unit)
    }
}

/// 画像から追加された品目
pub fn render_extracted_items(items: &[ExtractedItem]) -> String {
    if items.is_empty() {
        return "  (追加された品目はありません)\n".to_string();
    }

    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "  - {} ({})",
            item.display_name(),
            format_quantity(item.quantity, &item.unit)
        );
    }
    out
}

/// 消費期限までの日数（`YYYY-MM-DD` / RFC3339）
pub fn days_until(expiration: &str, today: NaiveDate) -> Option<i64> {
    let date = NaiveDate::parse_from_str(expiration, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(expiration)
                .ok()
                .map(|dt| dt.date_naive())
        })?;
    Some((date - today).num_days())
}

fn expiry_label(item: &InventoryItem, today: NaiveDate) -> String {
    let Some(days) = item
        .expiration_date
        .as_deref()
        .and_then(|d| days_until(d, today))
    else {
        return String::new();
    };

    match days {
        d if d < 0 => format!(" [期限切れ {}日]", -d),
        0 => " [今日まで]".to_string(),
        d if d <= EXPIRING_SOON_DAYS => format!(" [あと{}日 ⚠]", d),
        d => format!(" [あと{}日]", d),
    }
}

/// 在庫1件の詳細
pub fn render_inventory(inventory: &Inventory, today: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", inventory.name, inventory.id);
    if let Some(description) = inventory.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "  {}", description);
    }

    if inventory.items.is_empty() {
        let _ = writeln!(out, "  (品目なし)");
        return out;
    }

    for item in &inventory.items {
        let _ = writeln!(
            out,
            "  - {} ({}){}",
            item.display_name(),
            format_quantity(item.quantity, &item.unit),
            expiry_label(item, today)
        );
    }
    out
}

/// 在庫の一覧
pub fn render_inventories(inventories: &[Inventory]) -> String {
    if inventories.is_empty() {
        return "在庫がありません\n".to_string();
    }

    let mut out = String::new();
    for inventory in inventories {
        let _ = writeln!(
            out,
            "{}\t{}\t{}品目",
            inventory.id,
            inventory.name,
            inventory.items.len()
        );
    }
    out
}

/// 記事・資料の一覧
pub fn render_resources(resources: &[&Resource]) -> String {
    if resources.is_empty() {
        return "該当する資料がありません\n".to_string();
    }

    let mut out = String::new();
    for resource in resources {
        let _ = writeln!(out, "{} [{}]", resource.title, resource.kind);
        if !resource.description.is_empty() {
            let _ = writeln!(out, "  {}", resource.description);
        }
        let _ = writeln!(out, "  {}", resource.url);
        if !resource.tags.is_empty() {
            let _ = writeln!(out, "  #{}", resource.tags.join(" #"));
        }
    }
    out
}
