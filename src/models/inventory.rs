use serde::{Deserialize, Serialize};

/// One row of the `inventory` table. `alert` is never stored; see [`InventoryStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub stock: i64,
    pub reorder_point: i64,
    pub location: String,
}

impl InventoryItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        stock: i64,
        reorder_point: i64,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stock,
            reorder_point,
            location: location.into(),
        }
    }

    /// True when stock has dropped below the reorder threshold.
    pub fn needs_reorder(&self) -> bool {
        self.stock < self.reorder_point
    }
}

/// Wire shape of an inventory item, with the alert flag computed at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryStatus {
    pub id: String,
    pub name: String,
    pub stock: i64,
    pub reorder_point: i64,
    pub location: String,
    pub alert: bool,
}

impl From<InventoryItem> for InventoryStatus {
    fn from(item: InventoryItem) -> Self {
        let alert = item.needs_reorder();
        Self {
            id: item.id,
            name: item.name,
            stock: item.stock,
            reorder_point: item.reorder_point,
            location: item.location,
            alert,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub total: usize,
    pub alert_count: usize,
}

impl InventorySummary {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a InventoryItem>) -> Self {
        let (total, alert_count) = items.into_iter().fold((0, 0), |(total, alerts), item| {
            (total + 1, alerts + usize::from(item.needs_reorder()))
        });
        Self { total, alert_count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_when_stock_below_reorder_point() {
        let status = InventoryStatus::from(InventoryItem::new("D002", "Antiviral", 1200, 1500, "B"));
        assert!(status.alert);
    }

    #[test]
    fn no_alert_when_stock_above_reorder_point() {
        let status = InventoryStatus::from(InventoryItem::new("D001", "Pain", 5500, 5000, "A"));
        assert!(!status.alert);
    }

    #[test]
    fn no_alert_at_exact_reorder_point() {
        let item = InventoryItem::new("X", "Edge", 500, 500, "A");
        assert!(!item.needs_reorder(), "alert is strictly stock < reorder_point");
    }

    #[test]
    fn serializes_fields_in_wire_order() {
        let status = InventoryStatus::from(InventoryItem::new("D001", "Pain", 1, 2, "A"));
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(
            json,
            r#"{"id":"D001","name":"Pain","stock":1,"reorder_point":2,"location":"A","alert":true}"#
        );
    }

    #[test]
    fn summary_counts_alerts() {
        let items = vec![
            InventoryItem::new("a", "a", 1, 2, "x"),
            InventoryItem::new("b", "b", 3, 2, "x"),
            InventoryItem::new("c", "c", 0, 1, "x"),
        ];
        assert_eq!(
            InventorySummary::from_items(&items),
            InventorySummary { total: 3, alert_count: 2 }
        );
    }
}
