use crate::models::InventoryItem;

/// Fixed catalog served by the in-memory service.
pub fn default_catalog() -> Vec<InventoryItem> {
    vec![
        InventoryItem::new("drug_001", "AcetaZyme", 5500, 6000, "Warehouse A"),
        InventoryItem::new("drug_002", "Vitamax C200", 12000, 10000, "Warehouse B"),
        InventoryItem::new("drug_003", "GentaStat", 450, 500, "Warehouse A"),
        InventoryItem::new("drug_004", "Xylitol 5mg", 8500, 9000, "Distribution Center"),
        InventoryItem::new("drug_005", "Zoplicone Plus", 25000, 15000, "Warehouse B"),
        InventoryItem::new("drug_006", "Bactrofen", 1500, 1600, "Warehouse A"),
    ]
}

/// Read-only item list, looked up by linear scan.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<InventoryItem>,
}

impl Catalog {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(default_catalog())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_six_unique_items() {
        let catalog = Catalog::default();
        let mut ids: Vec<&str> = catalog.items().iter().map(|i| i.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn find_matches_exact_id() {
        let catalog = Catalog::default();
        assert_eq!(catalog.find("drug_002").map(|i| i.name.as_str()), Some("Vitamax C200"));
        assert!(catalog.find("DRUG_002").is_none());
        assert!(catalog.find("drug_999").is_none());
    }

    #[test]
    fn alerting_items_match_stock_levels() {
        let catalog = Catalog::default();
        let alerting: Vec<&str> = catalog
            .items()
            .iter()
            .filter(|i| i.needs_reorder())
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(alerting, vec!["drug_001", "drug_003", "drug_004", "drug_006"]);
    }
}
