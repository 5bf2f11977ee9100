use crate::models::CategoryOption;

/// Category reference data loaded once per session.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    processes: Vec<CategoryOption>,
    products: Vec<CategoryOption>,
}

impl Catalog {
    pub fn new(processes: Vec<CategoryOption>, products: Vec<CategoryOption>) -> Self {
        Self {
            processes,
            products,
        }
    }

    pub fn processes(&self) -> &[CategoryOption] {
        &self.processes
    }

    pub fn products(&self) -> &[CategoryOption] {
        &self.products
    }

    /// Products whose `step1` matches the given process key, in catalog order.
    pub fn products_for(&self, process: &str) -> Vec<CategoryOption> {
        self.products
            .iter()
            .filter(|product| product.step1 == process)
            .cloned()
            .collect()
    }

    pub fn product(&self, id: i32) -> Option<&CategoryOption> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty() && self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: i32, name: &str, step1: &str, unit: Option<&str>) -> CategoryOption {
        CategoryOption {
            id,
            name: name.to_string(),
            step1: step1.to_string(),
            unit: unit.map(str::to_string),
        }
    }

    #[test]
    fn products_are_filtered_by_process() {
        let catalog = Catalog::new(
            vec![option(1, "도장", "도장", None), option(2, "방수", "방수", None)],
            vec![
                option(3, "퍼티", "도장", Some("m2")),
                option(4, "우레탄", "방수", Some("m2")),
                option(5, "수성페인트", "도장", Some("L")),
            ],
        );

        let ids: Vec<i32> = catalog.products_for("도장").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 5]);
        assert!(catalog.products_for("철거").is_empty());
    }

    #[test]
    fn product_lookup_by_id() {
        let catalog = Catalog::new(Vec::new(), vec![option(3, "퍼티", "도장", Some("m2"))]);
        assert_eq!(catalog.product(3).map(|p| p.name.as_str()), Some("퍼티"));
        assert!(catalog.product(99).is_none());
    }
}
