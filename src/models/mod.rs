mod category;
mod line_item;
mod project;

pub use category::{CategoryKind, CategoryOption};
pub use line_item::{LineItem, subtotal};
pub use project::SaveProjectRequest;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_item() -> LineItem {
        LineItem {
            temp_id: 1_704_067_200_000,
            category_code_id: 3,
            process_name: "도장".to_string(),
            product_name: "퍼티".to_string(),
            unit: "m2".to_string(),
            material_quantity: 10,
            material_unit_price: 1000,
            labor_quantity: 10,
            labor_unit_price: 2000,
            expenses_quantity: 10,
            expenses_unit_price: 500,
        }
    }

    #[test]
    fn row_total_sums_all_three_categories() {
        assert_eq!(sample_item().row_total(), 35_000);
    }

    #[test]
    fn category_unit_is_optional() {
        let process: CategoryOption =
            serde_json::from_value(json!({ "id": 1, "name": "도장", "step1": "도장" })).unwrap();
        assert_eq!(process.unit, None);

        let product: CategoryOption = serde_json::from_value(
            json!({ "id": 3, "name": "퍼티", "step1": "도장", "unit": null, "extra": true }),
        )
        .unwrap();
        assert_eq!(product.unit, None);
    }

    #[test]
    fn save_request_uses_wire_keys() {
        let request = SaveProjectRequest {
            project_name: "Lobby".to_string(),
            project_duration: "2024-01-01 ~ 2024-01-31".to_string(),
            project_description: String::new(),
            materials: vec![sample_item()],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "projectName": "Lobby",
                "projectDuration": "2024-01-01 ~ 2024-01-31",
                "projectDescription": "",
                "materials": [{
                    "temp_id": 1_704_067_200_000i64,
                    "category_code_id": 3,
                    "process_name": "도장",
                    "product_name": "퍼티",
                    "unit": "m2",
                    "material_quantity": 10,
                    "material_unit_price": 1000,
                    "labor_quantity": 10,
                    "labor_unit_price": 2000,
                    "expenses_quantity": 10,
                    "expenses_unit_price": 500,
                }],
            })
        );
    }
}
