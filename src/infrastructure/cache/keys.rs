//! Cache key layout.
//!
//! All keys of one pharmacy and entity share a prefix so a write can drop
//! every derived view with a single pattern delete.

pub fn product(pharmacy_id: i64, id: i64) -> String {
    format!("products:{pharmacy_id}:id:{id}")
}

pub fn product_list(pharmacy_id: i64, page: u32, page_size: u32, query: Option<&str>) -> String {
    format!(
        "products:{pharmacy_id}:list:{page}:{page_size}:{}",
        query.unwrap_or_default()
    )
}

pub fn products_of(pharmacy_id: i64) -> String {
    format!("products:{pharmacy_id}:*")
}

pub fn customer(pharmacy_id: i64, id: i64) -> String {
    format!("customers:{pharmacy_id}:id:{id}")
}

pub fn customer_health_records(pharmacy_id: i64, customer_id: i64) -> String {
    format!("customers:{pharmacy_id}:id:{customer_id}:health")
}

pub fn order(pharmacy_id: i64, id: i64) -> String {
    format!("orders:{pharmacy_id}:id:{id}")
}

pub fn pharmacy(id: i64) -> String {
    format!("pharmacy:{id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::KeyPattern;

    #[test]
    fn test_product_keys_fall_under_tenant_pattern() {
        let pattern = KeyPattern::new(&products_of(3)).unwrap();
        assert!(pattern.matches(&product(3, 9)));
        assert!(pattern.matches(&product_list(3, 1, 25, Some("ibu"))));
        assert!(!pattern.matches(&product(33, 9)));
        assert!(!pattern.matches(&customer(3, 9)));
    }

    #[test]
    fn test_glob_characters_in_query_stay_literal() {
        let key = product_list(3, 1, 25, Some("a*b?[c]"));
        assert!(KeyPattern::new(&products_of(3)).unwrap().matches(&key));
        assert!(!KeyPattern::new(&products_of(4)).unwrap().matches(&key));
        assert_ne!(key, product_list(3, 1, 25, Some("axb")));
    }
}
