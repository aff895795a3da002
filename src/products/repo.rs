use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Highest code point in Unicode's private-use area; appending it to the
/// search term turns a prefix match into a closed lexicographic range.
const RANGE_SENTINEL: char = '\u{f8ff}';

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub product_name: String,
    pub unit_calories: f64,
    pub unit_weight: f64,
    pub weight_unit: String,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

const PRODUCT_COLUMNS: &str =
    "id, product_name, unit_calories, unit_weight, weight_unit, protein_g, carbs_g, fat_g";

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(product)
}

pub(crate) fn range_upper_bound(term: &str) -> String {
    let mut upper = String::with_capacity(term.len() + RANGE_SENTINEL.len_utf8());
    upper.push_str(term);
    upper.push(RANGE_SENTINEL);
    upper
}

/// Prefix search over product names as the range `[term, term + sentinel]`.
/// Callers are expected to short-circuit the empty term; an empty prefix
/// matches nothing, not everything.
pub async fn search_by_prefix(db: &PgPool, term: &str) -> anyhow::Result<Vec<Product>> {
    if term.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, Product>(&format!(
        r#"
        SELECT {PRODUCT_COLUMNS}
        FROM products
        WHERE product_name >= $1 AND product_name <= $2
        ORDER BY product_name ASC
        "#
    ))
    .bind(term)
    .bind(range_upper_bound(term))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_bound_appends_sentinel() {
        assert_eq!(range_upper_bound("app"), "app\u{f8ff}");
    }

    #[tokio::test]
    async fn empty_term_matches_nothing() {
        // The guard returns before any query, so the lazy pool never connects.
        let state = crate::state::AppState::fake();
        let rows = search_by_prefix(&state.db, "").await.unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn upper_bound_closes_the_prefix_range() {
        let upper = range_upper_bound("man");
        assert!("manzana" > "man");
        assert!("manzana" < upper.as_str());
        // A name that merely shares a shorter prefix falls outside the range.
        assert!("melon" > upper.as_str());
    }
}
