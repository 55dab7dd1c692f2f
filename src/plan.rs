use std::fs;
use std::path::Path;

use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};

use crate::db::DbError;

/// Raw SQL equivalent of the orders join in `OrderManager`, kept here so the
/// EXPLAIN statement stays in step with the diesel query it describes.
pub(crate) const ORDERS_JOIN_SQL: &str = "SELECT food.name, food.price \
     FROM orders INNER JOIN food ON food.id = orders.food_id \
     WHERE orders.user_id = ?";

/// One row of SQLite's `EXPLAIN QUERY PLAN` output.
#[derive(Debug, QueryableByName)]
pub(crate) struct PlanStep {
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Integer)]
    pub parent: i32,
    #[diesel(sql_type = Text)]
    pub detail: String,
}

pub(crate) fn explain_orders_join(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Vec<PlanStep>, DbError> {
    let steps = diesel::sql_query(format!("EXPLAIN QUERY PLAN {ORDERS_JOIN_SQL}"))
        .bind::<Integer, _>(user_id)
        .load::<PlanStep>(conn)?;
    Ok(steps)
}

/// Writes the plan as a linear DOT chain, one node per step with sequential
/// edges. Rendering the .dot to an image is left to external tooling.
pub(crate) fn write_plan_graph(steps: &[PlanStep], path: &Path) -> Result<(), DbError> {
    let mut dot = String::from("digraph query_plan {\n    rankdir=TB;\n    fontsize=10;\n");
    for (idx, step) in steps.iter().enumerate() {
        let label = step.detail.replace('"', "\\\"");
        dot.push_str(&format!("    n{idx} [label=\"{label}\"];\n"));
        if idx > 0 {
            dot.push_str(&format!("    n{} -> n{idx};\n", idx - 1));
        }
    }
    dot.push_str("}\n");
    fs::write(path, dot)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[test]
    fn join_query_yields_a_plan() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let steps = explain_orders_join(&mut conn, 1).unwrap();
        assert!(!steps.is_empty());
        for step in &steps {
            assert!(!step.detail.is_empty());
        }
    }

    #[test]
    fn plan_graph_is_a_linear_chain() {
        let steps = vec![
            PlanStep {
                id: 2,
                parent: 0,
                detail: "SCAN orders".to_string(),
            },
            PlanStep {
                id: 5,
                parent: 0,
                detail: "SEARCH food USING INTEGER PRIMARY KEY (rowid=?)".to_string(),
            },
        ];
        let path = std::env::temp_dir().join("order_desk_plan_graph_test.dot");
        write_plan_graph(&steps, &path).unwrap();
        let dot = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(dot.starts_with("digraph query_plan {"));
        assert!(dot.contains("n0 [label=\"SCAN orders\"];"));
        assert!(dot.contains("n1 [label=\"SEARCH food USING INTEGER PRIMARY KEY (rowid=?)\"];"));
        assert!(dot.contains("n0 -> n1;"));
        assert!(!dot.contains("n1 -> n0;"));
    }
}
