use std::path::Path;

use diesel::prelude::*;
use serde::Serialize;

use crate::db::{DbError, DbPool};
use crate::models::NewOrder;
use crate::plan;
use crate::schema::{food, orders, users};

pub(crate) const NO_ORDERS_MESSAGE: &str = "No orders found for the user.";
const PLAN_GRAPH_FILE: &str = "query_plan.dot";

/// Result value for every store-facing operation. Failures are carried here
/// as a message, never propagated to the caller.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    fn ok(message: impl Into<String>) -> Self {
        Outcome {
            success: true,
            message: message.into(),
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Outcome {
            success: false,
            message: message.into(),
        }
    }
}

/// Handles order-related operations and query plan inspection. Holds a pool
/// handle and checks out a fresh connection per operation.
pub(crate) struct OrderManager {
    pool: DbPool,
}

impl OrderManager {
    pub(crate) fn new(pool: DbPool) -> Self {
        OrderManager { pool }
    }

    /// Creates an order linking `user_id` to the food with the given exact
    /// name. An unknown food name fails without inserting anything.
    pub(crate) fn create_order(&self, user_id: i32, food_name: &str) -> Outcome {
        match self.try_create_order(user_id, food_name) {
            Ok(outcome) => outcome,
            Err(e) => Outcome::err(format!("Error: {e}")),
        }
    }

    fn try_create_order(&self, user_id: i32, food_name: &str) -> Result<Outcome, DbError> {
        let mut conn = self.pool.get()?;
        let food_id: Option<i32> = food::table
            .filter(food::name.eq(food_name))
            .select(food::id)
            .first(&mut conn)
            .optional()?;
        let Some(food_id) = food_id else {
            return Ok(Outcome::err("Food not found."));
        };
        diesel::insert_into(orders::table)
            .values(NewOrder { user_id, food_id })
            .execute(&mut conn)?;
        Ok(Outcome::ok("Order created successfully."))
    }

    /// Fetches the user's orders and renders them as a conversational
    /// sentence, aggregating repeated foods at read time.
    pub(crate) fn get_orders_for_user(&self, user_id: i32) -> Outcome {
        match self.try_get_orders(user_id) {
            Ok(outcome) => outcome,
            Err(e) => Outcome::err(e.to_string()),
        }
    }

    fn try_get_orders(&self, user_id: i32) -> Result<Outcome, DbError> {
        let mut conn = self.pool.get()?;
        let user_name: Option<String> = users::table
            .filter(users::id.eq(user_id))
            .select(users::name)
            .first(&mut conn)
            .optional()?;
        let Some(user_name) = user_name else {
            return Ok(Outcome::err("User not found."));
        };

        let rows: Vec<(String, f64)> = orders::table
            .inner_join(food::table)
            .filter(orders::user_id.eq(user_id))
            .select((food::name, food::price))
            .load(&mut conn)?;
        if rows.is_empty() {
            return Ok(Outcome::ok(NO_ORDERS_MESSAGE));
        }
        Ok(Outcome::ok(render_order_summary(&user_name, &rows)))
    }

    /// Logs the compiled SQL for the orders join, fetches the store's
    /// EXPLAIN output for it and logs each step. With `render_graph` set the
    /// plan is also written out as a DOT file.
    pub(crate) fn explain_orders_query(&self, user_id: i32, render_graph: bool) -> Outcome {
        match self.try_explain(user_id, render_graph) {
            Ok(outcome) => outcome,
            Err(e) => Outcome::err(format!("Error generating query plan: {e}")),
        }
    }

    fn try_explain(&self, user_id: i32, render_graph: bool) -> Result<Outcome, DbError> {
        let mut conn = self.pool.get()?;
        let query = orders::table
            .inner_join(food::table)
            .filter(orders::user_id.eq(user_id))
            .select((food::name, food::price));
        log::info!(
            "compiled query: {}",
            diesel::debug_query::<diesel::sqlite::Sqlite, _>(&query)
        );

        let steps = plan::explain_orders_join(&mut conn, user_id)?;
        if steps.is_empty() {
            return Ok(Outcome::ok("No query plan generated."));
        }
        for step in &steps {
            log::info!("plan step {} (parent {}): {}", step.id, step.parent, step.detail);
        }

        let mut message = steps
            .iter()
            .map(|step| step.detail.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if render_graph {
            plan::write_plan_graph(&steps, Path::new(PLAN_GRAPH_FILE))?;
            message.push_str(&format!("\nQuery plan graph saved as: {PLAN_GRAPH_FILE}"));
        }
        Ok(Outcome::ok(message))
    }
}

/// Builds the sentence for a user's orders. Foods appear in first-seen
/// order, repeats collapse into a count, and the last item is joined with
/// ", and " when more than one distinct food exists.
fn render_order_summary(user_name: &str, rows: &[(String, f64)]) -> String {
    let mut summary: Vec<(&str, u32, f64)> = Vec::new();
    for (name, price) in rows {
        if let Some(entry) = summary.iter_mut().find(|(n, _, _)| *n == name.as_str()) {
            entry.1 += 1;
        } else {
            summary.push((name.as_str(), 1, *price));
        }
    }

    let lines: Vec<String> = summary
        .iter()
        .map(|&(name, count, price)| {
            if count > 1 {
                format!("{count}x {name} for ${price:.2} each")
            } else {
                format!("{name} for ${price:.2}")
            }
        })
        .collect();

    let order_list = if lines.len() > 1 {
        format!(
            "{}, and {}",
            lines[..lines.len() - 1].join(", "),
            lines[lines.len() - 1]
        )
    } else {
        lines[0].clone()
    };

    format!("Hello {user_name}, you have ordered {order_list}! Thank you for dining with us.")
}
