#[macro_use]
extern crate diesel;

mod db;
mod manager;
mod models;
mod plan;
mod schema;
mod seed;

use crate::manager::OrderManager;

const DEMO_USER_ID: i32 = 2;
const RANDOM_ORDER_COUNT: usize = 5;

/// Substring-matching dispatcher over free-text questions, for manually
/// exercising the manager. Not a stable interface.
fn process_question(question: &str, user_id: i32, manager: &OrderManager) {
    let lowered = question.to_lowercase();

    if lowered.contains("create a new order") {
        // food name is whatever follows the last "for"
        let food_name = question
            .rsplit("for")
            .next()
            .unwrap_or("")
            .trim()
            .trim_end_matches('.');
        let result = manager.create_order(user_id, food_name);
        println!("Result: {}", result.message);
    } else if lowered.contains("show me my orders") {
        let result = manager.get_orders_for_user(user_id);
        if result.success {
            println!("Result: {}", result.message);
        } else {
            println!("Error: Failed to fetch orders - {}", result.message);
        }
    } else if lowered.contains("visualize query plan") {
        println!("Visualizing query plan for retrieving the user's orders...");
        let result = manager.explain_orders_query(user_id, false);
        println!("{}", result.message);
    } else {
        log::warn!("no handler matched question: {question}");
    }
}

fn main() {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let conn_spec =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "example.db".to_string());
    let pool = db::build_pool(&conn_spec).expect("Failed to create pool.");

    {
        let mut conn = pool.get().expect("Failed to check out a connection.");
        db::ensure_schema(&mut conn).expect("Failed to create tables.");
    }

    if let Err(e) = seed::seed_sample_data(&pool) {
        log::error!("error seeding sample data: {e}");
        return;
    }
    if let Err(e) = seed::seed_random_orders(&pool, RANDOM_ORDER_COUNT) {
        log::error!("error seeding orders: {e}");
        return;
    }
    log::info!("database populated or updated");

    let manager = OrderManager::new(pool);

    process_question("Create a new order for Tiramisu.", DEMO_USER_ID, &manager);
    process_question("Show me my orders.", DEMO_USER_ID, &manager);
    process_question("Visualize query plan.", DEMO_USER_ID, &manager);
}
