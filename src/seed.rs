use diesel::prelude::*;
use rand::Rng;

use crate::db::{DbError, DbPool};
use crate::models::{Food, NewFood, NewOrder, NewUser, User};

const SAMPLE_USERS: &[(&str, i32, &str)] = &[
    ("Alice", 30, "alice@example.com"),
    ("Bob", 25, "bob@example.com"),
    ("Charlie", 35, "charlie@example.com"),
];

const SAMPLE_FOODS: &[(&str, f64)] = &[
    ("Pizza Margherita", 12.5),
    ("Spaghetti Carbonara", 15.0),
    ("Lasagne", 14.0),
    ("Tiramisu", 6.5),
];

/// Inserts the sample users and foods, keyed by email and food name so a
/// re-run leaves the tables unchanged. Committed as a single transaction.
pub(crate) fn seed_sample_data(pool: &DbPool) -> Result<(), DbError> {
    use crate::schema::{food, users};

    let mut conn = pool.get()?;
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        for &(name, age, email) in SAMPLE_USERS {
            let existing: Option<User> = users::table
                .filter(users::email.eq(email))
                .first(conn)
                .optional()?;
            if existing.is_none() {
                diesel::insert_into(users::table)
                    .values(NewUser { name, age, email })
                    .execute(conn)?;
            }
        }

        for &(name, price) in SAMPLE_FOODS {
            let existing: Option<Food> = food::table
                .filter(food::name.eq(name))
                .first(conn)
                .optional()?;
            if existing.is_none() {
                diesel::insert_into(food::table)
                    .values(NewFood { name, price })
                    .execute(conn)?;
            }
        }

        Ok(())
    })?;
    Ok(())
}

/// Inserts `count` orders over uniformly random existing user and food ids.
/// Orders may repeat, there is no natural key to check against.
pub(crate) fn seed_random_orders(pool: &DbPool, count: usize) -> Result<usize, DbError> {
    use crate::schema::{food, orders, users};

    let mut conn = pool.get()?;
    let user_ids: Vec<i32> = users::table.select(users::id).load(&mut conn)?;
    let food_ids: Vec<i32> = food::table.select(food::id).load(&mut conn)?;
    if user_ids.is_empty() || food_ids.is_empty() {
        return Err("cannot seed orders before users and food exist".into());
    }

    let mut rng = rand::thread_rng();
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        for _ in 0..count {
            let row = NewOrder {
                user_id: user_ids[rng.gen_range(0..user_ids.len())],
                food_id: food_ids[rng.gen_range(0..food_ids.len())],
            };
            diesel::insert_into(orders::table).values(row).execute(conn)?;
        }
        Ok(())
    })?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::models::{Food, Order, User};
    use crate::schema::{food, orders, users};

    #[test]
    fn seeding_twice_leaves_the_same_rows() {
        let pool = test_pool();
        seed_sample_data(&pool).unwrap();
        let mut conn = pool.get().unwrap();
        let first_users: Vec<User> = users::table.load(&mut conn).unwrap();
        let first_foods: Vec<Food> = food::table.load(&mut conn).unwrap();
        drop(conn);

        seed_sample_data(&pool).unwrap();
        let mut conn = pool.get().unwrap();
        let second_users: Vec<User> = users::table.load(&mut conn).unwrap();
        let second_foods: Vec<Food> = food::table.load(&mut conn).unwrap();

        assert_eq!(first_users.len(), SAMPLE_USERS.len());
        assert_eq!(first_foods.len(), SAMPLE_FOODS.len());
        assert_eq!(second_users.len(), first_users.len());
        assert_eq!(second_foods.len(), first_foods.len());
        let emails: Vec<&str> = second_users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(
            emails,
            vec![
                "alice@example.com",
                "bob@example.com",
                "charlie@example.com"
            ]
        );
    }

    #[test]
    fn random_orders_reference_existing_rows() {
        let pool = test_pool();
        seed_sample_data(&pool).unwrap();
        let inserted = seed_random_orders(&pool, 5).unwrap();
        assert_eq!(inserted, 5);

        let mut conn = pool.get().unwrap();
        let rows: Vec<Order> = orders::table.load(&mut conn).unwrap();
        assert_eq!(rows.len(), 5);

        let user_ids: Vec<i32> = users::table.select(users::id).load(&mut conn).unwrap();
        let food_ids: Vec<i32> = food::table.select(food::id).load(&mut conn).unwrap();
        for row in rows {
            assert!(user_ids.contains(&row.user_id));
            assert!(food_ids.contains(&row.food_id));
        }
    }

    #[test]
    fn random_orders_need_users_and_food() {
        let pool = test_pool();
        let err = seed_random_orders(&pool, 3).unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
