use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{food, orders, users};

#[derive(Debug, Clone, Queryable, Serialize, Deserialize)]
pub(crate) struct User {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub email: String,
}

#[derive(Debug, Clone, Queryable, Serialize, Deserialize)]
pub(crate) struct Food {
    pub id: i32,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Queryable, Serialize, Deserialize)]
pub(crate) struct Order {
    pub id: i32,
    pub user_id: i32, //foreign key
    pub food_id: i32, //foreign key
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUser<'a> {
    pub name: &'a str,
    pub age: i32,
    pub email: &'a str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = food)]
pub(crate) struct NewFood<'a> {
    pub name: &'a str,
    pub price: f64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrder {
    pub user_id: i32,
    pub food_id: i32,
}
