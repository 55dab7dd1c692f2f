table! {
    users (id) {
        id -> Integer,
        name -> Text,
        age -> Integer,
        email -> Text,
    }
}

table! {
    food (id) {
        id -> Integer,
        name -> Text,
        price -> Double,
    }
}

table! {
    orders (id) {
        id -> Integer,
        user_id -> Integer,
        food_id -> Integer,
    }
}

joinable!(orders -> users (user_id));
joinable!(orders -> food (food_id));

allow_tables_to_appear_in_same_query!(users, food, orders);
