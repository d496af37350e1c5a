//! Diesel table definitions for the task and user stores.
//!
//! Kept in step with the SQL in `migrations/`; the unique constraints named
//! there (`tasks_title_key`, `users_username_key`, `users_email_key`) are
//! what the error mapping inspects to recover the offending field.

diesel::table! {
    tasks (id) {
        id -> Int8,
        #[max_length = 50]
        title -> Varchar,
        #[max_length = 255]
        description -> Nullable<Varchar>,
        completed -> Bool,
    }
}

diesel::table! {
    users (id) {
        id -> Int8,
        #[max_length = 25]
        username -> Varchar,
        password -> Text,
        #[max_length = 255]
        email -> Varchar,
    }
}

diesel::allow_tables_to_appear_in_same_query!(tasks, users);
