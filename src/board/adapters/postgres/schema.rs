//! Diesel schema for board persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Store-assigned task identifier.
        id -> Int8,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Stage value. Not constrained to the stage enumeration.
        #[max_length = 50]
        status -> Varchar,
        /// Optional due date without time of day.
        due_date -> Nullable<Date>,
        /// Optional weak reference to `users.id`.
        assignee_id -> Nullable<Int8>,
        /// Raw completion progress.
        progress -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// User directory.
    users (id) {
        /// User identifier.
        id -> Int8,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Email address.
        #[max_length = 255]
        email -> Varchar,
    }
}
