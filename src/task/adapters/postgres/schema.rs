//! Diesel schema for task records.

diesel::table! {
    /// Task records scoped by owner.
    tasks (id) {
        /// Server-assigned task identifier.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        /// Task text.
        text -> Text,
        /// Completion flag.
        completed -> Bool,
        /// Server-assigned creation timestamp.
        created_at -> Timestamptz,
        /// Completion timestamp, set exactly when `completed` is true.
        completed_at -> Nullable<Timestamptz>,
    }
}
