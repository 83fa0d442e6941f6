//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. `updated_at`
//! columns are maintained by the `set_updated_at` trigger.

diesel::table! {
    /// Customers.
    clients (id) {
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        phone -> Varchar,
        photo -> Varchar,
        date_of_birth -> Nullable<Date>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shops fulfilling orders.
    branches (id) {
        id -> Uuid,
        name -> Varchar,
        phone -> Varchar,
        photo -> Varchar,
        /// Zero-padded `HH:MM`, enforced by a check constraint.
        work_start_hour -> Varchar,
        /// Zero-padded `HH:MM`, enforced by a check constraint.
        work_end_hour -> Varchar,
        address -> Varchar,
        delivery_price -> Numeric,
        active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Product categories; `parent_id` references this table.
    categories (id) {
        id -> Uuid,
        title -> Varchar,
        parent_id -> Nullable<Uuid>,
        image -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue items.
    products (id) {
        id -> Uuid,
        /// `P-` code drawn from `product_code_seq`.
        product_code -> Varchar,
        title -> Varchar,
        description -> Text,
        price -> Numeric,
        photo -> Varchar,
        category_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Customer orders.
    orders (id) {
        id -> Uuid,
        /// `O-` code drawn from `order_code_seq`.
        order_code -> Varchar,
        client_id -> Uuid,
        branch_id -> Uuid,
        address -> Varchar,
        /// Branch delivery price copied at creation time.
        delivery_price -> Numeric,
        total_count -> Int4,
        total_price -> Numeric,
        /// One of `new`, `in-process`, `finished`, `canceled`.
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Product lines on an order.
    order_products (id) {
        id -> Uuid,
        order_id -> Uuid,
        product_id -> Uuid,
        discount_type -> Varchar,
        discount_amount -> Numeric,
        quantity -> Int4,
        price -> Numeric,
        line_sum -> Numeric,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(products -> categories (category_id));
diesel::joinable!(orders -> clients (client_id));
diesel::joinable!(orders -> branches (branch_id));
diesel::joinable!(order_products -> orders (order_id));
diesel::joinable!(order_products -> products (product_id));

diesel::allow_tables_to_appear_in_same_query!(
    clients,
    branches,
    categories,
    products,
    orders,
    order_products,
);
