//! Database queries for products.

use sqlx::PgPool;

use crate::error::AppError;

use super::models::Product;
use super::requests::{CreateProductRequest, UpdateProductRequest};

const PRODUCT_COLUMNS: &str = r#"
    id, name, category, description,
    cost_price, tax_percentage, variable_costs, fixed_costs_allocated,
    sales_channels, additional_fees, desired_margin_percentage,
    is_active, created_at, updated_at
"#;

/// Insert a new product and return the stored row.
pub async fn create_product(
    pool: &PgPool,
    request: &CreateProductRequest,
) -> Result<Product, AppError> {
    let sales_channels = request
        .sales_channels
        .as_ref()
        .map(serde_json::to_value)
        .transpose()?;

    let product = sqlx::query_as::<_, Product>(&format!(
        r#"
        INSERT INTO products (
            name, category, description,
            cost_price, tax_percentage, variable_costs, fixed_costs_allocated,
            sales_channels, additional_fees, desired_margin_percentage
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(&request.name)
    .bind(&request.category)
    .bind(&request.description)
    .bind(request.cost_price)
    .bind(request.tax_percentage)
    .bind(request.variable_costs)
    .bind(request.fixed_costs_allocated)
    .bind(sales_channels)
    .bind(request.additional_fees)
    .bind(request.desired_margin_percentage)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

/// Get a product by id.
pub async fn get_product(pool: &PgPool, id: i64) -> Result<Option<Product>, AppError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        r#"
        SELECT {PRODUCT_COLUMNS}
        FROM products
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// List products, newest first, with optional category and name filters.
pub async fn list_products(
    pool: &PgPool,
    category: Option<&str>,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Product>, AppError> {
    let products = sqlx::query_as::<_, Product>(&format!(
        r#"
        SELECT {PRODUCT_COLUMNS}
        FROM products
        WHERE ($1::text IS NULL OR category = $1)
          AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
        ORDER BY created_at DESC, id DESC
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(category)
    .bind(search)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

/// Count products matching the same filters as [`list_products`].
pub async fn count_products(
    pool: &PgPool,
    category: Option<&str>,
    search: Option<&str>,
) -> Result<i64, AppError> {
    let count: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM products
        WHERE ($1::text IS NULL OR category = $1)
          AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
        "#,
    )
    .bind(category)
    .bind(search)
    .fetch_one(pool)
    .await?;

    Ok(count.0)
}

/// Partially update a product; absent fields keep their stored values.
///
/// Returns `None` when the product does not exist.
pub async fn update_product(
    pool: &PgPool,
    id: i64,
    request: &UpdateProductRequest,
) -> Result<Option<Product>, AppError> {
    let sales_channels = request
        .sales_channels
        .as_ref()
        .map(serde_json::to_value)
        .transpose()?;

    let product = sqlx::query_as::<_, Product>(&format!(
        r#"
        UPDATE products
        SET name = COALESCE($2, name),
            category = COALESCE($3, category),
            description = COALESCE($4, description),
            cost_price = COALESCE($5, cost_price),
            tax_percentage = COALESCE($6, tax_percentage),
            variable_costs = COALESCE($7, variable_costs),
            fixed_costs_allocated = COALESCE($8, fixed_costs_allocated),
            sales_channels = COALESCE($9, sales_channels),
            additional_fees = COALESCE($10, additional_fees),
            desired_margin_percentage = COALESCE($11, desired_margin_percentage),
            is_active = COALESCE($12, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&request.name)
    .bind(&request.category)
    .bind(&request.description)
    .bind(request.cost_price)
    .bind(request.tax_percentage)
    .bind(request.variable_costs)
    .bind(request.fixed_costs_allocated)
    .bind(sales_channels)
    .bind(request.additional_fees)
    .bind(request.desired_margin_percentage)
    .bind(request.is_active)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// Delete a product. Returns whether a row was removed.
pub async fn delete_product(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
