//! Postgres-backed store implementations.
//!
//! Conditional writes are expressed as guarded `UPDATE ... WHERE ... RETURNING`
//! statements: the condition and the write are one atomic statement, so
//! concurrent writers resolve at the row level and exactly one wins.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Duplicate insert (primary key) |
//! | Database (check constraint violation) | `23514` | `Conflict` | Stock guard fired |
//! | Database (other) | Any other | `Backend` | Other database errors |
//! | PoolClosed | N/A | `Backend` | Connection pool was closed |
//! | Other | N/A | `Backend` | Network errors, connection failures, etc. |
//!
//! ## Schema
//!
//! `PostgresStores::connect` bootstraps the three tables with
//! `CREATE TABLE IF NOT EXISTS`; there is no separate migration step.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use reelhouse_catalog::{Genre, Movie, MovieStore};
use reelhouse_core::{CustomerId, MovieId, RentalId, StoreError, StoreResult};
use reelhouse_customers::{Customer, CustomerStore};
use reelhouse_rentals::{CustomerSnapshot, MovieSnapshot, Rental, RentalStore};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        phone TEXT NOT NULL,
        is_gold BOOLEAN NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movies (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        genre TEXT NOT NULL,
        daily_rental_rate BIGINT NOT NULL,
        number_in_stock BIGINT NOT NULL CHECK (number_in_stock >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rentals (
        id UUID PRIMARY KEY,
        customer_id UUID NOT NULL,
        customer_name TEXT NOT NULL,
        customer_phone TEXT NOT NULL,
        customer_is_gold BOOLEAN NOT NULL,
        movie_id UUID NOT NULL,
        movie_title TEXT NOT NULL,
        movie_daily_rental_rate BIGINT NOT NULL,
        date_out TIMESTAMPTZ NOT NULL,
        date_returned TIMESTAMPTZ,
        rental_fee BIGINT
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS rentals_customer_movie_idx
        ON rentals (customer_id, movie_id)
    "#,
];

/// Connection handle producing the three Postgres-backed stores.
///
/// All stores share one pool; the pool is thread-safe and cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresStores {
    pool: Arc<PgPool>,
}

impl PostgresStores {
    /// Connect to `database_url` and make sure the schema exists.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| StoreError::backend(format!("failed to connect to postgres: {e}")))?;

        let stores = Self {
            pool: Arc::new(pool),
        };
        stores.ensure_schema().await?;
        Ok(stores)
    }

    /// Wrap an existing pool (shared pools, tests). Does not touch the schema.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn customers(&self) -> PostgresCustomerStore {
        PostgresCustomerStore {
            pool: self.pool.clone(),
        }
    }

    pub fn movies(&self) -> PostgresMovieStore {
        PostgresMovieStore {
            pool: self.pool.clone(),
        }
    }

    pub fn rentals(&self) -> PostgresRentalStore {
        PostgresRentalStore {
            pool: self.pool.clone(),
        }
    }

    /// Create the tables if they are not there yet. Idempotent.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }
}

/// Postgres-backed customer store.
#[derive(Debug, Clone)]
pub struct PostgresCustomerStore {
    pool: Arc<PgPool>,
}

#[async_trait]
impl CustomerStore for PostgresCustomerStore {
    #[instrument(skip(self, customer), fields(customer_id = %customer.id_typed()), err)]
    async fn insert(&self, customer: Customer) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, is_gold)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(customer.id_typed().as_uuid())
        .bind(customer.name())
        .bind(customer.phone())
        .bind(customer.is_gold())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_customer", e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(customer_id = %id), err)]
    async fn get(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        let row = sqlx::query("SELECT id, name, phone, is_gold FROM customers WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_customer", e))?;

        match row {
            Some(row) => Ok(Some(customer_from_row(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> StoreResult<Vec<Customer>> {
        let rows = sqlx::query("SELECT id, name, phone, is_gold FROM customers")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_customers", e))?;

        let mut customers = Vec::with_capacity(rows.len());
        for row in rows {
            customers.push(customer_from_row(&row)?);
        }
        Ok(customers)
    }
}

/// Postgres-backed movie store.
#[derive(Debug, Clone)]
pub struct PostgresMovieStore {
    pool: Arc<PgPool>,
}

impl PostgresMovieStore {
    async fn exists(&self, id: MovieId) -> StoreResult<bool> {
        let row = sqlx::query("SELECT 1 AS one FROM movies WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("movie_exists", e))?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl MovieStore for PostgresMovieStore {
    #[instrument(skip(self, movie), fields(movie_id = %movie.id_typed()), err)]
    async fn insert(&self, movie: Movie) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO movies (id, title, genre, daily_rental_rate, number_in_stock)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(movie.id_typed().as_uuid())
        .bind(movie.title())
        .bind(movie.genre().name())
        .bind(movie.daily_rental_rate() as i64)
        .bind(movie.number_in_stock())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_movie", e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(movie_id = %id), err)]
    async fn get(&self, id: MovieId) -> StoreResult<Option<Movie>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, genre, daily_rental_rate, number_in_stock
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_movie", e))?;

        match row {
            Some(row) => Ok(Some(movie_from_row(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> StoreResult<Vec<Movie>> {
        let rows = sqlx::query(
            "SELECT id, title, genre, daily_rental_rate, number_in_stock FROM movies",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_movies", e))?;

        let mut movies = Vec::with_capacity(rows.len());
        for row in rows {
            movies.push(movie_from_row(&row)?);
        }
        Ok(movies)
    }

    #[instrument(skip(self), fields(movie_id = %id), err)]
    async fn decrement_stock(&self, id: MovieId) -> StoreResult<Movie> {
        // The WHERE clause is the stock guard; the statement is atomic.
        let row = sqlx::query(
            r#"
            UPDATE movies
            SET number_in_stock = number_in_stock - 1
            WHERE id = $1 AND number_in_stock > 0
            RETURNING id, title, genre, daily_rental_rate, number_in_stock
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("decrement_stock", e))?;

        match row {
            Some(row) => movie_from_row(&row),
            // No row matched: unknown id, or the guard held.
            None => {
                if self.exists(id).await? {
                    Err(StoreError::conflict("movie is out of stock"))
                } else {
                    Err(StoreError::NotFound)
                }
            }
        }
    }

    #[instrument(skip(self), fields(movie_id = %id), err)]
    async fn increment_stock(&self, id: MovieId) -> StoreResult<Movie> {
        let row = sqlx::query(
            r#"
            UPDATE movies
            SET number_in_stock = number_in_stock + 1
            WHERE id = $1
            RETURNING id, title, genre, daily_rental_rate, number_in_stock
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("increment_stock", e))?;

        match row {
            Some(row) => movie_from_row(&row),
            None => Err(StoreError::NotFound),
        }
    }
}

/// Postgres-backed rental store.
#[derive(Debug, Clone)]
pub struct PostgresRentalStore {
    pool: Arc<PgPool>,
}

impl PostgresRentalStore {
    async fn exists(&self, id: RentalId) -> StoreResult<bool> {
        let row = sqlx::query("SELECT 1 AS one FROM rentals WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("rental_exists", e))?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl RentalStore for PostgresRentalStore {
    #[instrument(skip(self, rental), fields(rental_id = %rental.id_typed()), err)]
    async fn create(&self, rental: Rental) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rentals (
                id,
                customer_id,
                customer_name,
                customer_phone,
                customer_is_gold,
                movie_id,
                movie_title,
                movie_daily_rental_rate,
                date_out,
                date_returned,
                rental_fee
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(rental.id_typed().as_uuid())
        .bind(rental.customer().id.as_uuid())
        .bind(&rental.customer().name)
        .bind(&rental.customer().phone)
        .bind(rental.customer().is_gold)
        .bind(rental.movie().id.as_uuid())
        .bind(&rental.movie().title)
        .bind(rental.movie().daily_rental_rate as i64)
        .bind(rental.date_out())
        .bind(rental.date_returned())
        .bind(rental.rental_fee().map(|fee| fee as i64))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_rental", e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(rental_id = %id), err)]
    async fn get(&self, id: RentalId) -> StoreResult<Option<Rental>> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_id, customer_name, customer_phone, customer_is_gold,
                   movie_id, movie_title, movie_daily_rental_rate,
                   date_out, date_returned, rental_fee
            FROM rentals
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_rental", e))?;

        match row {
            Some(row) => Ok(Some(rental_from_row(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(
        skip(self),
        fields(customer_id = %customer_id, movie_id = %movie_id),
        err
    )]
    async fn find_for_pair(
        &self,
        customer_id: CustomerId,
        movie_id: MovieId,
    ) -> StoreResult<Option<Rental>> {
        // Open rentals sort first, then the most recent checkout.
        let row = sqlx::query(
            r#"
            SELECT id, customer_id, customer_name, customer_phone, customer_is_gold,
                   movie_id, movie_title, movie_daily_rental_rate,
                   date_out, date_returned, rental_fee
            FROM rentals
            WHERE customer_id = $1 AND movie_id = $2
            ORDER BY (date_returned IS NULL) DESC, date_out DESC
            LIMIT 1
            "#,
        )
        .bind(customer_id.as_uuid())
        .bind(movie_id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_rental_for_pair", e))?;

        match row {
            Some(row) => Ok(Some(rental_from_row(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> StoreResult<Vec<Rental>> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, customer_name, customer_phone, customer_is_gold,
                   movie_id, movie_title, movie_daily_rental_rate,
                   date_out, date_returned, rental_fee
            FROM rentals
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_rentals", e))?;

        let mut rentals = Vec::with_capacity(rows.len());
        for row in rows {
            rentals.push(rental_from_row(&row)?);
        }
        Ok(rentals)
    }

    #[instrument(skip(self), fields(rental_id = %id), err)]
    async fn mark_returned(
        &self,
        id: RentalId,
        returned_at: DateTime<Utc>,
        fee: u64,
    ) -> StoreResult<Rental> {
        // The `date_returned IS NULL` guard makes the close a one-winner
        // write under concurrency.
        let row = sqlx::query(
            r#"
            UPDATE rentals
            SET date_returned = $2, rental_fee = $3
            WHERE id = $1 AND date_returned IS NULL
            RETURNING id, customer_id, customer_name, customer_phone, customer_is_gold,
                      movie_id, movie_title, movie_daily_rental_rate,
                      date_out, date_returned, rental_fee
            "#,
        )
        .bind(id.as_uuid())
        .bind(returned_at)
        .bind(fee as i64)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("mark_returned", e))?;

        match row {
            Some(row) => rental_from_row(&row),
            None => {
                if self.exists(id).await? {
                    Err(StoreError::conflict("rental is already closed"))
                } else {
                    Err(StoreError::NotFound)
                }
            }
        }
    }
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    // Unique violation: a duplicate insert lost the race.
                    "23505" => StoreError::Conflict(msg),
                    // Check constraint violation: the stock guard fired.
                    "23514" => StoreError::Conflict(msg),
                    _ => StoreError::Backend(msg),
                }
            } else {
                StoreError::Backend(msg)
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::backend(format!("connection pool closed in {operation}"))
        }
        _ => StoreError::backend(format!("sqlx error in {operation}: {err}")),
    }
}

// SQLx row types

#[derive(Debug)]
struct CustomerRow {
    id: uuid::Uuid,
    name: String,
    phone: String,
    is_gold: bool,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for CustomerRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(CustomerRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            is_gold: row.try_get("is_gold")?,
        })
    }
}

fn customer_from_row(row: &sqlx::postgres::PgRow) -> StoreResult<Customer> {
    let row = CustomerRow::from_row(row)
        .map_err(|e| StoreError::backend(format!("failed to decode customer row: {e}")))?;
    Ok(Customer::from_parts(
        CustomerId::from_uuid(row.id),
        row.name,
        row.phone,
        row.is_gold,
    ))
}

#[derive(Debug)]
struct MovieRow {
    id: uuid::Uuid,
    title: String,
    genre: String,
    daily_rental_rate: i64,
    number_in_stock: i64,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for MovieRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(MovieRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            genre: row.try_get("genre")?,
            daily_rental_rate: row.try_get("daily_rental_rate")?,
            number_in_stock: row.try_get("number_in_stock")?,
        })
    }
}

fn movie_from_row(row: &sqlx::postgres::PgRow) -> StoreResult<Movie> {
    let row = MovieRow::from_row(row)
        .map_err(|e| StoreError::backend(format!("failed to decode movie row: {e}")))?;
    let genre = Genre::new(row.genre)
        .map_err(|e| StoreError::backend(format!("corrupt movie row: {e}")))?;
    Ok(Movie::from_parts(
        MovieId::from_uuid(row.id),
        row.title,
        genre,
        row.daily_rental_rate as u64,
        row.number_in_stock,
    ))
}

#[derive(Debug)]
struct RentalRow {
    id: uuid::Uuid,
    customer_id: uuid::Uuid,
    customer_name: String,
    customer_phone: String,
    customer_is_gold: bool,
    movie_id: uuid::Uuid,
    movie_title: String,
    movie_daily_rental_rate: i64,
    date_out: DateTime<Utc>,
    date_returned: Option<DateTime<Utc>>,
    rental_fee: Option<i64>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for RentalRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(RentalRow {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
            customer_name: row.try_get("customer_name")?,
            customer_phone: row.try_get("customer_phone")?,
            customer_is_gold: row.try_get("customer_is_gold")?,
            movie_id: row.try_get("movie_id")?,
            movie_title: row.try_get("movie_title")?,
            movie_daily_rental_rate: row.try_get("movie_daily_rental_rate")?,
            date_out: row.try_get("date_out")?,
            date_returned: row.try_get("date_returned")?,
            rental_fee: row.try_get("rental_fee")?,
        })
    }
}

fn rental_from_row(row: &sqlx::postgres::PgRow) -> StoreResult<Rental> {
    let row = RentalRow::from_row(row)
        .map_err(|e| StoreError::backend(format!("failed to decode rental row: {e}")))?;
    Ok(Rental::from_parts(
        RentalId::from_uuid(row.id),
        CustomerSnapshot {
            id: CustomerId::from_uuid(row.customer_id),
            name: row.customer_name,
            phone: row.customer_phone,
            is_gold: row.customer_is_gold,
        },
        MovieSnapshot {
            id: MovieId::from_uuid(row.movie_id),
            title: row.movie_title,
            daily_rental_rate: row.movie_daily_rental_rate as u64,
        },
        row.date_out,
        row.date_returned,
        row.rental_fee.map(|fee| fee as u64),
    ))
}
