//! Application service wiring: stores and the workflow processors.

use std::sync::Arc;

use reelhouse_catalog::MovieStore;
use reelhouse_customers::CustomerStore;
use reelhouse_infra::{
    InMemoryCustomerStore, InMemoryMovieStore, InMemoryRentalStore, PostgresStores,
};
use reelhouse_rentals::{CheckoutProcessor, RentalStore, ReturnProcessor};

/// Shared service container handed to every handler through an `Extension`.
///
/// Stores are held as trait objects so the same router runs over in-memory
/// and Postgres backends.
pub struct AppServices {
    pub customers: Arc<dyn CustomerStore>,
    pub movies: Arc<dyn MovieStore>,
    pub rentals: Arc<dyn RentalStore>,
    pub returns: ReturnProcessor,
    pub checkout: CheckoutProcessor,
}

impl AppServices {
    /// Wire the processors over any set of store implementations.
    pub fn new(
        customers: Arc<dyn CustomerStore>,
        movies: Arc<dyn MovieStore>,
        rentals: Arc<dyn RentalStore>,
    ) -> Self {
        let returns = ReturnProcessor::new(rentals.clone(), movies.clone());
        let checkout = CheckoutProcessor::new(rentals.clone(), movies.clone(), customers.clone());

        Self {
            customers,
            movies,
            rentals,
            returns,
            checkout,
        }
    }
}

/// Build services from the environment.
///
/// `USE_PERSISTENT_STORES=true` selects Postgres (`DATABASE_URL` must then be
/// set); anything else selects the in-memory stores.
pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        return build_persistent_services().await;
    }

    build_in_memory_services()
}

fn build_in_memory_services() -> AppServices {
    // Volatile wiring (dev/test): state lives and dies with the process.
    tracing::info!("using in-memory stores");

    AppServices::new(
        Arc::new(InMemoryCustomerStore::new()),
        Arc::new(InMemoryMovieStore::new()),
        Arc::new(InMemoryRentalStore::new()),
    )
}

async fn build_persistent_services() -> AppServices {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");

    let stores = PostgresStores::connect(&database_url)
        .await
        .expect("Failed to connect to Postgres");

    tracing::info!("using postgres-backed stores");

    AppServices::new(
        Arc::new(stores.customers()),
        Arc::new(stores.movies()),
        Arc::new(stores.rentals()),
    )
}
