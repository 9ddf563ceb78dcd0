//! Seed the database with sample restaurants and products.
//!
//! Intended for local development only; running it twice inserts the sample
//! rows twice.
//!
//! # Usage
//!
//! ```bash
//! delivery-cli seed
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

use delivery_api::db::{RepositoryError, Repositories, create_pool};
use delivery_api::models::{NewProduct, NewRestaurant};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Storage error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// One restaurant with its menu.
struct SeedRestaurant {
    restaurant: NewRestaurant,
    products: Vec<NewProduct>,
}

/// Insert the sample data set.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;
    let repos = Repositories::postgres(&pool);

    for seed in sample_data() {
        let restaurant = repos.restaurants.insert(seed.restaurant).await?;
        tracing::info!(id = %restaurant.id, name = %restaurant.name, "Seeded restaurant");

        for mut product in seed.products {
            product.restaurant_id = restaurant.id;
            let product = repos.products.insert(product).await?;
            tracing::info!(id = %product.id, name = %product.name, "Seeded product");
        }
    }

    tracing::info!("Seeding complete!");
    Ok(())
}

fn sample_data() -> Vec<SeedRestaurant> {
    use delivery_core::RestaurantId;

    // Placeholder ids are overwritten after the restaurant insert.
    let pending = RestaurantId::new(0);

    vec![
        SeedRestaurant {
            restaurant: NewRestaurant {
                name: "Cantina da Nona".to_owned(),
                address: "Rua Augusta, 1200 - São Paulo".to_owned(),
                category: "Italiana".to_owned(),
                phone: "11987654321".to_owned(),
                opening_hours: "Ter-Dom 18:00-23:00".to_owned(),
                delivery_fee: Decimal::new(550, 2),
                delivery_minutes: 45,
            },
            products: vec![
                NewProduct {
                    restaurant_id: pending,
                    name: "Lasanha à Bolonhesa".to_owned(),
                    description: "Camadas de massa fresca com molho bolonhesa e bechamel".to_owned(),
                    category: "Massas".to_owned(),
                    price: Decimal::new(4890, 2),
                },
                NewProduct {
                    restaurant_id: pending,
                    name: "Tiramisu".to_owned(),
                    description: "Sobremesa clássica com café, mascarpone e cacau".to_owned(),
                    category: "Sobremesas".to_owned(),
                    price: Decimal::new(2200, 2),
                },
            ],
        },
        SeedRestaurant {
            restaurant: NewRestaurant {
                name: "Burger do Zé".to_owned(),
                address: "Av. Paulista, 900 - São Paulo".to_owned(),
                category: "Hamburgueria".to_owned(),
                phone: "11912345678".to_owned(),
                opening_hours: "Todos os dias 11:00-23:00".to_owned(),
                delivery_fee: Decimal::new(800, 2),
                delivery_minutes: 30,
            },
            products: vec![
                NewProduct {
                    restaurant_id: pending,
                    name: "Cheeseburger Duplo".to_owned(),
                    description: "Dois hambúrgueres de 120g, queijo cheddar e molho da casa".to_owned(),
                    category: "Lanches".to_owned(),
                    price: Decimal::new(3450, 2),
                },
                NewProduct {
                    restaurant_id: pending,
                    name: "Batata Frita Grande".to_owned(),
                    description: "Porção grande de batatas fritas crocantes com sal e alecrim".to_owned(),
                    category: "Acompanhamentos".to_owned(),
                    price: Decimal::new(1800, 2),
                },
            ],
        },
    ]
}
