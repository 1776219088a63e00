//! Read-only queries over the reference tables.

use sqlx::PgPool;

use crate::models::reference::{Airport, City, Country, Currency, Preference};

pub struct ReferenceRepo;

impl ReferenceRepo {
    pub async fn list_airports(pool: &PgPool) -> Result<Vec<Airport>, sqlx::Error> {
        sqlx::query_as::<_, Airport>("SELECT code, name, city FROM airports ORDER BY name")
            .fetch_all(pool)
            .await
    }

    pub async fn find_airport(pool: &PgPool, code: &str) -> Result<Option<Airport>, sqlx::Error> {
        sqlx::query_as::<_, Airport>("SELECT code, name, city FROM airports WHERE code = $1")
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_countries(pool: &PgPool) -> Result<Vec<Country>, sqlx::Error> {
        sqlx::query_as::<_, Country>("SELECT code, name, region FROM countries ORDER BY name")
            .fetch_all(pool)
            .await
    }

    pub async fn find_country(pool: &PgPool, code: &str) -> Result<Option<Country>, sqlx::Error> {
        sqlx::query_as::<_, Country>("SELECT code, name, region FROM countries WHERE code = $1")
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_currencies(pool: &PgPool) -> Result<Vec<Currency>, sqlx::Error> {
        sqlx::query_as::<_, Currency>("SELECT code, name, symbol FROM currencies ORDER BY code")
            .fetch_all(pool)
            .await
    }

    pub async fn list_preferences(pool: &PgPool) -> Result<Vec<Preference>, sqlx::Error> {
        sqlx::query_as::<_, Preference>(
            "SELECT code, name, description FROM preferences ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    /// All cities in one country, by name.
    pub async fn list_cities(pool: &PgPool, country_code: &str) -> Result<Vec<City>, sqlx::Error> {
        sqlx::query_as::<_, City>(
            "SELECT code, country_code, name FROM cities
             WHERE country_code = $1
             ORDER BY name",
        )
        .bind(country_code)
        .fetch_all(pool)
        .await
    }

    /// Cities in `country_code` whose code is in `codes`. Unknown codes are
    /// simply absent from the result; order is unspecified.
    pub async fn find_cities(
        pool: &PgPool,
        country_code: &str,
        codes: &[String],
    ) -> Result<Vec<City>, sqlx::Error> {
        sqlx::query_as::<_, City>(
            "SELECT code, country_code, name FROM cities
             WHERE country_code = $1 AND code = ANY($2)",
        )
        .bind(country_code)
        .bind(codes)
        .fetch_all(pool)
        .await
    }
}
