use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseSettings;
use crate::models::{FurnishingState, Lead, LeadPriority, Property};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

const LEAD_SELECT: &str = r#"
    SELECT l.lead_id, l.first_name, l.last_name, l.email, l.phone,
           l.budget_min::float8 AS budget_min, l.budget_max::float8 AS budget_max,
           l.bedrooms, l.bathrooms, l.furnished,
           l."preferredCity" AS preferred_city, l."preferredLocation" AS preferred_location,
           l.preferred_type_id_fk, l.priority::text AS priority, l."isArchived" AS is_archived,
           COALESCE(array_agg(la.amenity_id) FILTER (WHERE la.amenity_id IS NOT NULL), '{}') AS amenity_ids
    FROM leads l
    LEFT JOIN lead_amenities la ON la.lead_id = l.lead_id
"#;

const PROPERTY_SELECT: &str = r#"
    SELECT p.property_id, p.title, p.address, p.city, p.state, p.zip_code,
           p.property_type_id, p.price::float8 AS price, p.bedrooms, p.bathrooms,
           p.square_feet, p.furnishing::text AS furnishing, p."isArchived" AS is_archived,
           COALESCE(array_agg(pa.amenity_id) FILTER (WHERE pa.amenity_id IS NOT NULL), '{}') AS amenity_ids
    FROM properties p
    LEFT JOIN property_amenities pa ON pa.property_id = p.property_id
"#;

/// Read-only access to the CRM's leads, properties and their amenity links
///
/// Every record comes back with its amenity ids already aggregated, so the
/// engine never has to join lazily.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Load one lead with its desired amenity ids
    pub async fn get_lead(&self, lead_id: i32) -> Result<Lead, PostgresError> {
        let query = format!("{LEAD_SELECT} WHERE l.lead_id = $1 GROUP BY l.lead_id");

        let row = sqlx::query(&query)
            .bind(lead_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("lead {}", lead_id)))?;

        Ok(lead_from_row(&row)?)
    }

    /// Load one property with its amenity ids
    pub async fn get_property(&self, property_id: i32) -> Result<Property, PostgresError> {
        let query = format!("{PROPERTY_SELECT} WHERE p.property_id = $1 GROUP BY p.property_id");

        let row = sqlx::query(&query)
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("property {}", property_id)))?;

        Ok(property_from_row(&row)?)
    }

    /// Non-archived properties to rank for a lead, at most `limit`
    ///
    /// No budget predicate: budget is a scored dimension.
    pub async fn candidate_properties(&self, limit: u32) -> Result<Vec<Property>, PostgresError> {
        let query = format!(
            r#"{PROPERTY_SELECT}
            WHERE NOT COALESCE(p."isArchived", false)
            GROUP BY p.property_id
            ORDER BY p.property_id
            LIMIT $1"#
        );

        let rows = sqlx::query(&query)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        let properties = rows
            .iter()
            .map(property_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} candidate properties", properties.len());

        Ok(properties)
    }

    /// Non-archived leads to rank for a property, at most `limit`
    pub async fn candidate_leads(&self, limit: u32) -> Result<Vec<Lead>, PostgresError> {
        let query = format!(
            r#"{LEAD_SELECT}
            WHERE NOT COALESCE(l."isArchived", false)
            GROUP BY l.lead_id
            ORDER BY l.lead_id
            LIMIT $1"#
        );

        let rows = sqlx::query(&query)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        let leads = rows
            .iter()
            .map(lead_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} candidate leads", leads.len());

        Ok(leads)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn lead_from_row(row: &PgRow) -> Result<Lead, sqlx::Error> {
    let priority: Option<String> = row.try_get("priority")?;

    Ok(Lead {
        lead_id: Some(row.try_get("lead_id")?),
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        budget_min: row.try_get("budget_min")?,
        budget_max: row.try_get("budget_max")?,
        bedrooms: row.try_get("bedrooms")?,
        bathrooms: row.try_get("bathrooms")?,
        furnished: row.try_get::<Option<bool>, _>("furnished")?.unwrap_or(false),
        preferred_city: row.try_get("preferred_city")?,
        preferred_location: row.try_get("preferred_location")?,
        preferred_type_id: row.try_get("preferred_type_id_fk")?,
        priority: priority
            .and_then(|p| p.parse::<LeadPriority>().ok())
            .unwrap_or_default(),
        is_archived: row.try_get::<Option<bool>, _>("is_archived")?.unwrap_or(false),
        amenity_ids: row.try_get("amenity_ids")?,
    })
}

fn property_from_row(row: &PgRow) -> Result<Property, sqlx::Error> {
    let property_id: i32 = row.try_get("property_id")?;
    let furnishing: Option<String> = row.try_get("furnishing")?;

    Ok(Property {
        property_id: Some(property_id),
        title: row.try_get("title")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        zip_code: row.try_get("zip_code")?,
        property_type_id: row.try_get("property_type_id")?,
        price: row.try_get("price")?,
        bedrooms: row.try_get("bedrooms")?,
        bathrooms: row.try_get("bathrooms")?,
        square_feet: row.try_get("square_feet")?,
        furnishing: furnishing.and_then(|f| match f.parse::<FurnishingState>() {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!("Property {}: {}, treating furnishing as unknown", property_id, e);
                None
            }
        }),
        is_archived: row.try_get::<Option<bool>, _>("is_archived")?.unwrap_or(false),
        amenity_ids: row.try_get("amenity_ids")?,
    })
}
