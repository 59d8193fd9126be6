use crate::error::StoreError;
use crate::sources::{EnvironmentalStore, TrackSource, VesselProfileSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{EnvKey, FlowRecord, TrackPoint, VesselProfile, WaveRecord, WindRecord};
use dotenvy::dotenv;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, QueryBuilder, Row};
use std::env;
use std::time::Duration;
use track::{postime_to_utc, utc_to_postime};
use tracing::debug;

const WAVE_TABLE: &str = "wave_history";
const WIND_TABLE: &str = "wind_history";
const FLOW_TABLE: &str = "flow_history";
const TRACK_TABLE: &str = "ship_track";
const VESSEL_TABLE: &str = "vessel_profiles";

/// Establishes a connection pool to the store's database.
///
/// Reads `DATABASE_URL` from the environment (a `.env` file is honored if
/// present) and returns a shared pool. The pool is owned by the caller and
/// passed into the adapters below; the pipeline core never holds it across
/// runs.
pub async fn connect() -> Result<PgPool, StoreError> {
    // A missing .env file is fine; the variable may come from the process
    // environment.
    let _ = dotenv();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| StoreError::ConnectionConfig("DATABASE_URL must be set.".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await?;

    Ok(pool)
}

fn row_key(row: &PgRow) -> Result<EnvKey, sqlx::Error> {
    Ok(EnvKey {
        lat_index: row.try_get("lat_index")?,
        lon_index: row.try_get("lon_index")?,
        time: row.try_get("history_date")?,
    })
}

/// Appends the `(lat_index, lon_index, history_date) IN (...)` predicate
/// for a key batch.
fn push_key_predicate<'a>(builder: &mut QueryBuilder<'a, Postgres>, keys: &'a [EnvKey]) {
    builder.push_tuples(keys, |mut tuple, key| {
        tuple
            .push_bind(key.lat_index)
            .push_bind(key.lon_index)
            .push_bind(key.time);
    });
}

/// The database-backed environmental store: one equality-set query per
/// call, over the key batch the join engine hands in.
#[derive(Debug, Clone)]
pub struct SqlEnvironmentalStore {
    pool: PgPool,
}

impl SqlEnvironmentalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_rows(&self, select: &str, keys: &[EnvKey]) -> Result<Vec<PgRow>, StoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<Postgres>::new(select);
        push_key_predicate(&mut builder, keys);
        let rows = builder.build().fetch_all(&self.pool).await?;
        debug!(keys = keys.len(), rows = rows.len(), "environmental batch fetched");
        Ok(rows)
    }
}

#[async_trait]
impl EnvironmentalStore for SqlEnvironmentalStore {
    async fn fetch_wave(&self, keys: &[EnvKey]) -> Result<Vec<(EnvKey, WaveRecord)>, StoreError> {
        let select = format!(
            "SELECT lat_index, lon_index, history_date, wave_height, wave_direction, \
             wave_period, swell_wave_height, swell_wave_direction, swell_wave_period, \
             wind_wave_height, wind_wave_direction, wind_wave_period \
             FROM {WAVE_TABLE} WHERE (lat_index, lon_index, history_date)"
        );
        self.fetch_rows(&select, keys)
            .await?
            .iter()
            .map(|row| {
                let record = WaveRecord {
                    wave_height: row.try_get("wave_height")?,
                    wave_direction: row.try_get("wave_direction")?,
                    wave_period: row.try_get("wave_period")?,
                    swell_wave_height: row.try_get("swell_wave_height")?,
                    swell_wave_direction: row.try_get("swell_wave_direction")?,
                    swell_wave_period: row.try_get("swell_wave_period")?,
                    wind_wave_height: row.try_get("wind_wave_height")?,
                    wind_wave_direction: row.try_get("wind_wave_direction")?,
                    wind_wave_period: row.try_get("wind_wave_period")?,
                };
                Ok((row_key(row)?, record))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(StoreError::from)
    }

    async fn fetch_wind(&self, keys: &[EnvKey]) -> Result<Vec<(EnvKey, WindRecord)>, StoreError> {
        let select = format!(
            "SELECT lat_index, lon_index, history_date, pressure, temperature, u_wind, v_wind \
             FROM {WIND_TABLE} WHERE (lat_index, lon_index, history_date)"
        );
        self.fetch_rows(&select, keys)
            .await?
            .iter()
            .map(|row| {
                let record = WindRecord {
                    pressure: row.try_get("pressure")?,
                    temperature: row.try_get("temperature")?,
                    u_wind: row.try_get("u_wind")?,
                    v_wind: row.try_get("v_wind")?,
                };
                Ok((row_key(row)?, record))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(StoreError::from)
    }

    async fn fetch_flow(&self, keys: &[EnvKey]) -> Result<Vec<(EnvKey, FlowRecord)>, StoreError> {
        let select = format!(
            "SELECT lat_index, lon_index, history_date, u_flow, v_flow \
             FROM {FLOW_TABLE} WHERE (lat_index, lon_index, history_date)"
        );
        self.fetch_rows(&select, keys)
            .await?
            .iter()
            .map(|row| {
                let record = FlowRecord {
                    u_flow: row.try_get("u_flow")?,
                    v_flow: row.try_get("v_flow")?,
                };
                Ok((row_key(row)?, record))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(StoreError::from)
    }
}

/// The database-backed track source.
///
/// The `postime` column is a naive timestamp in the source's UTC+8 wire
/// convention, so both the window bounds and the decoded rows cross
/// [`utc_to_postime`]/[`postime_to_utc`] at this seam.
#[derive(Debug, Clone)]
pub struct SqlTrackSource {
    pool: PgPool,
}

impl SqlTrackSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackSource for SqlTrackSource {
    async fn fetch_track(
        &self,
        mmsi: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TrackPoint>, StoreError> {
        let query = format!(
            "SELECT lon, lat, sog, cog, hdg, draught, postime \
             FROM {TRACK_TABLE} \
             WHERE mmsi = $1 AND postime >= $2 AND postime <= $3 \
             ORDER BY postime ASC"
        );
        let rows = sqlx::query(&query)
            .bind(mmsi)
            .bind(utc_to_postime(start))
            .bind(utc_to_postime(end))
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(TrackPoint {
                    lon: row.try_get("lon")?,
                    lat: row.try_get("lat")?,
                    sog: row.try_get("sog")?,
                    cog: row.try_get("cog")?,
                    hdg: row.try_get("hdg")?,
                    draught: row.try_get("draught")?,
                    postime: postime_to_utc(row.try_get("postime")?),
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(StoreError::from)
    }
}

/// The database-backed vessel profile source.
#[derive(Debug, Clone)]
pub struct SqlVesselProfileSource {
    pool: PgPool,
}

impl SqlVesselProfileSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VesselProfileSource for SqlVesselProfileSource {
    async fn fetch_vessel_profile(&self, mmsi: &str) -> Result<VesselProfile, StoreError> {
        let query =
            format!("SELECT design_draft, design_speed FROM {VESSEL_TABLE} WHERE mmsi = $1");
        let row = sqlx::query(&query)
            .bind(mmsi)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::VesselNotFound(mmsi.to_string()))?;

        Ok(VesselProfile {
            design_draft: row.try_get("design_draft")?,
            design_speed: row.try_get("design_speed")?,
        })
    }
}
