use async_trait::async_trait;

use crate::errors::Result;
use crate::models::GeoRecord;

/// One storage tier in the cache chain.
///
/// Implementations must be cheap to probe and safe to call from many tasks
/// at once. `get` separates the two non-fatal outcomes callers care about:
/// `Ok(None)` means the key is absent (a plain miss), `Err` means the
/// backing store is unreachable or returned a corrupt payload. The chain
/// treats both as fallthrough but logs them at different levels so a cold
/// cache can be told apart from a broken one.
#[async_trait]
pub trait GeoRepository: Send + Sync {
    /// Look up the record stored for `ip`.
    async fn get(&self, ip: &str) -> Result<Option<GeoRecord>>;

    /// Store `record` under its address, overwriting any previous record.
    /// Idempotent: saving the same record twice yields the same stored state.
    async fn save(&self, record: &GeoRecord) -> Result<()>;

    /// Liveness probe, independent of any key lookup. `Ok(())` means the
    /// tier is reachable and operational. Callers bound the probe with a
    /// deadline; implementations doing I/O must stop when the future is
    /// dropped.
    async fn status(&self) -> Result<()>;
}
