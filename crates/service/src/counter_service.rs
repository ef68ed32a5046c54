use models::counter::BASE_DROPS_KEY;

use crate::errors::ServiceError;
use crate::store::CounterRepository;

/// Total base drops so far; an absent row reads as zero.
pub async fn get_total(repo: &dyn CounterRepository) -> Result<i64, ServiceError> {
    Ok(repo.get(BASE_DROPS_KEY).await?.unwrap_or(0))
}

/// Record one tower start and return the new total.
pub async fn increment_and_get(repo: &dyn CounterRepository) -> Result<i64, ServiceError> {
    repo.increment(BASE_DROPS_KEY).await
}
