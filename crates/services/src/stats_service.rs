use std::sync::Arc;

use backend::{OverallStats, StatsRepository};

use crate::error::StatsServiceError;

/// Facade over the aggregate statistics endpoint for the admin panel.
#[derive(Clone)]
pub struct StatsService {
    stats: Arc<dyn StatsRepository>,
}

impl StatsService {
    #[must_use]
    pub fn new(stats: Arc<dyn StatsRepository>) -> Self {
        Self { stats }
    }

    /// Totals and average progress across all students.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Backend` if the backend call fails.
    pub async fn overall(&self) -> Result<OverallStats, StatsServiceError> {
        let stats = self.stats.overall_stats().await?;
        Ok(stats)
    }
}
