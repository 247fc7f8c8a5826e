use std::time::Duration;

use serde::Serialize;

/// One blind increase, `offset` after the hand starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduledAlert {
    pub offset: Duration,
    pub amount: u64,
}

impl ScheduledAlert {
    pub fn new(offset: Duration, amount: u64) -> Self {
        Self { offset, amount }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BlindStructureError {
    #[error("blind amount {0:?} is not a positive integer")]
    InvalidAmount(String),
    #[error("blind structure has no amounts")]
    Empty,
}

/// The blind table used for every hand, fixed at process start.
///
/// Alerts are kept in non-decreasing offset order; alerts sharing an offset keep
/// the order they were given in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlindStructure {
    alerts: Vec<ScheduledAlert>,
}

impl BlindStructure {
    pub const DEFAULT_AMOUNTS: [u64; 11] = [100, 200, 300, 400, 500, 600, 800, 1000, 2000, 4000, 8000];
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10 * 60);

    pub fn new(alerts: impl IntoIterator<Item = ScheduledAlert>) -> Self {
        let mut alerts: Vec<ScheduledAlert> = alerts.into_iter().collect();
        alerts.sort_by_key(|alert| alert.offset);
        Self { alerts }
    }

    /// `amounts[i]` fires at `i * interval`.
    pub fn uniform(interval: Duration, amounts: &[u64]) -> Self {
        let mut offset = Duration::ZERO;
        let mut alerts = Vec::with_capacity(amounts.len());
        for &amount in amounts {
            alerts.push(ScheduledAlert::new(offset, amount));
            offset += interval;
        }
        Self { alerts }
    }

    /// Parse a comma separated amount list such as `"100,200,400"`.
    pub fn parse_amounts(raw: &str) -> Result<Vec<u64>, BlindStructureError> {
        let amounts = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.parse::<u64>() {
                Ok(amount) if amount > 0 => Ok(amount),
                _ => Err(BlindStructureError::InvalidAmount(part.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if amounts.is_empty() {
            return Err(BlindStructureError::Empty);
        }
        Ok(amounts)
    }

    pub fn alerts(&self) -> &[ScheduledAlert] {
        &self.alerts
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Offset of the last alert.
    pub fn total_duration(&self) -> Duration {
        self.alerts
            .last()
            .map(|alert| alert.offset)
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for BlindStructure {
    fn default() -> Self {
        Self::uniform(Self::DEFAULT_INTERVAL, &Self::DEFAULT_AMOUNTS)
    }
}
