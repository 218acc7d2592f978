//! Shared DTO types used across multiple endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

/// Offset pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListParams {
    /// Number of items to skip. Defaults to 0.
    #[serde(default)]
    pub skip: i64,
    /// Maximum items to return (max 100). Defaults to 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl ListParams {
    /// Clamps `skip` to non-negative and `limit` to `1..=100`.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            skip: self.skip.max(0),
            limit: self.limit.clamp(1, 100),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_contract() {
        let Ok(params) = serde_json::from_str::<ListParams>("{}") else {
            panic!("deserialization failed");
        };
        assert_eq!(params.skip, 0);
        assert_eq!(params.limit, 100);
    }

    #[test]
    fn clamped_bounds_hostile_values() {
        let params = ListParams {
            skip: -5,
            limit: 10_000,
        };
        let clamped = params.clamped();
        assert_eq!(clamped.skip, 0);
        assert_eq!(clamped.limit, 100);

        let zero = ListParams { skip: 3, limit: 0 }.clamped();
        assert_eq!(zero.limit, 1);
    }
}
