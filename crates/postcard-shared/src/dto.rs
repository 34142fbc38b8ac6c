//! Data Transfer Objects - response types for the API.

use serde::{Deserialize, Serialize};

/// Running total of accepted postcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionTotals {
    pub total_submissions: u64,
}

/// Visit count of the postcard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitTotals {
    pub visits: u64,
}

/// Server liveness report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_wire_name() {
        let json = serde_json::to_value(SubmissionTotals {
            total_submissions: 1,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "totalSubmissions": 1 }));
    }
}
