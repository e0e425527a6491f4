use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Envelope for every response body, success or failure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    /// Indonesian, shown to the reporter as-is
    pub message: Option<String>,
    pub meta: Option<Meta>,
    /// One entry per rejected field
    pub errors: Option<Vec<String>>,
}

/// Listing metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    /// Number of items in `data`
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// A full listing; `meta.total` is the item count
    pub fn listed(items: Vec<T>) -> Self {
        let total = items.len() as i64;
        Self::success(Some(items), None, Some(Meta { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listed_counts_items() {
        let response = ApiResponse::listed(vec!["Jl. Kenari", "Jl. Melati"]);
        let body = serde_json::to_value(&response).unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["data"], json!(["Jl. Kenari", "Jl. Melati"]));
    }

    #[test]
    fn test_error_shape() {
        let response = ApiResponse::<()>::error(
            Some("Data tidak valid".to_string()),
            Some(vec!["address: Alamat wajib diisi".to_string()]),
        );
        let body = serde_json::to_value(&response).unwrap();

        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert_eq!(body["errors"][0], "address: Alamat wajib diisi");
    }
}
