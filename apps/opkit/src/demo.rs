//! In-process demo backend.
//!
//! A small fake service covering the built-in catalog so the pipeline can
//! be exercised end to end without network access. Pagination over the
//! seeded zonal shifts uses a numeric offset as the continuation token.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{Value, json};

use opkit_core::{ClientError, ServiceClient};
use opkit_model::Payload;

/// Default page size for list responses when the caller sends no hint.
const DEFAULT_PAGE_SIZE: usize = 2;

/// Fake backend serving the built-in catalog's operations.
pub struct DemoBackend {
    shifts: Mutex<Vec<Payload>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for DemoBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoBackend").finish()
    }
}

impl Default for DemoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoBackend {
    /// Create a backend seeded with a handful of zonal shifts.
    #[must_use]
    pub fn new() -> Self {
        let shifts = vec![
            shift("zs-00000001", "lb-alpha", "use1-az1", "ACTIVE"),
            shift("zs-00000002", "lb-bravo", "use1-az2", "ACTIVE"),
            shift("zs-00000003", "lb-charlie", "use1-az1", "EXPIRED"),
            shift("zs-00000004", "lb-delta", "use1-az3", "CANCELED"),
            shift("zs-00000005", "lb-echo", "use1-az2", "ACTIVE"),
        ];
        Self {
            shifts: Mutex::new(shifts),
            next_id: AtomicU64::new(6),
        }
    }

    fn lock_shifts(&self) -> std::sync::MutexGuard<'_, Vec<Payload>> {
        self.shifts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn list_zonal_shifts(&self, request: &Payload) -> Result<Payload, ClientError> {
        let status = request.get_str("Status");
        let page_size = request
            .get("MaxResults")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = match request.get_str("NextToken") {
            None => 0,
            Some(token) => token.parse::<usize>().map_err(|_| ClientError::Service {
                code: "ValidationException".to_owned(),
                message: format!("Invalid NextToken: {token}"),
            })?,
        };

        let shifts = self.lock_shifts();
        let matching: Vec<&Payload> = shifts
            .iter()
            .filter(|s| status.is_none_or(|want| s.get_str("Status") == Some(want)))
            .collect();

        let page: Vec<Value> = matching
            .iter()
            .skip(offset)
            .take(page_size)
            .map(|s| (*s).clone().into_value())
            .collect();
        let next_offset = offset + page.len();

        let mut response = Payload::new();
        response.insert("Items", Value::Array(page));
        if next_offset < matching.len() {
            response.insert("NextToken", json!(next_offset.to_string()));
        }
        Ok(response)
    }

    fn start_zonal_shift(&self, request: &Payload) -> Result<Payload, ClientError> {
        for field in ["ResourceIdentifier", "AwayFrom", "ExpiresIn"] {
            if request.get(field).is_none() {
                return Err(ClientError::Service {
                    code: "ValidationException".to_owned(),
                    message: format!("Missing required field: {field}"),
                });
            }
        }

        let id = format!("zs-{:08}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut record = Payload::new();
        record.insert("ZonalShiftId", json!(id));
        for field in ["ResourceIdentifier", "AwayFrom", "ExpiresIn", "Comment"] {
            if let Some(value) = request.get(field) {
                record.insert(field, value.clone());
            }
        }
        record.insert("Status", json!("ACTIVE"));
        self.lock_shifts().push(record.clone());
        Ok(record)
    }

    fn cancel_zonal_shift(&self, request: &Payload) -> Result<Payload, ClientError> {
        let id = request.get_str("ZonalShiftId").unwrap_or_default();
        let mut shifts = self.lock_shifts();
        let Some(record) = shifts
            .iter_mut()
            .find(|s| s.get_str("ZonalShiftId") == Some(id))
        else {
            return Err(ClientError::Service {
                code: "ResourceNotFoundException".to_owned(),
                message: format!("Zonal shift {id} not found"),
            });
        };
        record.insert("Status", json!("CANCELED"));
        Ok(record.clone())
    }

    fn update_broker(request: &Payload) -> Result<Payload, ClientError> {
        if request.get("BrokerId").is_none() {
            return Err(ClientError::Service {
                code: "BadRequestException".to_owned(),
                message: "Missing required field: BrokerId".to_owned(),
            });
        }
        // Echo the accepted settings back, the way the real service does.
        let mut response = Payload::new();
        for (name, value) in request.iter() {
            response.insert(name.clone(), value.clone());
        }
        Ok(response)
    }

    fn get_account_information() -> Payload {
        let mut response = Payload::new();
        response.insert("AccountId", json!("000000000000"));
        response.insert("AccountName", json!("opkit-demo"));
        response.insert("AccountCreatedDate", json!("2024-01-01T00:00:00Z"));
        response
    }
}

fn shift(id: &str, resource: &str, away_from: &str, status: &str) -> Payload {
    let mut record = Payload::new();
    record.insert("ZonalShiftId", json!(id));
    record.insert("ResourceIdentifier", json!(resource));
    record.insert("AwayFrom", json!(away_from));
    record.insert("Status", json!(status));
    record
}

#[async_trait]
impl ServiceClient for DemoBackend {
    async fn call(&self, operation: &str, request: &Payload) -> Result<Payload, ClientError> {
        match operation {
            "ListZonalShifts" => self.list_zonal_shifts(request),
            "StartZonalShift" => self.start_zonal_shift(request),
            "CancelZonalShift" => self.cancel_zonal_shift(request),
            "UpdateBroker" => Self::update_broker(request),
            "GetAccountInformation" => Ok(Self::get_account_information()),
            other => Err(ClientError::Service {
                code: "UnknownOperationException".to_owned(),
                message: format!("Unknown operation: {other}"),
            }),
        }
    }
}
