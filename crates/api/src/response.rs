//! The `{ "data": ... }` envelope every successful response uses.

use serde::Serialize;

/// A missing or foreign record serializes as `data: null`, a filtered-out
/// list as `data: []`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
