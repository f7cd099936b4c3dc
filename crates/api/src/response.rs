//! Success envelope. Every 2xx JSON body is `{"data": ...}`; failures use
//! the `{"error", "code"}` body from [`crate::error`].

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
