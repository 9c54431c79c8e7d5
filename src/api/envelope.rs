//! Success bodies: `{success, data}`, `{success, items, total}` and `{success, message}`.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct DataEnvelope<T> {
    success: bool,
    data: T,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListEnvelope<T> {
    success: bool,
    items: Vec<T>,
    total: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageEnvelope {
    success: bool,
    message: String,
}

pub(crate) fn data<T: Serialize>(data: T) -> Json<DataEnvelope<T>> {
    Json(DataEnvelope { success: true, data })
}

pub(crate) fn list<T: Serialize>(items: Vec<T>) -> Json<ListEnvelope<T>> {
    let total = items.len();
    Json(ListEnvelope { success: true, items, total })
}

pub(crate) fn message(message: impl Into<String>) -> Json<MessageEnvelope> {
    Json(MessageEnvelope { success: true, message: message.into() })
}
