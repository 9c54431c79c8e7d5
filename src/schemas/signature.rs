use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Signature;

#[derive(Debug, Deserialize)]
pub(crate) struct SignatureCreate {
    #[serde(default)]
    pub(crate) result_id: Option<i64>,
    #[serde(default)]
    pub(crate) signature_data: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignatureResponse {
    pub(crate) id: i64,
    pub(crate) result_id: i64,
    pub(crate) evaluator_id: i64,
    pub(crate) evaluator_name: Option<String>,
    pub(crate) signature_data: String,
    pub(crate) signature_hash: String,
    pub(crate) signed_at: String,
}

impl SignatureResponse {
    pub(crate) fn from_db(signature: Signature) -> Self {
        Self {
            id: signature.id,
            result_id: signature.result_id,
            evaluator_id: signature.evaluator_id,
            evaluator_name: signature.evaluator_name,
            signature_data: signature.signature_data,
            signature_hash: signature.signature_hash,
            signed_at: format_primitive(signature.signed_at),
        }
    }
}
