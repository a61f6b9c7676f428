//! Operation output: builder context merged with the confirmation response

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use crate::host::ConfirmationResponse;

/// Terminal result of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutput<C> {
    pub response: ConfirmationResponse,
    pub context: C,
}

impl<C> OperationOutput<C> {
    pub fn new(response: ConfirmationResponse, context: C) -> Self {
        Self { response, context }
    }

    /// Signature of the confirmed transaction
    pub fn signature(&self) -> String {
        self.response.signature.to_string()
    }
}

impl<C: Serialize> OperationOutput<C> {
    /// Flattened JSON view used by the binary and structured logs
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(&self.context)?;
        let response = serde_json::json!({
            "signature": self.response.signature.to_string(),
            "slot": self.response.slot,
            "confirmationStatus": self
                .response
                .confirmation_status
                .as_ref()
                .map(|s| format!("{:?}", s)),
        });
        match value.as_object_mut() {
            Some(map) => {
                map.insert("response".to_string(), response);
                Ok(value)
            }
            None => Ok(serde_json::json!({ "response": response })),
        }
    }
}

/// Serialize a pubkey as its base58 string
pub(crate) fn serialize_pubkey<S: serde::Serializer>(
    key: &Pubkey,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(key)
}
