//! Decode flat bracket-notation keys such as `products[0][attributes][1][code]`
//! into nested values.
//!
//! ```
//! use serde_json::json;
//!
//! let value = nested_form::decode_to_json(json!({
//!     "item[attribute][0][t]": "size",
//!     "item[attribute][3][t]": "color",
//! }))
//! .unwrap();
//! assert_eq!(
//!     value,
//!     json!({"item": {"attribute": [{"t": "size"}, null, null, {"t": "color"}]}})
//! );
//! ```

pub mod constants;
pub mod decode;
pub mod error;
pub mod form;
pub mod key;
pub mod options;
pub mod value;

use serde::de::DeserializeOwned;

pub use crate::decode::NestedForm;
pub use crate::error::{Error, ErrorKind};
pub use crate::form::{FormData, Payload};
pub use crate::options::DecodeOptions;
pub use crate::value::{FileRef, Map, Value};

pub type Result<T> = std::result::Result<T, Error>;

/// Decodes a nested payload, failing with `NotMapping` / `NotNested` when
/// there is nothing to decode.
pub fn decode(payload: impl Into<Payload>) -> Result<Value> {
    decode_with_options(payload, &DecodeOptions::default())
}

pub fn decode_with_options(payload: impl Into<Payload>, options: &DecodeOptions) -> Result<Value> {
    let mut form = NestedForm::with_options(payload, *options);
    form.is_nested(true)?;
    form.into_data()
}

pub fn decode_to_json(payload: impl Into<Payload>) -> Result<serde_json::Value> {
    decode_to_json_with_options(payload, &DecodeOptions::default())
}

pub fn decode_to_json_with_options(
    payload: impl Into<Payload>,
    options: &DecodeOptions,
) -> Result<serde_json::Value> {
    decode_with_options(payload, options).map(serde_json::Value::from)
}

/// Decodes a nested payload straight into a deserializable type.
pub fn from_form<T: DeserializeOwned>(payload: impl Into<Payload>) -> Result<T> {
    from_form_with_options(payload, &DecodeOptions::default())
}

pub fn from_form_with_options<T: DeserializeOwned>(
    payload: impl Into<Payload>,
    options: &DecodeOptions,
) -> Result<T> {
    let value = decode_to_json_with_options(payload, options)?;
    serde_json::from_value(value)
        .map_err(|err| Error::deserialize(format!("deserialize failed: {err}")))
}

/// Whether the payload is a mapping with at least one nested key.
pub fn is_nested(payload: impl Into<Payload>) -> bool {
    match payload.into().resolve() {
        Payload::Flat(form) => form.has_nested_keys(),
        _ => false,
    }
}

/// Request-parser contract: the decoded value for nested payloads, the
/// payload unchanged otherwise. Only structural failures are errors.
pub fn resolve(payload: impl Into<Payload>) -> Result<Value> {
    resolve_with_options(payload, &DecodeOptions::default())
}

pub fn resolve_with_options(payload: impl Into<Payload>, options: &DecodeOptions) -> Result<Value> {
    NestedForm::with_options(payload, *options).into_resolved()
}
