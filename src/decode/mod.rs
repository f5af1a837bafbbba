pub mod group;
pub mod merge;
pub mod special;
pub mod tree;

use crate::form::{FormData, Payload};
use crate::value::Value;
use crate::{DecodeOptions, Error, Result};

pub use group::{partition, Group, Signature};
pub use special::{clean_value, clean_value_or, replace_specials};

/// Decodes a flat form into its nested value.
///
/// Fails with `EmptyContainer` when the form has no entries and with
/// `SparseOverflow` when a key pads an array by more than 1000 slots.
pub fn decode_form(form: &FormData, options: &DecodeOptions) -> Result<Value> {
    let groups = partition(form);
    tracing::debug!(
        entries = form.len(),
        groups = groups.len(),
        "decoding nested form"
    );
    merge::assemble(&groups, options)
}

/// Validity check followed by decoding, mirroring how a request parser uses
/// the decoder: check once, then read `data`.
///
/// # Examples
/// ```
/// use nested_form::{NestedForm, Payload};
/// use serde_json::json;
///
/// let mut form = NestedForm::new(Payload::from(json!({"a[0][x]": "1"})));
/// assert!(form.is_nested(false).unwrap());
/// assert_eq!(form.data().unwrap().to_json(), json!({"a": [{"x": 1}]}));
/// ```
#[derive(Debug, Clone)]
pub struct NestedForm {
    payload: Payload,
    // Flattened view of a `MultiValue` payload; `payload` stays untouched.
    collapsed: Option<FormData>,
    options: DecodeOptions,
    data: Option<Value>,
}

impl NestedForm {
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self::with_options(payload, DecodeOptions::default())
    }

    pub fn with_options(payload: impl Into<Payload>, options: DecodeOptions) -> Self {
        let payload = payload.into();
        let collapsed = match &payload {
            Payload::MultiValue(fields) => Some(FormData::from_multi(fields.iter().cloned())),
            _ => None,
        };
        Self {
            payload,
            collapsed,
            options,
            data: None,
        }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// The payload exactly as it was handed in.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The flat form the decoder reads, or `None` when the payload is not a
    /// mapping.
    pub fn form(&self) -> Option<&FormData> {
        match &self.payload {
            Payload::Flat(form) => Some(form),
            Payload::MultiValue(_) => self.collapsed.as_ref(),
            Payload::Other(_) => None,
        }
    }

    /// Returns whether the payload is a mapping with at least one nested key,
    /// decoding it on success. With `raise_exception` the two negative
    /// outcomes become `NotMapping` / `NotNested` errors. Decoding failures are
    /// always returned as errors.
    pub fn is_nested(&mut self, raise_exception: bool) -> Result<bool> {
        let Some(form) = self.form() else {
            return reject(Error::not_mapping(), raise_exception);
        };
        if !form.has_nested_keys() {
            return reject(Error::not_nested(), raise_exception);
        }
        if self.data.is_none() {
            let data = decode_form(form, &self.options)?;
            self.data = Some(data);
        }
        Ok(true)
    }

    pub fn data(&self) -> Result<&Value> {
        self.data.as_ref().ok_or_else(Error::not_validated)
    }

    pub fn into_data(self) -> Result<Value> {
        self.data.ok_or_else(Error::not_validated)
    }

    /// The decoded value when the payload is nested, otherwise the payload
    /// exactly as it was handed in (multi-valued keys keep their lists).
    pub fn into_resolved(mut self) -> Result<Value> {
        if self.is_nested(false)? {
            return self.into_data();
        }
        Ok(self.payload.into_value())
    }
}

fn reject(error: Error, raise_exception: bool) -> Result<bool> {
    if raise_exception {
        return Err(error);
    }
    tracing::debug!(reason = %error, "payload left undecoded");
    Ok(false)
}
