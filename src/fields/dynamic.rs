//! Type-erased fields.
//!
//! [`DynField`] wraps any field whose value type converts to and from
//! [`Value`], so fields of different Rust types can live side by side in a
//! struct or enum, or be assembled at runtime from a schema description.

use crate::core::{Reader, Writer};
use crate::error::Result;
use crate::fields::Field;
use crate::value::{Value, ValueType};
use std::fmt;
use std::sync::Arc;

/// A shared, immutable field over [`Value`].
#[derive(Clone)]
pub struct DynField {
    inner: Arc<dyn Field<Value = Value>>,
    label: &'static str,
}

impl DynField {
    /// Erase a typed field, converting values at the boundary.
    pub fn new<F>(field: F) -> Self
    where
        F: Field + 'static,
        F::Value: ValueType,
    {
        Self {
            inner: Arc::new(Erased(field)),
            label: std::any::type_name::<F>(),
        }
    }

    /// Wrap a field that already works on [`Value`], skipping conversion.
    pub fn from_value_field<F>(field: F) -> Self
    where
        F: Field<Value = Value> + 'static,
    {
        Self {
            inner: Arc::new(field),
            label: std::any::type_name::<F>(),
        }
    }
}

impl Field for DynField {
    type Value = Value;

    fn encode(&self, writer: &mut Writer, value: &Value) -> Result<()> {
        self.inner.encode(writer, value)
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<Value> {
        self.inner.decode(reader)
    }
}

impl fmt::Debug for DynField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DynField").field(&self.label).finish()
    }
}

struct Erased<F>(F);

impl<F> Field for Erased<F>
where
    F: Field,
    F::Value: ValueType,
{
    type Value = Value;

    fn encode(&self, writer: &mut Writer, value: &Value) -> Result<()> {
        let typed = F::Value::from_value(value)?;
        self.0.encode(writer, &typed)
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<Value> {
        self.0.decode(reader).map(ValueType::into_value)
    }
}
