//! Raw option values and the validators that normalize them.
//!
//! Options arrive as loosely typed [`Value`]s (numbers, booleans, text and
//! lists). The validators in this module check them against a primitive type,
//! a choice set, a fixed-length list or a per-axis pair, and return typed
//! values. Nothing unvalidated is ever stored on a plot entity.

use std::fmt;

use crate::error::{PlotError, Result};

/// A raw, unvalidated option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// Text value.
    Text(String),
    /// List of values.
    List(Vec<Value>),
}

impl Value {
    /// Human readable name of the value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => ValueType::Number.name(),
            Self::Bool(_) => ValueType::Bool.name(),
            Self::Text(_) => ValueType::Text.name(),
            Self::List(_) => "list",
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(values: [T; N]) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Primitive types an option can be validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Numbers.
    Number,
    /// Booleans.
    Bool,
    /// Text.
    Text,
}

impl ValueType {
    /// Human readable type name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Bool => "boolean",
            Self::Text => "text",
        }
    }

    /// Check whether a raw value has this type.
    pub fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Number, Value::Number(_))
                | (Self::Bool, Value::Bool(_))
                | (Self::Text, Value::Text(_))
        )
    }
}

/// A Rust type that can be extracted from a raw [`Value`].
pub trait Primitive: Sized + Clone + PartialEq + fmt::Display {
    /// The raw type this Rust type is read from.
    const TYPE: ValueType;

    /// Extract the typed value, or `None` on a type mismatch.
    fn from_value(value: &Value) -> Option<Self>;
}

impl Primitive for f64 {
    const TYPE: ValueType = ValueType::Number;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }
}

impl Primitive for bool {
    const TYPE: ValueType = ValueType::Bool;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl Primitive for String {
    const TYPE: ValueType = ValueType::Text;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(text) => Some(text.clone()),
            _ => None,
        }
    }
}

/// A value stored independently for the x and y axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Axes<T> {
    /// X axis component.
    pub x: T,
    /// Y axis component.
    pub y: T,
}

impl<T> Axes<T> {
    /// Create a pair from explicit components.
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Apply a function to both components.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Axes<U> {
        Axes {
            x: f(self.x),
            y: f(self.y),
        }
    }
}

impl<T: Clone> Axes<T> {
    /// Use the same value for both axes.
    pub fn splat(value: T) -> Self {
        Self {
            x: value.clone(),
            y: value,
        }
    }
}

/// Validate a single value against the primitive type `T`.
pub fn validate_single<T: Primitive>(property: &str, value: &Value) -> Result<T> {
    T::from_value(value).ok_or_else(|| wrong_type(property, T::TYPE, value))
}

/// Validate a value against `T` and require it to be one of `choices`.
pub fn validate_choice<T: Primitive>(property: &str, value: &Value, choices: &[T]) -> Result<T> {
    let typed = validate_single::<T>(property, value)?;
    if choices.contains(&typed) {
        Ok(typed)
    } else {
        Err(PlotError::InvalidChoice {
            property: property.to_owned(),
            choices: choices.iter().map(ToString::to_string).collect(),
            found: typed.to_string(),
        })
    }
}

/// Validate a list of exactly `length` elements of type `T`.
pub fn validate_array<T: Primitive>(property: &str, value: &Value, length: usize) -> Result<Vec<T>> {
    let Value::List(values) = value else {
        return Err(PlotError::NotArray {
            property: property.to_owned(),
        });
    };
    if values.len() != length {
        return Err(PlotError::WrongLength {
            property: property.to_owned(),
            expected: length,
            found: values.len(),
        });
    }
    values
        .iter()
        .map(|element| validate_single::<T>(property, element))
        .collect()
}

/// Validate a per-axis value.
///
/// A single value (bare or in a one-element list) is broadcast to both axes,
/// a two-element list maps positionally onto x and y.
pub fn validate_axes_pair<T: Primitive>(property: &str, value: &Value) -> Result<Axes<T>> {
    match value {
        Value::List(values) => match values.as_slice() {
            [both] => validate_single(property, both).map(Axes::splat),
            [x, y] => Ok(Axes::new(
                validate_single(property, x)?,
                validate_single(property, y)?,
            )),
            _ => Err(PlotError::WrongArity {
                property: property.to_owned(),
                found: values.len(),
            }),
        },
        single => validate_single(property, single).map(Axes::splat),
    }
}

/// Require a number to be strictly positive and finite.
pub fn validate_positive(property: &str, value: f64) -> Result<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(PlotError::NonPositive {
            property: property.to_owned(),
            value,
        })
    }
}

/// Resolve one recognized option: the provided value when present, otherwise
/// the static default, passed through the option's validator either way.
pub(crate) fn resolve<T>(
    property: &str,
    provided: Option<&Value>,
    default: Value,
    validate: impl FnOnce(&str, &Value) -> Result<T>,
) -> Result<T> {
    match provided {
        Some(value) => validate(property, value),
        None => validate(property, &default),
    }
}

/// Resolve an option that only applies when provided.
pub(crate) fn resolve_provided<T>(
    property: &str,
    provided: Option<&Value>,
    validate: impl FnOnce(&str, &Value) -> Result<T>,
) -> Result<Option<T>> {
    provided.map(|value| validate(property, value)).transpose()
}

pub(crate) fn ignore_unknown_option(kind: &str, key: &str) {
    log::debug!("ignoring unknown {kind} option `{key}`");
}

fn wrong_type(property: &str, expected: ValueType, value: &Value) -> PlotError {
    PlotError::WrongType {
        property: property.to_owned(),
        expected: expected.name(),
        found: value.type_name(),
    }
}
