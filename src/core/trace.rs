use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Axis;

/// Values carried by one trace axis.
///
/// Hosts send series; reshaping may collapse an axis to the single sample of
/// the current step, which is a bare scalar on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValues {
    Series(Vec<Value>),
    Scalar(Value),
}

impl AxisValues {
    #[must_use]
    pub fn series<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Series(values.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn as_series(&self) -> Option<&[Value]> {
        match self {
            Self::Series(values) => Some(values),
            Self::Scalar(_) => None,
        }
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Series(_) => None,
            Self::Scalar(value) => Some(value),
        }
    }
}

/// One renderable series as handed to the plotting library.
///
/// Only the fields the reshaper touches are typed; every other display field
/// (`marker`, `line`, `boxpoints`, ...) rides along in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<AxisValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<AxisValues>,
    /// Opaque on input; hosts are free to send numbers here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub trace_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Trace {
    #[must_use]
    pub fn with_y(mut self, values: AxisValues) -> Self {
        self.y = Some(values);
        self
    }

    #[must_use]
    pub fn with_x(mut self, values: AxisValues) -> Self {
        self.x = Some(values);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(Value::String(name.into()));
        self
    }

    #[must_use]
    pub fn name_str(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }

    #[must_use]
    pub fn axis(&self, axis: Axis) -> Option<&AxisValues> {
        match axis {
            Axis::X => self.x.as_ref(),
            Axis::Y => self.y.as_ref(),
        }
    }

    pub fn set_axis(&mut self, axis: Axis, values: Option<AxisValues>) {
        match axis {
            Axis::X => self.x = values,
            Axis::Y => self.y = values,
        }
    }

    /// Series backing `axis`, if the host sent one.
    #[must_use]
    pub fn series(&self, axis: Axis) -> Option<&[Value]> {
        self.axis(axis).and_then(AxisValues::as_series)
    }
}

/// Per-trace data exactly as the host supplied it.
pub type RawSeriesData = Vec<Trace>;

/// Per-trace data sliced for the current step.
pub type PreparedData = Vec<Trace>;
