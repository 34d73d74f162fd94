use serde::{Deserialize, Serialize};

/// Plot kinds the reshaper knows how to step through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    Bar,
    Box,
    Histogram,
    Line,
    Scatter,
}

impl PlotKind {
    pub const ALL: [Self; 5] = [
        Self::Bar,
        Self::Box,
        Self::Histogram,
        Self::Line,
        Self::Scatter,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Box => "box",
            Self::Histogram => "histogram",
            Self::Line => "line",
            Self::Scatter => "scatter",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Axis of a trace binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// Binds one rendered trace to the output keys feeding its axes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeriesBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SeriesBinding {
    #[must_use]
    pub fn y(key: impl Into<String>) -> Self {
        Self {
            y: Some(key.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn xy(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: Some(x.into()),
            y: Some(y.into()),
            name: None,
        }
    }

    #[must_use]
    pub fn with_x(mut self, key: impl Into<String>) -> Self {
        self.x = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Output key bound to `axis`; empty keys count as unbound.
    #[must_use]
    pub fn axis_key(&self, axis: Axis) -> Option<&str> {
        let key = match axis {
            Axis::X => self.x.as_deref(),
            Axis::Y => self.y.as_deref(),
        };
        key.filter(|key| !key.is_empty())
    }

    /// Display label: explicit name, else the raw binding value of `axis`.
    #[must_use]
    pub fn label(&self, axis: Axis) -> Option<String> {
        self.name.clone().or_else(|| match axis {
            Axis::X => self.x.clone(),
            Axis::Y => self.y.clone(),
        })
    }
}

/// Host-supplied chart definition.
///
/// `plot_type` keeps the raw host string so definitions naming kinds this
/// crate does not step through still round-trip and pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlotDefinition {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub plot_type: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub data: Vec<SeriesBinding>,
}

impl PlotDefinition {
    #[must_use]
    pub fn new(kind: PlotKind, title: impl Into<String>) -> Self {
        Self {
            plot_type: Some(kind.name().to_owned()),
            title: title.into(),
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_binding(mut self, binding: SeriesBinding) -> Self {
        self.data.push(binding);
        self
    }

    #[must_use]
    pub fn kind(&self) -> Option<PlotKind> {
        self.plot_type.as_deref().and_then(PlotKind::from_name)
    }

    #[must_use]
    pub fn binding(&self, index: usize) -> Option<&SeriesBinding> {
        self.data.get(index)
    }
}
