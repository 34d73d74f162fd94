use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};

/// Plotting-library layout.
///
/// The title is rendered by the host above the plot, so it is the only field
/// besides `shapes` the annotator cares about. Everything else passes through.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(
        default,
        deserialize_with = "null_as_no_shapes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub shapes: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_no_shapes<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Opaque render configuration forwarded to the plotting library.
pub type PlotConfig = Value;

/// Style of the vertical line marking the current step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepMarkerStyle {
    #[serde(default = "default_marker_color")]
    pub color: String,
    #[serde(default = "default_marker_width")]
    pub width: f64,
    #[serde(default = "default_marker_dash")]
    pub dash: String,
}

impl Default for StepMarkerStyle {
    fn default() -> Self {
        Self {
            color: default_marker_color(),
            width: default_marker_width(),
            dash: default_marker_dash(),
        }
    }
}

fn default_marker_color() -> String {
    "grey".to_owned()
}

fn default_marker_width() -> f64 {
    1.5
}

fn default_marker_dash() -> String {
    "dot".to_owned()
}

impl StepMarkerStyle {
    /// Line shape spanning the full plot height at `x = step`.
    #[must_use]
    pub fn shape_at(&self, step: usize) -> Value {
        json!({
            "type": "line",
            "yref": "paper",
            "y0": 0,
            "y1": 1,
            "x0": step,
            "x1": step,
            "line": {
                "color": self.color,
                "width": self.width,
                "dash": self.dash,
            },
        })
    }
}

/// Derives the layout to display for `current_step`.
///
/// The result never shares structure with `base`: the title is dropped and a
/// step marker is appended to the existing shapes unless the step is zero or
/// hidden. Existing shapes are never removed.
#[must_use]
pub fn annotate_layout(
    base: &PlotLayout,
    current_step: usize,
    hide_step: bool,
    marker: &StepMarkerStyle,
) -> PlotLayout {
    let mut layout = base.clone();
    layout.title = None;
    if current_step != 0 && !hide_step {
        layout.shapes.push(marker.shape_at(current_step));
    }
    layout
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{PlotLayout, StepMarkerStyle, annotate_layout};

    fn base_layout() -> PlotLayout {
        serde_json::from_value(json!({
            "title": {"text": "Loss"},
            "shapes": [{"type": "rect", "x0": 0, "x1": 1}],
            "xaxis": {"title": "step"}
        }))
        .expect("layout json")
    }

    #[test]
    fn annotate_drops_title_and_appends_marker() {
        let base = base_layout();
        let layout = annotate_layout(&base, 4, false, &StepMarkerStyle::default());

        assert_eq!(layout.title, None);
        assert_eq!(layout.shapes.len(), 2);
        assert_eq!(layout.shapes[0], base.shapes[0]);
        assert_eq!(layout.shapes[1]["x0"], json!(4));
        assert_eq!(layout.shapes[1]["x1"], json!(4));
        assert_eq!(layout.shapes[1]["yref"], json!("paper"));
        assert_eq!(layout.shapes[1]["line"]["dash"], json!("dot"));
        assert_eq!(layout.extra.get("xaxis"), base.extra.get("xaxis"));
        assert!(base.title.is_some());
    }

    #[test]
    fn null_shapes_read_as_no_shapes() {
        let base: PlotLayout =
            serde_json::from_value(json!({"shapes": null, "xaxis": {"title": "step"}}))
                .expect("layout with null shapes");
        assert!(base.shapes.is_empty());
        assert_eq!(base.extra.len(), 1);

        let layout = annotate_layout(&base, 2, false, &StepMarkerStyle::default());
        assert_eq!(layout.shapes.len(), 1);
        assert_eq!(layout.shapes[0]["x0"], json!(2));
    }

    #[test]
    fn zero_or_hidden_step_leaves_shapes_alone() {
        let base = base_layout();
        let marker = StepMarkerStyle::default();
        assert_eq!(annotate_layout(&base, 0, false, &marker).shapes, base.shapes);
        assert_eq!(annotate_layout(&base, 7, true, &marker).shapes, base.shapes);
    }
}
