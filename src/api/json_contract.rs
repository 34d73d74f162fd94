use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::{OutputsMap, PlotDefinition, PlotLayout, RawSeriesData, Trace};
use crate::error::{PlotError, PlotResult};

fn parse_json<T: DeserializeOwned>(input: &str, what: &str) -> PlotResult<T> {
    serde_json::from_str(input)
        .map_err(|e| PlotError::InvalidData(format!("failed to parse {what} json: {e}")))
}

fn to_json_pretty<T: Serialize + ?Sized>(value: &T, what: &str) -> PlotResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| PlotError::InvalidData(format!("failed to serialize {what} json: {e}")))
}

impl PlotDefinition {
    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        parse_json(input, "plot definition")
    }

    pub fn to_json_pretty(&self) -> PlotResult<String> {
        to_json_pretty(self, "plot definition")
    }

    /// Checks that every trace has exactly one binding and vice versa.
    pub fn check_lockstep(&self, data: &[Trace]) -> PlotResult<()> {
        if self.data.len() != data.len() {
            return Err(PlotError::InvalidData(format!(
                "definition binds {} traces but data holds {}",
                self.data.len(),
                data.len()
            )));
        }
        Ok(())
    }
}

impl PlotLayout {
    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        parse_json(input, "layout")
    }

    pub fn to_json_pretty(&self) -> PlotResult<String> {
        to_json_pretty(self, "layout")
    }
}

pub fn outputs_from_json_str(input: &str) -> PlotResult<OutputsMap> {
    parse_json(input, "outputs map")
}

pub fn series_from_json_str(input: &str) -> PlotResult<RawSeriesData> {
    parse_json(input, "series data")
}

pub fn series_to_json_pretty(data: &[Trace]) -> PlotResult<String> {
    to_json_pretty(data, "series data")
}

#[cfg(test)]
mod tests {
    use super::{outputs_from_json_str, series_from_json_str, series_to_json_pretty};
    use crate::core::{AggregationKind, Axis, Operation, PlotDefinition, PlotKind, PlotLayout};

    #[test]
    fn host_payloads_parse_into_typed_model() {
        let definition = PlotDefinition::from_json_str(
            r#"{"type":"line","title":"Loss","data":[{"x":"step","y":"loss","name":"train"}]}"#,
        )
        .expect("definition");
        assert_eq!(definition.kind(), Some(PlotKind::Line));

        let outputs = outputs_from_json_str(
            r#"{"loss":[{"op":"get","field":"loss"},{"op":"mean"}],"step":[{"op":"get","field":"step"}]}"#,
        )
        .expect("outputs");
        assert_eq!(
            outputs["loss"].last(),
            Some(&Operation::aggregate(AggregationKind::Mean))
        );
        assert_eq!(outputs.keys().collect::<Vec<_>>(), ["loss", "step"]);

        let data = series_from_json_str(r#"[{"x":[1,2],"y":[0.9,0.7],"name":"train"}]"#)
            .expect("series");
        assert_eq!(data[0].series(Axis::Y).map(<[_]>::len), Some(2));
        definition.check_lockstep(&data).expect("lockstep");

        let again = series_from_json_str(&series_to_json_pretty(&data).expect("encode"))
            .expect("decode");
        assert_eq!(again, data);
    }

    #[test]
    fn malformed_payloads_surface_invalid_data() {
        assert!(PlotDefinition::from_json_str(r#"{"data":"nope"}"#).is_err());
        assert!(outputs_from_json_str(r#"{"loss":[{"field":"loss"}]}"#).is_err());
        assert!(PlotLayout::from_json_str("[]").is_err());

        let definition = PlotDefinition::new(PlotKind::Bar, "empty");
        let data = series_from_json_str(r#"[{"y":[1]}]"#).expect("series");
        assert!(definition.check_lockstep(&data).is_err());
    }
}
