use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Output key -> chain of operations that produced the series.
///
/// The last operation of a chain decides how the series is revealed.
pub type OutputsMap = IndexMap<String, Vec<Operation>>;

pub const GET_TAG: &str = "get";

/// Aggregations an operation chain may end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationKind {
    Count,
    Sum,
    Mean,
    Min,
    Max,
    Median,
    Std,
}

impl AggregationKind {
    pub const ALL: [Self; 7] = [
        Self::Count,
        Self::Sum,
        Self::Mean,
        Self::Min,
        Self::Max,
        Self::Median,
        Self::Std,
    ];

    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Mean => "mean",
            Self::Min => "min",
            Self::Max => "max",
            Self::Median => "median",
            Self::Std => "std",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Reads one sample per step.
    Get,
    Aggregate(AggregationKind),
    /// Any other transform (filter, map, ...), kept by tag.
    Other(String),
}

impl OperationKind {
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        if tag == GET_TAG {
            return Self::Get;
        }
        AggregationKind::from_tag(tag).map_or_else(|| Self::Other(tag.to_owned()), Self::Aggregate)
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Get => GET_TAG,
            Self::Aggregate(kind) => kind.tag(),
            Self::Other(tag) => tag,
        }
    }
}

/// One link of an output's operation chain.
///
/// On the wire an operation is `{"op": "<tag>", ...params}`; parameters are
/// opaque to the reshaper and kept in host order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OperationRecord", into = "OperationRecord")]
pub struct Operation {
    pub kind: OperationKind,
    pub params: Map<String, Value>,
}

impl Operation {
    #[must_use]
    pub fn get(field: impl Into<String>) -> Self {
        let mut params = Map::new();
        params.insert("field".to_owned(), Value::String(field.into()));
        Self {
            kind: OperationKind::Get,
            params,
        }
    }

    #[must_use]
    pub fn aggregate(kind: AggregationKind) -> Self {
        Self {
            kind: OperationKind::Aggregate(kind),
            params: Map::new(),
        }
    }

    #[must_use]
    pub fn other(tag: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Other(tag.into()),
            params: Map::new(),
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        self.kind.tag()
    }

    #[must_use]
    pub fn is_get(&self) -> bool {
        self.kind == OperationKind::Get
    }
}

#[derive(Serialize, Deserialize)]
struct OperationRecord {
    op: String,
    #[serde(flatten)]
    params: Map<String, Value>,
}

impl From<OperationRecord> for Operation {
    fn from(record: OperationRecord) -> Self {
        Self {
            kind: OperationKind::from_tag(&record.op),
            params: record.params,
        }
    }
}

impl From<Operation> for OperationRecord {
    fn from(operation: Operation) -> Self {
        Self {
            op: operation.kind.tag().to_owned(),
            params: operation.params,
        }
    }
}
