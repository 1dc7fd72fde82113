//! AUR RPC (`rpc.php`) query answering.
//!
//! ```text
//! search     rpc.php?type=search&arg=foobar
//! info       rpc.php?type=info&arg=foobar
//! multiinfo  rpc.php?type=multiinfo&arg[]=cups-xerox&arg[]=cups-mc2430dl
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use crate::error::{Error, ErrorKind};
use crate::{IndexCache, Overlay, ProtocolRecord};

/// The query types the engine answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// Exact lookup of one package by name.
    Info,
    /// Exact lookup of several packages by name.
    MultiInfo,
    /// Substring search over names and descriptions.
    Search,
}
impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Info => "info",
            QueryType::MultiInfo => "multiinfo",
            QueryType::Search => "search",
        }
    }
}
impl FromStr for QueryType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "info" => Self::Info,
            "multiinfo" => Self::MultiInfo,
            "search" => Self::Search,
            _ => exn::bail!(ErrorKind::UnknownQueryType(s.to_string())),
        })
    }
}
impl Display for QueryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Parameters of one RPC request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// `type`
    pub kind: Option<String>,
    /// `arg`
    pub arg: Option<String>,
    /// Every `arg[]`, in request order.
    pub args: Vec<String>,
}
impl Query {
    /// Collects a query from decoded `(key, value)` pairs.
    ///
    /// When `type` or `arg` is repeated the last occurrence wins; `arg[]`
    /// values accumulate. Other keys (such as the protocol version `v`) are
    /// ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "type" => query.kind = Some(value.into()),
                "arg" => query.arg = Some(value.into()),
                "arg[]" => query.args.push(value.into()),
                _ => {},
            }
        }
        query
    }
}

/// The `results` member of a [`Response`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Results {
    List(Vec<ProtocolRecord>),
    /// A lone record, not wrapped in a list (`info` hits only).
    Single(Box<ProtocolRecord>),
    Message(&'static str),
}

/// A complete RPC response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    #[serde(rename = "type")]
    pub kind: String,
    pub resultcount: usize,
    pub results: Results,
}
impl Response {
    /// The fixed reply to a query type the engine doesn't answer.
    pub fn error() -> Self {
        Self { kind: "error".to_string(), resultcount: 0, results: Results::Message("incorrect") }
    }
}

/// Answers RPC queries against overlays held in an [`IndexCache`].
#[derive(Debug, Clone)]
pub struct QueryEngine {
    cache: Arc<IndexCache>,
}
impl QueryEngine {
    pub fn new(cache: Arc<IndexCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<IndexCache> {
        &self.cache
    }

    /// Answers `query` against the named overlay, building its index first
    /// if it isn't cached.
    #[instrument(skip(self))]
    pub async fn handle(&self, overlay: &str, query: &Query) -> Response {
        let index = self.cache.get_or_build(overlay).await;
        match query.kind.as_deref().map(str::parse::<QueryType>) {
            Some(Ok(kind)) => answer(&index, kind, query),
            _ => Response::error(),
        }
    }
}

/// Result shaping for a parsed query against one overlay index.
pub fn answer(index: &Overlay, kind: QueryType, query: &Query) -> Response {
    let project = |name: &str| index.get(name).map(|p| p.to_protocol(p.url_path()));
    let results: Vec<ProtocolRecord> = match kind {
        QueryType::Info => query.arg.as_deref().and_then(project).into_iter().collect(),
        QueryType::Search => match &query.arg {
            Some(arg) => index.iter().filter(|p| p.matches(arg)).map(|p| p.to_protocol(p.url_path())).collect(),
            None => Vec::new(),
        },
        QueryType::MultiInfo => query.args.iter().filter_map(|name| project(name.as_str())).collect(),
    };
    let resultcount = results.len();
    let results = match (kind, results.len()) {
        // Mirrors the AUR: an `info` hit is a bare object, but a miss is
        // still an empty list.
        (QueryType::Info, 1..) => {
            let mut results = results;
            Results::Single(Box::new(results.swap_remove(0)))
        },
        _ => Results::List(results),
    };
    Response { kind: kind.to_string(), resultcount, results }
}
