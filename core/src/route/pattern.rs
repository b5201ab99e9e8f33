use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of value a path parameter captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamKind {
    /// One or more ASCII digits.
    Int,
    /// Any non-empty segment.
    Any,
}

impl ParamKind {
    fn accepts(self, segment: &str) -> bool {
        match self {
            ParamKind::Int => !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()),
            ParamKind::Any => !segment.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Literal(String),
    Param { name: String, kind: ParamKind },
    /// Matches the remainder of the path, including nothing at all.
    Wildcard,
}

impl Segment {
    pub fn literal(text: impl Into<String>) -> Self {
        Segment::Literal(text.into())
    }

    pub fn int(name: impl Into<String>) -> Self {
        Segment::Param {
            name: name.into(),
            kind: ParamKind::Int,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("route pattern '{0}' must start with '/'")]
    MissingLeadingSlash(String),
    #[error("route pattern '{0}' has a parameter without a name")]
    EmptyParamName(String),
    #[error("route pattern '{pattern}' uses unknown parameter kind '{kind}'")]
    UnknownParamKind { pattern: String, kind: String },
    #[error("route pattern '{0}' has a wildcard that is not the last segment")]
    WildcardNotLast(String),
}

/// Segment template for a route path, e.g. `/problems/:id(int)`.
///
/// Matching is segment-wise and ignores empty segments, so `/admin/` and
/// `//admin` both match `/admin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// The pattern that only matches `/`.
    pub fn root() -> Self {
        Self::new(Vec::new())
    }

    /// Pattern made only of literal segments.
    pub fn exact(path: &str) -> Self {
        Self::new(split_path(path).map(Segment::literal).collect())
    }

    pub fn parse(text: &str) -> Result<Self, PatternError> {
        let text = text.trim();
        if text == "*" {
            return Ok(Self::new(vec![Segment::Wildcard]));
        }
        if !text.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(text.to_string()));
        }

        let raw: Vec<&str> = split_path(text).collect();
        let mut segments = Vec::with_capacity(raw.len());
        for (idx, part) in raw.iter().enumerate() {
            if *part == "*" {
                if idx + 1 != raw.len() {
                    return Err(PatternError::WildcardNotLast(text.to_string()));
                }
                segments.push(Segment::Wildcard);
                continue;
            }
            let Some(param) = part.strip_prefix(':') else {
                segments.push(Segment::literal(*part));
                continue;
            };
            let (name, kind) = match param.split_once('(') {
                Some((name, rest)) => {
                    let kind = rest.strip_suffix(')').unwrap_or(rest);
                    let kind = match kind {
                        "int" => ParamKind::Int,
                        "any" => ParamKind::Any,
                        other => {
                            return Err(PatternError::UnknownParamKind {
                                pattern: text.to_string(),
                                kind: other.to_string(),
                            });
                        }
                    };
                    (name, kind)
                }
                None => (param, ParamKind::Any),
            };
            if name.is_empty() {
                return Err(PatternError::EmptyParamName(text.to_string()));
            }
            segments.push(Segment::Param {
                name: name.to_string(),
                kind,
            });
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.matches(path).is_some()
    }

    /// Like [`Self::is_match`], but only for paths already in canonical
    /// form: no trailing slash and no empty segments.
    pub fn is_strict_match(&self, path: &str) -> bool {
        self.matches_strict(path).is_some()
    }

    pub fn matches_strict(&self, path: &str) -> Option<RouteParams> {
        if !is_canonical(path) {
            return None;
        }
        self.matches(path)
    }

    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let mut parts = split_path(path);
        let mut params = RouteParams::default();
        for segment in &self.segments {
            match segment {
                Segment::Wildcard => return Some(params),
                Segment::Literal(text) => {
                    if parts.next()? != text.as_str() {
                        return None;
                    }
                }
                Segment::Param { name, kind } => {
                    let part = parts.next()?;
                    if !kind.accepts(part) {
                        return None;
                    }
                    params.values.insert(name.clone(), part.to_string());
                }
            }
        }
        match parts.next() {
            Some(_) => None,
            None => Some(params),
        }
    }
}

impl FromStr for RoutePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [Segment::Wildcard] = self.segments.as_slice() {
            return f.write_str("*");
        }
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => write!(f, "/{text}")?,
                Segment::Param {
                    name,
                    kind: ParamKind::Int,
                } => write!(f, "/:{name}(int)")?,
                Segment::Param {
                    name,
                    kind: ParamKind::Any,
                } => write!(f, "/:{name}")?,
                Segment::Wildcard => f.write_str("/*")?,
            }
        }
        Ok(())
    }
}

impl Serialize for RoutePattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RoutePattern {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Parameters captured while matching a [`RoutePattern`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteParams {
    values: BTreeMap<String, String>,
}

impl RouteParams {
    /// Captured text exactly as it appeared in the path.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(|value| value.parse().ok())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub(crate) fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|part| !part.is_empty())
}

/// `/` or a path whose segments are all non-empty.
fn is_canonical(path: &str) -> bool {
    match path.strip_prefix('/') {
        Some("") => true,
        Some(rest) => rest.split('/').all(|part| !part.is_empty()),
        None => false,
    }
}
