//! JSON Pointer and same-document JSON Reference handling

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::document::ValueAdapter;
use crate::error::{GraphError, GraphResult};
use crate::model::ValueKind;

/// A parsed JSON Pointer. Segments are stored unescaped; `Display` produces
/// the canonical escaped form, which is what the parser uses as a path key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPointer {
    segments: Vec<String>,
}

impl JsonPointer {
    /// The pointer to the whole document (`""`).
    pub fn root() -> Self {
        JsonPointer::default()
    }

    pub fn parse(pointer: &str) -> GraphResult<Self> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }

        let Some(rest) = pointer.strip_prefix('/') else {
            return Err(invalid(pointer, "must be empty or start with '/'"));
        };

        let segments = rest
            .split('/')
            .map(|raw| unescape_segment(raw).ok_or_else(|| invalid(pointer, "invalid '~' escape")))
            .collect::<GraphResult<Vec<_>>>()?;

        Ok(JsonPointer { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Pointer to a child of the value this pointer addresses.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        JsonPointer { segments }
    }

    /// Walk `root` segment by segment. References inside the walked
    /// document are not followed.
    pub fn resolve<A: ValueAdapter>(&self, root: &A) -> GraphResult<A> {
        let mut current = root.clone();
        for segment in &self.segments {
            let next = match current.kind()? {
                ValueKind::Object => current.find_member(segment)?,
                ValueKind::Array => {
                    let index = parse_index(segment).ok_or_else(|| {
                        invalid(
                            &self.to_string(),
                            "array index must be an unsigned decimal integer",
                        )
                    })?;
                    current.element(index)?
                }
                _ => None,
            };
            current = next.ok_or_else(|| GraphError::UnresolvedPointer {
                pointer: self.to_string(),
            })?;
        }
        Ok(current)
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", escape_segment(segment))?;
        }
        Ok(())
    }
}

impl FromStr for JsonPointer {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonPointer::parse(s)
    }
}

/// A `$ref` value that points into the same document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonReference {
    uri: String,
    pointer: JsonPointer,
}

impl JsonReference {
    /// Parse a `$ref` URI. Only `#` and `#/...` fragments are supported;
    /// anything naming another document is rejected as not implemented.
    pub fn parse(uri: &str) -> GraphResult<Self> {
        let (document, fragment) = uri.split_once('#').unwrap_or((uri, ""));
        if !document.is_empty() {
            return Err(GraphError::NotImplemented(format!(
                "cross-document reference '{uri}'"
            )));
        }

        let fragment = urlencoding::decode(fragment).map_err(|err| {
            invalid(fragment, &format!("fragment is not valid percent-encoded UTF-8: {err}"))
        })?;
        if !fragment.is_empty() && !fragment.starts_with('/') {
            return Err(invalid(&fragment, "fragment is not a JSON Pointer"));
        }

        Ok(JsonReference {
            uri: uri.to_string(),
            pointer: JsonPointer::parse(&fragment)?,
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// Escape a member name for use as a pointer segment (`~` → `~0`, `/` → `~1`).
pub fn escape_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains(['~', '/']) {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

fn unescape_segment(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Unsigned decimal without leading zeros, so each element has one spelling.
fn parse_index(segment: &str) -> Option<usize> {
    let digits_only = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
    if !digits_only || (segment.len() > 1 && segment.starts_with('0')) {
        return None;
    }
    segment.parse().ok()
}

fn invalid(pointer: &str, reason: &str) -> GraphError {
    GraphError::InvalidPointer {
        pointer: pointer.to_string(),
        reason: reason.to_string(),
    }
}
