use serde::{Deserialize, Serialize};
use std::fmt;

pub use serde_json_bytes::{ByteString, Value};

/// A JSON object as returned by and sent to services.
pub type Object = serde_json_bytes::Map<ByteString, Value>;

/// One element of a [`Path`] into a result tree or a raw response.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathElement {
    /// An index into a list value.
    Index(usize),

    /// A response key of an object value.
    Key(String),
}

/// A path into a response, as found in GraphQL error paths.
///
/// Serializes to the standard mixed array form (`["a", 1, "b"]`) and displays
/// as `a/1/b`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(pub Vec<PathElement>);

impl Path {
    pub fn empty() -> Path {
        Path(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&PathElement> {
        self.0.last()
    }

    /// The path without its last element, or `None` on the empty path.
    pub fn parent(&self) -> Option<Path> {
        if self.is_empty() {
            None
        } else {
            Some(Path(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    pub fn join(&self, other: impl Into<Path>) -> Path {
        let other = other.into();
        let mut elements = self.0.clone();
        elements.extend(other.0);
        Path(elements)
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Path(
            s.split('/')
                .filter(|x| !x.is_empty())
                .map(|x| {
                    if let Ok(index) = x.parse::<usize>() {
                        PathElement::Index(index)
                    } else {
                        PathElement::Key(x.to_string())
                    }
                })
                .collect(),
        )
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        Path::from(s.as_str())
    }
}

impl From<usize> for Path {
    fn from(index: usize) -> Self {
        Path(vec![PathElement::Index(index)])
    }
}

impl From<PathElement> for Path {
    fn from(element: PathElement) -> Self {
        Path(vec![element])
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, element) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            match element {
                PathElement::Index(index) => write!(f, "{}", index)?,
                PathElement::Key(key) => write!(f, "{}", key)?,
            }
        }
        Ok(())
    }
}
