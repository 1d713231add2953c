use super::patch::TreeNode;
use crate::prelude::graphql::*;
use std::sync::Arc;

/// The resolved value carried by a [`ResultNode`].
#[derive(Clone, Debug, PartialEq)]
pub enum ResultValue {
    /// An object value; the content lives in the children.
    Object,

    /// A list value; the children are the elements in order.
    List,

    /// A completed leaf value.
    Completed(Value),

    /// An error reported by the service at this position. Error nodes have
    /// no children.
    Error(Error),

    /// A hydration placeholder, carrying the already completed raw value
    /// that will feed the dependent call. Placeholder nodes have no
    /// children.
    HydrationInput(Value),
}

/// Where a node sits in the overall result: the type its field belongs to
/// and the path from the root of the dispatch that produced it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepInfo {
    /// The overall type owning the field, when known.
    pub parent_type: Option<String>,

    /// The path from the root of the producing dispatch.
    pub path: Path,
}

/// An immutable node of the normalized result tree.
///
/// Nodes are shared through `Arc` and never mutated in place: every rewrite
/// produces a new tree reusing the untouched subtrees of the old one.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultNode {
    field: Option<Arc<Field>>,
    value: ResultValue,
    children: Vec<Arc<ResultNode>>,
    step_info: StepInfo,
}

impl ResultNode {
    pub(crate) fn new(
        field: Arc<Field>,
        value: ResultValue,
        children: Vec<Arc<ResultNode>>,
        step_info: StepInfo,
    ) -> ResultNode {
        ResultNode {
            field: Some(field),
            value,
            children,
            step_info,
        }
    }

    /// The root of a result tree; its children are the top level fields.
    pub(crate) fn root(children: Vec<Arc<ResultNode>>) -> ResultNode {
        ResultNode {
            field: None,
            value: ResultValue::Object,
            children,
            step_info: StepInfo::default(),
        }
    }

    /// A root representing a response that failed as a whole: a top level
    /// error and no data.
    pub(crate) fn root_error(error: Error) -> ResultNode {
        ResultNode {
            field: None,
            value: ResultValue::Error(error),
            children: Vec::new(),
            step_info: StepInfo::default(),
        }
    }

    /// The field this node answers; `None` at the root.
    pub fn field(&self) -> Option<&Field> {
        self.field.as_deref()
    }

    pub(crate) fn field_arc(&self) -> Option<Arc<Field>> {
        self.field.clone()
    }

    /// The response key of this node's field.
    pub fn response_key(&self) -> Option<&str> {
        self.field().map(|field| field.response_key())
    }

    pub fn value(&self) -> &ResultValue {
        &self.value
    }

    pub fn children(&self) -> &[Arc<ResultNode>] {
        &self.children
    }

    pub fn step_info(&self) -> &StepInfo {
        &self.step_info
    }

    pub fn is_hydration_input(&self) -> bool {
        matches!(self.value, ResultValue::HydrationInput(_))
    }

    /// The same node under a different field. The last element of the node's
    /// path follows the new response key; children keep their own paths.
    pub(crate) fn with_field(&self, field: Arc<Field>) -> ResultNode {
        let path = match self.step_info.path.parent() {
            Some(parent) => parent.join(field.response_key()),
            None => Path::from(field.response_key()),
        };
        ResultNode {
            field: Some(field),
            value: self.value.clone(),
            children: self.children.clone(),
            step_info: StepInfo {
                parent_type: self.step_info.parent_type.clone(),
                path,
            },
        }
    }

    /// Reassemble the tree into a JSON value.
    ///
    /// Error markers and unresolved placeholders render as `null`; this is a
    /// debugging and testing aid, the client facing serialization of the
    /// final tree belongs to the caller.
    pub fn to_data(&self) -> Value {
        match &self.value {
            ResultValue::Object => Value::Object(
                self.children
                    .iter()
                    .filter_map(|child| {
                        child
                            .response_key()
                            .map(|key| (ByteString::from(key.to_string()), child.to_data()))
                    })
                    .collect(),
            ),
            ResultValue::List => {
                Value::Array(self.children.iter().map(|child| child.to_data()).collect())
            }
            ResultValue::Completed(value) => value.clone(),
            ResultValue::Error(_) | ResultValue::HydrationInput(_) => Value::Null,
        }
    }

    /// Collect every error marker in the tree, in traversal order.
    pub fn errors(&self) -> Vec<Error> {
        let mut errors = Vec::new();
        self.collect_errors(&mut errors);
        errors
    }

    fn collect_errors(&self, errors: &mut Vec<Error>) {
        if let ResultValue::Error(error) = &self.value {
            errors.push(error.clone());
        }
        for child in &self.children {
            child.collect_errors(errors);
        }
    }
}

impl TreeNode for ResultNode {
    fn children(&self) -> &[Arc<Self>] {
        &self.children
    }

    fn with_children(&self, children: Vec<Arc<Self>>) -> Self {
        ResultNode {
            field: self.field.clone(),
            value: self.value.clone(),
            children,
            step_info: self.step_info.clone(),
        }
    }
}
