//! Column descriptors and column ordering.

use serde::Serialize;
use tracing::trace;

use crate::model::{Annotation, FieldType, ForeignKeyRef, Member, Model};
use crate::resolver::MetadataResolver;

/// Everything the renderer needs to know about one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub member: String,
    pub field_type: FieldType,
    /// Explicit position; `None` means unordered.
    pub order: Option<u32>,
    /// Explicit SQL type, used verbatim instead of the dialect mapping.
    pub type_name: Option<String>,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub foreign_key: Option<ForeignKeyRef>,
    pub index: bool,
    pub index_unique: bool,
    pub required: bool,
    pub unique: bool,
    pub max_length: Option<u32>,
    pub default_value: Option<String>,
    pub computed: Option<String>,
}

impl ColumnDescriptor {
    /// Read a member's annotations. For every kind the first annotation wins.
    pub fn from_member(model: &Model, member: &Member, resolver: &MetadataResolver) -> Self {
        let column = member.column_attr();

        let (index, index_unique) = member
            .find(|a| match a {
                Annotation::Index { unique } => Some((true, *unique)),
                _ => None,
            })
            .unwrap_or((false, false));

        let max_length = member
            .find(|a| match a {
                Annotation::MaxLength(len) => Some(*len),
                _ => None,
            })
            .or_else(|| {
                member.find(|a| match a {
                    Annotation::StringLength(len) => Some(*len),
                    _ => None,
                })
            });

        Self {
            name: resolver.resolve_column(model, member),
            member: member.ident().to_string(),
            field_type: member.field_type().clone(),
            order: column.and_then(|c| c.order),
            type_name: column.and_then(|c| c.type_name.clone()),
            primary_key: member.has(|a| matches!(a, Annotation::Key)),
            auto_increment: member.has(|a| matches!(a, Annotation::AutoIncrement)),
            foreign_key: member.find(|a| match a {
                Annotation::ForeignKey(target) => Some(target.clone()),
                _ => None,
            }),
            index,
            index_unique,
            required: member.has(|a| matches!(a, Annotation::Required)),
            unique: member.has(|a| matches!(a, Annotation::Unique)),
            max_length,
            default_value: member.find(|a| match a {
                Annotation::DefaultValue(value) => Some(value.clone()),
                _ => None,
            }),
            computed: member.find(|a| match a {
                Annotation::Computed(expr) => Some(expr.clone()),
                _ => None,
            }),
        }
    }

    /// Default literal, if one is set and not blank.
    pub fn default_literal(&self) -> Option<&str> {
        self.default_value
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }

    /// Computed expression, if one is set and not blank.
    pub fn computed_expression(&self) -> Option<&str> {
        self.computed
            .as_deref()
            .filter(|expr| !expr.trim().is_empty())
    }
}

/// Build one descriptor per mapped member and put them in column order.
pub fn extract_columns(model: &Model, resolver: &MetadataResolver) -> Vec<ColumnDescriptor> {
    let columns = model
        .members()
        .iter()
        .filter(|member| !member.has(|a| matches!(a, Annotation::NotMapped)))
        .map(|member| ColumnDescriptor::from_member(model, member, resolver))
        .collect();
    sort_columns(columns)
}

/// Order columns.
///
/// Explicitly ordered columns are sorted ascending (stable). Unordered
/// columns are kept on a stack in declaration order and popped into every
/// gap, i.e. every position `i` whose ordered column declares an order
/// greater than `i`; once the ordered run is exhausted the rest of the stack
/// is appended top first. Because it is a stack, unordered columns come out
/// in reverse declaration order whenever any ordered column exists. When no
/// column is ordered the declaration order is kept.
pub fn sort_columns(columns: Vec<ColumnDescriptor>) -> Vec<ColumnDescriptor> {
    let total = columns.len();
    if total == 0 {
        return columns;
    }

    let (mut ordered, mut unordered): (Vec<_>, Vec<_>) =
        columns.into_iter().partition(|c| c.order.is_some());
    if ordered.is_empty() {
        return unordered;
    }
    ordered.sort_by_key(|c| c.order);

    for i in 0..total {
        if unordered.is_empty() {
            break;
        }

        if i >= ordered.len() {
            trace!(position = i, remaining = unordered.len(), "appending unordered columns");
            ordered.extend(unordered.drain(..).rev());
            break;
        }

        if ordered[i].order.is_some_and(|order| order as usize > i) {
            if let Some(column) = unordered.pop() {
                trace!(column = %column.name, position = i, "filling order gap");
                ordered.insert(i, column);
            }
        }
    }

    ordered
}
