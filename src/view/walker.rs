use std::collections::HashSet;

use crate::view::view_model::{FieldDescriptor, FieldIndex, Group, ViewTree};

/// Fields of a view in document order.
pub fn collect_fields(view: &ViewTree) -> Vec<&FieldDescriptor> {
    let mut fields = Vec::new();
    let mut stack: Vec<&Group> = view.groups.iter().rev().collect();

    while let Some(group) = stack.pop() {
        if let Some(field) = &group.field {
            fields.push(field);
        }
        if let Some(layout) = &group.layout {
            let rows = layout.rows.iter().flat_map(|row| row.groups.iter());
            let nested: Vec<&Group> = layout.groups.iter().chain(rows).collect();
            stack.extend(nested.into_iter().rev());
        }
        if let Some(inner) = &group.view {
            stack.extend(inner.groups.iter().rev());
        }
    }

    fields
}

fn collect_fields_mut(view: &mut ViewTree) -> Vec<&mut FieldDescriptor> {
    let mut fields = Vec::new();
    let mut stack: Vec<&mut Group> = view.groups.iter_mut().rev().collect();

    while let Some(group) = stack.pop() {
        let Group {
            field,
            layout,
            view: inner,
            ..
        } = group;
        if let Some(field) = field {
            fields.push(field);
        }
        if let Some(layout) = layout {
            let rows = layout.rows.iter_mut().flat_map(|row| row.groups.iter_mut());
            let nested: Vec<&mut Group> = layout.groups.iter_mut().chain(rows).collect();
            stack.extend(nested.into_iter().rev());
        }
        if let Some(inner) = inner {
            stack.extend(inner.groups.iter_mut().rev());
        }
    }

    fields
}

/// Make every field index present and unique within the view.
///
/// Server-provided indices are kept on first sight. Missing or repeated
/// ones are numbered upward from the largest declared index.
pub fn assign_indices(view: &mut ViewTree) {
    let mut fields = collect_fields_mut(view);

    let mut next: FieldIndex = fields
        .iter()
        .filter_map(|f| f.index)
        .max()
        .map(|max| max + 1)
        .unwrap_or(0);

    let mut seen: HashSet<FieldIndex> = HashSet::new();
    for field in fields.iter_mut() {
        match field.index {
            Some(index) if seen.insert(index) => {}
            _ => {
                field.index = Some(next);
                seen.insert(next);
                next += 1;
            }
        }
    }
}
