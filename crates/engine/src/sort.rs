use std::cmp::Ordering;

use snapgrid_core::{ColumnId, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct SortSpec {
    pub column_id: ColumnId,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(column_id: impl Into<ColumnId>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column_id: impl Into<ColumnId>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Order records for display. Without a sort, this is just the stable
/// filtered-last partition over source order. With a sort, base field values
/// are compared by case-insensitive string coercion; a null (or missing)
/// value always orders first regardless of direction. Filtered records are
/// pushed to the end afterwards even if the comparator placed them earlier.
pub fn sort_records(records: &[Record], sort: Option<&SortSpec>) -> Vec<Record> {
    let mut out: Vec<Record> = records.to_vec();

    if let Some(spec) = sort {
        out.sort_by(|a, b| compare(a, b, spec));
    }

    // Stable partition: non-filtered keep their relative order up front,
    // filtered keep theirs at the back.
    let (mut kept, filtered): (Vec<Record>, Vec<Record>) =
        out.into_iter().partition(|r| !r.filtered);
    kept.extend(filtered);
    kept
}

fn compare(a: &Record, b: &Record, spec: &SortSpec) -> Ordering {
    let key_a = a.fields.get(&spec.column_id).and_then(|v| v.sort_key());
    let key_b = b.fields.get(&spec.column_id).and_then(|v| v.sort_key());

    match (key_a, key_b) {
        (None, None) => Ordering::Equal,
        // Nulls order first; direction never relocates them
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(ka), Some(kb)) => match spec.direction {
            SortDirection::Asc => ka.cmp(&kb),
            SortDirection::Desc => kb.cmp(&ka),
        },
    }
}
