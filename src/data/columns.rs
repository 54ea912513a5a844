use tracing::debug;

use super::{ColumnSelector, Table};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    /// Selected columns first, the rest after them in their original order.
    Reorder,
    /// Exactly the selected columns, in selector order.
    OnlyColumns,
    /// Everything except the selected columns, in original order.
    WithoutColumns,
}

/// The column transforms configured on a pipeline.
///
/// Stages run in a fixed order regardless of the order they were set in:
/// without-columns, then only-columns, then column-order. Each stage resolves
/// its selectors against the columns left by the previous one. A stage with
/// no selectors is the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    without_columns: Vec<ColumnSelector>,
    only_columns: Vec<ColumnSelector>,
    column_order: Vec<ColumnSelector>,
}

const STAGES: [ProjectionKind; 3] = [
    ProjectionKind::WithoutColumns,
    ProjectionKind::OnlyColumns,
    ProjectionKind::Reorder,
];

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: ProjectionKind, selectors: Vec<ColumnSelector>) {
        *self.stage_mut(kind) = selectors;
    }

    pub fn reset(&mut self, kind: ProjectionKind) {
        self.stage_mut(kind).clear();
    }

    pub fn reset_all(&mut self) {
        *self = Self::default();
    }

    pub fn selectors(&self, kind: ProjectionKind) -> &[ColumnSelector] {
        match kind {
            ProjectionKind::Reorder => &self.column_order,
            ProjectionKind::OnlyColumns => &self.only_columns,
            ProjectionKind::WithoutColumns => &self.without_columns,
        }
    }

    pub fn is_identity(&self) -> bool {
        STAGES.iter().all(|&kind| self.selectors(kind).is_empty())
    }

    fn stage_mut(&mut self, kind: ProjectionKind) -> &mut Vec<ColumnSelector> {
        match kind {
            ProjectionKind::Reorder => &mut self.column_order,
            ProjectionKind::OnlyColumns => &mut self.only_columns,
            ProjectionKind::WithoutColumns => &mut self.without_columns,
        }
    }

    /// Apply every configured stage to `table`, producing a new table.
    ///
    /// An empty table (no header, no rows) passes through untouched, even
    /// with index selectors configured.
    pub fn apply(&self, table: &Table) -> Result<Table> {
        if table.is_empty() || self.is_identity() {
            return Ok(table.clone());
        }

        let mut current = table.clone();
        for &kind in STAGES.iter() {
            let selectors = self.selectors(kind);
            if !selectors.is_empty() {
                current = project(&current, kind, selectors)?;
            }
        }

        Ok(current)
    }
}

/// Resolve a selector to a column index of `table`.
///
/// Names are matched exactly against the header (first match wins), so a
/// name never resolves on a table without a header. Indices must be below
/// [`Table::num_columns`].
pub fn resolve(selector: &ColumnSelector, table: &Table) -> Result<usize> {
    match selector {
        ColumnSelector::Name(name) => table
            .header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::ColumnNotFound { name: name.clone() }),
        ColumnSelector::Index(index) => {
            let count = table.num_columns();
            if *index < count {
                Ok(*index)
            } else {
                Err(Error::out_of_bounds(*index, count))
            }
        }
    }
}

/// Apply a single projection stage.
pub fn project(table: &Table, kind: ProjectionKind, selectors: &[ColumnSelector]) -> Result<Table> {
    let count = table.num_columns();
    let resolved = selectors
        .iter()
        .map(|s| resolve(s, table))
        .collect::<Result<Vec<_>>>()?;

    let indices: Vec<usize> = match kind {
        ProjectionKind::OnlyColumns => resolved,
        ProjectionKind::WithoutColumns => (0..count).filter(|i| !resolved.contains(i)).collect(),
        ProjectionKind::Reorder => {
            let mut front: Vec<usize> = Vec::with_capacity(count);
            for i in resolved {
                if !front.contains(&i) {
                    front.push(i);
                }
            }
            let rest: Vec<usize> = (0..count).filter(|i| !front.contains(i)).collect();
            front.extend(rest);
            front
        }
    };

    debug!("Projecting {:?}: columns {:?} of {}", kind, indices, count);

    // Cells past the header width belong to no column; only a projection
    // that drops unlisted columns discards them.
    let keep_extra = kind != ProjectionKind::OnlyColumns;
    let select = |row: &[String]| -> Vec<String> {
        let mut out: Vec<String> = indices
            .iter()
            .map(|&i| row.get(i).cloned().unwrap_or_default())
            .collect();
        if keep_extra && row.len() > count {
            out.extend(row[count..].iter().cloned());
        }
        out
    };

    let header = if table.header.is_empty() {
        Vec::new()
    } else {
        select(&table.header)
    };
    let rows = table.rows.iter().map(|row| select(row)).collect();

    Ok(Table { header, rows })
}
