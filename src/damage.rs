//! Damage tracking (partial redraw requests)
//!
//! Every grid operation reports which parts of the scene it invalidated so
//! the viewer can pick the cheapest redraw. When in doubt, use
//! `Damage::Full` for correctness.

use crate::grid::CellPosition;

/// Which parts of the grid need redrawing
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Damage {
    /// No redraw needed (default state for accumulation)
    #[default]
    None,
    /// Rebuild the whole scene: layout, cells, headers
    Full,
    /// Redraw specific areas only
    Areas(Vec<DamageArea>),
}

/// Independently redrawable parts of the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DamageArea {
    /// Selection highlights, current cell outline and edit overlay
    Selection,
    /// Column, row and index header strips
    Headers,
    /// Text of individual cells after value-only edits
    Cells(Vec<CellPosition>),
}

impl Damage {
    /// Create damage for specific areas
    pub fn areas(areas: Vec<DamageArea>) -> Self {
        if areas.is_empty() {
            Damage::None
        } else {
            Damage::Areas(areas)
        }
    }

    /// Selection layers plus headers (which mirror the selection)
    pub fn selection() -> Self {
        Damage::Areas(vec![DamageArea::Selection, DamageArea::Headers])
    }

    /// Create damage for specific cells
    pub fn cells(cells: Vec<CellPosition>) -> Self {
        if cells.is_empty() {
            Damage::None
        } else {
            Damage::Areas(vec![DamageArea::Cells(cells)])
        }
    }

    /// Full redraw when `changed`, nothing otherwise
    pub fn full_if(changed: bool) -> Self {
        if changed {
            Damage::Full
        } else {
            Damage::None
        }
    }

    /// Selection redraw when `changed`, nothing otherwise
    pub fn selection_if(changed: bool) -> Self {
        if changed {
            Damage::selection()
        } else {
            Damage::None
        }
    }

    /// Merge another damage into this one
    ///
    /// If either damage is Full, the result is Full.
    /// If either damage is None, the other takes precedence.
    /// Otherwise, areas are combined with deduplication.
    pub fn merge(&mut self, other: Damage) {
        match (&mut *self, other) {
            (Damage::None, other) => *self = other,
            (_, Damage::None) => {}
            (Damage::Full, _) => {}
            (this, Damage::Full) => *this = Damage::Full,
            (Damage::Areas(areas), Damage::Areas(other_areas)) => {
                for area in other_areas {
                    if let DamageArea::Cells(ref cells) = area {
                        if let Some(existing) = areas.iter_mut().find_map(|a| match a {
                            DamageArea::Cells(c) => Some(c),
                            _ => Option::None,
                        }) {
                            for &cell in cells {
                                if !existing.contains(&cell) {
                                    existing.push(cell);
                                }
                            }
                            continue;
                        }
                    }
                    if !areas.contains(&area) {
                        areas.push(area);
                    }
                }
            }
        }
    }

    /// Combine two damages, consuming both
    pub fn and(mut self, other: Damage) -> Self {
        self.merge(other);
        self
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Damage::Full)
    }

    /// Check if the selection layers must be rebuilt (or everything is)
    pub fn includes_selection(&self) -> bool {
        match self {
            Damage::None => false,
            Damage::Full => true,
            Damage::Areas(areas) => areas.contains(&DamageArea::Selection),
        }
    }

    pub fn includes_headers(&self) -> bool {
        match self {
            Damage::None => false,
            Damage::Full => true,
            Damage::Areas(areas) => areas.contains(&DamageArea::Headers),
        }
    }

    /// Cells to redraw individually, if any
    pub fn damaged_cells(&self) -> Option<&[CellPosition]> {
        match self {
            Damage::Areas(areas) => areas.iter().find_map(|a| match a {
                DamageArea::Cells(cells) => Some(cells.as_slice()),
                _ => None,
            }),
            _ => None,
        }
    }

    /// Check if any redraw is needed
    pub fn needs_redraw(&self) -> bool {
        match self {
            Damage::None => false,
            Damage::Full => true,
            Damage::Areas(areas) => !areas.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_none_is_identity() {
        let mut damage = Damage::None;
        damage.merge(Damage::selection());
        assert_eq!(damage, Damage::selection());

        damage.merge(Damage::None);
        assert_eq!(damage, Damage::selection());
    }

    #[test]
    fn test_merge_full_absorbs() {
        let mut damage = Damage::selection();
        damage.merge(Damage::Full);
        assert!(damage.is_full());

        damage.merge(Damage::cells(vec![CellPosition::new(0, 0)]));
        assert!(damage.is_full());
    }

    #[test]
    fn test_merge_cells_dedups() {
        let a = CellPosition::new(1, 1);
        let b = CellPosition::new(2, 1);
        let mut damage = Damage::cells(vec![a]);
        damage.merge(Damage::cells(vec![a, b]));
        assert_eq!(damage.damaged_cells(), Some(&[a, b][..]));
    }

    #[test]
    fn test_merge_areas_dedups() {
        let mut damage = Damage::selection();
        damage.merge(Damage::selection());
        assert_eq!(
            damage,
            Damage::Areas(vec![DamageArea::Selection, DamageArea::Headers])
        );
        assert!(damage.includes_selection());
        assert!(damage.includes_headers());
    }

    #[test]
    fn test_needs_redraw() {
        assert!(!Damage::None.needs_redraw());
        assert!(Damage::Full.needs_redraw());
        assert!(!Damage::Areas(vec![]).needs_redraw());
        assert!(!Damage::cells(vec![]).needs_redraw());
    }
}
