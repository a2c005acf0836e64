//! The beat catalog.
//!
//! The standard catalog holds the 22 story beats. Ids are dense and equal to
//! position + 1, so lookups index directly into the slice.

use super::beat::{Beat, BeatId};
use super::error::CatalogError;
use super::step::CoreStep;

/// The funnel beat. Once it is in the path only beats from
/// [`FUNNEL_FLOOR`] upward stay reachable.
pub const GATE_BEAT: BeatId = 18;

/// Lowest beat id reachable once the gate has been reached.
pub const FUNNEL_FLOOR: BeatId = 19;

/// Beat reported as current while the path is still empty.
pub const DEFAULT_BEAT: BeatId = 2;

static STANDARD_BEATS: [Beat; 22] = [
    Beat::new(1, "Self-Revelation (foreshadow)", CoreStep::SelfRevelation),
    Beat::new(2, "Ghost & World", CoreStep::WeaknessNeed),
    Beat::new(3, "Weakness & Need", CoreStep::WeaknessNeed),
    Beat::new(4, "Inciting Event", CoreStep::Desire),
    Beat::new(5, "Desire Declared", CoreStep::Desire),
    Beat::new(6, "Ally Enters", CoreStep::Plan),
    Beat::new(7, "Opponent / Mystery", CoreStep::Opponent),
    Beat::new(8, "Fake-Ally Opponent", CoreStep::Opponent),
    Beat::new(9, "1st Revelation", CoreStep::Desire)
        .repeatable(Some(3))
        .in_family("revelation"),
    Beat::new(10, "Plan Forged", CoreStep::Plan),
    Beat::new(11, "Opponent Counter-Plan", CoreStep::Opponent)
        .repeatable(None)
        .in_family("counter"),
    Beat::new(12, "Drive", CoreStep::Plan),
    Beat::new(13, "Ally Attacks", CoreStep::Plan),
    Beat::new(14, "Apparent Defeat", CoreStep::Plan),
    Beat::new(15, "2nd Revelation", CoreStep::Desire)
        .repeatable(None)
        .in_family("revelation"),
    Beat::new(16, "Audience Revelation", CoreStep::Battle),
    Beat::new(17, "3rd Revelation", CoreStep::Desire)
        .repeatable(None)
        .in_family("revelation"),
    Beat::new(18, "Gate / Gauntlet", CoreStep::Battle),
    Beat::new(19, "Battle", CoreStep::Battle),
    Beat::new(20, "Self-Revelation", CoreStep::SelfRevelation),
    Beat::new(21, "Moral Decision", CoreStep::NewEquilibrium),
    Beat::new(22, "New Equilibrium", CoreStep::NewEquilibrium),
];

/// Read-only view over a dense, `'static` list of beats.
///
/// `Catalog` is `Copy`; pass it by value.
///
/// # Example
///
/// ```rust
/// use beatpath::core::{Catalog, CatalogError, CoreStep};
///
/// let catalog = Catalog::standard();
/// assert_eq!(catalog.len(), 22);
/// assert_eq!(catalog.beat(18)?.step, CoreStep::Battle);
/// assert_eq!(catalog.beat(23), Err(CatalogError::NotFound(23)));
/// # Ok::<(), CatalogError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Catalog {
    beats: &'static [Beat],
}

impl Catalog {
    /// The fixed 22-beat catalog.
    pub fn standard() -> Self {
        Self {
            beats: &STANDARD_BEATS,
        }
    }

    /// Wrap a caller-supplied beat list.
    ///
    /// Fails unless the list is non-empty and `beats[i].id == i + 1` for
    /// every position.
    pub fn from_static(beats: &'static [Beat]) -> Result<Self, CatalogError> {
        if beats.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (position, beat) in beats.iter().enumerate() {
            if beat.id as usize != position + 1 {
                return Err(CatalogError::NonDenseIds {
                    position,
                    found: beat.id,
                });
            }
        }
        Ok(Self { beats })
    }

    /// Look up a beat by id. Total over `1..=len()`.
    pub fn beat(&self, id: BeatId) -> Result<&'static Beat, CatalogError> {
        let beats: &'static [Beat] = self.beats;
        (id as usize)
            .checked_sub(1)
            .and_then(|index| beats.get(index))
            .ok_or(CatalogError::NotFound(id))
    }

    pub fn contains(&self, id: BeatId) -> bool {
        self.beat(id).is_ok()
    }

    /// Every beat, ascending id.
    pub fn beats(&self) -> &'static [Beat] {
        self.beats
    }

    /// Beats matching `predicate`, ascending id.
    pub fn filter<P>(&self, predicate: P) -> impl Iterator<Item = &'static Beat>
    where
        P: Fn(&Beat) -> bool,
    {
        let beats: &'static [Beat] = self.beats;
        beats.iter().filter(move |beat| predicate(*beat))
    }

    /// Beats hosted by `step`, ascending id.
    pub fn in_step(&self, step: CoreStep) -> impl Iterator<Item = &'static Beat> {
        self.filter(move |beat| beat.step == step)
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_has_dense_ids() {
        let catalog = Catalog::standard();

        assert_eq!(catalog.len(), 22);
        for (index, beat) in catalog.beats().iter().enumerate() {
            assert_eq!(beat.id as usize, index + 1);
        }
        assert!(Catalog::from_static(&STANDARD_BEATS).is_ok());
    }

    #[test]
    fn lookup_is_total_over_range() {
        let catalog = Catalog::standard();

        for id in 1..=22 {
            assert_eq!(catalog.beat(id).unwrap().id, id);
        }
    }

    #[test]
    fn lookup_outside_range_is_not_found() {
        let catalog = Catalog::standard();

        assert_eq!(catalog.beat(0), Err(CatalogError::NotFound(0)));
        assert_eq!(catalog.beat(23), Err(CatalogError::NotFound(23)));
        assert_eq!(catalog.beat(u32::MAX), Err(CatalogError::NotFound(u32::MAX)));
        assert!(!catalog.contains(0));
    }

    #[test]
    fn first_revelation_is_capped_at_three() {
        let beat = Catalog::standard().beat(9).unwrap();

        assert!(beat.repeatable);
        assert_eq!(beat.max_repeats, Some(3));
        assert_eq!(beat.family_id, Some("revelation"));
    }

    #[test]
    fn every_step_hosts_at_least_one_beat() {
        let catalog = Catalog::standard();

        for step in CoreStep::ALL {
            assert!(catalog.in_step(step).next().is_some(), "{step} is empty");
        }
    }

    #[test]
    fn filter_preserves_catalog_order() {
        let repeatable: Vec<BeatId> = Catalog::standard()
            .filter(|b| b.repeatable)
            .map(|b| b.id)
            .collect();

        assert_eq!(repeatable, vec![9, 11, 15, 17]);
    }

    #[test]
    fn from_static_rejects_gaps() {
        static GAPPED: [Beat; 2] = [
            Beat::new(1, "One", CoreStep::WeaknessNeed),
            Beat::new(3, "Three", CoreStep::Desire),
        ];

        assert_eq!(
            Catalog::from_static(&GAPPED).unwrap_err(),
            CatalogError::NonDenseIds {
                position: 1,
                found: 3
            }
        );
    }

    #[test]
    fn from_static_rejects_empty() {
        static NONE: [Beat; 0] = [];

        assert_eq!(Catalog::from_static(&NONE).unwrap_err(), CatalogError::Empty);
    }
}
