//! Spell resolution: link parsed spells into their spellcasting entries.
//!
//! Spells and entries are decoded independently, so the links have to be
//! rebuilt afterwards:
//!
//! 1. Prepared slots name their spell directly; the slot is filled by exact id
//!    match against the spell list.
//! 2. Focus and innate entries collect every spell whose back-reference equals
//!    the entry id, in document order.
//! 3. Spontaneous entries only carry slot capacity. A spell pointing at one is
//!    accounted for but not attached anywhere.
//!
//! Rituals never take part. Whatever cannot be linked is reported as a
//! [`ResolutionIssue`] and the rest of the pass continues.
//!
//! Entry spell lists are rebuilt from scratch on every call, so resolving the
//! same input twice gives the same result.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde_json::{json, Value};

use bestiary_domain::{ItemKind, PreparationType, Spell, SpellCasting, SpellUse};

/// Resolved entries plus whatever could not be linked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub casting: SpellCasting,
    pub issues: Vec<ResolutionIssue>,
}

/// A data quality problem found while linking spells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionIssue {
    /// A prepared slot names a spell id that is not in the spell list.
    UnresolvedSlot {
        container_id: String,
        level_label: String,
        spell_id: String,
    },
    /// A spell points at an entry that does not take it.
    UnresolvedSpell {
        spell_id: String,
        spell_name: String,
        container_id: String,
    },
}

impl ResolutionIssue {
    /// Kind of the record the issue is about.
    pub fn kind(&self) -> ItemKind {
        match self {
            ResolutionIssue::UnresolvedSlot { .. } => ItemKind::SpellcastingEntry,
            ResolutionIssue::UnresolvedSpell { .. } => ItemKind::Spell,
        }
    }

    /// Synthetic record fragment for diagnostics sinks.
    pub fn fragment(&self) -> Value {
        match self {
            ResolutionIssue::UnresolvedSlot {
                container_id,
                level_label,
                spell_id,
            } => json!({
                "_id": container_id,
                "slot": level_label,
                "spellId": spell_id,
            }),
            ResolutionIssue::UnresolvedSpell {
                spell_id,
                spell_name,
                container_id,
            } => json!({
                "_id": spell_id,
                "name": spell_name,
                "containerId": container_id,
            }),
        }
    }
}

impl fmt::Display for ResolutionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionIssue::UnresolvedSlot {
                container_id,
                level_label,
                spell_id,
            } => write!(
                f,
                "prepared slot {} of entry '{}' names unknown spell '{}'",
                level_label, container_id, spell_id
            ),
            ResolutionIssue::UnresolvedSpell {
                spell_id,
                spell_name,
                container_id,
            } => write!(
                f,
                "spell '{}' ({}) is not taken by any entry (back-reference '{}')",
                spell_name, spell_id, container_id
            ),
        }
    }
}

/// Link `spells` into the entries of `casting`.
pub fn resolve_spells(spells: &[Spell], mut casting: SpellCasting) -> Resolution {
    let mut issues = Vec::new();

    // First spell wins when ids repeat. Positions, not ids, track what was
    // slotted so a duplicate id elsewhere still gets linked or reported.
    let mut by_id: HashMap<&str, usize> = HashMap::new();
    for (index, spell) in spells.iter().enumerate().filter(|(_, s)| !s.ritual) {
        by_id.entry(spell.id.as_str()).or_insert(index);
    }

    // Phase 1: prepared slots by direct id
    let mut slotted: HashSet<usize> = HashSet::new();
    for container in &mut casting.prepared {
        for slot in &mut container.slots {
            match by_id.get(slot.spell_id.as_str()).copied() {
                Some(index) => {
                    slot.spell = Some(spells[index].clone());
                    slotted.insert(index);
                }
                None => {
                    slot.spell = None;
                    issues.push(ResolutionIssue::UnresolvedSlot {
                        container_id: container.id.clone(),
                        level_label: slot.level_label.clone(),
                        spell_id: slot.spell_id.clone(),
                    });
                }
            }
        }
    }

    // Phase 2: back-references into focus and innate lists
    for container in &mut casting.focus {
        container.spells = back_referencing(spells, &container.id, &slotted)
            .cloned()
            .collect();
    }
    for container in &mut casting.innate {
        container.spells = back_referencing(spells, &container.id, &slotted)
            .cloned()
            .map(SpellUse::from)
            .collect();
    }

    // Phase 3: whatever is left over. Prepared entries only take spells
    // through their slots.
    for (index, spell) in spells.iter().enumerate().filter(|(_, s)| s.is_linkable()) {
        let resolved = slotted.contains(&index)
            || matches!(
                casting.preparation_of(&spell.container_id),
                Some(PreparationType::Spontaneous | PreparationType::Focus | PreparationType::Innate)
            );
        if !resolved {
            issues.push(ResolutionIssue::UnresolvedSpell {
                spell_id: spell.id.clone(),
                spell_name: spell.name.clone(),
                container_id: spell.container_id.clone(),
            });
        }
    }

    Resolution { casting, issues }
}

/// Linkable spells pointing at `container_id` that no prepared slot took.
fn back_referencing<'a>(
    spells: &'a [Spell],
    container_id: &'a str,
    slotted: &'a HashSet<usize>,
) -> impl Iterator<Item = &'a Spell> + 'a {
    spells
        .iter()
        .enumerate()
        .filter(move |(index, s)| {
            s.is_linkable() && s.container_id == container_id && !slotted.contains(index)
        })
        .map(|(_, s)| s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestiary_domain::{
        FocusCasting, InnateCasting, PreparedCasting, PreparedSlot, Slot, SpellUses,
        SpontaneousCasting,
    };

    fn spell(id: &str, container_id: &str) -> Spell {
        Spell {
            id: id.into(),
            name: format!("Spell {}", id),
            container_id: container_id.into(),
            uses: if container_id.is_empty() {
                SpellUses::Limited(1)
            } else {
                SpellUses::Unlimited
            },
            at_will: !container_id.is_empty(),
            ..Default::default()
        }
    }

    fn ritual(id: &str, container_id: &str) -> Spell {
        Spell {
            ritual: true,
            at_will: false,
            uses: SpellUses::Limited(1),
            ..spell(id, container_id)
        }
    }

    fn prepared(id: &str, occupants: &[(&str, &str)]) -> PreparedCasting {
        PreparedCasting {
            id: id.into(),
            slots: occupants
                .iter()
                .map(|(label, spell_id)| PreparedSlot {
                    level_label: (*label).into(),
                    spell_id: (*spell_id).into(),
                    spell: None,
                })
                .collect(),
            ..Default::default()
        }
    }

    fn casting() -> SpellCasting {
        SpellCasting {
            prepared: vec![prepared("prep", &[("slot1", "p1"), ("slot1", "p1"), ("slot2", "missing")])],
            spontaneous: vec![SpontaneousCasting {
                id: "spont".into(),
                slots: vec![Slot {
                    level_label: "slot1".into(),
                    max_casts: 4,
                }],
                ..Default::default()
            }],
            focus: vec![FocusCasting {
                id: "focus".into(),
                ..Default::default()
            }],
            innate: vec![InnateCasting {
                id: "innate".into(),
                ..Default::default()
            }],
        }
    }

    fn spells() -> Vec<Spell> {
        vec![
            spell("p1", "prep"),
            spell("f1", "focus"),
            spell("i1", "innate"),
            spell("f2", "focus"),
            spell("s1", "spont"),
            ritual("r1", "innate"),
            ritual("r2", ""),
            spell("orphan", "gone"),
        ]
    }

    #[test]
    fn prepared_slots_resolve_by_id() {
        let resolution = resolve_spells(&spells(), casting());
        let slots = &resolution.casting.prepared[0].slots;

        assert_eq!(slots[0].spell.as_ref().map(|s| s.id.as_str()), Some("p1"));
        // The same spell may fill several slots
        assert_eq!(slots[1].spell.as_ref().map(|s| s.id.as_str()), Some("p1"));
        assert!(slots[2].spell.is_none());
        assert!(resolution.issues.contains(&ResolutionIssue::UnresolvedSlot {
            container_id: "prep".into(),
            level_label: "slot2".into(),
            spell_id: "missing".into(),
        }));
    }

    #[test]
    fn back_references_fill_focus_and_innate_in_order() {
        let resolution = resolve_spells(&spells(), casting());

        let focus: Vec<&str> = resolution.casting.focus[0]
            .spells
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(focus, vec!["f1", "f2"]);

        let innate = &resolution.casting.innate[0].spells;
        assert_eq!(innate.len(), 1);
        assert_eq!(innate[0].spell.id, "i1");
        assert_eq!(innate[0].uses, SpellUses::Unlimited);
    }

    #[test]
    fn rituals_are_never_attached() {
        let resolution = resolve_spells(&spells(), casting());
        let casting = &resolution.casting;

        let attached_ids: Vec<&str> = casting
            .prepared
            .iter()
            .flat_map(|c| c.slots.iter().filter_map(|s| s.spell.as_ref()))
            .chain(casting.focus.iter().flat_map(|c| c.spells.iter()))
            .chain(casting.innate.iter().flat_map(|c| c.spells.iter().map(|u| &u.spell)))
            .map(|s| s.id.as_str())
            .collect();
        assert!(!attached_ids.contains(&"r1"));
        assert!(!attached_ids.contains(&"r2"));
    }

    #[test]
    fn ritual_ids_do_not_satisfy_prepared_slots() {
        let casting = SpellCasting {
            prepared: vec![prepared("prep", &[("slot6", "r1")])],
            ..Default::default()
        };
        let resolution = resolve_spells(&[ritual("r1", "prep")], casting);
        assert!(resolution.casting.prepared[0].slots[0].spell.is_none());
        assert_eq!(resolution.issues.len(), 1);
    }

    #[test]
    fn spontaneous_back_references_are_accounted_for() {
        let resolution = resolve_spells(&spells(), casting());
        assert!(!resolution.issues.iter().any(|issue| matches!(
            issue,
            ResolutionIssue::UnresolvedSpell { spell_id, .. } if spell_id == "s1"
        )));
        assert_eq!(resolution.casting.spontaneous[0].slots.len(), 1);
    }

    #[test]
    fn orphans_are_reported_not_dropped_silently() {
        let resolution = resolve_spells(&spells(), casting());
        let orphans: Vec<&ResolutionIssue> = resolution
            .issues
            .iter()
            .filter(|i| matches!(i, ResolutionIssue::UnresolvedSpell { .. }))
            .collect();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].kind(), ItemKind::Spell);
        assert_eq!(orphans[0].fragment()["_id"], "orphan");
        assert!(orphans[0].to_string().contains("gone"));
    }

    #[test]
    fn every_linkable_spell_lands_once_or_is_reported() {
        let spells = spells();
        let resolution = resolve_spells(&spells, casting());
        let casting = &resolution.casting;

        for spell in spells.iter().filter(|s| s.is_linkable()) {
            let in_slots = casting
                .prepared
                .iter()
                .any(|c| c.slots.iter().any(|s| s.spell.as_ref() == Some(spell)));
            let in_focus = casting
                .focus
                .iter()
                .flat_map(|c| c.spells.iter())
                .filter(|s| *s == spell)
                .count();
            let in_innate = casting
                .innate
                .iter()
                .flat_map(|c| c.spells.iter())
                .filter(|u| &u.spell == spell)
                .count();
            let spontaneous = casting.spontaneous.iter().any(|c| c.id == spell.container_id);
            let reported = resolution.issues.iter().any(|i| {
                matches!(i, ResolutionIssue::UnresolvedSpell { spell_id, .. } if *spell_id == spell.id)
            });

            let placements = usize::from(in_slots) + in_focus + in_innate + usize::from(spontaneous);
            assert!(
                placements == 1 || (placements == 0 && reported),
                "spell {} placed {} times",
                spell.id,
                placements
            );
        }
    }

    #[test]
    fn duplicate_id_outside_the_slot_still_links_by_back_reference() {
        let spells = vec![spell("x", "prep"), spell("x", "innate")];
        let casting = SpellCasting {
            prepared: vec![prepared("prep", &[("slot1", "x")])],
            innate: vec![InnateCasting {
                id: "innate".into(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let resolution = resolve_spells(&spells, casting);

        assert_eq!(
            resolution.casting.prepared[0].slots[0].spell.as_ref(),
            Some(&spells[0])
        );
        let innate = &resolution.casting.innate[0].spells;
        assert_eq!(innate.len(), 1);
        assert_eq!(innate[0].spell, spells[1]);
        assert!(resolution.issues.is_empty());
    }

    #[test]
    fn duplicate_id_with_dangling_back_reference_is_reported() {
        let spells = vec![spell("x", "prep"), spell("x", "gone")];
        let casting = SpellCasting {
            prepared: vec![prepared("prep", &[("slot1", "x")])],
            ..Default::default()
        };

        let resolution = resolve_spells(&spells, casting);

        assert_eq!(
            resolution.issues,
            vec![ResolutionIssue::UnresolvedSpell {
                spell_id: "x".into(),
                spell_name: "Spell x".into(),
                container_id: "gone".into(),
            }]
        );
    }

    #[test]
    fn resolving_twice_is_idempotent() {
        let spells = spells();
        let once = resolve_spells(&spells, casting());
        let twice = resolve_spells(&spells, once.casting.clone());

        assert_eq!(once, twice);
        assert_eq!(twice.casting.attached_spell_count(), 5);
    }

    #[test]
    fn no_entries_reports_every_linkable_spell() {
        let resolution = resolve_spells(&spells(), SpellCasting::default());
        assert!(resolution.casting.is_empty());
        // Rituals excluded
        assert_eq!(resolution.issues.len(), 6);
    }
}
