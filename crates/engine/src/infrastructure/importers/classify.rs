//! Item classification: route each raw item record to its entity decoder.

use std::str::FromStr;

use serde_json::{json, Value};

use bestiary_domain::{
    Action, ActionType, Attack, FreeAction, Item, ItemKind, Passive, PreparationType, Reaction,
    Spell, SpellCastingContainer,
};

use super::extract::str_at;
use super::parsers;
use crate::infrastructure::ports::DiagnosticsSink;

/// The outcome of classifying one raw item record.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedItem {
    Action(Action),
    FreeAction(FreeAction),
    Reaction(Reaction),
    Passive(Passive),
    Melee(Attack),
    Ranged(Attack),
    Spell(Spell),
    Casting(SpellCastingContainer),
    Equipment(Item),
    /// A record with a type or sub-type the stat block has no place for.
    Unclassified { kind: ItemKind, reason: String },
}

/// Inspect the discriminants of one record and decode it.
pub fn classify(raw: &Value) -> ClassifiedItem {
    if !raw.is_object() {
        return unclassified(ItemKind::Unknown(String::new()), "item record is not an object");
    }

    let type_tag = str_at(raw, &["type"]);
    if type_tag.is_empty() {
        return unclassified(ItemKind::Unknown(String::new()), "item record has no type");
    }

    // ItemKind parsing is infallible; unknown tags land in ItemKind::Unknown
    let kind = ItemKind::from_str(&type_tag).unwrap_or_else(|_| ItemKind::Unknown(type_tag));

    match kind {
        ItemKind::Action => classify_action(raw, kind),
        ItemKind::Melee => classify_strike(raw, kind),
        ItemKind::Spell => ClassifiedItem::Spell(parsers::parse_spell(raw)),
        ItemKind::SpellcastingEntry => classify_casting(raw, kind),
        ItemKind::Condition => unclassified(kind, "conditions are represented by passives"),
        ItemKind::Unknown(_) => {
            let reason = format!("unknown item type '{}'", kind);
            unclassified(kind, reason)
        }
        _ if kind.is_equipment() => ClassifiedItem::Equipment(parsers::parse_item(raw, &kind)),
        _ => unclassified(kind, "item type has no decoder"),
    }
}

fn classify_action(raw: &Value, kind: ItemKind) -> ClassifiedItem {
    let sub_type = str_at(raw, &["system", "actionType", "value"]);
    match sub_type.parse::<ActionType>() {
        Ok(ActionType::Action) => ClassifiedItem::Action(parsers::parse_action(raw)),
        Ok(ActionType::Free) => ClassifiedItem::FreeAction(parsers::parse_free_action(raw)),
        Ok(ActionType::Reaction) => ClassifiedItem::Reaction(parsers::parse_reaction(raw)),
        Ok(ActionType::Passive) => ClassifiedItem::Passive(parsers::parse_passive(raw)),
        Err(_) => {
            let reason = format!("uncategorized action type '{}'", sub_type);
            unclassified(kind, reason)
        }
    }
}

fn classify_strike(raw: &Value, kind: ItemKind) -> ClassifiedItem {
    let weapon_type = str_at(raw, &["system", "weaponType", "value"]);
    match weapon_type.to_lowercase().as_str() {
        "" | "melee" => ClassifiedItem::Melee(parsers::parse_attack(raw)),
        "ranged" => ClassifiedItem::Ranged(parsers::parse_attack(raw)),
        other => {
            let reason = format!("unknown weapon type '{}'", other);
            unclassified(kind, reason)
        }
    }
}

fn classify_casting(raw: &Value, kind: ItemKind) -> ClassifiedItem {
    let preparation = str_at(raw, &["system", "prepared", "value"]);
    let container = match preparation.parse::<PreparationType>() {
        Ok(PreparationType::Prepared) => {
            SpellCastingContainer::Prepared(parsers::parse_prepared(raw))
        }
        Ok(PreparationType::Spontaneous) => {
            SpellCastingContainer::Spontaneous(parsers::parse_spontaneous(raw))
        }
        Ok(PreparationType::Focus) => SpellCastingContainer::Focus(parsers::parse_focus(raw)),
        Ok(PreparationType::Innate) => SpellCastingContainer::Innate(parsers::parse_innate(raw)),
        Err(_) => {
            let reason = format!("unknown spell preparation '{}'", preparation);
            return unclassified(kind, reason);
        }
    };
    ClassifiedItem::Casting(container)
}

fn unclassified(kind: ItemKind, reason: impl Into<String>) -> ClassifiedItem {
    ClassifiedItem::Unclassified {
        kind,
        reason: reason.into(),
    }
}

/// Per-kind collections built from one document's item list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedItems {
    pub actions: Vec<Action>,
    pub free_actions: Vec<FreeAction>,
    pub reactions: Vec<Reaction>,
    pub passives: Vec<Passive>,
    pub melee: Vec<Attack>,
    pub ranged: Vec<Attack>,
    pub spells: Vec<Spell>,
    pub containers: Vec<SpellCastingContainer>,
    pub inventory: Vec<Item>,
    /// Number of records handed to the diagnostics sink instead
    pub unclassified: usize,
}

impl ClassifiedItems {
    pub fn push(&mut self, item: ClassifiedItem) {
        match item {
            ClassifiedItem::Action(a) => self.actions.push(a),
            ClassifiedItem::FreeAction(a) => self.free_actions.push(a),
            ClassifiedItem::Reaction(r) => self.reactions.push(r),
            ClassifiedItem::Passive(p) => self.passives.push(p),
            ClassifiedItem::Melee(a) => self.melee.push(a),
            ClassifiedItem::Ranged(a) => self.ranged.push(a),
            ClassifiedItem::Spell(s) => self.spells.push(s),
            ClassifiedItem::Casting(c) => self.containers.push(c),
            ClassifiedItem::Equipment(i) => self.inventory.push(i),
            ClassifiedItem::Unclassified { .. } => self.unclassified += 1,
        }
    }

    /// Number of records placed in a typed collection.
    pub fn classified_len(&self) -> usize {
        self.actions.len()
            + self.free_actions.len()
            + self.reactions.len()
            + self.passives.len()
            + self.melee.len()
            + self.ranged.len()
            + self.spells.len()
            + self.containers.len()
            + self.inventory.len()
    }

    /// Classified plus unclassified: always the number of records seen.
    pub fn len(&self) -> usize {
        self.classified_len() + self.unclassified
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify every record, sending the ones with no typed home to `sink`.
pub fn classify_all(items: &[Value], sink: &dyn DiagnosticsSink) -> ClassifiedItems {
    let mut classified = ClassifiedItems::default();
    for raw in items {
        let item = classify(raw);
        if let ClassifiedItem::Unclassified { kind, reason } = &item {
            tracing::debug!(
                kind = %kind,
                item_id = %str_at(raw, &["_id"]),
                item_name = %parsers::label(raw),
                reason = %reason,
                "Item not classified"
            );
            if raw.is_object() {
                sink.record(kind, raw, reason);
            } else {
                sink.record(kind, &json!({ "value": raw }), reason);
            }
        }
        classified.push(item);
    }
    classified
}
