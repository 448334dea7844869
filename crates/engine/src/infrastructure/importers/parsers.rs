//! Entity decoders, one per concrete item kind.
//!
//! Each decoder is a pure function from one raw item record to one typed
//! entity. Decoders never look at sibling records and never fail: absent
//! fields fall back to the defaults documented in [`super::extract`].

use serde_json::Value;

use bestiary_domain::{
    Action, Attack, DamageBlock, DamageEffect, FocusCasting, FreeAction, InnateCasting, Item,
    ItemKind, Passive, PreparedCasting, PreparedSlot, Price, Reaction, RitualData, Slot, Spell,
    SpellArea, SpellDefense, SpellDuration, SpellUses, SpontaneousCasting,
};

use super::extract::{
    bool_at, entries_at, has, i32_at, int_at, list_at, modifier_at, str_at, str_at_any,
    u32_at, value_at,
};
use super::sanitize::sanitize;

fn id(raw: &Value) -> String {
    str_at(raw, &["_id"])
}

fn name(raw: &Value) -> String {
    str_at(raw, &["name"])
}

fn description(raw: &Value) -> String {
    sanitize(&str_at(raw, &["system", "description", "value"]))
}

fn traits(raw: &Value) -> Vec<String> {
    list_at(raw, &["system", "traits", "value"])
}

fn rarity(raw: &Value) -> String {
    str_at(raw, &["system", "traits", "rarity"])
}

fn category(raw: &Value) -> String {
    str_at(raw, &["system", "category"])
}

// === Actions ===

pub fn parse_action(raw: &Value) -> Action {
    Action {
        id: id(raw),
        name: name(raw),
        actions: u32_at(raw, &["system", "actions", "value"]),
        description: description(raw),
        traits: traits(raw),
        category: category(raw),
        rarity: rarity(raw),
    }
}

pub fn parse_free_action(raw: &Value) -> FreeAction {
    FreeAction {
        id: id(raw),
        name: name(raw),
        description: description(raw),
        traits: traits(raw),
        category: category(raw),
        rarity: rarity(raw),
    }
}

pub fn parse_reaction(raw: &Value) -> Reaction {
    Reaction {
        id: id(raw),
        name: name(raw),
        description: description(raw),
        traits: traits(raw),
        category: category(raw),
        rarity: rarity(raw),
    }
}

pub fn parse_passive(raw: &Value) -> Passive {
    Passive {
        id: id(raw),
        name: name(raw),
        description: description(raw),
        traits: traits(raw),
        category: category(raw),
    }
}

// === Strikes ===

/// Decode a melee or ranged Strike.
///
/// Damage rolls are stored either as an object keyed by roll id (current
/// format) or as a plain list (older exports); both keep source order.
pub fn parse_attack(raw: &Value) -> Attack {
    let rolls: Vec<&Value> = match value_at(raw, &["system", "damageRolls"]) {
        Some(Value::Object(map)) => map.values().collect(),
        Some(Value::Array(items)) => items.iter().collect(),
        _ => Vec::new(),
    };

    let damage = rolls
        .into_iter()
        .map(|roll| DamageBlock {
            roll: str_at(roll, &["damage"]),
            damage_type: str_at(roll, &["damageType"]),
        })
        .filter(|block| !block.roll.is_empty())
        .collect();

    Attack {
        id: id(raw),
        name: name(raw),
        to_hit: modifier_at(raw, &["system", "bonus", "value"]),
        damage,
        traits: traits(raw),
        effect: DamageEffect {
            custom_text: str_at(raw, &["system", "attackEffects", "custom"]),
            conditions: list_at(raw, &["system", "attackEffects", "value"]),
        },
    }
}

// === Spells ===

/// Decode a spell record.
///
/// Besides the literal fields, four values are derived here:
///
/// - `cast_level`: the entry's heightened level if set, else the spell level
/// - `ritual`: whether a ritual block is present
/// - `container_id`: the back-reference to the spellcasting entry, or empty
/// - `uses`/`at_will`: a uses block gives its count; a linked non-ritual
///   spell without one is at will; anything else gets a single use
pub fn parse_spell(raw: &Value) -> Spell {
    let base_level = u32_at(raw, &["system", "level", "value"]);
    let cast_level = if has(raw, &["system", "location", "heightenedLevel"]) {
        u32_at(raw, &["system", "location", "heightenedLevel"])
    } else {
        base_level
    };

    let container_id = str_at(raw, &["system", "location", "value"]);
    let ritual = matches!(value_at(raw, &["system", "ritual"]), Some(Value::Object(_)));

    let uses = match value_at(raw, &["system", "location", "uses"]) {
        Some(block @ Value::Object(_)) => {
            let count = if has(block, &["value"]) {
                u32_at(block, &["value"])
            } else if has(block, &["max"]) {
                u32_at(block, &["max"])
            } else {
                1
            };
            SpellUses::Limited(count)
        }
        _ if !ritual && !container_id.is_empty() => SpellUses::Unlimited,
        _ => SpellUses::default(),
    };

    let ritual_data = if ritual {
        RitualData {
            primary_check: str_at(raw, &["system", "ritual", "primary", "check"]),
            secondary_casters: u32_at(raw, &["system", "ritual", "secondary", "casters"]),
            secondary_check: str_at(raw, &["system", "ritual", "secondary", "checks"]),
        }
    } else {
        RitualData::default()
    };

    Spell {
        id: id(raw),
        name: name(raw),
        cast_level,
        base_level,
        description: description(raw),
        range: str_at(raw, &["system", "range", "value"]),
        area: SpellArea {
            area_type: str_at(raw, &["system", "area", "type"]),
            value: u32_at(raw, &["system", "area", "value"]),
            detail: str_at(raw, &["system", "area", "details"]),
        },
        duration: SpellDuration {
            sustained: bool_at(raw, &["system", "duration", "sustained"]),
            text: str_at(raw, &["system", "duration", "value"]),
        },
        targets: str_at(raw, &["system", "target", "value"]),
        traits: traits(raw),
        defense: parse_spell_defense(raw),
        cast_time: str_at(raw, &["system", "time", "value"]),
        requirements: str_at(raw, &["system", "requirements"]),
        rarity: rarity(raw),
        at_will: uses.is_unlimited(),
        container_id,
        uses,
        ritual,
        ritual_data,
    }
}

/// Current records keep the save under `defense.save`; older ones use `save`
/// with `basic` stored as the marker string "basic".
fn parse_spell_defense(raw: &Value) -> SpellDefense {
    if has(raw, &["system", "defense", "save"]) {
        SpellDefense {
            save_type: str_at(raw, &["system", "defense", "save", "statistic"]),
            basic: bool_at(raw, &["system", "defense", "save", "basic"]),
        }
    } else {
        SpellDefense {
            save_type: str_at(raw, &["system", "save", "value"]),
            basic: bool_at(raw, &["system", "save", "basic"]),
        }
    }
}

// === Spellcasting entries ===

struct EntryHeader {
    id: String,
    name: String,
    dc: i32,
    modifier: String,
    tradition: String,
}

fn entry_header(raw: &Value) -> EntryHeader {
    EntryHeader {
        id: id(raw),
        name: name(raw),
        dc: i32_at(raw, &["system", "spelldc", "dc"]),
        modifier: modifier_at(raw, &["system", "spelldc", "value"]),
        tradition: str_at(raw, &["system", "tradition", "value"]),
    }
}

/// Decode a prepared entry: one [`PreparedSlot`] per spell prepared in each
/// slot group, with the spell itself left for the resolver.
pub fn parse_prepared(raw: &Value) -> PreparedCasting {
    let header = entry_header(raw);

    let mut slots = Vec::new();
    for (label, slot) in entries_at(raw, &["system", "slots"]) {
        let prepared: Vec<&Value> = match value_at(slot, &["prepared"]) {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(Value::Object(map)) => map.values().collect(),
            _ => Vec::new(),
        };
        for entry in prepared {
            let spell_id = str_at(entry, &["id"]);
            if spell_id.is_empty() {
                continue;
            }
            slots.push(PreparedSlot {
                level_label: label.to_string(),
                spell_id,
                spell: None,
            });
        }
    }

    PreparedCasting {
        id: header.id,
        name: header.name,
        dc: header.dc,
        modifier: header.modifier,
        tradition: header.tradition,
        slots,
    }
}

/// Decode a spontaneous entry: slot groups with at least one cast per day.
pub fn parse_spontaneous(raw: &Value) -> SpontaneousCasting {
    let header = entry_header(raw);

    let slots = entries_at(raw, &["system", "slots"])
        .into_iter()
        .map(|(label, slot)| Slot {
            level_label: label.to_string(),
            max_casts: u32_at(slot, &["max"]),
        })
        // Rows with no capacity (usually slot0) are not slots the caster has
        .filter(|slot| slot.max_casts > 0)
        .collect();

    SpontaneousCasting {
        id: header.id,
        name: header.name,
        dc: header.dc,
        modifier: header.modifier,
        tradition: header.tradition,
        slots,
    }
}

pub fn parse_focus(raw: &Value) -> FocusCasting {
    let header = entry_header(raw);
    FocusCasting {
        id: header.id,
        name: header.name,
        description: description(raw),
        dc: header.dc,
        modifier: header.modifier,
        tradition: header.tradition,
        cast_level: u32_at(raw, &["system", "autoHeightenLevel", "value"]),
        spells: Vec::new(),
    }
}

pub fn parse_innate(raw: &Value) -> InnateCasting {
    let header = entry_header(raw);
    InnateCasting {
        id: header.id,
        name: header.name,
        description: description(raw),
        dc: header.dc,
        modifier: header.modifier,
        tradition: header.tradition,
        spells: Vec::new(),
    }
}

// === Equipment ===

/// Decode any equipment-like record (weapon, armor, consumable, ...).
///
/// A record without `price.per` or `quantity` means one item, so both default
/// to 1 rather than 0.
pub fn parse_item(raw: &Value, kind: &ItemKind) -> Item {
    let per = int_at(raw, &["system", "price", "per"]);

    Item {
        id: id(raw),
        name: name(raw),
        category: category(raw),
        level: i32_at(raw, &["system", "level", "value"]),
        description: description(raw),
        price: Price {
            cp: u32_at(raw, &["system", "price", "value", "cp"]),
            sp: u32_at(raw, &["system", "price", "value", "sp"]),
            gp: u32_at(raw, &["system", "price", "value", "gp"]),
            pp: u32_at(raw, &["system", "price", "value", "pp"]),
            per: if per > 0 { u32_at(raw, &["system", "price", "per"]) } else { 1 },
        },
        item_type: kind.to_string(),
        traits: traits(raw),
        rarity: rarity(raw),
        range: item_range(raw),
        size: str_at(raw, &["system", "size"]),
        reload: str_at(raw, &["system", "reload", "value"]),
        bulk: modifier_at(raw, &["system", "bulk", "value"]),
        quantity: if has(raw, &["system", "quantity"]) {
            u32_at(raw, &["system", "quantity"])
        } else {
            1
        },
    }
}

/// Weapon range is a bare number in current records and `{value}` in older ones.
fn item_range(raw: &Value) -> String {
    match value_at(raw, &["system", "range"]) {
        Some(Value::Object(_)) => modifier_at(raw, &["system", "range", "value"]),
        Some(_) => modifier_at(raw, &["system", "range"]),
        None => String::new(),
    }
}

/// Display label for a record, used in diagnostics.
pub fn label(raw: &Value) -> String {
    str_at_any(raw, &[&["name"], &["_id"]])
}
