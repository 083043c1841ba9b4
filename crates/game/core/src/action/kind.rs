//! Action kinds named in unit progression slots.

/// Kind of action a unit (or tile) can take.
///
/// The snake_case names are the tokens used in a unit definition's
/// `action_order`, e.g. `["move", "attack|capture"]`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    Move,
    Attack,
    Capture,
    Build,
    Retreat,
    Heal,
}

impl ActionKind {
    /// Actions limited by the unit's remaining movement budget.
    pub fn uses_movement(self) -> bool {
        matches!(self, ActionKind::Move | ActionKind::Retreat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slot_tokens() {
        assert_eq!("attack".parse::<ActionKind>(), Ok(ActionKind::Attack));
        assert_eq!("retreat".parse::<ActionKind>(), Ok(ActionKind::Retreat));
        assert!("fly".parse::<ActionKind>().is_err());
        assert_eq!(ActionKind::Capture.to_string(), "capture");
    }
}
