//! Mutable loadout built for one task execution.

use crate::task::OutfitSpec;

/// Equipment and companion choices to commit before a task acts.
///
/// Built from a task's [`OutfitSpec`], then adjusted by engine hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outfit {
    /// Items to wear, in request order.
    pub equips: Vec<String>,
    /// Companion to bring along.
    pub familiar: Option<String>,
    /// Preference modifiers handed to the loadout subsystem.
    pub modifiers: Vec<String>,
    /// Items never to wear.
    pub avoid: Vec<String>,
    /// Engine-default equipment should not be added.
    pub skip_defaults: bool,
}

impl Outfit {
    /// An empty loadout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the loadout requested by `spec`. Returns the outfit and
    /// whether every requested piece was accepted.
    #[must_use]
    pub fn from_spec(spec: &OutfitSpec) -> (Self, bool) {
        let mut outfit = Self {
            avoid: spec.avoid.clone(),
            skip_defaults: spec.skip_defaults,
            ..Self::default()
        };
        let mut complete = true;
        for item in &spec.equip {
            complete &= outfit.equip(item);
        }
        if let Some(familiar) = &spec.familiar {
            complete &= outfit.set_familiar(familiar);
        }
        if let Some(modifier) = &spec.modifier {
            outfit.modifiers.push(modifier.clone());
        }
        (outfit, complete)
    }

    /// Adds `item`. Returns false if the item is avoided.
    pub fn equip(&mut self, item: &str) -> bool {
        if self.avoid.iter().any(|a| a == item) {
            return false;
        }
        if !self.equips.iter().any(|e| e == item) {
            self.equips.push(item.to_string());
        }
        true
    }

    /// Picks the companion. Returns false if a different one was already chosen.
    pub fn set_familiar(&mut self, familiar: &str) -> bool {
        match &self.familiar {
            Some(current) => current == familiar,
            None => {
                self.familiar = Some(familiar.to_string());
                true
            }
        }
    }

    /// Whether `item` is part of the loadout.
    #[must_use]
    pub fn has_equip(&self, item: &str) -> bool {
        self.equips.iter().any(|e| e == item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_spec() {
        let spec = OutfitSpec {
            equip: vec!["hand towel".to_string()],
            familiar: Some("Baby Gravy Fairy".to_string()),
            modifier: Some("item".to_string()),
            avoid: vec!["Jurassic Parka".to_string()],
            skip_defaults: true,
        };
        let (outfit, complete) = Outfit::from_spec(&spec);

        assert!(complete);
        assert!(outfit.has_equip("hand towel"));
        assert_eq!(outfit.familiar.as_deref(), Some("Baby Gravy Fairy"));
        assert_eq!(outfit.modifiers, vec!["item"]);
        assert!(outfit.skip_defaults);
    }

    #[test]
    fn avoided_items_are_refused() {
        let spec = OutfitSpec {
            equip: vec!["Jurassic Parka".to_string()],
            avoid: vec!["Jurassic Parka".to_string()],
            ..OutfitSpec::default()
        };
        let (outfit, complete) = Outfit::from_spec(&spec);
        assert!(!complete);
        assert!(outfit.equips.is_empty());
    }

    #[test]
    fn second_familiar_conflicts() {
        let mut outfit = Outfit::new();
        assert!(outfit.set_familiar("Baby Gravy Fairy"));
        assert!(outfit.set_familiar("Baby Gravy Fairy"));
        assert!(!outfit.set_familiar("Mosquito"));
    }
}
