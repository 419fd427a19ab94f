//! ResourceDescriptor - a class-granted resource pool (rage charges, ki, spell slots)
//!
//! The category is derived from name, icon and location by
//! [`crate::classifier::classify`] and is never read from input.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::classifier::{classify, ResourceCategory};
use crate::ids::ResourceId;

/// Which rest is being taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RestKind {
    Short,
    Long,
}

/// A class resource pool.
///
/// # Invariants
///
/// - `current_value <= max_value`
/// - `category == classify(name, icon, location)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    id: ResourceId,
    name: String,
    icon: String,
    location: String,
    max_value: u32,
    current_value: u32,
    long_rest: bool,
    short_rest: bool,
    category: ResourceCategory,
}

impl ResourceDescriptor {
    /// Create a full pool that recovers on a long rest.
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        location: impl Into<String>,
        max_value: u32,
    ) -> Self {
        let name = name.into();
        let icon = icon.into();
        let location = location.into();
        let category = classify(&name, &icon, &location);
        Self {
            id: ResourceId::new(),
            name,
            icon,
            location,
            max_value,
            current_value: max_value,
            long_rest: true,
            short_rest: false,
            category,
        }
    }

    pub fn with_id(mut self, id: ResourceId) -> Self {
        self.id = id;
        self
    }

    /// Set the current value, clamped to the pool size.
    pub fn with_current(mut self, current: u32) -> Self {
        self.current_value = current.min(self.max_value);
        self
    }

    pub fn with_recovery(mut self, long_rest: bool, short_rest: bool) -> Self {
        self.long_rest = long_rest;
        self.short_rest = short_rest;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    pub fn current_value(&self) -> u32 {
        self.current_value
    }

    pub fn recovers_on_long_rest(&self) -> bool {
        self.long_rest
    }

    pub fn recovers_on_short_rest(&self) -> bool {
        self.short_rest
    }

    pub fn category(&self) -> ResourceCategory {
        self.category
    }

    pub fn is_depleted(&self) -> bool {
        self.current_value == 0
    }

    // =========================================================================
    // Mutation (current value only)
    // =========================================================================

    /// Spend up to `amount`; returns how much was actually spent.
    pub fn spend(&mut self, amount: u32) -> u32 {
        let spent = amount.min(self.current_value);
        self.current_value -= spent;
        spent
    }

    pub fn restore(&mut self, amount: u32) {
        self.current_value = self.current_value.saturating_add(amount).min(self.max_value);
    }

    /// Refill if this pool recovers on the given rest. A long rest also
    /// refills short-rest pools.
    pub fn recover(&mut self, rest: RestKind) {
        let refills = match rest {
            RestKind::Short => self.short_rest,
            RestKind::Long => self.long_rest || self.short_rest,
        };
        if refills {
            self.current_value = self.max_value;
        }
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

fn default_true() -> bool {
    true
}

/// Wire format. `type` is intentionally absent: the category is re-derived.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceDescriptorWireFormat {
    #[serde(default)]
    id: ResourceId,
    name: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    location: String,
    #[serde(alias = "max")]
    max_value: u32,
    #[serde(default, alias = "current")]
    current_value: Option<u32>,
    #[serde(default = "default_true", alias = "isLongRest")]
    long_rest: bool,
    #[serde(default, alias = "isShortRest")]
    short_rest: bool,
}

impl Serialize for ResourceDescriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = ResourceDescriptorWireFormat {
            id: self.id,
            name: self.name.clone(),
            icon: self.icon.clone(),
            location: self.location.clone(),
            max_value: self.max_value,
            current_value: Some(self.current_value),
            long_rest: self.long_rest,
            short_rest: self.short_rest,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ResourceDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = ResourceDescriptorWireFormat::deserialize(deserializer)?;
        let current = wire.current_value.unwrap_or(wire.max_value);
        Ok(
            ResourceDescriptor::new(wire.name, wire.icon, wire.location, wire.max_value)
                .with_id(wire.id)
                .with_current(current)
                .with_recovery(wire.long_rest, wire.short_rest),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod construction {
        use super::*;

        #[test]
        fn new_classifies_and_fills() {
            let rage = ResourceDescriptor::new("Ярость", "", "traits", 3);
            assert_eq!(rage.category(), ResourceCategory::Rage);
            assert_eq!(rage.current_value(), 3);
            assert!(rage.recovers_on_long_rest());
            assert!(!rage.recovers_on_short_rest());
        }

        #[test]
        fn current_is_clamped() {
            let pool = ResourceDescriptor::new("Ki", "", "", 4).with_current(9);
            assert_eq!(pool.current_value(), 4);
        }
    }

    mod mutation {
        use super::*;

        #[test]
        fn spend_saturates() {
            let mut pool = ResourceDescriptor::new("Ki", "", "", 4);
            assert_eq!(pool.spend(3), 3);
            assert_eq!(pool.spend(3), 1);
            assert!(pool.is_depleted());
        }

        #[test]
        fn restore_caps_at_max() {
            let mut pool = ResourceDescriptor::new("Ki", "", "", 4).with_current(1);
            pool.restore(10);
            assert_eq!(pool.current_value(), 4);
        }

        #[test]
        fn short_rest_only_refills_short_rest_pools() {
            let mut rage = ResourceDescriptor::new("Rage", "", "", 3).with_current(0);
            let mut ki = ResourceDescriptor::new("Ki", "", "", 5)
                .with_current(0)
                .with_recovery(false, true);
            rage.recover(RestKind::Short);
            ki.recover(RestKind::Short);
            assert_eq!(rage.current_value(), 0);
            assert_eq!(ki.current_value(), 5);
        }

        #[test]
        fn long_rest_refills_both() {
            let mut ki = ResourceDescriptor::new("Ki", "", "", 5)
                .with_current(0)
                .with_recovery(false, true);
            ki.recover(RestKind::Long);
            assert_eq!(ki.current_value(), 5);
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn category_is_derived_not_read() {
            let json = r#"{"name":"Ярость","max":3,"current":1,"type":"spellSlots"}"#;
            let pool: ResourceDescriptor = serde_json::from_str(json).unwrap();
            assert_eq!(pool.category(), ResourceCategory::Rage);
            assert_eq!(pool.current_value(), 1);
        }

        #[test]
        fn accepts_builder_flag_names() {
            let json = r#"{"name":"Ki","maxValue":5,"isLongRest":false,"isShortRest":true}"#;
            let pool: ResourceDescriptor = serde_json::from_str(json).unwrap();
            assert!(!pool.recovers_on_long_rest());
            assert!(pool.recovers_on_short_rest());
            assert_eq!(pool.current_value(), 5);
        }

        #[test]
        fn roundtrip() {
            let pool = ResourceDescriptor::new("Spell slots", "spell", "spells", 4).with_current(2);
            let json = serde_json::to_string(&pool).unwrap();
            assert!(!json.contains("category"));
            let back: ResourceDescriptor = serde_json::from_str(&json).unwrap();
            assert_eq!(back, pool);
        }
    }
}
