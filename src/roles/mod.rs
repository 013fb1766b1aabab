//! Role tags and the registry that owns them
//!
//! The registry is the only state that survives between ticks. It is an
//! owned value threaded through the tick by `&mut`, never a global, so a
//! test can build one, feed it spawn/destroy events and inspect membership.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::UnitTag;
use crate::snapshot::{Snapshot, Unit};

/// Behavioural tag selecting which rule set drives a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    QueenInject,
    QueenCreep,
    Defending,
    Attacking,
    Scouting,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::QueenInject,
        Role::QueenCreep,
        Role::Defending,
        Role::Attacking,
        Role::Scouting,
    ];
}

/// Mapping from unit identity to its single role.
///
/// Keyed by tag, so a unit can never hold two roles at once.
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    roles: AHashMap<UnitTag, Role>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or overwrite the role of a unit present in `snapshot`.
    ///
    /// Unknown tags are rejected so the registry never holds phantom entries.
    pub fn assign(&mut self, tag: UnitTag, role: Role, snapshot: &Snapshot) -> Result<()> {
        if !snapshot.contains(tag) {
            tracing::warn!(unit = %tag, ?role, "role assignment for unit absent from snapshot");
            return Err(EngineError::UnknownUnit(tag));
        }
        if let Some(previous) = self.roles.insert(tag, role) {
            if previous != role {
                tracing::debug!(unit = %tag, ?previous, ?role, "role reassigned");
            }
        }
        Ok(())
    }

    pub fn role_of(&self, tag: UnitTag) -> Option<Role> {
        self.roles.get(&tag).copied()
    }

    /// Members of `role` that are alive in `snapshot`, in snapshot order
    pub fn units_with_role<'s>(&self, role: Role, snapshot: &'s Snapshot) -> Vec<&'s Unit> {
        snapshot
            .units
            .iter()
            .filter(|u| self.roles.get(&u.tag) == Some(&role))
            .collect()
    }

    /// Move every member of `from` into `to`; returns how many moved
    pub fn switch_role(&mut self, from: Role, to: Role) -> usize {
        if from == to {
            return 0;
        }
        let mut moved = 0;
        for role in self.roles.values_mut() {
            if *role == from {
                *role = to;
                moved += 1;
            }
        }
        moved
    }

    /// Drop the entry for a destroyed unit
    pub fn remove(&mut self, tag: UnitTag) -> Option<Role> {
        self.roles.remove(&tag)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn count(&self, role: Role) -> usize {
        self.roles.values().filter(|r| **r == role).count()
    }
}
