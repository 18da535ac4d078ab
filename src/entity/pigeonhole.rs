//! Pigeonholes: fixed two-slot shelters where pigeons hide and breed
//!
//! Each hole has one slot per gender. A pigeon can only enter through its
//! gender's entrance point, and only while that slot is free. Two occupants
//! that are both able to breed start a 150 frame breeding timer; the hole
//! reports completion so the world can add the offspring.

use serde::{Deserialize, Serialize};

use crate::core::error::{ColonyError, Result};
use crate::core::types::{EntityId, Gender, HoleId, Vec2};
use crate::entity::pigeon::Pigeon;

/// Frames of undisturbed breeding needed to produce an offspring
pub const BREEDING_FRAMES: u32 = 150;

/// Entrance offsets from the hole's top-left corner
const MALE_ENTRANCE_X: i32 = 20;
const FEMALE_ENTRANCE_X: i32 = 15;
const ENTRANCE_Y: i32 = 18;

/// Occupancy and breeding state of a pigeonhole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShelterState {
    Empty,
    SingleOccupant(Gender),
    Paired,
    Breeding { timer: u32 },
}

/// Facts about the current pair that the breeding timer depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairStatus {
    /// Both occupants satisfy `Pigeon::can_breed`
    pub both_can_breed: bool,
    /// Both occupants are younger than the old-age cutoff
    pub both_young: bool,
}

/// Result of advancing the breeding timer by one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreedingStep {
    /// Not breeding and the pair is not eligible
    Idle,
    /// Timer started this frame; both occupants must start breeding
    Started,
    Continuing,
    /// An occupant aged out, the attempt was abandoned
    Aborted,
    /// The timer reached `BREEDING_FRAMES`; an offspring is due
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pigeonhole {
    id: HoleId,
    x: i32,
    y: i32,
    slots: [Option<EntityId>; 2],
    breed_timer: u32,
}

impl Pigeonhole {
    pub fn new(id: HoleId, x: i32, y: i32) -> Self {
        Self {
            id,
            x,
            y,
            slots: [None, None],
            breed_timer: 0,
        }
    }

    pub fn id(&self) -> HoleId {
        self.id
    }

    /// Top-left corner of the 40x40 hole
    pub fn corner(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Where a pigeon of `gender` must stand to enter
    pub fn entrance(&self, gender: Gender) -> Vec2 {
        let dx = match gender {
            Gender::Male => MALE_ENTRANCE_X,
            Gender::Female => FEMALE_ENTRANCE_X,
        };
        Vec2::new((self.x + dx) as f64, (self.y + ENTRANCE_Y) as f64)
    }

    pub fn is_filled(&self, gender: Gender) -> bool {
        self.slots[gender.slot()].is_some()
    }

    pub fn occupant(&self, gender: Gender) -> Option<EntityId> {
        self.slots[gender.slot()]
    }

    pub fn occupants(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn breed_timer(&self) -> u32 {
        self.breed_timer
    }

    pub fn state(&self) -> ShelterState {
        match (self.slots[0], self.slots[1]) {
            (None, None) => ShelterState::Empty,
            (Some(_), None) => ShelterState::SingleOccupant(Gender::Male),
            (None, Some(_)) => ShelterState::SingleOccupant(Gender::Female),
            (Some(_), Some(_)) if self.breed_timer > 0 => ShelterState::Breeding {
                timer: self.breed_timer,
            },
            (Some(_), Some(_)) => ShelterState::Paired,
        }
    }

    /// Whether a pigeon of `gender` would find a breeding partner here
    ///
    /// `partner_ready` reports whether the opposite occupant can breed.
    pub fn can_breed(&self, gender: Gender, partner_ready: impl FnOnce(EntityId) -> bool) -> bool {
        if self.is_filled(gender) {
            return false;
        }
        match self.occupant(gender.opposite()) {
            Some(partner) => partner_ready(partner),
            None => false,
        }
    }

    /// Put a pigeon standing at its entrance into its gender's slot
    pub fn fill(&mut self, pigeon: &Pigeon) -> Result<()> {
        let gender = pigeon.gender();
        if self.is_filled(gender) {
            return Err(ColonyError::SlotOccupied {
                hole: self.id,
                gender,
            });
        }
        if pigeon.position().floor() != self.entrance(gender) {
            return Err(ColonyError::NotAtEntrance {
                pigeon: pigeon.id(),
                hole: self.id,
            });
        }

        self.slots[gender.slot()] = Some(pigeon.id());
        Ok(())
    }

    /// Take a pigeon out of its slot; any breeding in progress is lost
    pub fn release(&mut self, pigeon: &Pigeon) -> Result<()> {
        let slot = &mut self.slots[pigeon.gender().slot()];
        if *slot != Some(pigeon.id()) {
            return Err(ColonyError::NotInHole {
                pigeon: pigeon.id(),
                hole: self.id,
            });
        }

        *slot = None;
        self.breed_timer = 0;
        Ok(())
    }

    /// Empty the slots whose occupant is gone
    ///
    /// Returns true if anything was cleared. Clearing an occupant also stops
    /// the breeding timer, so a later partner never inherits a half-finished
    /// attempt.
    pub fn clear_departed(&mut self, is_gone: impl Fn(EntityId) -> bool) -> bool {
        let mut cleared = false;
        for slot in self.slots.iter_mut() {
            if slot.is_some_and(|id| is_gone(id)) {
                *slot = None;
                cleared = true;
            }
        }
        if cleared {
            self.breed_timer = 0;
        }
        cleared
    }

    /// Advance the breeding timer for one frame
    ///
    /// Only meaningful while both slots are occupied.
    pub fn advance_breeding(&mut self, pair: PairStatus) -> BreedingStep {
        if self.slots[0].is_none() || self.slots[1].is_none() {
            return BreedingStep::Idle;
        }

        if self.breed_timer == 0 {
            if pair.both_can_breed {
                self.breed_timer = 1;
                return BreedingStep::Started;
            }
            return BreedingStep::Idle;
        }

        if !pair.both_young {
            self.breed_timer = 0;
            return BreedingStep::Aborted;
        }

        self.breed_timer += 1;
        if self.breed_timer == BREEDING_FRAMES {
            self.breed_timer = 0;
            return BreedingStep::Completed;
        }
        BreedingStep::Continuing
    }
}
