//! In-process game simulation for headless testing without a game client.
//!
//! [`SimWorld`] plays the part of both collaborators around the core: it is
//! an [`InputSink`] that applies every action to a tiny game world, and it
//! produces the [`WorldSnapshot`] the vision layer would have decoded.  This
//! lets the full stack run in CI and in the CLI demo.
//!
//! Inputs can be delayed by a fixed number of ticks
//! ([`with_latency`][SimWorld::with_latency]) to mimic the round trip between
//! sending a key press and seeing its effect on screen.
//!
//! # Example
//!
//! ```rust
//! use waypilot_hal::{InputSink, SimWorld};
//! use waypilot_types::{Direction, FloorGrid, InputAction, Tile};
//!
//! let mut world = SimWorld::new(FloorGrid::open(7, 5, 5), Tile::new(1, 1, 7));
//! world.dispatch(&InputAction::Step(Direction::East)).unwrap();
//! world.advance();
//! assert_eq!(world.snapshot().player_tile(), Some(Tile::new(2, 1, 7)));
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::{debug, trace};
use waypilot_types::{
    Corpse, CorpseId, Creature, CreatureId, FloorGrid, InputAction, InventorySlot, MouseButton,
    PilotError, PlayerFix, ScreenProfile, SlotRef, Tile, Vitals, WorldSnapshot,
};

use crate::input::InputSink;
use crate::screen::ScreenMapper;

const POTION_HEAL: u8 = 40;
const SPELL_HEAL: u8 = 15;
const SPELL_MANA_COST: u8 = 20;

// ────────────────────────────────────────────────────────────────────────────
// Floor transitions
// ────────────────────────────────────────────────────────────────────────────

/// What makes a [`Transition`] fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Walking onto the tile (ramps, stairs, holes).
    Step,
    /// Using `item` on the tile (rope spots, shovel holes).
    Use { item: String },
    /// Right-clicking the tile (ladders, grates).
    RightClick,
}

/// A floor change: firing `trigger` at `at` moves the player to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub trigger: Trigger,
    pub at: Tile,
    pub to: Tile,
}

// ────────────────────────────────────────────────────────────────────────────
// SimWorld
// ────────────────────────────────────────────────────────────────────────────

/// A minimal game world driven by [`InputAction`]s.
pub struct SimWorld {
    floors: HashMap<i32, Arc<FloorGrid>>,
    player: Tile,
    confidence: f32,
    vitals: Vitals,
    creatures: Vec<Creature>,
    corpses: Vec<Corpse>,
    inventory: Vec<InventorySlot>,
    /// Contents that appear in the inventory once the container is opened.
    hidden: HashMap<SlotRef, Vec<InventorySlot>>,
    transitions: Vec<Transition>,
    profile: ScreenProfile,
    latency_ticks: u32,
    pending: VecDeque<(u32, InputAction)>,
    melee_damage: u8,
    next_corpse_id: u64,
    dispatched: Vec<InputAction>,
}

impl SimWorld {
    /// A world with a single floor and the player standing at `player`.
    pub fn new(floor: FloorGrid, player: Tile) -> Self {
        let mut floors = HashMap::new();
        floors.insert(floor.z(), Arc::new(floor));
        Self {
            floors,
            player,
            confidence: 1.0,
            vitals: Vitals::default(),
            creatures: Vec::new(),
            corpses: Vec::new(),
            inventory: Vec::new(),
            hidden: HashMap::new(),
            transitions: Vec::new(),
            profile: ScreenProfile::default(),
            latency_ticks: 0,
            pending: VecDeque::new(),
            melee_damage: 25,
            next_corpse_id: 1,
            dispatched: Vec::new(),
        }
    }

    /// Add (or replace) another floor.
    pub fn with_floor(mut self, floor: FloorGrid) -> Self {
        self.floors.insert(floor.z(), Arc::new(floor));
        self
    }

    pub fn with_creature(mut self, id: u32, tile: Tile, whitelisted: bool) -> Self {
        self.creatures.push(Creature {
            id: CreatureId(id),
            tile,
            health_percent: 100,
            targeted: false,
            whitelisted,
        });
        self
    }

    pub fn with_corpse(mut self, tile: Tile) -> Self {
        self.spawn_corpse(tile);
        self
    }

    pub fn with_item(mut self, slot: SlotRef, item: &str, count: u32) -> Self {
        self.inventory.push(InventorySlot {
            slot,
            item: item.to_string(),
            count,
            is_container: false,
        });
        self
    }

    /// A closed container at `slot` that reveals `contents` when opened.
    pub fn with_container(mut self, slot: SlotRef, contents: Vec<InventorySlot>) -> Self {
        self.inventory.push(InventorySlot {
            slot,
            item: "backpack".to_string(),
            count: 1,
            is_container: true,
        });
        self.hidden.insert(slot, contents);
        self
    }

    pub fn with_transition(mut self, trigger: Trigger, at: Tile, to: Tile) -> Self {
        self.transitions.push(Transition { trigger, at, to });
        self
    }

    /// Delay every action by `ticks` calls to [`advance`][Self::advance].
    pub fn with_latency(mut self, ticks: u32) -> Self {
        self.latency_ticks = ticks;
        self
    }

    pub fn with_vitals(mut self, vitals: Vitals) -> Self {
        self.vitals = vitals;
        self
    }

    /// Damage a targeted adjacent creature takes per tick.
    pub fn with_melee_damage(mut self, damage: u8) -> Self {
        self.melee_damage = damage;
        self
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn player(&self) -> Tile {
        self.player
    }

    pub fn vitals(&self) -> Vitals {
        self.vitals
    }

    pub fn set_vitals(&mut self, vitals: Vitals) {
        self.vitals = vitals;
    }

    /// Simulate a decoder that is unsure about the player's position.
    pub fn set_position_confidence(&mut self, confidence: f32) {
        self.confidence = confidence;
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn corpses(&self) -> &[Corpse] {
        &self.corpses
    }

    pub fn move_creature(&mut self, id: u32, tile: Tile) {
        if let Some(c) = self.creatures.iter_mut().find(|c| c.id == CreatureId(id)) {
            c.tile = tile;
        }
    }

    /// Remove a creature without leaving a corpse (it walked out of view).
    pub fn remove_creature(&mut self, id: u32) {
        self.creatures.retain(|c| c.id != CreatureId(id));
    }

    /// Every action accepted by [`dispatch`][InputSink::dispatch], in order.
    pub fn dispatched(&self) -> &[InputAction] {
        &self.dispatched
    }

    // ── simulation ───────────────────────────────────────────────────────

    /// Advance the world by one tick: apply due inputs, then resolve melee.
    pub fn advance(&mut self) {
        let mut due = Vec::new();
        for entry in self.pending.iter_mut() {
            entry.0 = entry.0.saturating_sub(1);
        }
        while self.pending.front().is_some_and(|(left, _)| *left == 0) {
            if let Some((_, action)) = self.pending.pop_front() {
                due.push(action);
            }
        }
        for action in due {
            self.apply(&action);
        }
        self.resolve_melee();
    }

    /// The snapshot a perfect decoder would produce right now.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            player: Some(PlayerFix {
                tile: self.player,
                confidence: self.confidence,
            }),
            vitals: self.vitals,
            creatures: self.creatures.clone(),
            corpses: self.corpses.clone(),
            inventory: self.inventory.clone(),
            floor: self.floors.get(&self.player.z).cloned(),
            profile: self.profile,
        }
    }

    fn resolve_melee(&mut self) {
        let player = self.player;
        let damage = self.melee_damage;
        let mut killed = Vec::new();
        for c in self.creatures.iter_mut() {
            if c.targeted && c.tile.is_adjacent(&player) {
                c.health_percent = c.health_percent.saturating_sub(damage);
                if c.health_percent == 0 {
                    killed.push((c.id, c.tile));
                }
            }
        }
        for (id, tile) in killed {
            debug!(creature = id.0, %tile, "sim creature died");
            self.creatures.retain(|c| c.id != id);
            self.spawn_corpse(tile);
        }
    }

    fn spawn_corpse(&mut self, tile: Tile) {
        self.corpses.push(Corpse {
            id: CorpseId(self.next_corpse_id),
            tile,
        });
        self.next_corpse_id += 1;
    }

    fn relative(&self, dx: i32, dy: i32) -> Tile {
        Tile::new(self.player.x + dx, self.player.y + dy, self.player.z)
    }

    fn transition(&self, at: Tile, pred: impl Fn(&Trigger) -> bool) -> Option<Tile> {
        self.transitions
            .iter()
            .find(|t| t.at == at && pred(&t.trigger))
            .map(|t| t.to)
    }

    fn apply(&mut self, action: &InputAction) {
        trace!(%action, "sim apply");
        match action {
            InputAction::Step(dir) => {
                let to = self.player.offset(*dir);
                if let Some(dest) = self.transition(to, |t| *t == Trigger::Step) {
                    self.player = dest;
                    return;
                }
                let walkable = self
                    .floors
                    .get(&to.z)
                    .is_some_and(|f| f.is_walkable(to));
                let occupied = self.creatures.iter().any(|c| c.tile == to);
                if walkable && !occupied {
                    self.player = to;
                }
            }
            InputAction::Click {
                dx,
                dy,
                button: MouseButton::Left,
            } => {
                let tile = self.relative(*dx, *dy);
                if self.creatures.iter().any(|c| c.tile == tile) {
                    for c in self.creatures.iter_mut() {
                        c.targeted = c.tile == tile;
                    }
                }
            }
            InputAction::Click {
                dx,
                dy,
                button: MouseButton::Right,
            } => {
                let tile = self.relative(*dx, *dy);
                let before = self.corpses.len();
                self.corpses.retain(|c| c.tile != tile);
                if self.corpses.len() < before {
                    return;
                }
                if let Some(dest) = self.transition(tile, |t| *t == Trigger::RightClick) {
                    self.player = dest;
                }
            }
            InputAction::UseItemOn { item, dx, dy } => {
                if self.inventory.iter().all(|s| s.item != *item || s.count == 0) {
                    return;
                }
                let tile = self.relative(*dx, *dy);
                let dest = self.transition(tile, |t| {
                    matches!(t, Trigger::Use { item: needed } if needed == item)
                });
                if let Some(dest) = dest {
                    self.player = dest;
                }
            }
            InputAction::UseSlot { slot } => {
                let Some(entry) = self
                    .inventory
                    .iter_mut()
                    .find(|s| s.slot == *slot && s.count > 0)
                else {
                    return;
                };
                if entry.item.contains("potion") {
                    entry.count -= 1;
                    self.vitals.health_percent =
                        self.vitals.health_percent.saturating_add(POTION_HEAL).min(100);
                }
            }
            InputAction::OpenContainer { slot } => {
                if let Some(contents) = self.hidden.remove(slot) {
                    for s in self.inventory.iter_mut().filter(|s| s.slot == *slot) {
                        s.is_container = false;
                    }
                    self.inventory.extend(contents);
                }
            }
            InputAction::Hotkey(_) => {
                if self.vitals.mana_percent >= SPELL_MANA_COST {
                    self.vitals.mana_percent -= SPELL_MANA_COST;
                    self.vitals.health_percent =
                        self.vitals.health_percent.saturating_add(SPELL_HEAL).min(100);
                }
            }
        }
    }
}

impl InputSink for SimWorld {
    fn dispatch(&mut self, action: &InputAction) -> Result<(), PilotError> {
        let offset = match action {
            InputAction::Click { dx, dy, .. } | InputAction::UseItemOn { dx, dy, .. } => {
                Some((*dx, *dy))
            }
            _ => None,
        };
        if let Some((dx, dy)) = offset {
            if ScreenMapper::new(self.profile).pixel_for(dx, dy).is_none() {
                return Err(PilotError::Input {
                    action: action.to_string(),
                    details: "target is off screen".to_string(),
                });
            }
        }
        self.dispatched.push(action.clone());
        if self.latency_ticks == 0 {
            self.apply(action);
        } else {
            self.pending.push_back((self.latency_ticks, action.clone()));
        }
        Ok(())
    }
}
