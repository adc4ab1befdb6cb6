use crate::battle::ai::RandomBehavior;
use crate::battle::state::{BattleSession, EventBus, TurnRng};
use crate::battle::trainer::OpponentParty;
use crate::battle::turn_orchestrator::resolve_player_action;
use crate::config::BattleConfig;
use crate::errors::{ActionError, BattleEngineError, BattleResult};
use crate::host::{
    AmbientToken, Backpack, BattleHost, ConditionFlags, ExplorationBridge, PalRoster, Roster,
};
use crate::pal::Pal;
use crate::player::PlayerAction;
use pal_schema::{ItemKind, MoveSet, PalTemplate};
use std::sync::Arc;

/// The ambient token the test world starts in.
pub const TEST_AMBIENT: AmbientToken = AmbientToken::new(7);

/// A builder for creating test Pal instances with common defaults.
///
/// # Example
/// ```ignore
/// let pal = TestPalBuilder::new("Bramblet")
///     .with_max_hp(20)
///     .with_hp(10)
///     .build();
/// ```
pub struct TestPalBuilder {
    template: PalTemplate,
    hp: Option<u32>,
    uses: Option<(u32, u32)>,
}

impl TestPalBuilder {
    /// Creates a builder with the stock stat line: 50 HP, 10/15 damage, 15/5 uses.
    pub fn new(name: &str) -> Self {
        Self {
            template: PalTemplate::named(name),
            hp: None,
            uses: None,
        }
    }

    pub fn with_max_hp(mut self, max_hp: u32) -> Self {
        self.template.max_hp = max_hp;
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn with_damage(mut self, basic: u32, special: u32) -> Self {
        self.template.base_attack_damage = basic;
        self.template.base_special_attack_damage = special;
        self
    }

    /// Sets the remaining uses in each pool, leaving the maximums alone.
    pub fn with_uses(mut self, basic: u32, special: u32) -> Self {
        self.uses = Some((basic, special));
        self
    }

    pub fn with_moves(mut self, basic: &str, special: &str) -> Self {
        self.template.moves = MoveSet::new(basic, special);
        self
    }

    pub fn build(self) -> Pal {
        let mut pal = Pal::from_template(Arc::new(self.template));
        if let Some(hp) = self.hp {
            pal.hp = hp.min(pal.max_hp);
        }
        if let Some((basic, special)) = self.uses {
            pal.basic_attack_uses = basic;
            pal.special_attack_uses = special;
        }
        pal
    }
}

/// In-memory collaborators for runner-level tests.
pub struct TestWorld {
    pub backpack: Backpack,
    pub roster: PalRoster,
    pub world: ExplorationBridge,
    pub quests: ConditionFlags,
}

impl TestWorld {
    pub fn new(pals: Vec<Pal>) -> Self {
        Self {
            backpack: Backpack::new(),
            roster: PalRoster::new(pals),
            world: ExplorationBridge::new(TEST_AMBIENT),
            quests: ConditionFlags::new(),
        }
    }

    pub fn with_items(mut self, items: &[(ItemKind, u32)]) -> Self {
        self.backpack = Backpack::with_items(items);
        self
    }

    pub fn host(&mut self) -> BattleHost<'_> {
        BattleHost::new(
            &mut self.backpack,
            &mut self.roster,
            &mut self.world,
            &mut self.quests,
        )
    }
}

/// A session already in progress plus its collaborators, for driving the
/// orchestrator directly. Nothing is restored on construction, so HP and
/// energy are exactly what the builders set.
pub struct HostFixture {
    pub session: BattleSession,
    pub backpack: Backpack,
    pub roster: PalRoster,
    pub world: ExplorationBridge,
    pub quests: ConditionFlags,
}

impl HostFixture {
    /// Slot 0 of `roster` fights a wild `opponent`.
    pub fn wild(roster: Vec<Pal>, opponent: Pal) -> Self {
        Self::against(roster, OpponentParty::wild(opponent))
    }

    pub fn trainer(roster: Vec<Pal>, trainer: &str, party: Vec<Pal>) -> Self {
        let party = match OpponentParty::trainer(trainer, party) {
            Ok(party) => party,
            Err(err) => panic!("Failed to build trainer party: {}", err),
        };
        Self::against(roster, party)
    }

    fn against(roster: Vec<Pal>, opponents: OpponentParty) -> Self {
        Self {
            session: BattleSession::new(0, opponents, TEST_AMBIENT),
            backpack: Backpack::new(),
            roster: PalRoster::new(roster),
            world: ExplorationBridge::new(TEST_AMBIENT),
            quests: ConditionFlags::new(),
        }
    }

    pub fn with_items(mut self, items: &[(ItemKind, u32)]) -> Self {
        self.backpack = Backpack::with_items(items);
        self
    }

    /// Borrow the session and the collaborators separately.
    pub fn split(&mut self) -> (&mut BattleSession, BattleHost<'_>) {
        (
            &mut self.session,
            BattleHost::new(
                &mut self.backpack,
                &mut self.roster,
                &mut self.world,
                &mut self.quests,
            ),
        )
    }

    pub fn player_pal(&self) -> &Pal {
        &self.roster.pals()[self.session.player_slot()]
    }

    /// Resolve one action with the default rules and the random opponent AI.
    pub fn resolve(&mut self, action: PlayerAction, rng: &mut TurnRng) -> BattleResult<EventBus> {
        let config = BattleConfig::default();
        let (session, mut host) = self.split();
        resolve_player_action(session, action, &mut host, rng, &config, &RandomBehavior::new())
    }
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when functions unexpectedly fail.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}

/// Helper function to assert that a Result was rejected as a player action
/// and return the rejection.
pub fn assert_action_error<T: std::fmt::Debug>(result: BattleResult<T>) -> ActionError {
    match result {
        Err(BattleEngineError::Action(err)) => err,
        other => panic!("Expected an action rejection but got {:?}", other),
    }
}
