//! Text dispatcher for the Pal battle engine.
//!
//! Reads one action per line from stdin and prints the narrative for each
//! resolved turn. Plays one wild encounter, then every trainer in the
//! catalog.

use clap::Parser;
use pal_battle::host::{AmbientToken, Backpack, BattleHost, ConditionFlags, ExplorationBridge, PalRoster};
use pal_battle::{
    BattleConfig, BattleRunner, ItemKind, OpponentParty, PalCatalog, PlayerAction, TurnOutcome, TurnRng,
};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const BUNDLED_CATALOG: &str = include_str!("../data/catalog.ron");
const STARTING_POTIONS: u32 = 3;
const STARTING_TREATS: u32 = 2;

#[derive(Debug, Parser)]
#[command(name = "pal-battle")]
#[command(about = "Play through the catalog's encounters from stdin", long_about = None)]
struct Options {
    /// Catalog of Pal and trainer templates (defaults to the bundled one)
    catalog: Option<PathBuf>,

    /// Balance tunables in RON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible battles
    #[arg(long)]
    seed: Option<u64>,

    /// Print each turn's events as JSON instead of narrative
    #[arg(long)]
    json: bool,
}

/// Everything the battle core borrows from the rest of the game.
struct Player {
    backpack: Backpack,
    roster: PalRoster,
    world: ExplorationBridge,
    quests: ConditionFlags,
}

impl Player {
    fn host(&mut self) -> BattleHost<'_> {
        BattleHost::new(&mut self.backpack, &mut self.roster, &mut self.world, &mut self.quests)
    }
}

struct Session {
    runner: BattleRunner,
    player: Player,
    json: bool,
}

impl Session {
    fn print(&self, outcome: &TurnOutcome) -> Result<(), Box<dyn Error>> {
        if self.json {
            println!("{}", serde_json::to_string(outcome)?);
        } else {
            for line in outcome.formatted_lines() {
                println!("{}", line);
            }
        }
        Ok(())
    }

    fn status(&self) {
        match self.runner.active_combatants(&self.player.roster) {
            Ok((player, opponent)) => {
                for pal in [player, opponent] {
                    println!(
                        "{} (Lv {}) HP {}/{} | basic {} | special {}{}",
                        pal.name,
                        pal.level,
                        pal.hp,
                        pal.max_hp,
                        pal.basic_attack_uses,
                        pal.special_attack_uses,
                        if pal.is_defending { " | braced" } else { "" }
                    );
                }
            }
            Err(err) => println!("{}", err),
        }
    }

    /// Drive one encounter to its end. Returns false if input ran out first.
    fn fight(&mut self, opponents: OpponentParty, input: &mut impl BufRead) -> Result<bool, Box<dyn Error>> {
        let outcome = match self.runner.start_battle(&mut self.player.host(), None, opponents) {
            Ok(outcome) => outcome,
            Err(err) => {
                println!("{}", err);
                return Ok(true);
            }
        };
        self.print(&outcome)?;

        let mut line = String::new();
        while self.runner.is_active() {
            if !self.json {
                print!("> ");
                io::stdout().flush()?;
            }
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(false);
            }

            match line.trim() {
                "" => continue,
                "status" => {
                    self.status();
                    continue;
                }
                "help" => {
                    println!("basic (1), special, defend (2), item (3), tame, run (4), switch <n>, status");
                    continue;
                }
                _ => {}
            }

            let action = match line.parse::<PlayerAction>() {
                Ok(action) => action,
                Err(err) => {
                    println!("{}", err);
                    continue;
                }
            };
            match self.runner.submit_action(&mut self.player.host(), action) {
                Ok(outcome) => self.print(&outcome)?,
                Err(err) => println!("{}", err),
            }
        }
        Ok(true)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let options = Options::parse();
    let catalog = match &options.catalog {
        Some(path) => PalCatalog::load(path)?,
        None => PalCatalog::from_ron_str(BUNDLED_CATALOG)?,
    };
    let config = match &options.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };
    let rng = match options.seed {
        Some(seed) => TurnRng::from_seed(seed),
        None => TurnRng::new_random(),
    };

    let starter_name = catalog
        .starter()
        .or_else(|| catalog.pal_names().first().map(String::as_str))
        .ok_or("catalog has no Pals")?
        .to_string();
    let starter = catalog.spawn_starter(&starter_name)?;

    let mut session = Session {
        runner: BattleRunner::new(config, rng),
        player: Player {
            backpack: Backpack::with_items(&[
                (ItemKind::Potion, STARTING_POTIONS),
                (ItemKind::Treat, STARTING_TREATS),
            ]),
            roster: PalRoster::new(vec![starter]),
            world: ExplorationBridge::new(AmbientToken::new(0)),
            quests: ConditionFlags::new(),
        },
        json: options.json,
    };

    let mut encounters: Vec<(Option<String>, OpponentParty)> = Vec::new();
    if let Some(wild) = catalog.pal_names().iter().find(|name| **name != starter_name) {
        encounters.push((None, OpponentParty::wild(catalog.spawn_wild(wild)?)));
    }
    for trainer in catalog.trainer_names() {
        let intro = catalog.trainer(trainer).and_then(|t| t.intro.clone());
        encounters.push((intro, catalog.spawn_trainer_party(trainer)?));
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    for (index, (intro, opponents)) in encounters.into_iter().enumerate() {
        if index > 0 && session.player.roster.full_party_heal() && !session.json {
            println!("Your Pals rest at the Pal Center and are fully restored.");
        }
        if let Some(intro) = intro.filter(|_| !session.json) {
            println!("{}", intro);
        }
        if !session.fight(opponents, &mut input)? {
            break;
        }
    }

    if !session.json {
        println!("You have {} Pal(s).", session.player.roster.len());
    }
    Ok(())
}
