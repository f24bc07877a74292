//! Text commands and rendering shared by the terminal front end and the MCP server.
//!
//! A [`Console`] owns one game and the store it saves to. Each command line
//! comes back as plain text: the command's own reply, then any new battle log
//! lines, then the player-facing text of the events it published. Battle
//! tasks are not fired here; callers pace them with [`Console::advance`].

use crate::battle::state::{AttackKind, BattlePhase, BattleSession, Side};
use crate::elite::{InstanceId, Position};
use crate::events::GameEvent;
use crate::game::GameSession;
use crate::inventory::InventorySort;
use crate::item_data::find_item;
use crate::persistence::KeyValueStore;
use crate::quests::all_quests;
use crate::species::{find_elite, DetailedElite};
use schema::Zone;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use strum::IntoEnumIterator;

pub const DEFAULT_BALL: &str = "elite_ball";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Status,
    Elites,
    Inventory(InventorySort),
    Quests,
    StartQuest(String),
    Zones,
    Zone(Zone),
    Look { x: f32, z: f32 },
    Wild,
    Battle,
    Attack(AttackKind),
    Capture(String),
    Flee,
    End,
    Use { item: String, target: Option<usize> },
    Buy { item: String, quantity: u32 },
    Active(usize),
    Evolve(usize),
    Fuse(usize, usize),
    Release(usize),
    Lookup(String),
    Save,
    Load,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&verb, args)) = words.split_first() else {
        return Err("Type 'help' for a list of commands.".to_string());
    };

    match verb.to_lowercase().as_str() {
        "help" | "?" => Ok(Command::Help),
        "status" => Ok(Command::Status),
        "elites" | "team" => Ok(Command::Elites),
        "inventory" | "inv" | "bag" => {
            let sort = match args.first() {
                None => InventorySort::Category,
                Some(word) => word
                    .parse()
                    .map_err(|_| format!("Unknown sort order '{}'.", word))?,
            };
            Ok(Command::Inventory(sort))
        }
        "quests" => Ok(Command::Quests),
        "start" => rest(args, "start <quest>").map(Command::StartQuest),
        "zones" | "world" => Ok(Command::Zones),
        "zone" | "go" => {
            let name = rest(args, "zone <name>")?;
            parse_zone(&name)
                .map(Command::Zone)
                .ok_or_else(|| format!("Unknown zone '{}'.", name))
        }
        "look" => match args {
            [x, z] => Ok(Command::Look {
                x: parse_number(x)?,
                z: parse_number(z)?,
            }),
            _ => Err("Usage: look <x> <z>".to_string()),
        },
        "wild" => Ok(Command::Wild),
        "battle" => Ok(Command::Battle),
        "attack" => match args.first().map(|s| s.to_lowercase()).as_deref() {
            None | Some("tackle") => Ok(Command::Attack(AttackKind::Tackle)),
            Some("special") => Ok(Command::Attack(AttackKind::Special)),
            Some(other) => Err(format!("Unknown attack '{}'.", other)),
        },
        "capture" | "catch" => Ok(Command::Capture(
            rest(args, "").unwrap_or_else(|_| DEFAULT_BALL.to_string()),
        )),
        "flee" | "run" => Ok(Command::Flee),
        "end" => Ok(Command::End),
        "use" => {
            let (item, target) = split_trailing_number(args);
            if item.is_empty() {
                return Err("Usage: use <item> [elite number]".to_string());
            }
            Ok(Command::Use {
                item,
                target: target.map(|n| n as usize),
            })
        }
        "buy" => {
            let (item, quantity) = split_trailing_number(args);
            if item.is_empty() {
                return Err("Usage: buy <item> [quantity]".to_string());
            }
            Ok(Command::Buy {
                item,
                quantity: quantity.unwrap_or(1),
            })
        }
        "active" => single_number(args, "active <n>").map(Command::Active),
        "evolve" => single_number(args, "evolve <n>").map(Command::Evolve),
        "release" => single_number(args, "release <n>").map(Command::Release),
        "fuse" => match args {
            [a, b] => Ok(Command::Fuse(parse_number(a)?, parse_number(b)?)),
            _ => Err("Usage: fuse <n> <m>".to_string()),
        },
        "lookup" | "info" => rest(args, "lookup <elite or item>").map(Command::Lookup),
        "save" => Ok(Command::Save),
        "load" => Ok(Command::Load),
        other => Err(format!(
            "Unknown command '{}'. Type 'help' for a list of commands.",
            other
        )),
    }
}

fn rest(args: &[&str], usage: &str) -> Result<String, String> {
    if args.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(args.join(" "))
    }
}

fn parse_number<T: std::str::FromStr>(word: &str) -> Result<T, String> {
    word.parse()
        .map_err(|_| format!("'{}' is not a number.", word))
}

fn single_number(args: &[&str], usage: &str) -> Result<usize, String> {
    match args {
        [n] => parse_number(n),
        _ => Err(format!("Usage: {}", usage)),
    }
}

/// `["super", "potion", "2"]` becomes `("super potion", Some(2))`.
fn split_trailing_number(args: &[&str]) -> (String, Option<u32>) {
    match args.split_last() {
        Some((last, head)) => match last.parse::<u32>() {
            Ok(n) => (head.join(" "), Some(n)),
            Err(_) => (args.join(" "), None),
        },
        None => (String::new(), None),
    }
}

/// Accepts the short name (`cave`) or the title (`Crystal Caves`).
pub fn parse_zone(name: &str) -> Option<Zone> {
    let name = name.trim();
    name.replace(' ', "_")
        .parse::<Zone>()
        .ok()
        .or_else(|| Zone::iter().find(|z| z.title().eq_ignore_ascii_case(name)))
}

pub fn help_text() -> String {
    [
        "Commands:",
        "  status                  trainer, zone and battle summary",
        "  elites                  your captured Elites",
        "  inventory [sort]        items, sorted by category, name or rarity",
        "  quests                  active, completed and available quests",
        "  start <quest>           begin a quest",
        "  zones                   discovered zones",
        "  zone <name>             travel to a zone",
        "  look <x> <z>            move and check for nearby wild Elites",
        "  wild                    wild Elites in the current zone",
        "  battle                  current battle status",
        "  attack [special]        attack with tackle or special",
        "  capture [ball]          throw a ball (default elite_ball)",
        "  flee                    leave the battle",
        "  end                     close a finished battle",
        "  use <item> [n]          use an item, optionally on Elite n",
        "  buy <item> [qty]        buy from the shop",
        "  active <n>              choose your battle Elite",
        "  evolve <n>              evolve Elite n",
        "  fuse <n> <m>            fuse two Elites with a Fusion Crystal",
        "  release <n>             release Elite n",
        "  lookup <name>           species or item details",
        "  save / load             persist the game",
    ]
    .join("\n")
}

pub fn display_battle(session: &BattleSession) -> String {
    let mut out = format!(
        "{}\n  vs\n{}\nPhase: {:?}",
        session.player, session.enemy, session.phase
    );
    match session.phase {
        BattlePhase::Menu if session.turn == Side::Player => {
            out.push_str("\nYour move: attack, attack special, capture [ball], use <item>, flee");
        }
        BattlePhase::Menu | BattlePhase::Animation => {}
        _ => out.push_str("\nThe battle is over. Type 'end' to leave."),
    }
    out
}

pub fn display_zones(game: &GameSession) -> String {
    let world = game.world();
    let mut out = String::from("Zones:");
    for zone in Zone::iter() {
        let marker = if zone == world.current_zone() {
            ">"
        } else if world.is_discovered(zone) {
            "*"
        } else {
            " "
        };
        out.push_str(&format!("\n {} {:<20} ({})", marker, zone.title(), zone));
    }
    out
}

pub fn display_wild(game: &GameSession) -> String {
    let wild = game.world().wild();
    if wild.is_empty() {
        return "No wild Elites nearby. Try 'look <x> <z>'.".to_string();
    }
    let here = game.profile().position;
    let mut out = format!("Wild Elites in {}:", game.world().current_zone().title());
    for elite in wild {
        match elite.position {
            Some(position) => out.push_str(&format!(
                "\n  {} at {} ({:.1}m away)",
                elite,
                position,
                here.planar_distance(&position)
            )),
            None => out.push_str(&format!("\n  {}", elite)),
        }
    }
    out
}

pub fn display_quests(game: &GameSession) -> String {
    let quests = game.quests();
    let mut out = String::from("Active quests:");
    if quests.active().is_empty() {
        out.push_str("\n  none");
    }
    for record in quests.active() {
        out.push_str(&format!("\n{}", record));
    }

    if !quests.completed().is_empty() {
        out.push_str("\nCompleted:");
        for record in quests.completed() {
            out.push_str(&format!("\n  {}", record.title));
        }
    }

    let available: Vec<_> = all_quests()
        .filter(|t| !quests.is_active(&t.id) && !quests.is_completed(&t.id))
        .filter(|t| t.prerequisites.iter().all(|p| quests.is_completed(p)))
        .collect();
    if !available.is_empty() {
        out.push_str("\nAvailable:");
        for template in available {
            out.push_str(&format!("\n  {} - {}", template.id, template.title));
        }
    }
    out
}

pub fn display_status(game: &GameSession) -> String {
    let mut out = format!("{}\n{}", game.profile(), game.world());
    out.push_str(&format!("\nMoney: {}", game.inventory().money()));
    if let Some(session) = game.battle() {
        out.push_str(&format!("\n\nIn battle:\n{}", display_battle(session)));
    }
    out
}

pub fn lookup(name: &str) -> String {
    if let Some(definition) = find_elite(name) {
        return DetailedElite(definition).to_string();
    }
    if let Some(item) = find_item(name) {
        let price = item
            .price
            .map_or_else(|| "not sold".to_string(), |p| format!("{} coins", p));
        return format!(
            "{} [{} / {}]\n{}\nPrice: {}",
            item.name, item.category, item.rarity, item.description, price
        );
    }
    format!("No Elite or item called '{}'.", name)
}

/// Battle narration already covers these.
fn narrated_by_battle_log(event: &GameEvent) -> bool {
    matches!(
        event,
        GameEvent::BattleStarted { .. } | GameEvent::BattleWon { .. } | GameEvent::BattleLost { .. }
    )
}

/// One game plus the store its saves go to.
pub struct Console {
    game: GameSession,
    store: Box<dyn KeyValueStore + Send>,
    /// Battle id and number of log lines already shown.
    log_cursor: (u64, usize),
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("game", &self.game)
            .field("log_cursor", &self.log_cursor)
            .finish_non_exhaustive()
    }
}

impl Console {
    pub fn new(game: GameSession, store: Box<dyn KeyValueStore + Send>) -> Self {
        Self {
            game,
            store,
            log_cursor: (0, 0),
        }
    }

    pub fn game(&self) -> &GameSession {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameSession {
        &mut self.game
    }

    pub fn time_until_next_task(&self) -> Option<Duration> {
        self.game.time_until_next_task()
    }

    /// Parses and runs one command line.
    pub fn execute(&mut self, line: &str) -> String {
        let reply = match parse_command(line) {
            Ok(command) => {
                tracing::debug!(?command, "running command");
                self.run(command)
            }
            Err(message) => message,
        };
        self.with_feedback(reply)
    }

    /// Moves the game clock forward and reports what happened.
    pub fn advance(&mut self, elapsed: Duration) -> String {
        self.game.advance(elapsed);
        self.with_feedback(String::new())
    }

    /// Fires every queued battle task at once.
    pub fn run_pending(&mut self) -> String {
        self.game.run_until_idle();
        self.with_feedback(String::new())
    }

    fn run(&mut self, command: Command) -> String {
        let game = &mut self.game;
        match command {
            Command::Help => help_text(),
            Command::Status => display_status(game),
            Command::Elites => game.profile().to_string(),
            Command::Inventory(sort) => {
                let inventory = game.inventory();
                let mut out = format!(
                    "Money: {}  Slots: {}/{}",
                    inventory.money(),
                    inventory.used_slots(),
                    inventory.max_slots()
                );
                for entry in inventory.entries_sorted(sort) {
                    out.push_str(&format!(
                        "\n  {:<16} x{:<3} [{}]",
                        entry.item.name, entry.quantity, entry.item.category
                    ));
                }
                out
            }
            Command::Quests => display_quests(game),
            Command::StartQuest(id) => match game.start_quest(&id) {
                Ok(record) => record.to_string(),
                Err(e) => error_text(e),
            },
            Command::Zones => display_zones(game),
            Command::Zone(zone) => {
                game.change_zone(zone);
                String::new()
            }
            Command::Look { x, z } => {
                let y = game.profile().position.y;
                let position = Position::new(x, y, z);
                if game.check_for_elites(position) {
                    return game.battle().map(display_battle).unwrap_or_default();
                }
                match game.world().nearest_elite(&position) {
                    Some((elite, distance)) => format!(
                        "Nothing noticed you. Nearest: {} ({:.1}m away).",
                        elite.name(),
                        distance
                    ),
                    None => "Nothing stirs here.".to_string(),
                }
            }
            Command::Wild => display_wild(game),
            Command::Battle => game
                .battle()
                .map(display_battle)
                .unwrap_or_else(|| "You are not in a battle.".to_string()),
            Command::Attack(kind) => unit_reply(game.attack(kind)),
            Command::Capture(ball) => match find_item(&ball) {
                Some(item) => unit_reply(game.capture(&item.id).map(|_| ())),
                None => unit_reply(game.capture(&ball).map(|_| ())),
            },
            Command::Flee => unit_reply(game.flee()),
            Command::End => match game.end_battle() {
                Ok(outcome) => format!("Battle ended ({:?}).", outcome),
                Err(e) => error_text(e),
            },
            Command::Use { item, target } => {
                let Some(definition) = find_item(&item) else {
                    return format!("No item called '{}'.", item);
                };
                let target = match target.map(|n| roster_id(game, n)).transpose() {
                    Ok(target) => target,
                    Err(message) => return message,
                };
                match game.use_item(&definition.id, target) {
                    Ok(outcome) => outcome.to_string(),
                    Err(e) => error_text(e),
                }
            }
            Command::Buy { item, quantity } => {
                let Some(definition) = find_item(&item) else {
                    return format!("No item called '{}'.", item);
                };
                match game.purchase(&definition.id, quantity) {
                    Ok(held) => format!(
                        "Bought {} x{}. You now have {}. Money left: {}.",
                        definition.name,
                        quantity,
                        held,
                        game.inventory().money()
                    ),
                    Err(e) => error_text(e),
                }
            }
            Command::Active(n) => match roster_id(game, n) {
                Ok(id) => match game.set_active_elite(id) {
                    Ok(()) => format!(
                        "{} is now your active Elite.",
                        game.profile().get(id).map(|e| e.name()).unwrap_or_default()
                    ),
                    Err(e) => error_text(e),
                },
                Err(message) => message,
            },
            Command::Evolve(n) => match roster_id(game, n) {
                Ok(id) => unit_reply(game.evolve_elite(id).map(|_| ())),
                Err(message) => message,
            },
            Command::Fuse(a, b) => match (roster_id(game, a), roster_id(game, b)) {
                (Ok(a), Ok(b)) => unit_reply(game.fuse_elites(a, b).map(|_| ())),
                (Err(message), _) | (_, Err(message)) => message,
            },
            Command::Release(n) => match roster_id(game, n) {
                Ok(id) => match game.release_elite(id) {
                    Ok(released) => format!("Released {}.", released.name()),
                    Err(e) => error_text(e),
                },
                Err(message) => message,
            },
            Command::Lookup(name) => lookup(&name),
            Command::Save => {
                if game.save(self.store.as_mut()) {
                    "Game saved.".to_string()
                } else {
                    "Could not save the game.".to_string()
                }
            }
            Command::Load => {
                if game.load(self.store.as_ref()) {
                    "Game loaded.".to_string()
                } else {
                    "No saved game to load.".to_string()
                }
            }
        }
    }

    /// Appends unseen battle log lines and event text to a reply.
    fn with_feedback(&mut self, reply: String) -> String {
        let mut lines: Vec<String> = Vec::new();
        if !reply.is_empty() {
            lines.push(reply);
        }

        if let Some(session) = self.game.battle() {
            let seen = if self.log_cursor.0 == session.id {
                self.log_cursor.1
            } else {
                0
            };
            lines.extend(session.log().iter().skip(seen).cloned());
            self.log_cursor = (session.id, session.log().len());
        }

        for event in self.game.drain_events() {
            if narrated_by_battle_log(&event) {
                continue;
            }
            if let Some(text) = event.format() {
                lines.push(text);
            }
        }
        lines.join("\n")
    }
}

/// A console shared by concurrent callers that each wait out their own
/// battle steps in real time.
///
/// A caller holds the turn from its command until its last queued step has
/// fired, so the clock only moves once per step and every line lands in the
/// reply of the command that caused it.
#[derive(Debug)]
pub struct SharedConsole {
    console: Mutex<Console>,
    turn: tokio::sync::Mutex<()>,
}

impl SharedConsole {
    pub fn new(console: Console) -> Self {
        Self {
            console: Mutex::new(console),
            turn: tokio::sync::Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Console> {
        self.console.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one command line, then sleeps through its queued battle steps.
    pub async fn run(&self, line: &str) -> String {
        let _turn = self.turn.lock().await;
        let mut text = self.lock().execute(line);

        loop {
            let Some(wait) = self.lock().time_until_next_task() else {
                break;
            };
            tokio::time::sleep(wait).await;
            let more = self.lock().advance(wait);
            if !more.is_empty() {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&more);
            }
        }
        text
    }

    /// Runs `f` against the console between turns.
    pub async fn with<R>(&self, f: impl FnOnce(&mut Console) -> R) -> R {
        let _turn = self.turn.lock().await;
        f(&mut self.lock())
    }
}

fn roster_id(game: &GameSession, number: usize) -> Result<InstanceId, String> {
    game.profile()
        .by_number(number)
        .map(|elite| elite.id)
        .ok_or_else(|| format!("No Elite numbered {}.", number))
}

fn unit_reply<E: fmt::Display>(result: Result<(), E>) -> String {
    match result {
        Ok(()) => String::new(),
        Err(e) => error_text(e),
    }
}

fn error_text(error: impl fmt::Display) -> String {
    format!("Error: {}", error)
}
