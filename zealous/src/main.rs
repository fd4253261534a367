// The binary is named after the bot, which trips the snake case lint.
#![allow(non_snake_case)]

#[macro_use]
extern crate clap;

mod bot;

use std::ops::RangeInclusive;

use clap::{ArgEnum, Parser};
use log::{error, info};
use rand::prelude::SliceRandom;
use rand::thread_rng;
use rust_sc2::prelude::*;
use zealous_openings::BuildFamily;

use crate::bot::Zealous;

const PORT_RANGE: RangeInclusive<i32> = 1..=65535;

const LADDER_MAPS: &[&str] = &[
    "2000AtmospheresAIE",
    "BerlingradAIE",
    "BlackburnAIE",
    "CuriousMindsAIE",
    "GlitteringAshesAIE",
    "HardwireAIE",
];

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    mode: Option<Mode>,

    #[clap(long = "LadderServer")]
    ladder_server: Option<String>,

    #[clap(long = "GamePort", validator = port_in_range)]
    game_port: Option<i32>,

    #[clap(long = "OpponentId")]
    opponent: Option<String>,

    #[clap(long = "StartPort", validator = port_in_range)]
    start_port: Option<i32>,

    /// Play another race than protoss
    #[clap(long, short, arg_enum)]
    race: Option<GameRace>,

    /// Force the response family: pvp, pvz, pvt or pvr
    #[clap(long)]
    build: Option<String>,

    /// Set game step for bot
    #[clap(short = 's', long = "step", default_value_t = 1)]
    game_step: u32,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
pub enum GameRace {
    Terran,
    Zerg,
    Protoss,
    Random,
}

impl From<GameRace> for Race {
    fn from(race: GameRace) -> Self {
        match race {
            GameRace::Terran => Race::Terran,
            GameRace::Zerg => Race::Zerg,
            GameRace::Protoss => Race::Protoss,
            GameRace::Random => Race::Random,
        }
    }
}

fn port_in_range(s: &str) -> Result<(), String> {
    let port = s.parse::<i32>().map_err(|e| e.to_string())?;
    if PORT_RANGE.contains(&port) {
        Ok(())
    } else {
        Err(format!(
            "Port not in range {}-{}",
            PORT_RANGE.start(),
            PORT_RANGE.end()
        ))
    }
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Bot versus in-game AI
    Local {
        map: Option<String>,
        race: Option<Race>,
        difficulty: Option<Difficulty>,
        ai_build: Option<AIBuild>,
        sc2_version: Option<String>,
        save_replay: Option<String>,
        realtime: Option<bool>,
    },
    /// Bot versus Human
    Human {
        /// Specify a map
        #[clap(long("map"), short('m'))]
        map: Option<String>,
        /// Sets human race
        #[clap(long("race"), short('r'))]
        race: Option<Race>,
        /// Sets human name
        name: Option<String>,
        /// Sets sc2 version
        sc2_version: Option<String>,
        /// Replay file
        save_replay: Option<String>,
    },
}

fn pick_map(map: &Option<String>) -> String {
    match map {
        Some(map) => map.clone(),
        None => LADDER_MAPS
            .choose(&mut thread_rng())
            .copied()
            .unwrap_or("2000AtmospheresAIE")
            .to_string(),
    }
}

/// The configured bot, or None when the command line asks for something we
/// can't play.
fn configure(app: &Cli) -> Option<Zealous> {
    let mut bot = Zealous::default();
    bot.set_game_step(app.game_step);
    if let Some(race) = app.race {
        bot.race = race.into();
    }
    if let Some(build) = &app.build {
        match build.parse::<BuildFamily>() {
            Ok(family) => bot.force_build(family),
            Err(e) => {
                error!("{}", e);
                return None;
            }
        }
    }
    Some(bot)
}

fn play_ladder(bot: &mut Zealous, app: &Cli) -> SC2Result<()> {
    match (app.ladder_server.as_deref(), app.game_port, app.start_port) {
        (Some(server), Some(game_port), Some(start_port)) => {
            info!("Joining ladder game at {}:{}", server, game_port);
            run_ladder_game(bot, server, game_port, start_port, app.opponent.as_deref())
        }
        _ => {
            error!("Ladder games need --LadderServer, --GamePort and --StartPort");
            Ok(())
        }
    }
}

fn main() -> SC2Result<()> {
    env_logger::init();
    let app = Cli::parse();
    let mut bot = match configure(&app) {
        Some(bot) => bot,
        None => return Ok(()),
    };

    match &app.mode {
        Some(Mode::Local {
            map,
            race,
            difficulty,
            ai_build,
            sc2_version,
            save_replay,
            realtime,
        }) => run_vs_computer(
            &mut bot,
            Computer::new(
                race.unwrap_or(Race::Random),
                difficulty.unwrap_or(Difficulty::CheatMoney),
                *ai_build,
            ),
            pick_map(map).as_str(),
            LaunchOptions {
                sc2_version: sc2_version.as_deref(),
                realtime: realtime.unwrap_or_default(),
                save_replay_as: save_replay.as_deref(),
            },
        ),
        Some(Mode::Human {
            map,
            race,
            name,
            sc2_version,
            save_replay,
        }) => run_vs_human(
            &mut bot,
            PlayerSettings {
                race: race.unwrap_or(Race::Random),
                name: name.as_deref(),
                ..Default::default()
            },
            pick_map(map).as_str(),
            LaunchOptions {
                sc2_version: sc2_version.as_deref(),
                realtime: true,
                save_replay_as: save_replay.as_deref(),
            },
        ),
        None => play_ladder(&mut bot, &app),
    }
}
