use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use arena_core::{
    run_combat, Build, CombatConfig, CombatEvent, CombatResult, Creature, Side,
};

#[derive(Parser)]
#[command(version, about = "Evaluate creature builds in the deterministic combat arena")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Combat configuration overrides (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write a JSON report of the run.
    #[arg(long, global = true)]
    out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one build pairing for a number of seeded games.
    Single(SingleArgs),
    /// Play every build pairing and rank by average win rate.
    RoundRobin(RoundRobinArgs),
    /// Play repeated best-of-7 series between two builds.
    Series(SeriesArgs),
}

#[derive(Args)]
struct SingleArgs {
    /// First build: "<species> <vitality> <attack> <speed> <willpower>"
    #[arg(long)]
    build1: String,
    /// Second build, same format.
    #[arg(long)]
    build2: String,
    #[arg(long, default_value_t = 100)]
    games: u64,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Print the tick-by-tick log of the first game.
    #[arg(long)]
    verbose: bool,
}

#[derive(Args)]
struct RoundRobinArgs {
    /// Builds to pit against each other (at least two).
    #[arg(long, num_args = 2.., required = true)]
    builds: Vec<String>,
    #[arg(long, default_value_t = 100)]
    games: u64,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Args)]
struct SeriesArgs {
    #[arg(long)]
    build1: String,
    #[arg(long)]
    build2: String,
    #[arg(long, default_value_t = 10)]
    series_count: u64,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::try_init().ok();
    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => CombatConfig::from_path(path)?,
        None => CombatConfig::default(),
    };
    match cli.command {
        Commands::Single(args) => handle_single(args, &config, cli.out.as_deref()),
        Commands::RoundRobin(args) => handle_round_robin(args, &config, cli.out.as_deref()),
        Commands::Series(args) => handle_series(args, &config, cli.out.as_deref()),
    }
}

struct GameTally {
    wins_a: u64,
    wins_b: u64,
    draws: u64,
    avg_ticks: f64,
    games: u64,
}

fn parse_build(raw: &str) -> Result<Build> {
    Build::from_str(raw).with_context(|| format!("invalid build '{raw}'"))
}

fn run_games(
    build_a: &Build,
    build_b: &Build,
    games: u64,
    base_seed: u64,
    config: &CombatConfig,
    verbose_game: Option<u64>,
) -> Result<GameTally> {
    let mut tally = GameTally {
        wins_a: 0,
        wins_b: 0,
        draws: 0,
        avg_ticks: 0.0,
        games,
    };
    let mut total_ticks = 0u64;

    for game in 0..games {
        let match_seed = base_seed + game;
        let creature_a = Creature::from_build(build_a, Side::A, match_seed);
        let creature_b = Creature::from_build(build_b, Side::B, match_seed);
        let result = run_combat(creature_a, creature_b, match_seed, config)?;
        total_ticks += u64::from(result.ticks);
        match result.winner {
            Some(Side::A) => tally.wins_a += 1,
            Some(Side::B) => tally.wins_b += 1,
            None => tally.draws += 1,
        }
        if verbose_game == Some(game) {
            print_match_log(&result, match_seed);
        }
    }

    if games > 0 {
        tally.avg_ticks = total_ticks as f64 / games as f64;
    }
    Ok(tally)
}

fn handle_single(args: SingleArgs, config: &CombatConfig, out: Option<&std::path::Path>) -> Result<()> {
    let build_a = parse_build(&args.build1)?;
    let build_b = parse_build(&args.build2)?;

    println!("Arena Simulator");
    println!();
    println!("Build 1: {} ({})", format_build(&build_a), format_derived(&build_a));
    println!("Build 2: {} ({})", format_build(&build_b), format_derived(&build_b));
    println!();
    println!("Simulating {} games...", args.games);
    println!();

    let verbose_game = args.verbose.then_some(0);
    let tally = run_games(&build_a, &build_b, args.games, args.seed, config, verbose_game)?;

    let rate_a = percent(tally.wins_a, tally.games);
    let rate_b = percent(tally.wins_b, tally.games);
    println!("Results:");
    println!("  Build 1 wins: {} ({rate_a:.1}%)", tally.wins_a);
    println!("  Build 2 wins: {} ({rate_b:.1}%)", tally.wins_b);
    println!("  Draws: {}", tally.draws);
    println!("  Avg game length: {:.1} ticks", tally.avg_ticks);
    println!();

    if tally.wins_a > tally.wins_b {
        println!("Build 1 ({}) wins.", format_build(&build_a));
    } else if tally.wins_b > tally.wins_a {
        println!("Build 2 ({}) wins.", format_build(&build_b));
    } else {
        println!("Tie!");
    }

    if let Some(path) = out {
        let report = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "mode": "single",
            "build1": format_build(&build_a),
            "build2": format_build(&build_b),
            "games": tally.games,
            "seed": args.seed,
            "wins_a": tally.wins_a,
            "wins_b": tally.wins_b,
            "draws": tally.draws,
            "avg_ticks": tally.avg_ticks,
        });
        write_report(path, &report)?;
    }
    Ok(())
}

fn handle_round_robin(
    args: RoundRobinArgs,
    config: &CombatConfig,
    out: Option<&std::path::Path>,
) -> Result<()> {
    let builds: Vec<Build> = args
        .builds
        .iter()
        .map(|raw| parse_build(raw))
        .collect::<Result<_>>()?;

    println!("Arena Simulator — Round-Robin");
    println!();
    for (index, build) in builds.iter().enumerate() {
        println!(
            "Build {}: {} ({})",
            index + 1,
            format_build(build),
            format_derived(build)
        );
    }
    println!();
    println!("Simulating {} games per pair...", args.games);
    println!();

    let n = builds.len();
    let mut win_rates = vec![vec![None::<f64>; n]; n];
    let mut total_wins = vec![0u64; n];
    let mut total_games = vec![0u64; n];
    let mut pair_reports = Vec::new();

    let mut pair_seed = args.seed;
    for i in 0..n {
        for j in (i + 1)..n {
            let tally = run_games(&builds[i], &builds[j], args.games, pair_seed, config, None)?;
            pair_seed += args.games;

            win_rates[i][j] = Some(tally.wins_a as f64 / tally.games.max(1) as f64);
            win_rates[j][i] = Some(tally.wins_b as f64 / tally.games.max(1) as f64);
            total_wins[i] += tally.wins_a;
            total_wins[j] += tally.wins_b;
            total_games[i] += tally.games;
            total_games[j] += tally.games;
            pair_reports.push(json!({
                "build_a": format_build(&builds[i]),
                "build_b": format_build(&builds[j]),
                "wins_a": tally.wins_a,
                "wins_b": tally.wins_b,
                "draws": tally.draws,
                "avg_ticks": tally.avg_ticks,
            }));
        }
    }

    let labels: Vec<String> = (1..=n).map(|i| format!("B{i}")).collect();
    println!("Pairwise Win Rates:");
    print!("{:>8}", "");
    for label in &labels {
        print!("{label:>8}");
    }
    println!();
    for i in 0..n {
        print!("{:>8}", labels[i]);
        for j in 0..n {
            if i == j {
                print!("{:>8}", "--");
            } else if let Some(rate) = win_rates[i][j] {
                print!("{:>8}", format!("{:.1}%", rate * 100.0));
            } else {
                print!("{:>8}", "?");
            }
        }
        println!();
    }
    println!();

    let mut rankings: Vec<(f64, usize)> = (0..n)
        .map(|i| {
            let avg = if total_games[i] > 0 {
                total_wins[i] as f64 / total_games[i] as f64
            } else {
                0.0
            };
            (avg, i)
        })
        .collect();
    rankings.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    println!("Rankings (by average win rate):");
    for (rank, (rate, index)) in rankings.iter().enumerate() {
        println!(
            "  {}. {} — {:.1}% avg win rate",
            rank + 1,
            format_build(&builds[*index]),
            rate * 100.0
        );
    }

    if let Some(path) = out {
        let report = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "mode": "round_robin",
            "games_per_pair": args.games,
            "seed": args.seed,
            "pairs": pair_reports,
        });
        write_report(path, &report)?;
    }
    Ok(())
}

fn handle_series(args: SeriesArgs, config: &CombatConfig, out: Option<&std::path::Path>) -> Result<()> {
    let build_a = parse_build(&args.build1)?;
    let build_b = parse_build(&args.build2)?;

    println!("Arena Simulator — Series (best-of-7)");
    println!();
    println!("Build 1: {} ({})", format_build(&build_a), format_derived(&build_a));
    println!("Build 2: {} ({})", format_build(&build_b), format_derived(&build_b));
    println!();
    println!("Simulating {} best-of-7 series...", args.series_count);
    println!();

    let mut series_wins_a = 0u64;
    let mut series_wins_b = 0u64;
    let mut games_played = 0u64;

    for series in 0..args.series_count {
        let series_seed = args.seed + series * 100;
        let mut game_wins_a = 0u32;
        let mut game_wins_b = 0u32;

        for game in 0..7 {
            if game_wins_a >= 4 || game_wins_b >= 4 {
                break;
            }
            let match_seed = series_seed + game;
            let creature_a = Creature::from_build(&build_a, Side::A, match_seed);
            let creature_b = Creature::from_build(&build_b, Side::B, match_seed);
            let result = run_combat(creature_a, creature_b, match_seed, config)?;
            games_played += 1;
            match result.winner {
                Some(Side::A) => game_wins_a += 1,
                Some(Side::B) => game_wins_b += 1,
                None => {}
            }
        }

        if game_wins_a > game_wins_b {
            series_wins_a += 1;
        } else if game_wins_b > game_wins_a {
            series_wins_b += 1;
        }
    }

    println!("Series Results:");
    println!("  Build 1 wins: {}/{} series", series_wins_a, args.series_count);
    println!("  Build 2 wins: {}/{} series", series_wins_b, args.series_count);
    println!("  Total games played: {games_played}");
    println!();

    if series_wins_a > series_wins_b {
        println!(
            "Build 1 ({}) wins {}/{} series.",
            format_build(&build_a),
            series_wins_a,
            args.series_count
        );
    } else if series_wins_b > series_wins_a {
        println!(
            "Build 2 ({}) wins {}/{} series.",
            format_build(&build_b),
            series_wins_b,
            args.series_count
        );
    } else {
        println!("Series tied!");
    }

    if let Some(path) = out {
        let report = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "mode": "series",
            "build1": format_build(&build_a),
            "build2": format_build(&build_b),
            "series_count": args.series_count,
            "seed": args.seed,
            "series_wins_a": series_wins_a,
            "series_wins_b": series_wins_b,
            "games_played": games_played,
        });
        write_report(path, &report)?;
    }
    Ok(())
}

fn print_match_log(result: &CombatResult, match_seed: u64) {
    println!();
    println!("--- Verbose Log (seed={match_seed}) ---");
    for entry in &result.log {
        let tick = entry.tick;
        for event in &entry.events {
            match event {
                CombatEvent::Attack {
                    side,
                    damage,
                    dodged,
                    hp_remaining,
                } => {
                    let dodged = if *dodged { " (dodged)" } else { "" };
                    println!(
                        "  Tick {tick:2} | {side} attacks: {damage} dmg{dodged}, target HP={hp_remaining}"
                    );
                }
                CombatEvent::Move { side, to } => {
                    println!("  Tick {tick:2} | {side} moves to ({}, {})", to.0, to.1);
                }
                CombatEvent::SkipAttack { side } => {
                    println!("  Tick {tick:2} | {side} skips attack (stunned)");
                }
                CombatEvent::AbilityProc { side, ability, .. } => {
                    println!("  Tick {tick:2} | {side} procs {}", kind_name(*ability));
                }
                CombatEvent::AbilityResisted { side, ability } => {
                    println!("  Tick {tick:2} | {side}'s {} resisted", kind_name(*ability));
                }
                CombatEvent::TrickReflected { side, ability } => {
                    println!("  Tick {tick:2} | {side}'s {} reflected", kind_name(*ability));
                }
                CombatEvent::Dot {
                    side,
                    damage,
                    hp_remaining,
                } => {
                    println!("  Tick {tick:2} | {side} takes {damage} DOT, HP={hp_remaining}");
                }
                CombatEvent::RingDamage {
                    side,
                    damage,
                    hp_remaining,
                } => {
                    println!("  Tick {tick:2} | {side} takes {damage} ring dmg, HP={hp_remaining}");
                }
                CombatEvent::SecondWind {
                    side,
                    heal,
                    hp_remaining,
                } => {
                    println!("  Tick {tick:2} | {side} Second Wind! +{heal} HP={hp_remaining}");
                }
                CombatEvent::Regeneration {
                    side,
                    heal,
                    hp_remaining,
                } => {
                    println!("  Tick {tick:2} | {side} regenerates +{heal} HP={hp_remaining}");
                }
            }
        }
    }
    let verdict = match result.winner {
        Some(Side::A) => "a wins",
        Some(Side::B) => "b wins",
        None => "draw",
    };
    let condition = match result.end_condition {
        arena_core::EndCondition::Death => "death",
        arena_core::EndCondition::Timeout => "timeout",
    };
    println!(
        "  Result: {verdict} in {} ticks ({condition})",
        result.ticks
    );
    println!("--- End Verbose Log ---");
    println!();
}

fn format_build(build: &Build) -> String {
    let stats = build.stats;
    format!(
        "{} {}/{}/{}/{}",
        build.species.name(),
        stats.vitality(),
        stats.attack(),
        stats.speed(),
        stats.willpower()
    )
}

fn format_derived(build: &Build) -> String {
    let creature = Creature::from_build(build, Side::A, 0);
    format!(
        "max_hp={}, base_dmg={}, dodge={:.1}%, resist={:.1}%",
        creature.max_hp,
        creature.base_dmg,
        creature.dodge_chance * 100.0,
        creature.resist_chance * 100.0
    )
}

fn kind_name(kind: arena_core::AbilityKind) -> String {
    serde_json::to_value(kind)
        .ok()
        .and_then(|value| value.as_str().map(str::to_owned))
        .unwrap_or_default()
}

fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

fn write_report(path: &std::path::Path, report: &serde_json::Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, serde_json::to_string_pretty(report)?)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    println!("Report written to {}", path.display());
    Ok(())
}
