//! Outcome engine simulator
//!
//! Usage:
//!   sz-sim slot --spins 100000 --seed 7        - Long-run slot RTP and bonus rate
//!   sz-sim wheel --cell red --spins 100000     - Repeated wheel bet
//!   sz-sim cases --box kezro --opens 10000     - Case opening value
//!   sz-sim verify-boxes                        - Check catalogue tiling and EV

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;

use sz_cases::CasesConfig;
use sz_core::load_config;
use sz_sim::{simulate_cases, simulate_slot, simulate_wheel, verify_boxes};
use sz_slot::SlotConfig;
use sz_wheel::WheelConfig;

#[derive(Parser)]
#[command(name = "sz-sim", about = "Seeded batch runs and audits for the outcome engines")]
struct Cli {
    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate paid slot spins
    Slot {
        #[arg(short, long, default_value_t = 100_000)]
        spins: u64,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Active paylines (defaults to the config)
        #[arg(short, long)]
        lines: Option<usize>,
        /// JSON or YAML slot config
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Simulate a repeated wheel bet
    Wheel {
        /// Board cell id (`red`, `c-2`, `s-23`, …)
        #[arg(long, default_value = "red")]
        cell: String,
        #[arg(short, long, default_value_t = 100_000)]
        spins: u64,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Simulate case openings
    Cases {
        #[arg(long = "box", default_value = "grossadmiral")]
        box_id: String,
        #[arg(short, long, default_value_t = 10_000)]
        opens: u64,
        /// Boxes per open
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Check every box tiles the ticket space
    VerifyBoxes {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Slot {
            spins,
            seed,
            lines,
            config,
        } => {
            let config: SlotConfig = load_or_default(config)?;
            let report = simulate_slot(config, seed, spins, lines)?;
            if cli.json {
                return print_json(&report);
            }
            println!("Slot: {} paid spins on {} lines (seed {})", report.paid_spins, report.lines, seed);
            println!("  Bet        {}", report.total_bet);
            println!("  Won        {}", report.total_win);
            println!("  RTP        {:.2}% (target {:.0}%)", report.rtp, report.target_rtp * 100.0);
            println!("  Hit rate   {:.2}%", report.hit_rate);
            println!("  Free spins {} from {} bonuses, {} retriggers", report.free_spins, report.bonuses, report.retriggers);
            match report.bonus_frequency {
                Some(every) => println!("  Bonus      1 in {:.1} paid spins", every),
                None => println!("  Bonus      never triggered"),
            }
            println!("  Max win    {}", report.max_win);
        }
        Commands::Wheel {
            cell,
            spins,
            seed,
            config,
        } => {
            let config: WheelConfig = load_or_default(config)?;
            let report = simulate_wheel(config, seed, spins, &cell)?;
            if cli.json {
                return print_json(&report);
            }
            println!("Wheel: {} spins on {} (seed {})", report.spins, report.cell, seed);
            println!("  Staked     {}", report.total_staked);
            println!("  Paid       {}", report.total_paid);
            println!("  RTP        {:.2}%", report.rtp);
            println!("  Wins       {}", report.winning_spins);
        }
        Commands::Cases {
            box_id,
            opens,
            count,
            seed,
            config,
        } => {
            let config: CasesConfig = load_or_default(config)?;
            let report = simulate_cases(config, seed, &box_id, opens, count)?;
            if cli.json {
                return print_json(&report);
            }
            println!("Cases: {} boxes of {} (seed {})", report.boxes_opened, report.box_id, seed);
            println!("  Spent      {}", report.total_spent);
            println!("  Value      {}", report.total_value);
            println!("  RTP        {:.2}% (expected {:.2}%)", report.rtp, report.expected_rtp);
            for (rarity, n) in &report.rarity_counts {
                println!("  {:<10} {}", rarity.label(), n);
            }
        }
        Commands::VerifyBoxes { config } => {
            let config: CasesConfig = load_or_default(config)?;
            let audits = verify_boxes(&config.catalog);
            if cli.json {
                print_json(&audits)?;
            } else {
                for audit in &audits {
                    let status = if audit.tiles { "ok" } else { "BROKEN" };
                    println!(
                        "{:<14} {:>7}  {} items  EV {:.3}  RTP {:.1}%  {}",
                        audit.box_id, audit.price, audit.items, audit.expected_value, audit.expected_rtp, status
                    );
                    if let Some(problem) = &audit.problem {
                        println!("  {}", problem);
                    }
                }
            }
            if audits.iter().any(|a| !a.tiles) {
                bail!("catalogue has boxes that do not tile the ticket space");
            }
        }
    }
    Ok(())
}

fn load_or_default<T>(path: Option<PathBuf>) -> Result<T>
where
    T: Default + serde::de::DeserializeOwned,
{
    match path {
        Some(path) => load_config(&path).with_context(|| format!("Failed to load {}", path.display())),
        None => Ok(T::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
