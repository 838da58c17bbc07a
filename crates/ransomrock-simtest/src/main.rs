//! Ransom Rock Headless Session Harness
//!
//! Validates the economy engine and shipped economy data, then plays a
//! simulated session to the ransom. Runs entirely in-process with no UI and no
//! clock, no audio.
//!
//! Usage:
//!   cargo run -p ransomrock-simtest
//!   cargo run -p ransomrock-simtest -- --verbose
//!   cargo run -p ransomrock-simtest -- --seed 7 --json

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use ransomrock_logic::config::{validate_config, EconomyConfig};
use ransomrock_logic::prelude::*;
use ransomrock_logic::trader::TradeRate;
use ransomrock_logic::upgrades::{cost_at, UpgradeTrack};

// ── Economy data (same JSON the game ships) ─────────────────────────────
const ECONOMY_JSON: &str = include_str!("../../../data/economy.json");

/// Simulated frame length for the session run.
const FRAME_SECONDS: f64 = 0.1;
/// Give up on the session after this much simulated time.
const SESSION_LIMIT_SECONDS: f64 = 2.0 * 60.0 * 60.0;

// ── Logging ─────────────────────────────────────────────────────────────

struct HarnessLogger;

impl log::Log for HarnessLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: HarnessLogger = HarnessLogger;

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

struct Options {
    verbose: bool,
    json: bool,
    seed: u64,
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    Options {
        verbose: args.iter().any(|a| a == "--verbose"),
        json: args.iter().any(|a| a == "--json"),
        seed,
    }
}

fn main() {
    let opts = parse_args();
    init_logging(opts.verbose);
    println!("=== Ransom Rock Session Harness ===\n");

    let mut results = Vec::new();

    // 1. Economy data
    let config = match load_economy(&mut results) {
        Some(c) => c,
        None => {
            report(&results, opts.verbose);
            std::process::exit(1);
        }
    };

    // 2. Production accrual
    results.extend(validate_accrual());

    // 3. Affordability and trades
    results.extend(validate_transactions(&config));

    // 4. Ransom edge trigger
    results.extend(validate_ransom(&config));

    // 5. Upgrade tracks
    results.extend(validate_upgrades(&config));

    // 6. Simulated player session
    let session = play_session(&config, opts.seed);
    results.push(check(
        "session_reaches_ransom",
        session.won,
        match session.won_at {
            Some(t) => format!(
                "ransom paid after {:.0}s sim ({} clicks, {} purchases, {} trades)",
                t, session.clicks, session.purchases, session.trades
            ),
            None => format!(
                "no ransom within {:.0}s sim, {} Coin held",
                SESSION_LIMIT_SECONDS, session.final_state.counts[ResourceKind::Coin]
            ),
        },
    ));

    if opts.json {
        match serde_json::to_string_pretty(&session) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("failed to encode session report: {}", e),
        }
    }

    if !report(&results, opts.verbose) {
        std::process::exit(1);
    }
}

/// Print results, returning whether everything passed.
fn report(results: &[TestResult], verbose: bool) -> bool {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );
    failed == 0
}

// ── 1. Economy data ─────────────────────────────────────────────────────

fn load_economy(results: &mut Vec<TestResult>) -> Option<EconomyConfig> {
    println!("--- Economy Data ---");

    let config = match EconomyConfig::from_json(ECONOMY_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(check("economy_load", false, e.to_string()));
            return None;
        }
    };
    results.push(check(
        "economy_load",
        true,
        format!(
            "{} multiplier upgrades, {} auto upgrades, {} trades, {} click sources",
            config.multiplier_upgrades.len(),
            config.auto_upgrades.len(),
            config.trades.len(),
            config.click_sources.len()
        ),
    ));

    let errors = validate_config(&config);
    results.push(check(
        "economy_valid",
        errors.is_empty(),
        if errors.is_empty() {
            "no validation errors".into()
        } else {
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    ));

    let ransom_reachable = config.trades.iter().any(|t| t.buy == config.ransom.currency)
        || config
            .click_sources
            .iter()
            .any(|c| c.kind == config.ransom.currency);
    results.push(check(
        "ransom_currency_obtainable",
        ransom_reachable,
        format!(
            "{} {} via trades or clicks",
            config.ransom.amount, config.ransom.currency
        ),
    ));

    Some(config)
}

// ── 2. Production accrual ───────────────────────────────────────────────

fn validate_accrual() -> Vec<TestResult> {
    println!("--- Production Accrual ---");
    let mut results = Vec::new();

    let mut engine = EconomyEngine::new();
    engine.set_auto_production_rate(ResourceKind::Coal, 2.0);
    for _ in 0..3 {
        engine.tick(0.4);
    }
    let coal = engine.get_count(ResourceKind::Coal);
    results.push(check(
        "accrual_three_ticks",
        coal == 2,
        format!("2/s over 3×0.4s → {} Coal (expected 2)", coal),
    ));

    // Same span, different chunking.
    let mut fine = EconomyEngine::new();
    let mut coarse = EconomyEngine::new();
    for e in [&mut fine, &mut coarse] {
        e.set_auto_production_rate(ResourceKind::Stone, 1.0);
    }
    for _ in 0..600 {
        fine.tick(0.1);
    }
    coarse.tick(60.0);
    let (f, c) = (
        fine.get_count(ResourceKind::Stone),
        coarse.get_count(ResourceKind::Stone),
    );
    results.push(check(
        "accrual_partition_independent",
        f == c && f == 60,
        format!("600×0.1s → {}, 1×60s → {}", f, c),
    ));

    results
}

// ── 3. Affordability and trades ─────────────────────────────────────────

fn validate_transactions(config: &EconomyConfig) -> Vec<TestResult> {
    println!("--- Transactions ---");
    let mut results = Vec::new();

    let mut engine = EconomyEngine::new();
    engine.add_resource(ResourceKind::Coin, 999);
    let events = Rc::new(RefCell::new(0u32));
    let sink = Rc::clone(&events);
    let sub = engine.on_resource_changed(move |_| *sink.borrow_mut() += 1);
    let spent = engine.spend(ResourceKind::Coin, 1000);
    let held = engine.get_count(ResourceKind::Coin);
    results.push(check(
        "spend_guard",
        !spent && held == 999 && *events.borrow() == 0,
        format!(
            "spend 1000 of 999 → {}, balance {}, {} notifications",
            spent,
            held,
            events.borrow()
        ),
    ));
    sub.unsubscribe();
    results.push(check(
        "listener_teardown",
        engine.listener_count() == 0,
        format!("{} listeners after unsubscribe", engine.listener_count()),
    ));

    let rate = config.trade_for(ResourceKind::Coal).unwrap_or_default();
    let mut engine = EconomyEngine::new();
    engine.add_resource(rate.sell, 19);
    let expected = rate.quote(19);
    let quote = rate.execute(&mut engine, 19);
    let (sold_left, bought) = (engine.get_count(rate.sell), engine.get_count(rate.buy));
    results.push(check(
        "trade_whole_units",
        quote == Some(expected)
            && sold_left == 19 - expected.sell_amount
            && bought == expected.receive_amount,
        format!(
            "sell 19 {} at {}/unit → {} {} left, {} {}",
            rate.sell, rate.sell_per_unit, sold_left, rate.sell, bought, rate.buy
        ),
    ));

    let mut engine = EconomyEngine::new();
    engine.add_resource(ResourceKind::Coal, 5);
    let ok = engine.trade(ResourceKind::Coal, 10, ResourceKind::Coin, 1);
    results.push(check(
        "trade_atomic_refusal",
        !ok && engine.get_count(ResourceKind::Coal) == 5
            && engine.get_count(ResourceKind::Coin) == 0,
        format!("unaffordable trade returned {}", ok),
    ));

    results
}

// ── 4. Ransom ───────────────────────────────────────────────────────────

fn validate_ransom(config: &EconomyConfig) -> Vec<TestResult> {
    println!("--- Ransom ---");
    let mut results = Vec::new();

    let ransom = config.ransom;
    let mut engine = EconomyEngine::with_seeds(ResourceTable::filled(0), ransom);
    let flips = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&flips);
    let _sub = engine.on_ransom_availability_changed(move |e| sink.borrow_mut().push(e.available));

    engine.add_resource(ransom.currency, ransom.amount - 1);
    engine.add_resource(ransom.currency, 1);
    engine.add_resource(ransom.currency, 5);
    let after_crossing = flips.borrow().clone();
    results.push(check(
        "ransom_edge_once",
        after_crossing == vec![true],
        format!("flips after crossing and overshoot: {:?}", after_crossing),
    ));

    let paid = engine.pay_ransom();
    results.push(check(
        "ransom_paid",
        paid && engine.get_count(ransom.currency) == 5 && *flips.borrow() == vec![true, false],
        format!(
            "paid={}, {} {} left, flips {:?}",
            paid,
            engine.get_count(ransom.currency),
            ransom.currency,
            flips.borrow()
        ),
    ));

    results
}

// ── 5. Upgrades ─────────────────────────────────────────────────────────

fn validate_upgrades(config: &EconomyConfig) -> Vec<TestResult> {
    println!("--- Upgrades ---");
    let mut results = Vec::new();

    let curve: Vec<u64> = (0..4).map(|l| cost_at(10.0, 1.5, l)).collect();
    results.push(check(
        "cost_curve",
        curve == vec![10, 15, 22, 34],
        format!("10×1.5^n → {:?}", curve),
    ));

    for data in &config.auto_upgrades {
        let mut engine = EconomyEngine::new();
        engine.add_resource(data.currency, u64::MAX / 2);
        let mut track = UpgradeTrack::new(data.clone());
        let levels = data.max_level.unwrap_or(3).min(3);
        for _ in 0..levels {
            track.purchase(&mut engine);
        }
        let rate = engine.get_auto_production_rate(data.target);
        let expected = data.rate_at(levels);
        results.push(check(
            &format!("auto_overwrite_{}", data.name.to_lowercase().replace(' ', "_")),
            track.level() == levels && (rate - expected).abs() < 1e-9,
            format!("{} levels → {:.2}/s (expected {:.2})", track.level(), rate, expected),
        ));
    }

    for data in &config.multiplier_upgrades {
        let mut engine = EconomyEngine::new();
        engine.add_resource(data.currency, u64::MAX / 2);
        let mut track = UpgradeTrack::new(data.clone());
        track.purchase(&mut engine);
        track.purchase(&mut engine);
        let mult = engine.get_multiplier(data.target);
        let expected = 1.0 + 2.0 * data.production_bonus_per_level;
        results.push(check(
            &format!("multiplier_stack_{}", data.name.to_lowercase().replace(' ', "_")),
            (mult - expected).abs() < 1e-9,
            format!("2 levels → ×{:.2} (expected ×{:.2})", mult, expected),
        ));
    }

    results
}

// ── 6. Simulated session ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SessionReport {
    seed: u64,
    won: bool,
    won_at: Option<f64>,
    clicks: u64,
    purchases: u32,
    trades: u32,
    final_state: EconomySnapshot,
}

/// A player who clicks a few times a second, buys whatever upgrade is
/// affordable, sells coal whenever a whole coin is available, and pays the
/// ransom as soon as it unlocks.
fn play_session(config: &EconomyConfig, seed: u64) -> SessionReport {
    println!("--- Session (seed {}) ---", seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut engine = EconomyEngine::from_config(config);

    let mut multipliers: Vec<_> = config
        .multiplier_upgrades
        .iter()
        .cloned()
        .map(UpgradeTrack::new)
        .collect();
    let mut autos: Vec<_> = config
        .auto_upgrades
        .iter()
        .cloned()
        .map(UpgradeTrack::new)
        .collect();
    let trades: Vec<TradeRate> = config.trades.clone();

    let ransom_ready = Rc::new(RefCell::new(engine.is_ransom_available()));
    let flag = Rc::clone(&ransom_ready);
    let sub = engine.on_ransom_availability_changed(move |e| *flag.borrow_mut() = e.available);

    let mut report = SessionReport {
        seed,
        won: false,
        won_at: None,
        clicks: 0,
        purchases: 0,
        trades: 0,
        final_state: engine.snapshot(),
    };

    let mut elapsed = 0.0;
    while elapsed < SESSION_LIMIT_SECONDS {
        if !config.click_sources.is_empty() && rng.gen_bool(0.5) {
            let source = config.click_sources[rng.gen_range(0..config.click_sources.len())];
            engine.collect_click(source.kind, source.amount_per_click);
            report.clicks += 1;
        }

        engine.tick(FRAME_SECONDS);
        elapsed += FRAME_SECONDS;

        for track in autos.iter_mut() {
            if track.purchase(&mut engine).is_some() {
                report.purchases += 1;
            }
        }
        for track in multipliers.iter_mut() {
            if track.purchase(&mut engine).is_some() {
                report.purchases += 1;
            }
        }
        for rate in &trades {
            let sellable = rate.max_tradeable(&engine);
            if rate.execute(&mut engine, sellable).is_some() {
                report.trades += 1;
            }
        }

        if *ransom_ready.borrow() && engine.pay_ransom() {
            report.won = true;
            report.won_at = Some(elapsed);
            log::info!("Session won after {:.1}s", elapsed);
            break;
        }
    }

    sub.unsubscribe();
    report.final_state = engine.snapshot();
    report
}
