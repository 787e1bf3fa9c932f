//! End-to-end simulation harness.
//!
//! Drives the public API the way the binary does: config → runner →
//! report → export, with scripted and seeded wheels.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use roulette_sim::batch::run_batch;
use roulette_sim::bet::BetSpec;
use roulette_sim::config::{AppConfig, RunConfig};
use roulette_sim::engine::{SimulationRunner, WinStreak};
use roulette_sim::prompt::{AutoContinue, ConfirmationPrompt, PromptStatus};
use roulette_sim::report::{render_chart, render_text, SimulationReport};
use roulette_sim::storage;
use roulette_sim::strategy::StrategyParams;
use roulette_sim::types::{BetType, EvenChance, HaltReason, Pocket, StrategyKind, WheelType};
use roulette_sim::wheel::{ScriptedSpinner, Wheel};

/// Answers from a fixed list and records every status it was shown.
struct ScriptedPrompt {
    answers: Vec<bool>,
    seen: Vec<PromptStatus>,
}

impl ConfirmationPrompt for ScriptedPrompt {
    fn confirm_continue(&mut self, status: &PromptStatus) -> bool {
        self.seen.push(status.clone());
        if self.answers.is_empty() {
            true
        } else {
            self.answers.remove(0)
        }
    }
}

fn run_config(kind: StrategyKind, bet: BetSpec, balance: Decimal, wager: Decimal, spins: u32) -> RunConfig {
    RunConfig {
        initial_balance: balance,
        wheel_type: WheelType::European,
        bet,
        strategy: StrategyParams::new(kind, wager),
        spin_count: spins,
        prompt_after_win: false,
    }
}

fn numbers(ns: &[u8]) -> Vec<Pocket> {
    ns.iter()
        .map(|n| if *n == 0 { Pocket::Zero } else { Pocket::Number(*n) })
        .collect()
}

fn play(config: RunConfig, script: &[u8]) -> SimulationReport {
    let mut spinner = ScriptedSpinner::new(config.wheel_type, numbers(script));
    SimulationRunner::new(config)
        .unwrap()
        .run(&mut spinner, &mut AutoContinue)
}

fn wagers(report: &SimulationReport) -> Vec<Decimal> {
    report.rounds.iter().map(|r| r.wager).collect()
}

// ---------------------------------------------------------------------------
// Strategy progressions through the full loop
// ---------------------------------------------------------------------------

#[test]
fn test_martingale_reference_scenario() {
    let cfg = run_config(StrategyKind::Martingale, BetSpec::standard(BetType::Single), dec!(1000), dec!(10), 5);
    let report = play(cfg, &[5, 5, 5, 0, 5]);

    assert_eq!(wagers(&report), vec![dec!(10), dec!(20), dec!(40), dec!(80), dec!(10)]);
    assert_eq!(report.longest_win_streak, WinStreak { length: 1, amount_won: dec!(2800) });
    assert_eq!(report.final_balance, dec!(3720));
    assert_eq!(report.net_profit_loss, dec!(2720));
    assert_eq!(report.balance_history.len(), 6);
}

#[test]
fn test_fibonacci_losing_run() {
    let cfg = run_config(StrategyKind::Fibonacci, BetSpec::even_chance(EvenChance::Red), dec!(1000), dec!(2), 6);
    // 2 is black: six losses
    let report = play(cfg, &[2]);
    assert_eq!(
        wagers(&report),
        vec![dec!(2), dec!(2), dec!(4), dec!(6), dec!(10), dec!(16)]
    );
    assert_eq!(report.final_balance, dec!(960));
}

#[test]
fn test_one_three_two_six_full_cycle() {
    let cfg = run_config(StrategyKind::OneThreeTwoSix, BetSpec::even_chance(EvenChance::Odd), dec!(100), dec!(1), 5);
    let report = play(cfg, &[1]);
    assert_eq!(
        wagers(&report),
        vec![dec!(1), dec!(3), dec!(2), dec!(6), dec!(1)]
    );
    assert_eq!(report.strategy_cycles, 1);
}

#[test]
fn test_dalembert_never_below_unit() {
    let cfg = run_config(StrategyKind::DAlembert, BetSpec::even_chance(EvenChance::High), dec!(500), dec!(5), 8);
    // win, win, loss, win, win, loss, loss, win
    let report = play(cfg, &[20, 20, 3, 20, 20, 3, 3, 20]);
    assert!(report.rounds.iter().all(|r| r.wager >= dec!(5)));
    assert_eq!(
        wagers(&report),
        vec![dec!(5), dec!(5), dec!(5), dec!(10), dec!(5), dec!(5), dec!(10), dec!(15)]
    );
}

#[test]
fn test_thirds_from_config_file() {
    let cfg: AppConfig = toml::from_str(
        r#"
        [simulation]
        strategy = "Thirds"
        initial_wager = 5
        spins = 3
        "#,
    )
    .unwrap();
    let run = cfg.to_run_config().unwrap();
    // 13 and 24 are inside the middle dozen, 25 is not
    let report = play(run, &[13, 24, 25]);
    assert_eq!(report.final_balance, dec!(1015));
    assert_eq!(report.bet_type, BetType::Dozen);
}

// ---------------------------------------------------------------------------
// Halting
// ---------------------------------------------------------------------------

#[test]
fn test_underfunded_run_reports_zero_spins() {
    let cfg = run_config(StrategyKind::Martingale, BetSpec::standard(BetType::Single), dec!(5), dec!(10), 10);
    let report = play(cfg, &[0]);
    assert_eq!(report.total_spins, 0);
    assert_eq!(report.balance_history, vec![dec!(5)]);
    assert!(report.is_bust());
    assert!(render_text(&report).contains("insufficient funds"));
}

#[test]
fn test_endless_winning_streak_halts_on_overflow() {
    let cfg = run_config(StrategyKind::ReverseMartingale, BetSpec::standard(BetType::Single), dec!(1000), dec!(10), 1000);
    let report = play(cfg, &[0]);

    assert!(matches!(report.halt_reason, HaltReason::BankrollOverflow { .. }));
    assert!(report.total_spins < 1000);
    assert_eq!(report.total_losses, 0);
    assert_eq!(
        report.final_balance,
        report.initial_balance + report.total_returned - report.total_wagered
    );
    assert!(render_text(&report).contains("bankroll overflow"));
}

#[test]
fn test_user_stop_after_second_win() {
    let mut cfg = run_config(StrategyKind::Paroli, BetSpec::even_chance(EvenChance::Red), dec!(100), dec!(5), 20);
    cfg.prompt_after_win = true;
    let mut spinner = ScriptedSpinner::new(WheelType::European, numbers(&[1, 2, 3]));
    let mut prompt = ScriptedPrompt {
        answers: vec![true, false],
        seen: Vec::new(),
    };
    let report = SimulationRunner::new(cfg)
        .unwrap()
        .run(&mut spinner, &mut prompt);

    assert_eq!(report.halt_reason, HaltReason::UserStopped);
    assert_eq!(report.total_spins, 3);
    assert_eq!(prompt.seen.len(), 2);
    assert_eq!(prompt.seen[0].spin, 1);
    assert_eq!(prompt.seen[1].spin, 3);
    assert_eq!(prompt.seen[1].bankroll, report.final_balance);
}

// ---------------------------------------------------------------------------
// Invariants over random play
// ---------------------------------------------------------------------------

#[test]
fn test_every_strategy_conserves_money_and_respects_bankroll() {
    for (i, kind) in StrategyKind::ALL.iter().enumerate() {
        let bet = if *kind == StrategyKind::Thirds {
            BetSpec::dozen(2).unwrap()
        } else {
            BetSpec::even_chance(EvenChance::Black)
        };
        let mut cfg = run_config(*kind, bet, dec!(300), dec!(3), 1000);
        cfg.wheel_type = WheelType::American;
        let mut wheel = Wheel::seeded(WheelType::American, 1000 + i as u64);
        let report = SimulationRunner::new(cfg)
            .unwrap()
            .run(&mut wheel, &mut AutoContinue);

        assert_eq!(
            report.final_balance,
            report.initial_balance + report.total_returned - report.total_wagered,
            "{kind}"
        );
        let mut bankroll = report.initial_balance;
        for round in &report.rounds {
            assert!(round.wager > Decimal::ZERO, "{kind}");
            assert!(round.wager <= bankroll, "{kind}");
            bankroll = round.bankroll_after;
        }
        assert!(report.final_balance >= Decimal::ZERO, "{kind}");
        assert_eq!(report.total_wins + report.total_losses, report.total_spins);
        assert_eq!(report.balance_history.len(), report.total_spins as usize + 1);
    }
}

#[test]
fn test_batch_matches_individual_runs() {
    let cfg = run_config(StrategyKind::Flat, BetSpec::even_chance(EvenChance::Even), dec!(100), dec!(1), 50);
    let summary = run_batch(&cfg, 4, 10).unwrap();

    let mut finals: Vec<Decimal> = (0..4u64)
        .map(|i| {
            let mut wheel = Wheel::seeded(WheelType::European, 10 + i);
            SimulationRunner::new(cfg.clone())
                .unwrap()
                .run(&mut wheel, &mut AutoContinue)
                .final_balance
        })
        .collect();
    finals.sort();
    assert_eq!(summary.min_final_balance, finals[0]);
    assert_eq!(summary.max_final_balance, finals[3]);
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[test]
fn test_report_export_and_render() {
    let cfg = run_config(StrategyKind::Labouchere, BetSpec::even_chance(EvenChance::Low), dec!(250), dec!(1), 40);
    let mut wheel = Wheel::seeded(WheelType::European, 77);
    let report = SimulationRunner::new(cfg)
        .unwrap()
        .run(&mut wheel, &mut AutoContinue);

    let mut path = std::env::temp_dir();
    path.push(format!("roulette_it_report_{}.json", uuid::Uuid::new_v4()));
    let path = path.to_string_lossy().to_string();
    storage::save_report(&report, Some(&path)).unwrap();
    let loaded = storage::load_report(&path).unwrap().unwrap();
    assert_eq!(loaded, report);
    std::fs::remove_file(&path).unwrap();

    let chart = render_chart(&report, 30, 8);
    assert!(chart.starts_with("Balance Over Time"));
    assert!(chart.contains("Wins vs Losses"));
}
