use clap::Parser;
use team_balancer::core::report::{render_grouping, render_history};
use team_balancer::utils::error::{BalancerError, ErrorSeverity};
use team_balancer::utils::{logger, validation::Validate};
use team_balancer::{CliConfig, LocalStorage, ShuffleEngine, TeamBalancer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting team-balancer");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let settings = match cli.settings().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let shuffler = match settings.search.seed {
        Some(seed) => {
            tracing::info!("🔧 Using fixed seed {}", seed);
            ShuffleEngine::seeded(seed)
        }
        None => ShuffleEngine::from_entropy(),
    };
    let balancer = TeamBalancer::with_shuffler(LocalStorage::default(), &settings, shuffler);

    if cli.show_history {
        let history = balancer.history().await;
        println!("{}", render_history(&history));
        return Ok(());
    }

    let roster = match cli.roster_source() {
        Ok(roster) => roster,
        Err(e) => {
            report_failure(&e);
            return Ok(());
        }
    };

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - history will not be updated");
    }

    match balancer
        .run_roster(roster.as_ref(), &cli.team_options(), !cli.dry_run)
        .await
    {
        Ok(outcome) => {
            println!("🎮 Teams");
            println!();
            println!("{}", render_grouping(&outcome.grouping));
            tracing::info!(
                "✅ Done (score {}, {} trials, history {}{})",
                outcome.score,
                outcome.trials,
                outcome.history_len,
                if outcome.committed { "" } else { ", not saved" }
            );
        }
        Err(e) => report_failure(&e),
    }

    Ok(())
}

fn report_failure(e: &BalancerError) {
    tracing::error!(
        "❌ Balancing failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,      // 警告，但成功
        ErrorSeverity::Medium => 2,   // 可重試
        ErrorSeverity::High => 1,     // 輸入或設定錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
