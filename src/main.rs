use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use pump_sizing_toolbox::admin::{AdminService, StaticTokenAuthenticator};
use pump_sizing_toolbox::app::{self, AppError, PumpCommand};
use pump_sizing_toolbox::catalog::{NewPump, PowerSource};
use pump_sizing_toolbox::config::{self, DEFAULT_CONFIG_PATH};
use pump_sizing_toolbox::i18n::{self, keys, Translator};
use pump_sizing_toolbox::logging;
use pump_sizing_toolbox::scenario::{Calculators, ScenarioKind};

/// 펌프 사양 계산 및 카탈로그 매칭 도구
#[derive(Parser)]
#[command(name = "pump_sizing_toolbox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hydraulic pump sizing and catalog matching", long_about = None)]
struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// 메뉴 언어 (ko, en, auto)
    #[arg(long, global = true)]
    lang: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 시나리오 계산 (결과는 JSON)
    Calc {
        scenario: ScenarioKind,
        /// 입력 값 key=value (반복 가능)
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,
        /// JSON 객체 입력 파일
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// 펌프 카탈로그 관리
    Pumps {
        #[command(subcommand)]
        action: PumpAction,
    },
    /// 대화형 메뉴 (기본)
    Menu,
}

#[derive(Subcommand)]
enum PumpAction {
    List,
    Stats,
    Add {
        #[arg(long)]
        token: String,
        #[command(flatten)]
        pump: PumpArgs,
    },
    Update {
        #[arg(long)]
        token: String,
        id: i64,
        #[command(flatten)]
        pump: PumpArgs,
    },
    Delete {
        #[arg(long)]
        token: String,
        id: i64,
    },
}

#[derive(Args)]
struct PumpArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    brand: String,
    /// 유량 [L/h]
    #[arg(long)]
    flow_rate: Option<f64>,
    /// 양정 [m]
    #[arg(long)]
    head: Option<f64>,
    /// 생략하면 모든 동력원에 일치하는 범용 펌프
    #[arg(long)]
    power: Option<PowerSource>,
    #[arg(long)]
    price: f64,
}

impl From<PumpArgs> for NewPump {
    fn from(args: PumpArgs) -> Self {
        NewPump {
            name: args.name,
            brand: args.brand,
            flow_rate: args.flow_rate,
            head: args.head,
            power: args.power,
            price: args.price,
        }
    }
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 명령을 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match try_run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err((tr, err)) => {
            eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: Cli) -> Result<(), (Translator, AppError)> {
    let fallback = Translator::new(&i18n::resolve_language(cli.lang.as_deref(), None));
    let cfg = config::load_or_default(&cli.config).map_err(|e| (fallback, e.into()))?;

    logging::init(cli.log_level.as_deref().or(cfg.log_level.as_deref()));
    let tr = Translator::new(&i18n::resolve_language(
        cli.lang.as_deref(),
        Some(&cfg.language),
    ));

    execute(cli.command.unwrap_or(Commands::Menu), &cfg, &tr).map_err(|e| (tr, e))
}

fn execute(command: Commands, cfg: &config::Config, tr: &Translator) -> Result<(), AppError> {
    let catalog = cfg.open_catalog()?;
    let auth = StaticTokenAuthenticator::new(cfg.admin.token.clone())
        .with_user_tokens(cfg.admin.user_tokens.iter().cloned());
    let admin = AdminService::new(&catalog, &auth);
    let calculators = Calculators::new(&cfg.standards);

    match command {
        Commands::Calc {
            scenario,
            params,
            input,
        } => {
            let input = app::build_input(input.as_deref(), &params)?;
            let response = app::calculate(&calculators, &catalog, scenario, &input)?;
            println!("{}", app::to_json(&response)?);
        }
        Commands::Pumps { action } => {
            let command = match action {
                PumpAction::List => PumpCommand::List,
                PumpAction::Stats => PumpCommand::Stats,
                PumpAction::Add { token, pump } => PumpCommand::Add {
                    token,
                    pump: pump.into(),
                },
                PumpAction::Update { token, id, pump } => PumpCommand::Update {
                    token,
                    id,
                    pump: pump.into(),
                },
                PumpAction::Delete { token, id } => PumpCommand::Delete { token, id },
            };
            let output = app::run_pump_command(&admin, command)?;
            println!("{}", output.to_json()?);
        }
        Commands::Menu => app::run(tr, &calculators, &catalog, &admin)?,
    }
    Ok(())
}
