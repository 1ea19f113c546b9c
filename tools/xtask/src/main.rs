//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与脚本检查命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-core`: 运行 kethaka-core 覆盖率
//! - `script-check`: 检查脚本文件（词法、语法、降级）
//! - `emit`: 编译单个脚本并输出目标表示

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use kethaka_core::{
    FrontendConfig, PythonBackend, TargetKind, TreeBackend, compile_with_lexicon,
};
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;
use xshell::{Shell, cmd};

/// 脚本扩展名
const SCRIPT_EXTENSION: &str = "snl";

/// 默认脚本目录（相对于 workspace root）
const DEFAULT_SCRIPTS_DIR: &str = "assets/scripts";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,

    /// 运行 kethaka-core 覆盖率报告
    CovCore,

    /// 检查脚本文件
    ///
    /// 不带路径时检查 assets/scripts/ 下所有 .snl 文件。
    ScriptCheck {
        /// 脚本文件或目录
        path: Option<PathBuf>,

        /// 前端配置文件（JSON）
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// 编译单个脚本并输出到 stdout
    Emit {
        /// 脚本文件
        file: PathBuf,

        /// 目标表示（默认取配置文件中的 target）
        #[arg(short, long, value_enum)]
        target: Option<TargetArg>,

        /// 前端配置文件（JSON）
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetArg {
    Tree,
    Python,
}

impl From<TargetArg> for TargetKind {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Tree => TargetKind::Tree,
            TargetArg::Python => TargetKind::Python,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = real_main(cli.command) {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

/// 日志只输出到 stderr：`[LEVEL] message`，不带时间和模块路径
fn init_logging(verbose: bool) {
    let filter = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(true)
        .compact()
        .with_filter(filter);

    Registry::default().with(layer).init();
}

fn real_main(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::CheckAll => check_all(),
        Commands::CovCore => cov_core(),
        Commands::ScriptCheck { path, config } => {
            let config = load_config(config.as_deref())?;
            script_check(path.as_deref(), &config)
        }
        Commands::Emit {
            file,
            target,
            config,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(target) = target {
                config.target = target.into();
            }
            emit(&file, &config)
        }
    }
}

//=============================================================================
// 门禁命令
//=============================================================================

fn check_all() -> anyhow::Result<()> {
    let sh = Shell::new()?;

    eprintln!("\n==> cargo fmt --all -- --check");
    cmd!(sh, "cargo fmt --all -- --check").run()?;

    eprintln!("\n==> cargo clippy --workspace --all-targets");
    cmd!(sh, "cargo clippy --workspace --all-targets").run()?;

    eprintln!("\n==> cargo test --workspace");
    cmd!(sh, "cargo test --workspace").run()?;

    Ok(())
}

fn cov_core() -> anyhow::Result<()> {
    let sh = Shell::new()?;

    if cmd!(sh, "cargo llvm-cov --version").quiet().run().is_err() {
        anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        );
    }

    eprintln!("\n==> cargo llvm-cov -p kethaka-core --html");
    cmd!(sh, "cargo llvm-cov -p kethaka-core --html").run()?;

    eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
    Ok(())
}

//=============================================================================
// 配置
//=============================================================================

/// 读取前端配置，未指定文件时使用默认配置
fn load_config(path: Option<&Path>) -> anyhow::Result<FrontendConfig> {
    let Some(path) = path else {
        debug!("使用默认前端配置");
        return Ok(FrontendConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
    let config = FrontendConfig::from_json_str(&content)
        .with_context(|| format!("配置文件无效: {}", path.display()))?;
    info!(path = %path.display(), backend = ?config.target, "已加载前端配置");
    Ok(config)
}

//=============================================================================
// script-check 命令实现
//=============================================================================

/// 脚本检查结果
#[derive(Default)]
struct ScriptCheckResult {
    /// 检查的脚本数量
    scripts_checked: usize,
    /// 失败的脚本数量
    errors: usize,
}

/// 执行脚本检查
fn script_check(path: Option<&Path>, config: &FrontendConfig) -> anyhow::Result<()> {
    let files = match path {
        Some(path) if path.is_file() => vec![path.to_path_buf()],
        Some(path) if path.is_dir() => collect_script_files(path),
        Some(path) => anyhow::bail!("路径不存在: {}", path.display()),
        None => {
            let dir = Path::new(DEFAULT_SCRIPTS_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认脚本目录不存在: {}\n请在 workspace 根目录运行，或指定脚本路径",
                    dir.display()
                );
            }
            collect_script_files(dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到脚本文件（.{SCRIPT_EXTENSION}）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个脚本文件...\n", files.len());

    let mut result = ScriptCheckResult::default();
    for file in &files {
        check_script_file(file, config, &mut result);
    }

    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个脚本", result.scripts_checked);
    if result.errors > 0 {
        eprintln!("❌ {} 个错误", result.errors);
        anyhow::bail!("脚本检查发现错误");
    }
    eprintln!("✅ 检查通过，无错误");
    Ok(())
}

/// 递归收集目录下的脚本文件，按路径排序
fn collect_script_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION))
        .collect();
    files.sort();
    files
}

/// 检查单个脚本文件：走完整条管线，只报告第一个错误
fn check_script_file(file: &Path, config: &FrontendConfig, result: &mut ScriptCheckResult) {
    let script_id = file.display().to_string();
    result.scripts_checked += 1;

    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ERROR] {script_id}: 无法读取文件 - {e}");
            result.errors += 1;
            return;
        }
    };

    match compile_with_lexicon(&content, &config.lexicon, &TreeBackend) {
        Ok(program) => debug!(script = %script_id, statements = program.body.len(), "检查通过"),
        Err(e) => {
            eprintln!("[ERROR] {script_id}: {e}");
            result.errors += 1;
        }
    }
}

//=============================================================================
// emit 命令实现
//=============================================================================

fn emit(file: &Path, config: &FrontendConfig) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("无法读取脚本: {}", file.display()))?;

    let output = match config.target {
        TargetKind::Tree => compile_with_lexicon(&content, &config.lexicon, &TreeBackend)
            .with_context(|| file.display().to_string())?
            .to_json_pretty()?,
        TargetKind::Python => compile_with_lexicon(&content, &config.lexicon, &PythonBackend)
            .with_context(|| file.display().to_string())?,
    };

    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
