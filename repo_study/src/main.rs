mod cleaner;
mod collector;
mod config;
mod quality;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::StudyContext;
use github_handler::GithubClient;
use storage::StudyStore;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_logger() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_target(false),
        )
        .init();
}

#[derive(Parser)]
#[command(name = "repo_study", about = "GitHub 仓库热度与工程质量代理指标的关联研究")]
struct Cli {
    #[command(subcommand)]
    stage: Stage,
}

#[derive(Subcommand)]
enum Stage {
    /// 拉取搜索结果并落盘原始快照
    Collect,
    /// 清洗原始快照, 生成带衍生字段的表格数据
    Clean,
    /// 逐仓库提取质量指标并合并到最终数据集
    Quality,
    /// 对最终数据集做统计分析并输出报告
    Analyze,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 初始化日志记录器
    init_logger();

    let cli = Cli::parse();

    // 加载配置
    let ctx = StudyContext::load_config("repo_study/config")?;
    let store = StudyStore::new(
        &ctx.storage.raw_path,
        &ctx.storage.cleaned_path,
        &ctx.storage.final_path,
    );

    match cli.stage {
        Stage::Collect => {
            let client = GithubClient::from_env(&ctx.github.api_base)?;
            collector::run(&ctx, &client, &store).await?;
        }
        Stage::Clean => {
            cleaner::run(&store)?;
        }
        Stage::Quality => {
            let client = GithubClient::from_env(&ctx.github.api_base)?;
            quality::run(&client, &store).await?;
        }
        Stage::Analyze => {
            let records = store.read_final()?;
            print!("{}", analysis::report::render(&records));
        }
    }

    Ok(())
}
