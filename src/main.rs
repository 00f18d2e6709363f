use clap::Parser;
use tracing::Level;

use pixel_veil::{
    cli::{Cli, Commands},
    handler::{
        handle_analyze, handle_batch, handle_capacity, handle_filter, handle_hide, handle_recover,
    },
};

/// 程序的主入口点
///
/// 负责解析命令行参数、初始化日志，并根据子命令
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 日志写到标准错误，不干扰正常输出
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Recover(args) => handle_recover(args),
        Commands::Analyze(args) => handle_analyze(args),
        Commands::Capacity(args) => handle_capacity(args),
        Commands::Filter(args) => handle_filter(args),
        Commands::Batch(args) => handle_batch(args),
    }
}
