//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

use crate::codec::{DecodeMethod, Scheme};
use crate::filters::Filter;

/// 一款在无损图像像素中隐藏文本、恢复文本并检测隐写痕迹的命令行工具。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款在无损图像 (如 PNG, BMP) 的像素最低有效位中隐藏或恢复文本，并通过像素统计量估计图像是否含有隐写内容的命令行工具。"
)]
pub struct Cli {
    /// 输出调试日志到标准错误。
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在图像中隐藏文本文件内容。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 统计分析图像，估计其含有隐写内容的概率。
    Analyze(AnalyzeArgs),

    /// 显示图像能隐藏的最大字符数。
    Capacity(CapacityArgs),

    /// 对图像应用可视化检测滤镜。
    Filter(FilterArgs),

    /// 把同一段文本 (或其分片) 批量隐藏到多张图像中。
    Batch(BatchArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 结果图像的输出路径，默认为输入目录下的 `doctored_<文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 编码方案。
    #[arg(short, long, value_enum, default_value_t = Scheme::Lsb)]
    pub method: Scheme,

    /// 用于掩码的密码。
    #[arg(short, long)]
    pub password: Option<String>,

    /// 编码后加入随机 ±1 噪声。
    #[arg(short, long)]
    pub noise: bool,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本的输出路径，默认为输入目录下的 `recovered_<文件名>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 解码方案，`auto` 会依次尝试所有方案。
    #[arg(short, long, value_enum, default_value_t = DecodeMethod::Auto)]
    pub method: DecodeMethod,

    /// 编码时使用的密码。
    #[arg(short, long)]
    pub password: Option<String>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'analyze' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// 待分析的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 同时打印像素值直方图。
    #[arg(long)]
    pub histogram: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 可选的文本文件，用于显示容量占用比例。
    #[arg(short, long)]
    pub text: Option<PathBuf>,
}

/// 'filter' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct FilterArgs {
    /// 输入图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 滤镜类型。
    #[arg(short, long, value_enum)]
    pub kind: Filter,

    /// 输出路径，默认为输入目录下的 `<滤镜>_<文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 批量隐藏时文本的分配方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BatchMode {
    /// 每张图像都隐藏完整文本。
    #[default]
    Same,
    /// 文本平均分片，每张图像隐藏一片并带上序号。
    Split,
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BatchMode::Same => "same",
            BatchMode::Split => "split",
        })
    }
}

/// 'batch' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// 输入图像文件路径，可以指定多个。
    #[arg(short, long, num_args = 1.., required = true)]
    pub images: Vec<PathBuf>,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 文本分配方式。
    #[arg(short, long, value_enum, default_value_t = BatchMode::Same)]
    pub mode: BatchMode,

    /// 用于掩码的密码。
    #[arg(short, long)]
    pub password: Option<String>,

    /// 输出目录，默认与每张输入图像相同。
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}
