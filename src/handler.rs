//! # 命令处理逻辑模块
//!
//! 包含各个子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、图像解码与保存、调用核心隐写与分析函数以及向用户报告结果。

use crate::analysis::{self, Verdict};
use crate::capacity::{UsageLevel, capacity, usage_level, usage_percent};
use crate::cli::{AnalyzeArgs, BatchArgs, BatchMode, CapacityArgs, FilterArgs, HideArgs, RecoverArgs};
use crate::codec::Scheme;
use crate::constants::MAX_MESSAGE_LEN;
use crate::noise::add_noise;
use crate::steganography::{decode_message, encode_message, split_message};
use anyhow::{Context, Result};
use colored::Colorize;
use image::{ImageFormat, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

/// 直方图输出时每行合并的取值个数。
const HISTOGRAM_BUCKET: usize = 8;

/// 直方图柱的最大宽度 (字符)。
const HISTOGRAM_WIDTH: f64 = 50.0;

/// 读取图像并转换为 RGBA 像素布局。
fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    Ok(image.to_rgba8())
}

/// 以 PNG 格式保存图像，有损格式会破坏最低位。
fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| {
            format!(
                "Unable to write to target image file: {}",
                path.to_string_lossy().red().bold()
            )
        })
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| {
        format!(
            "Unable to read text file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// 在 `source` 所在目录下生成 `<prefix><文件名主干>.<extension>`。
fn sibling_path(source: &Path, dir: Option<&Path>, prefix: &str, extension: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let dir = dir
        .map(Path::to_path_buf)
        .or_else(|| source.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{prefix}{stem}.{extension}"))
}

/// 未指定 `--force` 时拒绝覆盖已存在的文件。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本文件、检查隐写空间是否足够、调用核心编码函数，
/// 按需加入噪声，最后以 PNG 格式写出结果图像。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径、编码方案和密码的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件。
/// * 图像没有足够的空间来隐藏文本。
/// * 核心编码函数 (`encode_message`) 在执行过程中失败。
/// * 目标文件已存在且未指定 `--force`，或无法写入目标文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| sibling_path(&args.image, None, "doctored_", "png"));
    ensure_writable(&dest, args.force)?;

    let mut picture = load_rgba(&args.image)?;
    let text = read_text(&args.text)?;
    let (width, height) = picture.dimensions();

    let available = capacity(width, height).min(MAX_MESSAGE_LEN);
    let required = text.chars().count();
    anyhow::ensure!(
        required <= available,
        "Not enough space in the image to hide the text. \nRequired: {}, Available: {}",
        required.to_string().red().bold(),
        available.to_string().green().bold()
    );

    encode_message(
        &mut picture,
        width,
        height,
        &text,
        args.method,
        args.password.as_deref(),
    )
    .with_context(|| {
        format!(
            "Failed to hide the message with method {}. \nTry a shorter message or another method.",
            args.method.to_string().red().bold()
        )
    })?;

    if args.noise {
        let touched = add_noise(&mut picture, &mut rand::rng());
        tracing::debug!(touched, "noise layer applied");
    }

    save_png(&picture, &dest)?;

    println!(
        "The text has been successfully hidden ({} of {} characters, method {}) and saved: {}",
        required.to_string().green(),
        available.to_string().green(),
        args.method.to_string().cyan(),
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、按指定方案 (或自动检测) 解码，
/// 最后将恢复的文本内容写入目标文本文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径、解码方案和密码的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 核心解码函数 (`decode_message`) 没有找到消息。
/// * 目标文件已存在且未指定 `--force`，或无法写入目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| sibling_path(&args.image, None, "recovered_", "txt"));
    ensure_writable(&dest, args.force)?;

    let picture = load_rgba(&args.image)?;

    let recovered = decode_message(&picture, args.method, args.password.as_deref())
        .with_context(|| {
            format!(
                "Failed to recover a message from '{}'. \nThe image may not contain a hidden message or is corrupted.",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    fs::write(&dest, &recovered.message).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered (method {}) and saved: {}",
        recovered.scheme.to_string().cyan(),
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Analyze' 命令的执行逻辑。
///
/// 输出卡方分数、熵、LSB 偏差和估计概率，可选地打印直方图。
/// 卡方分数和概率含有随机抖动，多次运行结果会略有不同。
pub fn handle_analyze(args: AnalyzeArgs) -> Result<()> {
    let picture = load_rgba(&args.image)?;

    let result = analysis::analyze(&picture, &mut rand::rng()).with_context(|| {
        format!(
            "Failed to analyze image: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    println!("Chi-square:  {:.3}", result.chi_square);
    println!("Entropy:     {:.3}", result.entropy);
    println!("LSB bias:    {:.3}", result.lsb_bias);
    println!("Probability: {}%", result.probability);

    let verdict = result.verdict();
    let message = match verdict {
        Verdict::Likely => verdict.message().red().bold(),
        Verdict::Possible => verdict.message().yellow().bold(),
        Verdict::Clean => verdict.message().green().bold(),
    };
    println!("{message}");

    if args.histogram {
        let histogram = analysis::histogram(&picture);
        let bars = analysis::bar_heights(&histogram, HISTOGRAM_WIDTH);
        for (bucket, heights) in bars.chunks(HISTOGRAM_BUCKET).enumerate() {
            let start = bucket * HISTOGRAM_BUCKET;
            let height = heights.iter().copied().fold(0.0, f64::max);
            println!(
                "{:>3}-{:>3} |{}",
                start,
                start + HISTOGRAM_BUCKET - 1,
                "█".repeat(height.round() as usize).cyan()
            );
        }
    }

    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 输出图像的最大字符数；提供文本文件时同时输出占用比例。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = load_rgba(&args.image)?;
    let (width, height) = picture.dimensions();
    let available = capacity(width, height);

    println!(
        "{}x{} image can hide up to {} characters",
        width,
        height,
        available.to_string().green().bold()
    );

    if let Some(path) = &args.text {
        let length = read_text(path)?.chars().count();
        let percent = usage_percent(length, available);
        let usage = format!("{length}/{available} characters ({percent}%)");
        let usage = match usage_level(percent) {
            UsageLevel::Danger => usage.red().bold(),
            UsageLevel::Warning => usage.yellow().bold(),
            UsageLevel::Normal => usage.green().bold(),
        };
        println!("Usage: {usage}");
    }

    Ok(())
}

/// 处理 'Filter' 命令的执行逻辑。
pub fn handle_filter(args: FilterArgs) -> Result<()> {
    let prefix = format!("{}_", args.kind.name());
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| sibling_path(&args.image, None, &prefix, "png"));
    ensure_writable(&dest, args.force)?;

    let mut picture = load_rgba(&args.image)?;
    args.kind.apply(&mut picture);
    save_png(&picture, &dest)?;

    println!(
        "The {} filter has been applied and saved: {}",
        args.kind.name().cyan(),
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 将一条消息以顺序 1 位方案写入单张图像。
fn hide_in_one(
    source: &Path,
    dest: &Path,
    message: &str,
    password: Option<&str>,
    force: bool,
) -> Result<()> {
    ensure_writable(dest, force)?;
    let mut picture = load_rgba(source)?;
    let (width, height) = picture.dimensions();
    encode_message(&mut picture, width, height, message, Scheme::Lsb, password)
        .context("Encoding failed")?;
    save_png(&picture, dest)
}

/// 处理 'Batch' 命令的执行逻辑。
///
/// 依次处理每张图像，单张失败只报告错误，不中断后续图像。
///
/// # Errors
///
/// 无法读取文本文件，或所有图像都处理失败时返回错误。
pub fn handle_batch(args: BatchArgs) -> Result<()> {
    let text = read_text(&args.text)?;
    let messages = match args.mode {
        BatchMode::Same => vec![text; args.images.len()],
        BatchMode::Split => split_message(&text, args.images.len()),
    };

    if let Some(dir) = &args.out_dir {
        fs::create_dir_all(dir).with_context(|| {
            format!(
                "Unable to create output directory: {}",
                dir.to_string_lossy().red().bold()
            )
        })?;
    }

    let mut succeeded = 0;
    for (index, (source, message)) in args.images.iter().zip(&messages).enumerate() {
        // 序号避免不同目录下同名图像写到同一个输出文件
        let prefix = format!("doctored_{}_", index + 1);
        let dest = sibling_path(source, args.out_dir.as_deref(), &prefix, "png");
        match hide_in_one(source, &dest, message, args.password.as_deref(), args.force) {
            Ok(()) => {
                succeeded += 1;
                println!(
                    "{} {} -> {}",
                    "✓".green().bold(),
                    source.to_string_lossy(),
                    dest.to_string_lossy().green()
                );
            }
            Err(e) => println!(
                "{} {}: {:#}",
                "✗".red().bold(),
                source.to_string_lossy(),
                e
            ),
        }
    }

    anyhow::ensure!(
        succeeded > 0,
        "Batch failed: none of the {} images could be processed.",
        args.images.len().to_string().red().bold()
    );

    println!(
        "Batch complete: {}/{} images processed ({} mode)",
        succeeded.to_string().green().bold(),
        args.images.len(),
        args.mode
    );
    Ok(())
}
