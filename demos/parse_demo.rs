//! rsuaparser 解析演示程序
//! 功能说明：
//! 1. 以内置规则库初始化解析器
//! 2. 解析命令行传入的 UA（未传入时使用内置样例）
//! 3. 输出逐维度结果与结构化 JSON
//!
//! 运行命令：
//! RUST_LOG=rsuaparser=debug cargo run --example parse_demo -- "<user agent>"

use std::time::Instant;

use anyhow::Result;
use rsuaparser::{ConfigManager, UaParser};
use tracing_subscriber::EnvFilter;

const SAMPLE_UAS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.212 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 11; SM-G991B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.120 Mobile Safari/537.36",
    "Opera/9.80 (J2ME/MIDP; Opera Mini/9.80 (S60; SymbOS; Opera Mobi/23.348; U; en) Presto/2.5.25 Version/10.54",
];

fn main() -> Result<()> {
    // ========== 1. 日志系统初始化 ==========
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // ========== 2. 初始化解析器 ==========
    let start = Instant::now();
    let parser = UaParser::new(&ConfigManager::get_default())?;
    println!("✅ 解析器初始化完成 | 耗时 {:?}", start.elapsed());

    // ========== 3. 解析 ==========
    let args: Vec<String> = std::env::args().skip(1).collect();
    let inputs: Vec<&str> = if args.is_empty() {
        SAMPLE_UAS.to_vec()
    } else {
        args.iter().map(String::as_str).collect()
    };

    for ua in inputs {
        let start = Instant::now();
        let agent = parser.parse(ua);
        let elapsed = start.elapsed();

        println!("\n🔍 {ua}");
        println!("   {agent}");
        println!("   耗时 {elapsed:?}");
        println!("{}", serde_json::to_string_pretty(&agent)?);
    }

    Ok(())
}
