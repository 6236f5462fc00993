//! UA 解析器：按维度查询 + 汇总结果
use std::sync::Arc;

use super::agent::{Browser, Cpu, Device, Engine, Os, ParsedAgent};
use crate::compiler::{CompiledRuleLibrary, RuleCompiler};
use crate::config::ParserConfig;
use crate::error::UaResult;
use crate::mapper::{Category, FieldRecord, RuleEngine, field};
use crate::rule::{RuleLibrary, RuleLoader};
use crate::utils::VersionExtractor;

/// UA 解析器
///
/// 编译后的规则库只读共享，克隆解析器不会复制规则。
/// 每次查询都会新建结果记录，查询之间互不影响。
#[derive(Debug, Clone)]
pub struct UaParser {
    library: Arc<CompiledRuleLibrary>,
    ua: Option<String>,
}

impl UaParser {
    /// 按配置加载并编译规则库，创建解析器
    pub fn new(config: &ParserConfig) -> UaResult<Self> {
        let library = Self::build_library(config)?;
        Ok(Self::with_library(Arc::new(library)))
    }

    /// 按配置加载规则库并合并调用方提供的扩展规则（扩展优先）
    pub fn with_extension(config: &ParserConfig, extension: RuleLibrary) -> UaResult<Self> {
        let mut rule_lib = RuleLoader::load(config)?;
        rule_lib.extend(extension);
        let library = RuleCompiler::new(config).compile(&rule_lib)?;
        Ok(Self::with_library(Arc::new(library)))
    }

    /// 复用已编译的规则库
    pub fn with_library(library: Arc<CompiledRuleLibrary>) -> Self {
        Self { library, ua: None }
    }

    /// 加载规则源（含扩展）并编译
    pub fn build_library(config: &ParserConfig) -> UaResult<CompiledRuleLibrary> {
        let rule_lib = RuleLoader::load(config)?;
        RuleCompiler::new(config).compile(&rule_lib)
    }

    pub fn library(&self) -> &Arc<CompiledRuleLibrary> {
        &self.library
    }

    pub fn with_ua(mut self, ua: impl Into<String>) -> Self {
        self.ua = Some(ua.into());
        self
    }

    pub fn set_ua(&mut self, ua: impl Into<String>) -> &mut Self {
        self.ua = Some(ua.into());
        self
    }

    pub fn ua(&self) -> Option<&str> {
        self.ua.as_deref()
    }

    /// 解析单个 UA，不改变解析器当前的 UA
    pub fn parse(&self, ua: &str) -> ParsedAgent {
        Self::with_library(Arc::clone(&self.library)).with_ua(ua).result()
    }

    pub fn browser(&self) -> Browser {
        let mut record = self.extract(Category::Browser);
        let major = VersionExtractor::major(record.get(field::VERSION));
        record.set(field::MAJOR, major);
        Browser::from(record)
    }

    pub fn engine(&self) -> Engine {
        Engine::from(self.extract(Category::Engine))
    }

    pub fn os(&self) -> Os {
        Os::from(self.extract(Category::Os))
    }

    pub fn device(&self) -> Device {
        Device::from(self.extract(Category::Device))
    }

    pub fn cpu(&self) -> Cpu {
        Cpu::from(self.extract(Category::Cpu))
    }

    /// 汇总全部维度
    pub fn result(&self) -> ParsedAgent {
        ParsedAgent {
            ua: self.ua.clone().unwrap_or_default(),
            browser: self.browser(),
            engine: self.engine(),
            os: self.os(),
            device: self.device(),
            cpu: self.cpu(),
        }
    }

    /// 单维度匹配，规则库缺少该维度时返回全部缺失的记录
    fn extract(&self, category: Category) -> FieldRecord {
        let mut record = category.empty_record();
        if let Some(table) = self.library.table(category) {
            RuleEngine::extract(&mut record, self.ua.as_deref(), table);
        }
        record
    }
}
