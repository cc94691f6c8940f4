//! 字段提取服务 - 业务能力层
//!
//! 按固定顺序尝试策略链，第一个能解析出数值的候选元素胜出。
//! 查询失败、候选文本无法解析都只是"跳过"，不会变成错误。
//!
//! 策略 XPath 作用于整个文档，但只取位于行锚点之后的候选（锚点之后没有
//! 匹配时才退回到全部候选）。明细通常渲染在所属行之后，前面仍保持展开的
//! 行就不会抢先命中。已知局限：明细若渲染在所有行之前且多行同时展开，
//! 仍会读到第一个可见匹配。

use tracing::{debug, warn};

use crate::infrastructure::PageSession;
use crate::models::{ExtractionOutcome, Field, RowCtx, Strategy, StrategyTable};
use crate::services::field_parser::parse_field;
use crate::utils::logging::truncate_text;

/// 字段提取服务
pub struct FieldExtractor {
    strategies: StrategyTable,
}

impl FieldExtractor {
    pub fn new(strategies: StrategyTable) -> Self {
        Self { strategies }
    }

    /// 提取一个字段
    ///
    /// 永远不返回错误：所有策略都失败时结果为 `NotFound`。
    pub async fn extract<S: PageSession>(
        &self,
        session: &S,
        field: Field,
        ctx: &RowCtx,
    ) -> ExtractionOutcome {
        debug!("{} 正在查找 {} ...", ctx, field);

        for (i, strategy) in self.strategies.for_field(field).iter().enumerate() {
            if let Some(value) = self.try_strategy(session, field, strategy, i + 1, ctx).await {
                debug!(
                    "{} ✓ {} = {} (策略 {} '{}')",
                    ctx,
                    field,
                    value,
                    i + 1,
                    strategy.name
                );
                return ExtractionOutcome::Found(value);
            }
        }

        warn!("{} ⚠️ 无法找到 {} 字段", ctx, field);
        ExtractionOutcome::NotFound
    }

    async fn try_strategy<S: PageSession>(
        &self,
        session: &S,
        field: Field,
        strategy: &Strategy,
        ordinal: usize,
        ctx: &RowCtx,
    ) -> Option<u32> {
        let texts = match session.query_texts_from(&strategy.xpath, &ctx.anchor).await {
            Ok(texts) => texts,
            Err(e) => {
                debug!("{} 策略 {} '{}' 失败: {}", ctx, ordinal, strategy.name, e);
                return None;
            }
        };
        debug!(
            "{} 策略 {} '{}' 找到 {} 个 {} 元素",
            ctx,
            ordinal,
            strategy.name,
            texts.len(),
            field
        );

        first_parseable(field, &texts).or_else(|| {
            if !texts.is_empty() {
                debug!(
                    "{} 策略 {} 的候选文本都无法解析: {:?}",
                    ctx,
                    ordinal,
                    texts.iter().map(|t| truncate_text(t, 40)).collect::<Vec<_>>()
                );
            }
            None
        })
    }
}

/// 返回第一个能解析的候选文本的值
pub fn first_parseable(field: Field, candidates: &[String]) -> Option<u32> {
    candidates.iter().find_map(|text| parse_field(field, text))
}
