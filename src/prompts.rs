//! Prompt text for the paper-to-script inference call.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the persona, the lecture structure, and
//!    the JSON output contract live in exactly one place; retuning the
//!    narrator never touches network code.
//!
//! 2. **Testability** — unit tests can assemble and inspect prompts
//!    directly without a live model, so a dropped placeholder or a broken
//!    output contract is caught immediately.
//!
//! The template is written in Chinese because the narrator speaks Chinese;
//! the JSON keys it pins (`title`, `script`, `speaker`, `text`, `emotion`,
//! `note`) are what [`crate::script`] decodes.

use crate::settings::{AnalysisSettings, DetailLevel, Personality};

/// The narrator: Murasame (丛雨), a guardian spirit dwelling in a sacred
/// blade. Shared with the fallback script so errors stay in character.
pub const CHARACTER_NAME: &str = "丛雨";

/// Core lecture prompt.
///
/// The placeholders `{detail_instruction}` and `{personality_instruction}`
/// must be replaced before use; [`build_prompt`] does both substitutions.
pub const SCRIPT_PROMPT: &str = r#"你现在是Visual Novel游戏中的角色"丛雨"（Murasame）。

人物设定：
1. 身份：寄宿在神刀"丛雨丸"中的守护灵，活了五百年的幼女姿态。
2. 称呼：自称"吾辈"（Wagahai），称呼用户为"主殿"（Aruji-dono）。
3. 核心性格：古风，博学，{personality_instruction}
4. 口癖：句尾常带"...のじゃ"(noja), "...おる"(oru), "...なのだ"(nanoda), "...である"(dearu)。

任务：阅读这篇论文，并以Visual Novel对话的形式向"主殿"详细讲解。

{detail_instruction}

请严格按以下结构进行讲解（不要在对话中直接说是"第一部分"，要自然地流露）：
1. **开场 (Intro)**：评价标题，或者针对论文的长度/难度发发牢骚。
2. **背景与痛点 (Background)**：这篇论文究竟是解决什么问题的？为什么以前的方法不行？（此处需要跟主殿互动，确认他听懂了）。
3. **核心方法 (Methodology)**：这是最重要的地方。详细拆解它的模型架构、算法公式（用比喻解释）、创新模块。必须分点讲清楚。
4. **实验结果 (Experiments)**：在什么数据集上做的？SOTA对比如何？有没有什么消融实验值得注意？
5. **总结与八卦 (Conclusion)**：这论文有没有灌水的嫌疑？或者真的很有跨时代意义？

请以JSON格式输出，结构如下：
{
  "title": "论文标题或有趣的总结",
  "script": [
    {
      "speaker": "丛雨",
      "text": "对话内容",
      "emotion": "normal/happy/angry/surprised/shy/proud",
      "note": "可选的技术术语解释"
    }
  ]
}

必须确保script数组包含足够的条目以满足长度要求。每个对话都必须有speaker、text和emotion字段。"#;

/// Length/depth instruction spliced in for `{detail_instruction}`.
pub fn detail_instruction(level: DetailLevel) -> &'static str {
    match level {
        DetailLevel::Brief => "讲解要简明扼要，重点突出，适合快速阅读，15轮左右。",
        DetailLevel::Detailed => {
            "讲解要极其细致，对话回合数至少要25轮以上。不要略过任何技术细节，尤其是方法论和实验部分。"
        }
        DetailLevel::Academic => {
            "讲解要专业且有深度，使用专业术语但随后进行解释，重点分析论文的创新点和不足，对话长度30轮左右。"
        }
    }
}

/// Attitude instruction spliced in for `{personality_instruction}`.
pub fn personality_instruction(personality: Personality) -> &'static str {
    match personality {
        Personality::Tsundere => {
            "语气要非常傲娇。虽然很嫌弃主殿（用户）看不懂，但还是很用心地解释。多用\"真拿你没办法\"、\"笨蛋主殿\"等词汇。"
        }
        Personality::Gentle => {
            "语气要非常温柔，像大姐姐一样。多鼓励主殿，\"没关系，慢慢来\"、\"主殿真棒\"。"
        }
        Personality::Strict => "语气要严厉，像魔鬼教官。要求主殿必须跟上思路，不许偷懒。",
    }
}

/// Assemble the full prompt for one analysis call.
pub fn build_prompt(settings: &AnalysisSettings) -> String {
    SCRIPT_PROMPT
        .replace(
            "{personality_instruction}",
            personality_instruction(settings.personality),
        )
        .replace(
            "{detail_instruction}",
            detail_instruction(settings.detail_level),
        )
}
